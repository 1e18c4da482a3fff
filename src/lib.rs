//! # driftfield
//!
//! A mouse-reactive 2D particle field: a drifting constellation of glowing
//! particles joined by a connective web, reacting to the pointer with
//! attraction, orbiting, repulsion, and burst effects.
//!
//! ## Quick Start
//!
//! ```ignore
//! use driftfield::prelude::*;
//!
//! fn main() -> Result<(), SimulationError> {
//!     Simulation::new()
//!         .with_title("starfield")
//!         .with_config(|c| {
//!             c.attraction_radius = 400.0;
//!             c.click_burst = 12;
//!         })
//!         .with_visuals(|v| v.blend_mode = BlendMode::Additive)
//!         .run()
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Bands
//!
//! The pointer projects three concentric distance bands onto the field:
//! an outer **attraction** band (with nested stick and orbit sub-bands),
//! an inner **repulsion** band (with a nested explosion sub-band), and
//! the neutral region beyond, where particles relax back to rest. All
//! radii and force factors are [`FieldConfig`] fields.
//!
//! ### Lifecycle
//!
//! Permanent particles live until the canvas is resized; the population
//! is derived from the canvas area and replenished when it dips.
//! Temporary particles, spawned in rings by fast pointer motion and
//! clicks, carry a frame-counted lifetime and fade out on their own.
//!
//! ### Driving the field yourself
//!
//! [`Simulation`] owns the window and frame loop, but the simulator is
//! plain data: construct a [`ParticleField`], feed it
//! [`PointerFrame`]s, and read the arena back out - that is exactly what
//! the tests do.

pub mod config;
pub mod error;
pub mod field;
pub mod gpu;
pub mod mesh;
pub mod particle;
pub mod pointer;
pub mod simulation;
pub mod time;
pub mod visuals;

pub use config::FieldConfig;
pub use error::{GpuError, SimulationError};
pub use field::ParticleField;
pub use glam::Vec2;
pub use mesh::{connection_strength, FrameMesh};
pub use particle::{Arena, Particle, ParticleClass};
pub use pointer::{PointerFrame, PointerTracker};
pub use simulation::Simulation;
pub use time::{Cooldown, FrameClock};
pub use visuals::{BlendMode, InteractionState, VisualConfig};

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::config::FieldConfig;
    pub use crate::error::SimulationError;
    pub use crate::field::ParticleField;
    pub use crate::mesh::FrameMesh;
    pub use crate::pointer::{PointerFrame, PointerTracker};
    pub use crate::simulation::Simulation;
    pub use crate::visuals::{BlendMode, VisualConfig};
    pub use glam::Vec2;
}
