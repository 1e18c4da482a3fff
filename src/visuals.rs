//! Visual configuration and color policy.
//!
//! Rendering appearance is kept separate from the force model: the field
//! tracks hue and force magnitudes, and this module decides what colors
//! they turn into. Particles are drawn as radial gradients whose stops
//! shift with the interaction state, with an extra bright core ("glow")
//! once the acting force passes a threshold.
//!
//! # Usage
//!
//! ```ignore
//! Simulation::new()
//!     .with_visuals(|v| {
//!         v.blend_mode = BlendMode::Additive;
//!         v.background = Vec3::ZERO;
//!     })
//!     .run()
//! ```

use glam::Vec3;

/// How particle colors combine with the framebuffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    /// Standard alpha blending (default).
    #[default]
    Alpha,
    /// Additive blending. Overlapping particles brighten; good for dense
    /// glowing fields.
    Additive,
}

/// Rendering options independent of the force model.
#[derive(Debug, Clone)]
pub struct VisualConfig {
    /// Clear color behind the field.
    pub background: Vec3,
    pub blend_mode: BlendMode,

    /// Repulsion force above which the repulsion palette applies.
    pub repelled_threshold: f32,
    /// Magnetic force above which the attraction palette applies.
    pub attracted_threshold: f32,
    /// Force levels that switch the bright core on.
    pub glow_repulsion_threshold: f32,
    pub glow_magnetic_threshold: f32,
    /// Connection strength above which lines get the glow treatment.
    pub connection_glow_threshold: f32,
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            background: Vec3::ZERO,
            blend_mode: BlendMode::Alpha,
            repelled_threshold: 0.1,
            attracted_threshold: 0.001,
            glow_repulsion_threshold: 0.05,
            glow_magnetic_threshold: 0.005,
            connection_glow_threshold: 0.7,
        }
    }
}

/// Which distance band currently dominates a particle's appearance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionState {
    Neutral,
    Attracted,
    Repelled,
}

impl VisualConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify a particle by its accumulated force magnitudes.
    /// Repulsion wins over attraction when both are present.
    pub fn interaction_state(&self, magnetic: f32, repulsion: f32) -> InteractionState {
        if repulsion > self.repelled_threshold {
            InteractionState::Repelled
        } else if magnetic > self.attracted_threshold {
            InteractionState::Attracted
        } else {
            InteractionState::Neutral
        }
    }

    /// Inner and outer gradient stops for a particle body. The gradient
    /// runs inner -> outer -> transparent.
    pub fn gradient_stops(&self, hue: f32, state: InteractionState) -> (Vec3, Vec3) {
        match state {
            InteractionState::Neutral => (
                hsl_to_rgb(hue, 0.8, 0.7),
                hsl_to_rgb(hue + 30.0, 0.6, 0.5),
            ),
            InteractionState::Attracted => (
                hsl_to_rgb(hue, 0.9, 0.8),
                hsl_to_rgb(hue + 60.0, 0.7, 0.6),
            ),
            InteractionState::Repelled => (
                hsl_to_rgb(hue + 180.0, 1.0, 0.8),
                hsl_to_rgb(hue + 210.0, 0.8, 0.6),
            ),
        }
    }

    /// Whether the small high-opacity core is drawn.
    pub fn has_glow(&self, magnetic: f32, repulsion: f32) -> bool {
        repulsion > self.glow_repulsion_threshold || magnetic > self.glow_magnetic_threshold
    }

    /// Color of the line joining two particles: the average of their hues.
    pub fn connection_color(&self, hue_a: f32, hue_b: f32) -> Vec3 {
        hsl_to_rgb((hue_a + hue_b) * 0.5, 0.7, 0.6)
    }
}

/// Convert HSL to RGB.
///
/// * `hue` - degrees, wraps modulo 360
/// * `saturation` - 0.0 (gray) to 1.0 (vivid)
/// * `lightness` - 0.0 (black) to 1.0 (white)
pub fn hsl_to_rgb(hue: f32, saturation: f32, lightness: f32) -> Vec3 {
    let h = hue.rem_euclid(360.0) / 60.0;
    let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let m = lightness - c / 2.0;

    let (r, g, b) = match h as u32 % 6 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    Vec3::new(r + m, g + m, b + m)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hsl_primaries() {
        let red = hsl_to_rgb(0.0, 1.0, 0.5);
        assert!((red.x - 1.0).abs() < 0.001 && red.y < 0.001 && red.z < 0.001);

        let green = hsl_to_rgb(120.0, 1.0, 0.5);
        assert!(green.x < 0.001 && (green.y - 1.0).abs() < 0.001);

        let blue = hsl_to_rgb(240.0, 1.0, 0.5);
        assert!((blue.z - 1.0).abs() < 0.001 && blue.x < 0.001);
    }

    #[test]
    fn test_hsl_wraps_hue() {
        let a = hsl_to_rgb(380.0, 0.7, 0.6);
        let b = hsl_to_rgb(20.0, 0.7, 0.6);
        assert!((a - b).length() < 0.001);
    }

    #[test]
    fn test_hsl_lightness_extremes() {
        assert!(hsl_to_rgb(220.0, 0.8, 0.0).length() < 0.001);
        let white = hsl_to_rgb(220.0, 0.8, 1.0);
        assert!((white - Vec3::ONE).length() < 0.001);
    }

    #[test]
    fn test_repulsion_wins_state() {
        let visuals = VisualConfig::default();
        assert_eq!(
            visuals.interaction_state(0.01, 0.5),
            InteractionState::Repelled
        );
        assert_eq!(
            visuals.interaction_state(0.01, 0.0),
            InteractionState::Attracted
        );
        assert_eq!(
            visuals.interaction_state(0.0, 0.0),
            InteractionState::Neutral
        );
    }

    #[test]
    fn test_connection_color_symmetric() {
        let visuals = VisualConfig::default();
        let ab = visuals.connection_color(210.0, 250.0);
        let ba = visuals.connection_color(250.0, 210.0);
        assert!((ab - ba).length() < 1e-6);
    }
}
