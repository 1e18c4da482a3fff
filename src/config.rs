//! Field configuration.
//!
//! Every tunable of the simulator lives here. Each option scales or gates
//! exactly one force or visual computation; there is no coupling between
//! options, so they can be adjusted independently.
//!
//! # Usage
//!
//! ```ignore
//! Simulation::new()
//!     .with_config(|c| {
//!         c.attraction_radius = 400.0;
//!         c.click_burst = 16;
//!     })
//!     .run()
//! ```

/// Tunable parameters for a [`ParticleField`](crate::ParticleField).
///
/// Defaults reproduce the reference behavior: a blue-to-purple field of up
/// to 150 particles that orbits, sticks to, and scatters away from the
/// pointer, with connective lines between neighbors.
#[derive(Debug, Clone)]
pub struct FieldConfig {
    /// Hard cap on the particle count at (re)initialization.
    pub max_particles: usize,
    /// Initial count is `min(max_particles, area / area_divisor)`.
    pub area_divisor: f32,
    /// Cap for the per-frame permanent replenishment target.
    pub sustain_max: usize,
    /// Sustain target is `min(sustain_max, area / sustain_divisor)`.
    pub sustain_divisor: f32,

    /// Outer radius of pointer influence. Between `repulsion_radius` and
    /// this, particles are pulled toward the pointer.
    pub attraction_radius: f32,
    /// Below this distance particles are pushed away instead.
    pub repulsion_radius: f32,
    /// Sub-band of the repulsion zone with an extra outward impulse and
    /// maximal visual response.
    pub explosion_radius: f32,
    /// Tight inner band with a strong direct pull ("stick").
    pub stick_radius: f32,
    /// Band with a tangential velocity component ("orbit").
    pub orbit_radius: f32,
    /// Pointer velocity bleeds into particle velocity inside this radius.
    pub velocity_influence_radius: f32,

    /// Multiplicative velocity damping applied every frame. Must be < 1
    /// for motion to decay.
    pub friction: f32,
    /// Amplitude of the per-particle floating oscillation. Zero freezes
    /// the idle drift entirely.
    pub float_strength: f32,
    /// Particles wrap to the opposite edge once they pass this many pixels
    /// beyond the canvas.
    pub wrap_margin: f32,
    /// Bounded position history per particle, for the fading trail.
    pub trail_len: usize,

    /// Resting hue range in degrees. Default 200..260 (blue to purple).
    pub hue_min: f32,
    pub hue_max: f32,

    /// Pointer speed (px/frame) above which motion bursts may spawn.
    pub spawn_speed_threshold: f32,
    /// Minimum milliseconds between motion bursts.
    pub spawn_cooldown_ms: u64,
    /// Maximum temporaries per motion burst.
    pub burst_max: usize,
    /// Temporaries per click burst. Clicks ignore the motion cooldown.
    pub click_burst: usize,
    /// Temporary lifetime is sampled from this range, in frames.
    pub temp_life_min: u32,
    pub temp_life_max: u32,
    /// Temporaries fade exponentially over their final frames.
    pub fade_window: u32,

    /// Maximum distance for a connective line between two particles.
    pub connection_distance: f32,

    /// RNG seed. `None` seeds from entropy; tests pin this for
    /// reproducible fields.
    pub seed: Option<u64>,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            max_particles: 150,
            area_divisor: 8_000.0,
            sustain_max: 120,
            sustain_divisor: 10_000.0,

            attraction_radius: 300.0,
            repulsion_radius: 30.0,
            explosion_radius: 15.0,
            stick_radius: 20.0,
            orbit_radius: 60.0,
            velocity_influence_radius: 100.0,

            friction: 0.98,
            float_strength: 0.001,
            wrap_margin: 10.0,
            trail_len: 8,

            hue_min: 200.0,
            hue_max: 260.0,

            spawn_speed_threshold: 2.0,
            spawn_cooldown_ms: 50,
            burst_max: 3,
            click_burst: 8,
            temp_life_min: 100,
            temp_life_max: 200,
            fade_window: 30,

            connection_distance: 120.0,

            seed: None,
        }
    }
}

impl FieldConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Target particle count for a canvas of the given size, at
    /// initialization time.
    pub fn initial_count(&self, width: f32, height: f32) -> usize {
        let by_area = (width * height / self.area_divisor).floor() as usize;
        by_area.min(self.max_particles)
    }

    /// Permanent population the spawner maintains during the run.
    pub fn sustain_count(&self, width: f32, height: f32) -> usize {
        let by_area = (width * height / self.sustain_divisor).floor() as usize;
        by_area.min(self.sustain_max)
    }

    /// Fixed seed for deterministic runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_count_area_scaled() {
        let config = FieldConfig::default();
        // 800x600 = 480000 / 8000 = 60 particles, under the cap
        assert_eq!(config.initial_count(800.0, 600.0), 60);
    }

    #[test]
    fn test_initial_count_capped() {
        let config = FieldConfig::default();
        // 4K area would want 1000+, cap wins
        assert_eq!(config.initial_count(3840.0, 2160.0), 150);
    }

    #[test]
    fn test_sustain_below_initial() {
        let config = FieldConfig::default();
        let (w, h) = (1920.0, 1080.0);
        assert!(config.sustain_count(w, h) <= config.initial_count(w, h));
    }
}
