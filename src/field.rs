//! The particle field simulator.
//!
//! [`ParticleField`] exclusively owns the particle arena and advances it
//! once per display frame. Pointer input arrives as a drained
//! [`PointerFrame`]; nothing outside the field reads or mutates particle
//! state directly.
//!
//! The pointer maps to three concentric bands, outermost first:
//!
//! - **attraction** (`repulsion_radius < d < attraction_radius`): a pull
//!   toward the pointer, plus a strong "stick" pull and a tangential orbit
//!   component in two nested inner bands;
//! - **repulsion** (`d < repulsion_radius`): a push away, hue shift, and an
//!   extra outward impulse in the nested explosion band;
//! - **neutral** (beyond `attraction_radius`): no pointer force; visual
//!   values relax back toward their resting levels.
//!
//! Pointer velocity also bleeds into nearby particles, a per-particle
//! oscillator keeps the field drifting when idle, and edges wrap
//! toroidally.

use std::f32::consts::TAU;
use std::time::Duration;

use glam::Vec2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::FieldConfig;
use crate::particle::{Arena, Particle, ParticleClass, Trail};
use crate::pointer::PointerFrame;
use crate::time::Cooldown;

/// Guard for force denominators when the pointer sits exactly on a
/// particle.
const MIN_DISTANCE: f32 = 1e-4;

/// A mouse-reactive field of particles over a 2D canvas.
pub struct ParticleField {
    config: FieldConfig,
    arena: Arena,
    width: f32,
    height: f32,
    spawn_cooldown: Cooldown,
    rng: SmallRng,
    removals: Vec<usize>,
}

impl ParticleField {
    /// Create a field sized to the canvas and populate it with
    /// `min(max_particles, area / area_divisor)` permanent particles.
    pub fn new(config: FieldConfig, width: f32, height: f32) -> Self {
        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        let spawn_cooldown = Cooldown::from_millis(config.spawn_cooldown_ms);
        let mut field = Self {
            config,
            arena: Arena::new(),
            width,
            height,
            spawn_cooldown,
            rng,
            removals: Vec::new(),
        };
        field.reinit();
        field
    }

    /// Discard all particles and repopulate for new canvas dimensions.
    /// Must be called on every canvas resize.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        self.reinit();
    }

    fn reinit(&mut self) {
        self.arena.clear();
        let count = self.config.initial_count(self.width, self.height);
        for _ in 0..count {
            let particle = self.make_particle(None, ParticleClass::Permanent);
            self.arena.insert(particle);
        }
        log::debug!(
            "field init: {}x{} -> {} particles",
            self.width,
            self.height,
            count
        );
    }

    /// Advance the field one frame.
    ///
    /// `now` is elapsed wall time, used only for the motion-burst
    /// cooldown.
    pub fn step(&mut self, pointer: &PointerFrame, now: Duration) {
        self.update_particles(pointer);
        self.sustain_population();
        self.motion_burst(pointer, now);
        for &click in &pointer.clicks {
            self.click_burst(click);
        }
    }

    /// Live particle storage, for mesh assembly and inspection.
    pub fn particles(&self) -> &Arena {
        &self.arena
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    // ========== Per-frame update ==========

    fn update_particles(&mut self, pointer: &PointerFrame) {
        let config = &self.config;
        let (width, height) = (self.width, self.height);
        self.removals.clear();

        for (index, particle) in self.arena.iter_mut() {
            let keep = step_particle(config, particle, pointer, width, height);
            if !keep {
                self.removals.push(index);
            }
        }

        let removals = std::mem::take(&mut self.removals);
        for index in &removals {
            self.arena.kill(*index);
        }
        self.removals = removals;
    }

    // ========== Spawning policy ==========

    /// Top the permanent population back up to the sustain target, one
    /// particle per frame.
    fn sustain_population(&mut self) {
        let permanent = self
            .arena
            .iter()
            .filter(|(_, p)| !p.is_temporary())
            .count();
        if permanent < self.config.sustain_count(self.width, self.height) {
            let particle = self.make_particle(None, ParticleClass::Permanent);
            self.arena.insert(particle);
        }
    }

    /// Fast pointer motion emits a small ring of temporaries around the
    /// cursor, rate-limited by the cooldown.
    fn motion_burst(&mut self, pointer: &PointerFrame, now: Duration) {
        let Some(center) = pointer.position else {
            return;
        };
        let speed = pointer.speed();
        if speed <= self.config.spawn_speed_threshold || !self.spawn_cooldown.ready(now) {
            return;
        }

        let count = ((speed / 5.0) as usize).min(self.config.burst_max);
        for i in 0..count {
            let angle = TAU * i as f32 / count as f32 + self.rng.gen::<f32>() * 0.5;
            let distance = 20.0 + self.rng.gen::<f32>() * 30.0;
            let position = center + Vec2::from_angle(angle) * distance;
            let life = self.random_life();
            let particle = self.make_particle(Some(position), ParticleClass::Temporary { life });
            self.arena.insert(particle);
        }
        self.spawn_cooldown.trigger(now);
    }

    /// Clicks emit a fixed-size ring burst, independent of the motion
    /// cooldown.
    fn click_burst(&mut self, center: Vec2) {
        let count = self.config.click_burst;
        for i in 0..count {
            let angle = TAU * i as f32 / count as f32;
            let distance = 30.0 + self.rng.gen::<f32>() * 50.0;
            let position = center + Vec2::from_angle(angle) * distance;
            let life = self.random_life();
            let particle = self.make_particle(Some(position), ParticleClass::Temporary { life });
            self.arena.insert(particle);
        }
    }

    /// Insert a permanent particle at a chosen position and velocity.
    /// Visual values are randomized as usual.
    pub fn spawn_at(&mut self, position: Vec2, velocity: Vec2) -> usize {
        let mut particle = self.make_particle(Some(position), ParticleClass::Permanent);
        particle.velocity = velocity;
        self.arena.insert(particle)
    }

    /// Insert a temporary particle with an explicit lifetime in frames.
    pub fn spawn_temporary_at(&mut self, position: Vec2, velocity: Vec2, life: u32) -> usize {
        let mut particle = self.make_particle(Some(position), ParticleClass::Temporary { life });
        particle.velocity = velocity;
        self.arena.insert(particle)
    }

    fn random_life(&mut self) -> u32 {
        self.rng
            .gen_range(self.config.temp_life_min..=self.config.temp_life_max)
    }

    fn make_particle(&mut self, position: Option<Vec2>, class: ParticleClass) -> Particle {
        let (width, height) = (self.width, self.height);
        let rng = &mut self.rng;
        let position = position
            .unwrap_or_else(|| Vec2::new(rng.gen::<f32>() * width, rng.gen::<f32>() * height));
        let velocity = Vec2::new(
            (rng.gen::<f32>() - 0.5) * 1.5,
            (rng.gen::<f32>() - 0.5) * 1.5,
        );
        let radius = rng.gen::<f32>() * 2.0 + 2.0;
        let opacity = rng.gen::<f32>() * 0.6 + 0.4;
        let hue = rng.gen_range(self.config.hue_min..self.config.hue_max);

        Particle {
            position,
            velocity,
            resting_radius: radius,
            resting_opacity: opacity,
            resting_hue: hue,
            radius,
            opacity,
            hue,
            max_radius: radius * 8.0,
            max_opacity: 1.0,
            magnetic_force: 0.0,
            repulsion_force: 0.0,
            float_phase: rng.gen::<f32>() * TAU,
            float_speed: 0.02 + rng.gen::<f32>() * 0.2,
            class,
            trail: Trail::new(self.config.trail_len),
        }
    }
}

/// Advance one particle one frame. Returns false when the particle's life
/// has run out and it must leave the live set.
fn step_particle(
    config: &FieldConfig,
    p: &mut Particle,
    pointer: &PointerFrame,
    width: f32,
    height: f32,
) -> bool {
    let fading = matches!(p.class, ParticleClass::Temporary { life } if life <= config.fade_window);

    let mut force = Vec2::ZERO;
    let mut in_band = false;

    if let Some(mouse) = pointer.position {
        let delta = mouse - p.position;
        let distance = delta.length().max(MIN_DISTANCE);
        let toward = delta / distance;

        if distance < config.attraction_radius && distance > config.repulsion_radius {
            in_band = true;

            // Stick: direct, un-normalized pull right next to the cursor.
            if distance < config.stick_radius {
                p.velocity += delta * 0.15;
            }

            // Orbit: tangential kick, strongest at the center of the band.
            if distance < config.orbit_radius {
                let strength = (config.orbit_radius - distance) / config.orbit_radius;
                p.velocity += Vec2::new(-toward.y, toward.x) * strength;
            }

            let attraction =
                (config.attraction_radius - distance) / config.attraction_radius * 0.01;
            force += toward * attraction;
            p.magnetic_force = attraction;

            p.radius = p.resting_radius + attraction * 20.0;
            p.opacity = (p.resting_opacity + attraction * 3.0).min(p.max_opacity);
        } else if distance < config.repulsion_radius {
            in_band = true;

            let repulsion = (config.repulsion_radius - distance) / config.repulsion_radius * 3.0;
            force -= toward * repulsion;
            p.repulsion_force = repulsion;

            p.radius = p.resting_radius + repulsion * 40.0;
            p.opacity = (p.resting_opacity + repulsion * 3.0).min(p.max_opacity);
            p.hue = (p.hue + repulsion * 50.0).rem_euclid(360.0);

            if distance < config.explosion_radius {
                let explosion =
                    (config.explosion_radius - distance) / config.explosion_radius * 0.2;
                force -= toward * explosion;
                p.radius = (p.resting_radius + explosion * 80.0).min(p.max_radius);
                p.opacity = p.max_opacity;
            }
        }

        // Pointer velocity bleeds into particles near the cursor,
        // regardless of band.
        if distance < config.velocity_influence_radius {
            let influence = (pointer.speed() / 20.0).min(1.0);
            force += pointer.velocity * 0.001 * influence;
        }
    }

    if !in_band {
        // Relax toward resting values; forces decay exponentially rather
        // than resetting.
        p.radius += (p.resting_radius - p.radius) * 0.1;
        if !fading {
            p.opacity += (p.resting_opacity - p.opacity) * 0.1;
        }
        p.magnetic_force *= 0.95;
        p.repulsion_force *= 0.95;
    }

    p.velocity += force;

    // Floating drift so the field never sits still.
    p.float_phase += p.float_speed;
    p.velocity += Vec2::new(p.float_phase.cos(), p.float_phase.sin()) * config.float_strength;

    p.position += p.velocity;
    p.velocity *= config.friction;

    p.trail.push(p.position, p.opacity);

    wrap_position(&mut p.position, width, height, config.wrap_margin);

    if let ParticleClass::Temporary { ref mut life } = p.class {
        // Saturating so a zero-life insert dies here instead of wrapping
        // into an immortal particle.
        *life = life.saturating_sub(1);
        if *life == 0 {
            return false;
        }
        if *life <= config.fade_window {
            p.opacity *= 0.95;
        }
    }
    true
}

/// Toroidal wraparound: a particle past one edge (beyond the margin)
/// reappears at the opposite edge. Velocity is untouched.
pub(crate) fn wrap_position(position: &mut Vec2, width: f32, height: f32, margin: f32) {
    if position.x < -margin {
        position.x = width + margin;
    } else if position.x > width + margin {
        position.x = -margin;
    }
    if position.y < -margin {
        position.y = height + margin;
    } else if position.y > height + margin {
        position.y = -margin;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet_config() -> FieldConfig {
        // Area too small for any particles, so tests control the
        // population explicitly.
        FieldConfig {
            area_divisor: 1e12,
            sustain_divisor: 1e12,
            seed: Some(7),
            ..FieldConfig::default()
        }
    }

    fn idle_pointer() -> PointerFrame {
        PointerFrame::default()
    }

    #[test]
    fn test_wrap_all_edges() {
        let (w, h, m) = (800.0, 600.0, 10.0);

        let mut p = Vec2::new(w + m + 1.0, 300.0);
        wrap_position(&mut p, w, h, m);
        assert_eq!(p, Vec2::new(-m, 300.0));

        let mut p = Vec2::new(-m - 1.0, 300.0);
        wrap_position(&mut p, w, h, m);
        assert_eq!(p, Vec2::new(w + m, 300.0));

        let mut p = Vec2::new(400.0, h + m + 0.5);
        wrap_position(&mut p, w, h, m);
        assert_eq!(p, Vec2::new(400.0, -m));

        let mut p = Vec2::new(400.0, -m - 0.5);
        wrap_position(&mut p, w, h, m);
        assert_eq!(p, Vec2::new(400.0, h + m));
    }

    #[test]
    fn test_wrap_inside_is_noop() {
        let mut p = Vec2::new(10.0, 10.0);
        wrap_position(&mut p, 800.0, 600.0, 10.0);
        assert_eq!(p, Vec2::new(10.0, 10.0));
    }

    #[test]
    fn test_step_survives_empty_field() {
        let mut field = ParticleField::new(quiet_config(), 100.0, 100.0);
        field.step(&idle_pointer(), Duration::ZERO);
        assert_eq!(field.particles().len(), 0);
    }

    #[test]
    fn test_click_burst_count() {
        let mut field = ParticleField::new(quiet_config(), 800.0, 600.0);
        let frame = PointerFrame {
            position: Some(Vec2::new(400.0, 300.0)),
            velocity: Vec2::ZERO,
            clicks: vec![Vec2::new(400.0, 300.0)],
        };
        field.step(&frame, Duration::ZERO);
        assert_eq!(field.particles().len(), field.config().click_burst);
        assert!(field.particles().iter().all(|(_, p)| p.is_temporary()));
    }

    #[test]
    fn test_motion_burst_respects_cooldown() {
        let mut config = quiet_config();
        config.spawn_cooldown_ms = 50;
        let mut field = ParticleField::new(config, 800.0, 600.0);

        let fast = PointerFrame {
            position: Some(Vec2::new(400.0, 300.0)),
            velocity: Vec2::new(30.0, 0.0),
            clicks: Vec::new(),
        };

        field.step(&fast, Duration::from_millis(0));
        let after_first = field.particles().len();
        assert!(after_first > 0);

        // Inside the cooldown window nothing new spawns.
        field.step(&fast, Duration::from_millis(10));
        assert_eq!(field.particles().len(), after_first);

        // Past the window the burst fires again.
        field.step(&fast, Duration::from_millis(60));
        assert!(field.particles().len() > after_first);
    }

    #[test]
    fn test_slow_pointer_never_bursts() {
        let mut field = ParticleField::new(quiet_config(), 800.0, 600.0);
        let slow = PointerFrame {
            position: Some(Vec2::new(400.0, 300.0)),
            velocity: Vec2::new(1.0, 0.0),
            clicks: Vec::new(),
        };
        for i in 0..20 {
            field.step(&slow, Duration::from_millis(i * 100));
        }
        assert_eq!(field.particles().len(), 0);
    }

    #[test]
    fn test_sustain_replenishes_permanents() {
        let mut config = quiet_config();
        // 800x600 / 10000 = 48 sustain target, one added per frame.
        config.sustain_divisor = 10_000.0;
        let mut field = ParticleField::new(config, 800.0, 600.0);
        assert_eq!(field.particles().len(), 0);

        for _ in 0..48 {
            field.step(&idle_pointer(), Duration::ZERO);
        }
        assert_eq!(field.particles().len(), 48);

        // At target, population holds.
        field.step(&idle_pointer(), Duration::ZERO);
        assert_eq!(field.particles().len(), 48);
    }

    #[test]
    fn test_resize_reinitializes() {
        let mut config = FieldConfig::default();
        config.seed = Some(3);
        let mut field = ParticleField::new(config, 800.0, 600.0);
        let initial = field.particles().len();
        assert_eq!(initial, 60);

        field.resize(400.0, 400.0);
        assert_eq!(field.particles().len(), 20);
        assert!(field
            .particles()
            .iter()
            .all(|(_, p)| p.position.x <= 400.0 && p.position.y <= 400.0));
    }

    #[test]
    fn test_zero_life_temporary_dies_immediately() {
        let mut field = ParticleField::new(quiet_config(), 800.0, 600.0);
        let index = field.spawn_temporary_at(Vec2::new(400.0, 300.0), Vec2::ZERO, 0);

        field.step(&idle_pointer(), Duration::ZERO);
        assert!(field.particles().get(index).is_none());

        let index = field.spawn_temporary_at(Vec2::new(400.0, 300.0), Vec2::ZERO, 1);
        field.step(&idle_pointer(), Duration::ZERO);
        assert!(field.particles().get(index).is_none());
    }

    #[test]
    fn test_orbit_band_adds_tangential_velocity() {
        let config = quiet_config();
        let mut field = ParticleField::new(config.clone(), 800.0, 600.0);
        let particle = field.make_particle(
            Some(Vec2::new(400.0 + 40.0, 300.0)),
            ParticleClass::Permanent,
        );
        let index = field.arena.insert(Particle {
            velocity: Vec2::ZERO,
            ..particle
        });

        let frame = PointerFrame {
            position: Some(Vec2::new(400.0, 300.0)),
            velocity: Vec2::ZERO,
            clicks: Vec::new(),
        };
        field.update_particles(&frame);

        // Pointer is due -x of the particle; the orbit kick is
        // perpendicular to that axis.
        let p = field.arena.get(index).unwrap();
        assert!(p.velocity.y.abs() > 0.1);
    }
}
