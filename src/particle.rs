//! Particle data model and storage.
//!
//! A [`Particle`] carries its kinematic state plus a pair of visual values
//! (resting and current) for radius, opacity, and hue. The current values
//! are driven up by pointer forces and relax back toward resting once the
//! particle leaves all interaction bands.
//!
//! Particles live in an [`Arena`]: a preallocated slot pool with alive flags
//! and a free list. Temporary particles are removed by index without
//! shifting the rest of the pool, so steady-state frames allocate nothing.

use glam::Vec2;

/// Lifecycle class of a particle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleClass {
    /// Lives until the field is reinitialized (resize).
    Permanent,
    /// Removed once `life` reaches zero. `life` is in frames and is
    /// monotonically non-increasing.
    Temporary { life: u32 },
}

/// A single point in a particle's trail.
#[derive(Debug, Clone, Copy)]
pub struct TrailPoint {
    pub position: Vec2,
    /// Particle opacity at the time the point was recorded.
    pub opacity: f32,
}

/// Bounded history of a particle's recent positions, oldest first.
///
/// Backed by a ring buffer; pushing beyond the bound evicts the oldest
/// entry without shifting or reallocating.
#[derive(Debug, Clone)]
pub struct Trail {
    points: Vec<TrailPoint>,
    head: usize,
    cap: usize,
}

impl Trail {
    pub fn new(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
            head: 0,
            cap: capacity,
        }
    }

    pub fn push(&mut self, position: Vec2, opacity: f32) {
        if self.cap == 0 {
            return;
        }
        let point = TrailPoint { position, opacity };
        if self.points.len() < self.cap {
            self.points.push(point);
        } else {
            // Full: overwrite the oldest slot and advance the head.
            self.points[self.head] = point;
            self.head = (self.head + 1) % self.cap;
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterate oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &TrailPoint> {
        let (tail, front) = self.points.split_at(self.head);
        front.iter().chain(tail.iter())
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.head = 0;
    }
}

/// One particle of the field.
#[derive(Debug, Clone)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,

    /// Resting visual values, fixed at spawn.
    pub resting_radius: f32,
    pub resting_opacity: f32,
    pub resting_hue: f32,

    /// Current visual values, forced by interaction and relaxing back.
    pub radius: f32,
    pub opacity: f32,
    pub hue: f32,

    /// Upper bounds the explosion band saturates toward.
    pub max_radius: f32,
    pub max_opacity: f32,

    /// Accumulated force magnitudes, decayed each neutral frame. These
    /// drive the gradient palette and glow selection.
    pub magnetic_force: f32,
    pub repulsion_force: f32,

    /// Floating drift oscillator.
    pub float_phase: f32,
    pub float_speed: f32,

    pub class: ParticleClass,
    pub trail: Trail,
}

impl Particle {
    pub fn is_temporary(&self) -> bool {
        matches!(self.class, ParticleClass::Temporary { .. })
    }

    /// Remaining life in frames, if temporary.
    pub fn life(&self) -> Option<u32> {
        match self.class {
            ParticleClass::Temporary { life } => Some(life),
            ParticleClass::Permanent => None,
        }
    }
}

/// Slot-pool storage for particles.
///
/// Indices are stable for the lifetime of a particle; freed slots are
/// recycled on the next insert.
#[derive(Debug, Default)]
pub struct Arena {
    slots: Vec<Option<Particle>>,
    free: Vec<usize>,
    live: usize,
}

impl Arena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            live: 0,
        }
    }

    /// Number of live particles.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Insert a particle, reusing a freed slot when one exists.
    pub fn insert(&mut self, particle: Particle) -> usize {
        self.live += 1;
        match self.free.pop() {
            Some(index) => {
                self.slots[index] = Some(particle);
                index
            }
            None => {
                self.slots.push(Some(particle));
                self.slots.len() - 1
            }
        }
    }

    /// Remove the particle at `index`. Already-dead and out-of-range
    /// indices are no-ops so a particle cannot be freed twice.
    pub fn kill(&mut self, index: usize) {
        let Some(slot) = self.slots.get_mut(index) else {
            return;
        };
        if slot.take().is_some() {
            self.free.push(index);
            self.live -= 1;
        }
    }

    pub fn get(&self, index: usize) -> Option<&Particle> {
        self.slots.get(index).and_then(|slot| slot.as_ref())
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Particle> {
        self.slots.get_mut(index).and_then(|slot| slot.as_mut())
    }

    /// Iterate live particles with their slot indices.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Particle)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|p| (i, p)))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, &mut Particle)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_mut().map(|p| (i, p)))
    }

    /// Drop all particles but keep the allocation.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.live = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_particle() -> Particle {
        Particle {
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            resting_radius: 3.0,
            resting_opacity: 0.7,
            resting_hue: 220.0,
            radius: 3.0,
            opacity: 0.7,
            hue: 220.0,
            max_radius: 24.0,
            max_opacity: 1.0,
            magnetic_force: 0.0,
            repulsion_force: 0.0,
            float_phase: 0.0,
            float_speed: 0.1,
            class: ParticleClass::Permanent,
            trail: Trail::new(4),
        }
    }

    #[test]
    fn test_trail_evicts_oldest() {
        let mut trail = Trail::new(3);
        for i in 0..5 {
            trail.push(Vec2::new(i as f32, 0.0), 1.0);
        }
        assert_eq!(trail.len(), 3);
        let xs: Vec<f32> = trail.iter().map(|p| p.position.x).collect();
        assert_eq!(xs, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_trail_partial_fill_order() {
        let mut trail = Trail::new(8);
        trail.push(Vec2::new(1.0, 0.0), 1.0);
        trail.push(Vec2::new(2.0, 0.0), 1.0);
        let xs: Vec<f32> = trail.iter().map(|p| p.position.x).collect();
        assert_eq!(xs, vec![1.0, 2.0]);
    }

    #[test]
    fn test_arena_reuses_freed_slots() {
        let mut arena = Arena::new();
        let a = arena.insert(test_particle());
        let _b = arena.insert(test_particle());
        arena.kill(a);
        assert_eq!(arena.len(), 1);

        let c = arena.insert(test_particle());
        assert_eq!(c, a);
        assert_eq!(arena.len(), 2);
        assert_eq!(arena.slots.len(), 2);
    }

    #[test]
    fn test_arena_double_kill_is_noop() {
        let mut arena = Arena::new();
        let a = arena.insert(test_particle());
        arena.kill(a);
        arena.kill(a);
        assert_eq!(arena.len(), 0);
        assert_eq!(arena.free.len(), 1);
    }

    #[test]
    fn test_arena_kill_out_of_range_is_noop() {
        let mut arena = Arena::new();
        arena.insert(test_particle());
        arena.kill(17);
        assert_eq!(arena.len(), 1);
        assert!(arena.free.is_empty());
    }

    #[test]
    fn test_arena_iter_skips_dead() {
        let mut arena = Arena::new();
        let a = arena.insert(test_particle());
        let b = arena.insert(test_particle());
        arena.kill(a);
        let indices: Vec<usize> = arena.iter().map(|(i, _)| i).collect();
        assert_eq!(indices, vec![b]);
    }
}
