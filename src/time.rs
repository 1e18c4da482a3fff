//! Frame timing and the spawn cooldown.
//!
//! The simulator is stepped per display frame, so most of its constants are
//! frame-based rather than time-based. Wall time only matters in one place:
//! the motion-burst cooldown, which is a plain elapsed-time comparison
//! against the previous burst.

use std::time::{Duration, Instant};

/// Per-frame clock for the run loop.
///
/// Tracks elapsed time, delta time, and frame count.
#[derive(Debug)]
pub struct FrameClock {
    start: Instant,
    last_frame: Instant,
    elapsed: Duration,
    delta_secs: f32,
    frame_count: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_frame: now,
            elapsed: Duration::ZERO,
            delta_secs: 0.0,
            frame_count: 0,
        }
    }

    /// Advance the clock. Call once per frame; returns the elapsed time.
    pub fn tick(&mut self) -> Duration {
        let now = Instant::now();
        self.delta_secs = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.elapsed = now.duration_since(self.start);
        self.frame_count += 1;
        self.elapsed
    }

    /// Total time since the clock was created.
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Seconds since the previous tick.
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    /// Frames ticked so far.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Elapsed-time gate for the motion-burst spawner.
///
/// `ready` takes the caller's notion of "now" so the simulator stays
/// deterministic under synthetic clocks.
#[derive(Debug)]
pub struct Cooldown {
    interval: Duration,
    last: Option<Duration>,
}

impl Cooldown {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    pub fn from_millis(millis: u64) -> Self {
        Self::new(Duration::from_millis(millis))
    }

    /// True when at least `interval` has passed since the last trigger
    /// (or the cooldown has never fired). Does not consume the window.
    pub fn ready(&self, now: Duration) -> bool {
        match self.last {
            Some(last) => now.saturating_sub(last) >= self.interval,
            None => true,
        }
    }

    /// Record a trigger at `now`.
    pub fn trigger(&mut self, now: Duration) {
        self.last = Some(now);
    }
}
