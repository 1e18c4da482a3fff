//! Pointer input plumbing.
//!
//! Window events write into a [`PointerTracker`]; the simulator drains one
//! [`PointerFrame`] per tick. This keeps the update step deterministic no
//! matter how many cursor events fired between frames: only the latest
//! position survives (a one-slot buffer), while clicks are queued so none
//! are lost.
//!
//! Pointer velocity is derived at drain time as the delta between the last
//! two drained positions, so it is per-frame, not per-event.

use glam::Vec2;
use winit::event::{ElementState, MouseButton, WindowEvent};

/// Read-model the simulator consumes once per frame.
#[derive(Debug, Clone, Default)]
pub struct PointerFrame {
    /// Latest cursor position, `None` until the cursor first enters.
    pub position: Option<Vec2>,
    /// Position delta since the previous drained frame. Zero when the
    /// cursor has not moved.
    pub velocity: Vec2,
    /// Left-button presses since the previous drained frame, in order.
    pub clicks: Vec<Vec2>,
}

impl PointerFrame {
    /// Pointer speed in pixels per frame.
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }
}

/// Accumulates pointer events between frames.
#[derive(Debug, Default)]
pub struct PointerTracker {
    latest: Option<Vec2>,
    last_drained: Option<Vec2>,
    clicks: Vec<Vec2>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a winit event. Non-pointer events are ignored.
    pub fn handle_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.latest = Some(Vec2::new(position.x as f32, position.y as f32));
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                if let Some(position) = self.latest {
                    self.clicks.push(position);
                }
            }
            _ => {}
        }
    }

    /// Drain the accumulated state into one frame's worth of input.
    pub fn take_frame(&mut self) -> PointerFrame {
        let velocity = match (self.latest, self.last_drained) {
            (Some(now), Some(prev)) => now - prev,
            _ => Vec2::ZERO,
        };
        self.last_drained = self.latest;

        PointerFrame {
            position: self.latest,
            velocity,
            clicks: std::mem::take(&mut self.clicks),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;

    fn moved(x: f64, y: f64) -> WindowEvent {
        WindowEvent::CursorMoved {
            device_id: winit::event::DeviceId::dummy(),
            position: PhysicalPosition::new(x, y),
        }
    }

    #[test]
    fn test_velocity_spans_frames_not_events() {
        let mut tracker = PointerTracker::new();
        tracker.handle_event(&moved(0.0, 0.0));
        let _ = tracker.take_frame();

        // Three events in one frame collapse to the latest position.
        tracker.handle_event(&moved(10.0, 0.0));
        tracker.handle_event(&moved(20.0, 0.0));
        tracker.handle_event(&moved(30.0, 5.0));
        let frame = tracker.take_frame();

        assert_eq!(frame.position, Some(Vec2::new(30.0, 5.0)));
        assert_eq!(frame.velocity, Vec2::new(30.0, 5.0));
    }

    #[test]
    fn test_velocity_zero_without_motion() {
        let mut tracker = PointerTracker::new();
        tracker.handle_event(&moved(50.0, 50.0));
        let _ = tracker.take_frame();
        let frame = tracker.take_frame();
        assert_eq!(frame.velocity, Vec2::ZERO);
        assert_eq!(frame.position, Some(Vec2::new(50.0, 50.0)));
    }

    #[test]
    fn test_no_position_before_first_event() {
        let mut tracker = PointerTracker::new();
        let frame = tracker.take_frame();
        assert!(frame.position.is_none());
        assert_eq!(frame.velocity, Vec2::ZERO);
    }

    #[test]
    fn test_clicks_queue_and_drain() {
        let mut tracker = PointerTracker::new();
        tracker.handle_event(&moved(5.0, 5.0));
        tracker.handle_event(&WindowEvent::MouseInput {
            device_id: winit::event::DeviceId::dummy(),
            state: ElementState::Pressed,
            button: MouseButton::Left,
        });
        tracker.handle_event(&moved(9.0, 9.0));
        tracker.handle_event(&WindowEvent::MouseInput {
            device_id: winit::event::DeviceId::dummy(),
            state: ElementState::Pressed,
            button: MouseButton::Left,
        });

        let frame = tracker.take_frame();
        assert_eq!(frame.clicks.len(), 2);
        assert_eq!(frame.clicks[0], Vec2::new(5.0, 5.0));
        assert_eq!(frame.clicks[1], Vec2::new(9.0, 9.0));

        assert!(tracker.take_frame().clicks.is_empty());
    }
}
