use std::time::Instant;

use tracing::trace;

use crate::controller::input::{InputEvent, InputState};
use crate::model::Camera;

/// Timing for one frame, in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTime {
    pub dt: f32,
    pub elapsed: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    start: Instant,
    last: Instant,
}

impl FrameClock {
    pub fn new(now: Instant) -> Self {
        Self { start: now, last: now }
    }

    /// Time since the previous tick and since the clock started. A `now`
    /// earlier than the last tick counts as zero.
    pub fn tick(&mut self, now: Instant) -> FrameTime {
        let dt = now.saturating_duration_since(self.last).as_secs_f32();
        self.last = self.last.max(now);
        FrameTime {
            dt,
            elapsed: self.last.duration_since(self.start).as_secs_f32(),
        }
    }
}

/// Per-frame driver: routes input to the camera and keeps the clock.
#[derive(Debug)]
pub struct FrameLoop {
    pub camera: Camera,
    pub input: InputState,
    clock: FrameClock,
}

impl FrameLoop {
    pub fn new(camera: Camera, input: InputState, now: Instant) -> Self {
        Self { camera, input, clock: FrameClock::new(now) }
    }

    /// Pointer motion reaches the camera right away; held keys wait for `tick`.
    pub fn handle(&mut self, event: &InputEvent) {
        self.input.process_event(event);
        let (dx, dy) = self.input.consume_look();
        if dx != 0.0 || dy != 0.0 {
            self.camera.process_pointer_motion(dx, dy);
        }
    }

    pub fn tick(&mut self, now: Instant) -> FrameTime {
        let time = self.clock.tick(now);
        self.camera.process_continuous_input(self.input.held(), time.dt);
        trace!(dt = time.dt, elapsed = time.elapsed, "frame");
        time
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use glam::Vec3;
    use winit::keyboard::KeyCode;

    use super::*;

    #[test]
    fn clock_reports_delta_and_elapsed() {
        let t0 = Instant::now();
        let mut clock = FrameClock::new(t0);
        let first = clock.tick(t0 + Duration::from_millis(16));
        assert!((first.dt - 0.016).abs() < 1e-6);
        let second = clock.tick(t0 + Duration::from_millis(50));
        assert!((second.dt - 0.034).abs() < 1e-6);
        assert!((second.elapsed - 0.05).abs() < 1e-6);
    }

    #[test]
    fn clock_never_runs_backwards() {
        let t0 = Instant::now();
        let mut clock = FrameClock::new(t0 + Duration::from_secs(1));
        let time = clock.tick(t0);
        assert_eq!(time, FrameTime { dt: 0.0, elapsed: 0.0 });
    }

    #[test]
    fn held_forward_moves_the_camera_each_tick() {
        let t0 = Instant::now();
        let mut frames = FrameLoop::new(Camera::new(Vec3::ZERO, -90.0, 0.0), InputState::default(), t0);
        frames.handle(&InputEvent::KeyDown(KeyCode::KeyW));
        frames.tick(t0 + Duration::from_secs(1));
        assert!(frames.camera.position.abs_diff_eq(Vec3::new(0.0, 0.0, -2.5), 1e-5));

        frames.handle(&InputEvent::KeyUp(KeyCode::KeyW));
        frames.tick(t0 + Duration::from_secs(2));
        assert!(frames.camera.position.abs_diff_eq(Vec3::new(0.0, 0.0, -2.5), 1e-5));
    }

    #[test]
    fn pointer_motion_turns_the_camera_between_frames() {
        let t0 = Instant::now();
        let mut frames = FrameLoop::new(Camera::default(), InputState::default(), t0);
        frames.handle(&InputEvent::PointerMoved { x: 400.0, y: 300.0 });
        assert_eq!(frames.camera.yaw(), -90.0);

        frames.handle(&InputEvent::PointerMoved { x: 500.0, y: 250.0 });
        assert!((frames.camera.yaw() - -80.0).abs() < 1e-4);
        assert!((frames.camera.pitch() - 5.0).abs() < 1e-4);
    }

    #[test]
    fn locked_pointer_keeps_turning_with_raw_motion() {
        let t0 = Instant::now();
        let mut frames = FrameLoop::new(Camera::default(), InputState::default(), t0);
        frames.handle(&InputEvent::PointerLockChanged { locked: true });
        for _ in 0..36 {
            frames.handle(&InputEvent::MouseMove { dx: 100.0, dy: 0.0 });
        }
        // a full turn, well beyond any window width in pixels
        assert!((frames.camera.yaw() - 270.0).abs() < 1e-3);
        assert!(frames.camera.forward().abs_diff_eq(Vec3::NEG_Z, 1e-4));
    }
}
