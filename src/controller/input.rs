//! Input handling: physical keys and pointer motion in, camera keys and look deltas out
use std::collections::{HashMap, HashSet};

use winit::keyboard::KeyCode;

use crate::model::CameraKey;

/// Windowing-independent input events
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    KeyDown(KeyCode),
    KeyUp(KeyCode),
    /// Absolute pointer position in window pixels.
    PointerMoved { x: f64, y: f64 },
    /// Raw relative motion, reported even when the cursor cannot move.
    MouseMove { dx: f32, dy: f32 },
    FocusLost,
    PointerLockChanged { locked: bool },
}

/// Turns absolute pointer positions into deltas.
#[derive(Debug, Default, Clone)]
pub struct PointerTracker {
    last: Option<(f64, f64)>,
}

impl PointerTracker {
    /// The first position after construction or [`reset`](Self::reset) only
    /// seeds the tracker and yields no delta.
    pub fn track(&mut self, x: f64, y: f64) -> Option<(f32, f32)> {
        let delta = self.last.map(|(lx, ly)| ((x - lx) as f32, (y - ly) as f32));
        self.last = Some((x, y));
        delta
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

/// Held camera keys and the pointer motion not yet applied to the camera.
///
/// While the pointer is locked only raw `MouseMove` deltas steer the camera;
/// otherwise absolute positions do.
#[derive(Debug, Default)]
pub struct InputState {
    pub pressed_keys: HashSet<CameraKey>,
    pub look_delta: (f32, f32),
    pub pointer_locked: bool,
    pointer: PointerTracker,
    bindings: KeyBindings,
}

impl InputState {
    pub fn new(bindings: KeyBindings) -> Self {
        Self { bindings, ..Default::default() }
    }

    pub fn process_event(&mut self, event: &InputEvent) {
        match event {
            InputEvent::KeyDown(code) => {
                if let Some(key) = self.bindings.camera_key(*code) {
                    self.pressed_keys.insert(key);
                }
            }
            InputEvent::KeyUp(code) => {
                if let Some(key) = self.bindings.camera_key(*code) {
                    self.pressed_keys.remove(&key);
                }
            }
            InputEvent::PointerMoved { x, y } => {
                if self.pointer_locked {
                    return;
                }
                if let Some((dx, dy)) = self.pointer.track(*x, *y) {
                    self.look_delta.0 += dx;
                    self.look_delta.1 += dy;
                }
            }
            InputEvent::MouseMove { dx, dy } => {
                if self.pointer_locked {
                    self.look_delta.0 += dx;
                    self.look_delta.1 += dy;
                }
            }
            InputEvent::FocusLost => {
                self.clear_keys();
                self.pointer.reset();
                self.pointer_locked = false;
            }
            InputEvent::PointerLockChanged { locked } => {
                self.pointer_locked = *locked;
                self.pointer.reset();
            }
        }
    }

    pub fn held(&self) -> &HashSet<CameraKey> {
        &self.pressed_keys
    }

    pub fn clear_keys(&mut self) {
        self.pressed_keys.clear();
    }

    pub fn consume_look(&mut self) -> (f32, f32) {
        std::mem::take(&mut self.look_delta)
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }
}

/// Physical key → action mapping
#[derive(Debug, Clone)]
pub struct KeyBindings {
    pub camera: HashMap<KeyCode, CameraKey>,
    pub quit: KeyCode,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let camera = HashMap::from([
            (KeyCode::KeyW, CameraKey::Forward),
            (KeyCode::KeyS, CameraKey::Back),
            (KeyCode::KeyA, CameraKey::Left),
            (KeyCode::KeyD, CameraKey::Right),
            (KeyCode::Space, CameraKey::Up),
            (KeyCode::ShiftLeft, CameraKey::Down),
            (KeyCode::ArrowUp, CameraKey::TurnUp),
            (KeyCode::ArrowDown, CameraKey::TurnDown),
            (KeyCode::ArrowLeft, CameraKey::TurnLeft),
            (KeyCode::ArrowRight, CameraKey::TurnRight),
        ]);
        Self { camera, quit: KeyCode::Escape }
    }
}

impl KeyBindings {
    pub fn camera_key(&self, code: KeyCode) -> Option<CameraKey> {
        self.camera.get(&code).copied()
    }

    pub fn is_quit(&self, code: KeyCode) -> bool {
        code == self.quit
    }
}

pub mod native {
    use winit::event::{DeviceEvent, ElementState, WindowEvent};
    use winit::keyboard::PhysicalKey;

    use super::InputEvent;

    /// Maps the window events the sandbox cares about; everything else is `None`.
    pub fn window_event_to_input(event: &WindowEvent) -> Option<InputEvent> {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                let PhysicalKey::Code(code) = event.physical_key else {
                    return None;
                };
                Some(match event.state {
                    ElementState::Pressed => InputEvent::KeyDown(code),
                    ElementState::Released => InputEvent::KeyUp(code),
                })
            }
            WindowEvent::CursorMoved { position, .. } => Some(InputEvent::PointerMoved {
                x: position.x,
                y: position.y,
            }),
            WindowEvent::Focused(false) => Some(InputEvent::FocusLost),
            _ => None,
        }
    }

    pub fn device_event_to_input(event: &DeviceEvent) -> Option<InputEvent> {
        match event {
            DeviceEvent::MouseMotion { delta: (dx, dy) } => Some(InputEvent::MouseMove {
                dx: *dx as f32,
                dy: *dy as f32,
            }),
            _ => None,
        }
    }
}
