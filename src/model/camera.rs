use std::collections::HashSet;

use glam::{Mat4, Vec3};

use crate::config::CameraSettings;

/// Just short of straight up/down so `look_at` never degenerates.
pub const PITCH_LIMIT: f32 = 89.0;

/// Held keys the camera reacts to, already mapped from physical keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraKey {
    Forward,
    Back,
    Left,
    Right,
    Up,
    Down,
    TurnUp,
    TurnDown,
    TurnLeft,
    TurnRight,
}

/// Free-fly camera. Angles are in degrees; yaw −90 looks down −Z.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub up: Vec3,
    /// World units per second.
    pub linear_speed: f32,
    /// Degrees per second for the turn keys.
    pub rotation_speed: f32,
    /// Degrees per pixel of pointer motion.
    pub sensitivity: f32,
    yaw: f32,
    pitch: f32,
    forward: Vec3,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 1.0, 3.0), -90.0, 0.0)
    }
}

impl Camera {
    pub fn new(position: Vec3, yaw: f32, pitch: f32) -> Self {
        let mut camera = Self {
            position,
            up: Vec3::Y,
            linear_speed: 2.5,
            rotation_speed: 90.0,
            sensitivity: 0.1,
            yaw,
            pitch,
            forward: Vec3::NEG_Z,
        };
        camera.update_vectors();
        camera
    }

    pub fn from_settings(settings: &CameraSettings) -> Self {
        let mut camera = Self::new(Vec3::from(settings.position), settings.yaw, settings.pitch);
        camera.linear_speed = settings.linear_speed;
        camera.rotation_speed = settings.rotation_speed;
        camera.sensitivity = settings.sensitivity;
        camera
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    pub fn right(&self) -> Vec3 {
        self.forward.cross(self.up).normalize()
    }

    /// Forward projected onto the ground plane; walking ignores pitch.
    pub fn horizontal_forward(&self) -> Vec3 {
        let yaw = self.yaw.to_radians();
        Vec3::new(yaw.cos(), 0.0, yaw.sin())
    }

    /// Applies one frame of held keys. Movement uses the orientation from the
    /// start of the frame; turning takes effect for the next one.
    pub fn process_continuous_input(&mut self, keys: &HashSet<CameraKey>, dt: f32) {
        let step = self.linear_speed * dt;
        let turn = self.rotation_speed * dt;
        let flat = self.horizontal_forward();
        let right = self.right();

        for key in keys {
            match key {
                CameraKey::Forward => self.position += flat * step,
                CameraKey::Back => self.position -= flat * step,
                CameraKey::Left => self.position -= right * step,
                CameraKey::Right => self.position += right * step,
                CameraKey::Up => self.position += self.up * step,
                CameraKey::Down => self.position -= self.up * step,
                CameraKey::TurnUp => self.pitch += turn,
                CameraKey::TurnDown => self.pitch -= turn,
                CameraKey::TurnLeft => self.yaw -= turn,
                CameraKey::TurnRight => self.yaw += turn,
            }
        }

        self.update_vectors();
    }

    /// `dx`/`dy` are pointer deltas in window pixels, y growing downward.
    pub fn process_pointer_motion(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * self.sensitivity;
        self.pitch -= dy * self.sensitivity;
        self.update_vectors();
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.forward, self.up)
    }

    fn update_vectors(&mut self) {
        self.pitch = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        self.forward = Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos()).normalize();
    }
}
