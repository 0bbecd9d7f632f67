use glam::{Mat4, Vec3};

/// Degrees of static tilt added per instance index.
pub const ANGLE_STEP_DEG: f32 = 20.0;
/// Spin speed in degrees per second for every third instance.
pub const SPIN_DEG_PER_SEC: f32 = 50.0;

pub fn tilt_axis() -> Vec3 {
    Vec3::new(1.0, 0.3, 0.5).normalize()
}

pub fn spin_axis() -> Vec3 {
    Vec3::new(0.5, 1.0, 0.0).normalize()
}

/// One drawn copy of the cube.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Instance {
    pub position: Vec3,
    pub angle_deg: f32,
    pub spins: bool,
}

impl Instance {
    pub fn new(index: usize, position: Vec3) -> Self {
        Self {
            position,
            angle_deg: ANGLE_STEP_DEG * index as f32,
            spins: index % 3 == 0,
        }
    }

    pub fn from_positions(positions: &[Vec3]) -> Vec<Self> {
        positions.iter().enumerate().map(|(i, p)| Self::new(i, *p)).collect()
    }

    pub fn model_matrix(&self, elapsed: f32) -> Mat4 {
        let model = Mat4::from_translation(self.position)
            * Mat4::from_axis_angle(tilt_axis(), self.angle_deg.to_radians());
        if self.spins {
            model * Mat4::from_axis_angle(spin_axis(), (elapsed * SPIN_DEG_PER_SEC).to_radians())
        } else {
            model
        }
    }
}

/// The ten positions the sandbox starts with.
pub fn default_positions() -> Vec<[f32; 3]> {
    vec![
        [0.0, 0.0, 0.0],
        [2.0, 5.0, -15.0],
        [-1.5, -2.2, -2.5],
        [-3.8, -2.0, -12.3],
        [2.4, -0.4, -3.5],
        [-1.7, 3.0, -7.5],
        [1.3, -2.0, -2.5],
        [1.5, 2.0, -2.5],
        [1.5, 0.2, -1.5],
        [-1.3, 1.0, -1.5],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn third_instance_at_rest() {
        let p = Vec3::new(-3.8, -2.0, -12.3);
        let inst = Instance::new(3, p);
        assert!(inst.spins);
        let expected = Mat4::from_translation(p) * Mat4::from_axis_angle(tilt_axis(), 60f32.to_radians());
        assert!(inst.model_matrix(0.0).abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn only_every_third_instance_spins() {
        let spinning: Vec<usize> = Instance::from_positions(&[Vec3::ZERO; 7])
            .iter()
            .enumerate()
            .filter(|(_, inst)| inst.spins)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(spinning, vec![0, 3, 6]);
    }

    #[test]
    fn static_instances_ignore_time() {
        let inst = Instance::new(4, Vec3::new(2.4, -0.4, -3.5));
        assert_eq!(inst.model_matrix(0.0), inst.model_matrix(12.5));
    }

    #[test]
    fn spin_advances_with_time() {
        let inst = Instance::new(0, Vec3::ZERO);
        let expected = Mat4::from_axis_angle(spin_axis(), 100f32.to_radians());
        assert!(inst.model_matrix(2.0).abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn translation_column_is_the_position() {
        let p = Vec3::new(1.5, 2.0, -2.5);
        let m = Instance::new(7, p).model_matrix(3.0);
        assert!(m.w_axis.truncate().abs_diff_eq(p, 1e-6));
    }

    #[test]
    fn ten_default_positions() {
        let positions = default_positions();
        assert_eq!(positions.len(), 10);
        assert_eq!(positions[0], [0.0, 0.0, 0.0]);
        assert_eq!(positions[9], [-1.3, 1.0, -1.5]);
    }
}
