use glam::{Quat, Vec3};

/// Supplies the view direction used to pick directional sprite variants
pub trait CameraView {
    /// Direction the camera looks at
    fn forward(&self) -> Vec3;

    /// Camera right vector, perpendicular to forward on the ground plane
    fn right(&self) -> Vec3 {
        self.forward().cross(Vec3::Y).normalize_or_zero()
    }
}

/// Orbit camera around a target. Yaw 0 looks down -Z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub target: Vec3,
    pub distance: f32,
    // A rotation about +Y, in radians
    pub yaw: f32,
    // Negative values look down on the target, in radians
    pub pitch: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            distance: 10.0,
            yaw: 0.0,
            pitch: 0.0,
        }
    }
}

impl Camera {
    /// Classic isometric view, 45 degrees around and ~35 degrees down
    pub fn isometric(target: Vec3, distance: f32) -> Self {
        Self {
            target,
            distance,
            yaw: 45f32.to_radians(),
            pitch: -(1.0 / 2f32.sqrt()).atan(),
        }
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(-self.yaw) * Quat::from_rotation_x(self.pitch)
    }

    pub fn pos(&self) -> Vec3 {
        self.target - self.forward() * self.distance
    }

    pub fn orbit(&mut self, delta_yaw: f32) {
        self.yaw = (self.yaw + delta_yaw).rem_euclid(std::f32::consts::TAU);
    }
}

impl CameraView for Camera {
    fn forward(&self) -> Vec3 {
        self.rotation() * Vec3::NEG_Z
    }
}

impl CameraView for Vec3 {
    fn forward(&self) -> Vec3 {
        *self
    }
}
