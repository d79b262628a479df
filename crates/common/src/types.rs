use glam::{EulerRot, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Spatial transform: translation, Euler rotation, scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub translation: Vec3,
    /// Euler angles in radians (x = pitch, y = yaw, z = roll).
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Transform at `translation` with identity rotation and uniform `scale`.
    pub fn at(translation: Vec3, scale: f32) -> Self {
        Self {
            translation,
            rotation: Vec3::ZERO,
            scale: Vec3::splat(scale),
        }
    }

    /// Rotation as a quaternion, composed Y * X * Z.
    pub fn orientation(&self) -> Quat {
        Quat::from_euler(
            EulerRot::YXZ,
            self.rotation.y,
            self.rotation.x,
            self.rotation.z,
        )
    }

    /// Model matrix `T * Ry * Rx * Rz * S`.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.orientation(), self.translation)
    }
}

/// Position and orientation of the viewer. Shaped like a [`Transform`]
/// without scale, but owned by the frame loop rather than the scene.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewerPose {
    pub translation: Vec3,
    pub rotation: Vec3,
}
