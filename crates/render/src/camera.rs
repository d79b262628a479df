use glam::{EulerRot, Mat3, Mat4, Vec3, Vec4};

/// Vertical field of view used by the frame loop.
pub const FOV_Y_DEGREES: f32 = 50.0;
/// Near clip plane used by the frame loop.
pub const NEAR_PLANE: f32 = 0.1;
/// Far clip plane used by the frame loop.
pub const FAR_PLANE: f32 = 100.0;

/// View and projection transforms for one frame.
///
/// Conventions: left-handed view space looking down +Z, Y-down world, and a
/// clip-space depth range of [0, 1] (near plane at 0, far plane at 1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraRig {
    view: Mat4,
    projection: Mat4,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
        }
    }
}

impl CameraRig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look from `position` along `direction`, with `up` fixing the roll.
    pub fn set_view_direction(&mut self, position: Vec3, direction: Vec3, up: Vec3) {
        let w = direction.normalize();
        let u = w.cross(up).normalize();
        let v = w.cross(u);
        self.view = view_from_basis(u, v, w, position);
    }

    /// Look from `position` at `target`. Up is -Y.
    pub fn set_view_target(&mut self, position: Vec3, target: Vec3) {
        self.set_view_direction(position, target - position, Vec3::NEG_Y);
    }

    /// View from a position and Euler rotation applied Y, then X, then Z.
    pub fn set_view_yxz(&mut self, position: Vec3, rotation: Vec3) {
        let basis = Mat3::from_euler(EulerRot::YXZ, rotation.y, rotation.x, rotation.z);
        self.view = view_from_basis(basis.x_axis, basis.y_axis, basis.z_axis, position);
    }

    /// Perspective projection mapping view depth `near..far` to `0..1`.
    pub fn set_perspective(&mut self, fov_y: f32, aspect: f32, near: f32, far: f32) {
        debug_assert!(aspect.abs() > f32::EPSILON, "aspect ratio must be non-zero");
        self.projection = Mat4::perspective_lh(fov_y, aspect, near, far);
    }

    /// Orthographic projection mapping view depth `near..far` to `0..1`.
    pub fn set_orthographic(
        &mut self,
        left: f32,
        right: f32,
        top: f32,
        bottom: f32,
        near: f32,
        far: f32,
    ) {
        self.projection = Mat4::from_cols(
            Vec4::new(2.0 / (right - left), 0.0, 0.0, 0.0),
            Vec4::new(0.0, 2.0 / (bottom - top), 0.0, 0.0),
            Vec4::new(0.0, 0.0, 1.0 / (far - near), 0.0),
            Vec4::new(
                -(right + left) / (right - left),
                -(bottom + top) / (bottom - top),
                -near / (far - near),
                1.0,
            ),
        );
    }

    pub fn view(&self) -> Mat4 {
        self.view
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }
}

/// Inverse of the rigid transform whose axes are `u`, `v`, `w` at `position`.
fn view_from_basis(u: Vec3, v: Vec3, w: Vec3, position: Vec3) -> Mat4 {
    Mat4::from_cols(
        Vec4::new(u.x, v.x, w.x, 0.0),
        Vec4::new(u.y, v.y, w.y, 0.0),
        Vec4::new(u.z, v.z, w.z, 0.0),
        Vec4::new(-u.dot(position), -v.dot(position), -w.dot(position), 1.0),
    )
}
