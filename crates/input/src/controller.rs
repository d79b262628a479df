use crate::action::{Action, HeldActions};
use glam::Vec3;
use gridscene_common::ViewerPose;
use std::f32::consts::TAU;

/// Pitch limit in radians, just short of straight up or down.
const PITCH_LIMIT: f32 = 1.5;

/// Moves the viewer in the horizontal XZ plane and turns it with yaw/pitch.
///
/// The world is Y-down, so "up" movement goes towards negative Y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyboardMovementController {
    /// Translation speed in units per second.
    pub move_speed: f32,
    /// Turn speed in radians per second.
    pub look_speed: f32,
}

impl Default for KeyboardMovementController {
    fn default() -> Self {
        Self {
            move_speed: 3.0,
            look_speed: 1.5,
        }
    }
}

impl KeyboardMovementController {
    pub fn new(move_speed: f32, look_speed: f32) -> Self {
        Self {
            move_speed,
            look_speed,
        }
    }

    /// Advance `pose` by `dt` seconds of the held actions.
    pub fn move_in_plane_xz(&self, pose: ViewerPose, dt: f32, held: &HeldActions) -> ViewerPose {
        let mut next = pose;

        let mut rotate = Vec3::ZERO;
        if held.is_held(Action::LookRight) {
            rotate.y += 1.0;
        }
        if held.is_held(Action::LookLeft) {
            rotate.y -= 1.0;
        }
        if held.is_held(Action::LookUp) {
            rotate.x += 1.0;
        }
        if held.is_held(Action::LookDown) {
            rotate.x -= 1.0;
        }
        if rotate.length_squared() > f32::EPSILON {
            next.rotation += self.look_speed * dt * rotate.normalize();
        }

        next.rotation.x = next.rotation.x.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        next.rotation.y = next.rotation.y.rem_euclid(TAU);

        let yaw = next.rotation.y;
        let forward = Vec3::new(yaw.sin(), 0.0, yaw.cos());
        let right = Vec3::new(forward.z, 0.0, -forward.x);
        let up = Vec3::NEG_Y;

        let mut direction = Vec3::ZERO;
        if held.is_held(Action::MoveForward) {
            direction += forward;
        }
        if held.is_held(Action::MoveBackward) {
            direction -= forward;
        }
        if held.is_held(Action::MoveRight) {
            direction += right;
        }
        if held.is_held(Action::MoveLeft) {
            direction -= right;
        }
        if held.is_held(Action::MoveUp) {
            direction += up;
        }
        if held.is_held(Action::MoveDown) {
            direction -= up;
        }
        if direction.length_squared() > f32::EPSILON {
            next.translation += self.move_speed * dt * direction.normalize();
        }

        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn held(actions: &[Action]) -> HeldActions {
        actions.iter().copied().collect()
    }

    #[test]
    fn idle_input_keeps_pose() {
        let controller = KeyboardMovementController::default();
        let pose = ViewerPose {
            translation: Vec3::new(1.0, 2.0, 3.0),
            rotation: Vec3::new(0.2, 1.0, 0.0),
        };
        let next = controller.move_in_plane_xz(pose, 0.5, &HeldActions::new());
        assert_eq!(next, pose);
    }

    #[test]
    fn forward_at_zero_yaw_moves_along_z() {
        let controller = KeyboardMovementController::default();
        let next = controller.move_in_plane_xz(
            ViewerPose::default(),
            0.5,
            &held(&[Action::MoveForward]),
        );
        assert!(next.translation.abs_diff_eq(Vec3::new(0.0, 0.0, 1.5), 1e-6));
    }

    #[test]
    fn custom_speeds_scale_motion() {
        let controller = KeyboardMovementController::new(6.0, 0.5);
        let next = controller.move_in_plane_xz(
            ViewerPose::default(),
            0.5,
            &held(&[Action::MoveForward, Action::LookLeft]),
        );
        // Yaw turns first, then forward follows the new heading.
        assert!((next.rotation.y - (TAU - 0.25)).abs() < 1e-5);
        assert!((next.translation.length() - 3.0).abs() < 1e-5);
    }

    #[test]
    fn diagonal_movement_is_normalized() {
        let controller = KeyboardMovementController::default();
        let next = controller.move_in_plane_xz(
            ViewerPose::default(),
            1.0,
            &held(&[Action::MoveForward, Action::MoveRight]),
        );
        assert!((next.translation.length() - controller.move_speed).abs() < 1e-5);
        assert_eq!(next.translation.y, 0.0);
    }

    #[test]
    fn up_moves_towards_negative_y() {
        let controller = KeyboardMovementController::default();
        let next =
            controller.move_in_plane_xz(ViewerPose::default(), 1.0, &held(&[Action::MoveUp]));
        assert!(next.translation.abs_diff_eq(Vec3::new(0.0, -3.0, 0.0), 1e-6));
    }

    #[test]
    fn opposite_keys_cancel() {
        let controller = KeyboardMovementController::default();
        let pose = ViewerPose::default();
        let next = controller.move_in_plane_xz(
            pose,
            1.0,
            &held(&[Action::MoveLeft, Action::MoveRight]),
        );
        assert_eq!(next.translation, pose.translation);
    }

    #[test]
    fn pitch_is_clamped() {
        let controller = KeyboardMovementController::default();
        let next =
            controller.move_in_plane_xz(ViewerPose::default(), 10.0, &held(&[Action::LookUp]));
        assert_eq!(next.rotation.x, PITCH_LIMIT);
        let next =
            controller.move_in_plane_xz(ViewerPose::default(), 10.0, &held(&[Action::LookDown]));
        assert_eq!(next.rotation.x, -PITCH_LIMIT);
    }

    #[test]
    fn yaw_wraps_into_one_turn() {
        let controller = KeyboardMovementController::default();
        let next =
            controller.move_in_plane_xz(ViewerPose::default(), 1.0, &held(&[Action::LookLeft]));
        assert!((0.0..TAU).contains(&next.rotation.y));
        assert!((next.rotation.y - (TAU - 1.5)).abs() < 1e-5);
    }

    #[test]
    fn forward_follows_yaw() {
        let controller = KeyboardMovementController::default();
        let pose = ViewerPose {
            translation: Vec3::ZERO,
            rotation: Vec3::new(0.0, std::f32::consts::FRAC_PI_2, 0.0),
        };
        let next = controller.move_in_plane_xz(pose, 1.0, &held(&[Action::MoveForward]));
        assert!(next.translation.abs_diff_eq(Vec3::new(3.0, 0.0, 0.0), 1e-5));
    }
}
