//! Viewer input: logical actions and the movement controller.
//!
//! # Invariants
//! - Platform key codes never cross into this crate; hosts map keys to actions.
//! - Pose updates are pure functions of (pose, elapsed time, held actions).

pub mod action;
pub mod controller;

pub use action::{Action, HeldActions};
pub use controller::KeyboardMovementController;

pub fn crate_info() -> &'static str {
    "gridscene-input v0.1.0"
}
