//! Shared value types used across the gridscene crates.
//!
//! # Conventions
//! - The world is Y-down: positive Y points towards the floor.
//! - Euler rotations are radians applied in Y, then X, then Z order.

mod types;

pub use types::{Transform, ViewerPose};

pub fn crate_info() -> &'static str {
    "gridscene-common v0.1.0"
}
