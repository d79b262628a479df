//! Backend-agnostic rendering core: frame loop, camera rig, frame clock.
//!
//! # Invariants
//! - The loop is single-threaded; the scene is only read while a frame is recorded.
//! - A frame that cannot be acquired is skipped, never reported as an error.
//! - The device is idle before the loop returns normally.
//!
//! Backends plug in through [`WindowHost`], [`FrameRenderer`] and
//! [`RenderSystem`]; the loop itself never touches a graphics API.

mod camera;
mod clock;
mod error;
mod frame_loop;

pub use camera::{CameraRig, FAR_PLANE, FOV_Y_DEGREES, NEAR_PLANE};
pub use clock::FrameClock;
pub use error::RenderError;
pub use frame_loop::{
    ApplicationLoop, FrameRenderer, LoopState, LoopStats, RenderSystem, WindowHost,
};

pub fn crate_info() -> &'static str {
    "gridscene-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
