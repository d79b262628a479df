//! wgpu render backend for gridscene.
//!
//! [`WgpuRenderer`] owns the surface and acquires frames; [`SimpleRenderSystem`]
//! draws the scene into the render pass the renderer opens.
//!
//! # Invariants
//! - The render system never mutates the scene.
//! - Pipelines target the renderer's surface format and [`DEPTH_FORMAT`].

mod gpu;
mod shaders;
mod system;

pub use gpu::{DEPTH_FORMAT, WgpuFrame, WgpuRenderer};
pub use system::SimpleRenderSystem;
