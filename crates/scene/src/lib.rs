//! Scene: the game objects drawn every frame.
//!
//! # Invariants
//! - Objects keep insertion order; ids are assigned sequentially.
//! - Every object references a mesh that was loaded into a `MeshTable`.
//! - Every mutation bumps the revision so renderers can cache uploads.

pub mod collection;

pub use collection::{GameObject, GameObjectId, INSTANCE_SCALE, SceneCollection};

pub fn crate_info() -> &'static str {
    "gridscene-scene v0.1.0"
}
