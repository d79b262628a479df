//! Scene layout generator: deterministic placement of repeated instances.
//!
//! # Invariants
//! - Every generator is a pure function of its arguments.
//! - Output order is part of the contract; callers spawn objects in that order.
//! - Duplicated rows and faces at index 0 are intentional and preserved.

pub mod grid;

pub use grid::{
    DEFAULT_LAYOUT_COUNT, FACE_SPACING, MAX_LAYOUT_INSTANCES, face_len, gen_face, gen_line,
    gen_row, gen_volume, row_len, volume_len,
};

pub fn crate_info() -> &'static str {
    "gridscene-layout v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("layout"));
    }
}
