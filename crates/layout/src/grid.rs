use glam::Vec3;

/// Repetition count used by the desktop scene.
pub const DEFAULT_LAYOUT_COUNT: usize = 40;

/// Largest layout the binaries agree to generate.
pub const MAX_LAYOUT_INSTANCES: usize = 1 << 24;

/// Distance between consecutive depth layers produced by [`gen_volume`].
pub const FACE_SPACING: f32 = 2.5;

/// Step between neighbouring instances inside a row.
const ROW_STEP: Vec3 = Vec3::X;

/// `count` points along `offset`, starting one step away from `start`.
///
/// Point `i` is `start + offset * (i + 1)`; `start` itself is never emitted.
pub fn gen_line(offset: Vec3, start: Vec3, count: usize) -> Vec<Vec3> {
    (0..count)
        .map(|i| start + offset * (i + 1) as f32)
        .collect()
}

/// One row of `2 * count` points: the line along +X emitted twice, back to back.
pub fn gen_row(start: Vec3, count: usize) -> Vec<Vec3> {
    let left = gen_line(ROW_STEP, start, count);
    let mut right = gen_line(ROW_STEP, start, count);
    right.extend(left);
    right
}

/// A face of rows at depth `z`.
///
/// Rows climb from y = 0 to y = count / 2 (inclusive), then descend from
/// y = 0 to y = -(count / 2 - 1). The y = 0 row appears in both halves.
pub fn gen_face(count: usize, z: f32) -> Vec<Vec3> {
    let half = count / 2;
    let mut rows = Vec::with_capacity(face_len(count).unwrap_or(0));
    for i in 0..=half {
        rows.extend(gen_row(Vec3::new(1.0, i as f32, z), count));
    }
    for i in 0..half {
        rows.extend(gen_row(Vec3::new(1.0, -(i as f32), z), count));
    }
    rows
}

/// Stack of faces: depths `2.5 * i + 2.5` for i in `0..=count / 2`, then
/// `-2.5 * i + 2.5` for i in `0..count / 2`. The 2.5 face appears twice.
pub fn gen_volume(count: usize) -> Vec<Vec3> {
    let half = count / 2;
    let mut faces = Vec::with_capacity(volume_len(count).unwrap_or(0));
    for i in 0..=half {
        faces.extend(gen_face(count, FACE_SPACING * i as f32 + FACE_SPACING));
    }
    for i in 0..half {
        faces.extend(gen_face(count, -FACE_SPACING * i as f32 + FACE_SPACING));
    }
    faces
}

/// Number of points produced by [`gen_row`], or `None` on overflow.
pub fn row_len(count: usize) -> Option<usize> {
    count.checked_mul(2)
}

/// Number of points produced by [`gen_face`], or `None` on overflow.
pub fn face_len(count: usize) -> Option<usize> {
    let half = count / 2;
    row_len(count)?.checked_mul(2 * half + 1)
}

/// Number of points produced by [`gen_volume`], or `None` on overflow.
pub fn volume_len(count: usize) -> Option<usize> {
    let half = count / 2;
    face_len(count)?.checked_mul(2 * half + 1)
}
