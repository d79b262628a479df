//! Mesh assets: an immutable arena of loaded meshes addressed by handle.
//!
//! Game objects share a mesh by holding a [`MeshHandle`], never the mesh
//! itself. A handle is only produced by inserting into a [`MeshTable`], so
//! every handle refers to a mesh that loaded successfully.

use bytemuck::{Pod, Zeroable};
use std::path::{Path, PathBuf};

/// Index of a mesh inside its [`MeshTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshHandle(u32);

impl MeshHandle {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Vertex layout shared by the loader and the GPU backend.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// Triangle mesh in CPU memory.
#[derive(Debug, Clone)]
pub struct MeshData {
    pub name: String,
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }
}

/// Errors from loading model files.
#[derive(Debug, thiserror::Error)]
pub enum AssetLoadError {
    #[error("failed to load {}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },
    #[error("{} contains no triangles", path.display())]
    Empty { path: PathBuf },
}

/// Load a Wavefront OBJ file into a single triangulated mesh.
///
/// Every object in the file is merged into one mesh. Missing normals and
/// texture coordinates are zero, missing vertex colors are white.
pub fn load_model_from_file(path: impl AsRef<Path>) -> Result<MeshData, AssetLoadError> {
    let path = path.as_ref();
    let (models, _materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
    )
    .map_err(|source| AssetLoadError::Load {
        path: path.to_path_buf(),
        source,
    })?;

    let mut vertices = Vec::new();
    let mut indices = Vec::new();
    for model in &models {
        let mesh = &model.mesh;
        let base = vertices.len() as u32;
        let count = mesh.positions.len() / 3;
        vertices.extend((0..count).map(|i| Vertex {
            position: [
                mesh.positions[i * 3],
                mesh.positions[i * 3 + 1],
                mesh.positions[i * 3 + 2],
            ],
            color: [
                mesh.vertex_color.get(i * 3).copied().unwrap_or(1.0),
                mesh.vertex_color.get(i * 3 + 1).copied().unwrap_or(1.0),
                mesh.vertex_color.get(i * 3 + 2).copied().unwrap_or(1.0),
            ],
            normal: [
                mesh.normals.get(i * 3).copied().unwrap_or(0.0),
                mesh.normals.get(i * 3 + 1).copied().unwrap_or(0.0),
                mesh.normals.get(i * 3 + 2).copied().unwrap_or(0.0),
            ],
            uv: [
                mesh.texcoords.get(i * 2).copied().unwrap_or(0.0),
                mesh.texcoords.get(i * 2 + 1).copied().unwrap_or(0.0),
            ],
        }));
        // tobj rejects faces that reference missing vertices.
        indices.extend(mesh.indices.iter().map(|&index| base + index));
    }

    if indices.is_empty() {
        return Err(AssetLoadError::Empty {
            path: path.to_path_buf(),
        });
    }

    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "unnamed".into());
    tracing::debug!(
        "loaded {} ({} objects, {} vertices, {} indices)",
        path.display(),
        models.len(),
        vertices.len(),
        indices.len()
    );

    Ok(MeshData {
        name,
        vertices,
        indices,
    })
}

/// Arena of loaded meshes. Meshes are never removed; handles stay valid for
/// the lifetime of the table.
#[derive(Debug, Default)]
pub struct MeshTable {
    meshes: Vec<MeshData>,
}

impl MeshTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an already loaded mesh and return its handle.
    pub fn insert(&mut self, mesh: MeshData) -> MeshHandle {
        let handle = MeshHandle(self.meshes.len() as u32);
        self.meshes.push(mesh);
        handle
    }

    /// Load an OBJ file and insert it.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<MeshHandle, AssetLoadError> {
        let mesh = load_model_from_file(path)?;
        Ok(self.insert(mesh))
    }

    pub fn get(&self, handle: MeshHandle) -> Option<&MeshData> {
        self.meshes.get(handle.index())
    }

    /// All meshes with their handles, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (MeshHandle, &MeshData)> {
        self.meshes
            .iter()
            .enumerate()
            .map(|(i, m)| (MeshHandle(i as u32), m))
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }
}

pub fn crate_info() -> &'static str {
    "gridscene-assets v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const QUAD_OBJ: &str = "\
o quad
v -1.0 -1.0 0.0
v 1.0 -1.0 0.0
v 1.0 1.0 0.0
v -1.0 1.0 0.0
vn 0.0 0.0 1.0
f 1//1 2//1 3//1 4//1
";

    const TWO_TRIANGLES_OBJ: &str = "\
o first
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 1.0 0.0
f 1 2 3
o second
v 0.0 0.0 1.0
v 1.0 0.0 1.0
v 0.0 1.0 1.0
f 4 5 6
";

    fn write_obj(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".obj").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn load_quad_is_triangulated() {
        let file = write_obj(QUAD_OBJ);
        let mesh = load_model_from_file(file.path()).unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.index_count(), 6);
        assert!(mesh.vertices.iter().all(|v| v.normal == [0.0, 0.0, 1.0]));
        assert!(mesh.vertices.iter().all(|v| v.color == [1.0, 1.0, 1.0]));
    }

    #[test]
    fn objects_are_merged_with_rebased_indices() {
        let file = write_obj(TWO_TRIANGLES_OBJ);
        let mesh = load_model_from_file(file.path()).unwrap();
        assert_eq!(mesh.vertex_count(), 6);
        assert_eq!(mesh.index_count(), 6);
        assert!(mesh.indices[3..].iter().all(|&i| i >= 3));
        assert!(mesh.vertices.iter().all(|v| v.normal == [0.0; 3]));
    }

    #[test]
    fn missing_file_is_load_error() {
        let err = load_model_from_file("does/not/exist.obj").unwrap_err();
        assert!(matches!(err, AssetLoadError::Load { .. }));
        assert!(err.to_string().contains("exist.obj"));
    }

    #[test]
    fn face_past_last_vertex_is_load_error() {
        let file = write_obj("v 0.0 0.0 0.0\nf 1 2 3\n");
        let err = load_model_from_file(file.path()).unwrap_err();
        assert!(matches!(
            err,
            AssetLoadError::Load {
                source: tobj::LoadError::FaceVertexOutOfBounds,
                ..
            }
        ));
    }

    #[test]
    fn unparseable_position_is_load_error() {
        let file = write_obj("v a b c\nf 1 2 3\n");
        let err = load_model_from_file(file.path()).unwrap_err();
        assert!(matches!(
            err,
            AssetLoadError::Load {
                source: tobj::LoadError::PositionParseError,
                ..
            }
        ));
    }

    #[test]
    fn binary_garbage_has_no_geometry() {
        let file = write_obj("\0\u{ff}garbage\n");
        let err = load_model_from_file(file.path()).unwrap_err();
        assert!(matches!(err, AssetLoadError::Empty { .. }));
    }

    #[test]
    fn file_without_faces_is_empty_error() {
        let file = write_obj("v 0.0 0.0 0.0\nv 1.0 0.0 0.0\n");
        let err = load_model_from_file(file.path()).unwrap_err();
        assert!(matches!(err, AssetLoadError::Empty { .. }));
    }

    #[test]
    fn table_handles_are_sequential() {
        let file = write_obj(QUAD_OBJ);
        let mut table = MeshTable::new();
        let a = table.load(file.path()).unwrap();
        let b = table.load(file.path()).unwrap();
        assert_ne!(a, b);
        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(a).unwrap().index_count(), 6);
        let handles: Vec<MeshHandle> = table.iter().map(|(h, _)| h).collect();
        assert_eq!(handles, [a, b]);
    }

    #[test]
    fn failed_load_leaves_table_unchanged() {
        let mut table = MeshTable::new();
        assert!(table.load("missing.obj").is_err());
        assert!(table.is_empty());
    }
}
