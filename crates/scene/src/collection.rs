use glam::Vec3;
use gridscene_assets::MeshHandle;
use gridscene_common::Transform;

/// Uniform scale applied to every instance spawned from a layout.
pub const INSTANCE_SCALE: f32 = 3.0;

/// Sequential identifier of a game object within its scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GameObjectId(pub u32);

/// One drawable instance of a shared mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameObject {
    pub id: GameObjectId,
    pub model: MeshHandle,
    pub transform: Transform,
}

/// Insertion-ordered set of game objects, owned by the application.
///
/// Objects are stored contiguously in spawn order, which is also their id
/// order, so lookups by id are direct indexing.
#[derive(Debug, Clone, Default)]
pub struct SceneCollection {
    objects: Vec<GameObject>,
    revision: u64,
}

impl SceneCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn one object and return its id.
    pub fn spawn(&mut self, model: MeshHandle, transform: Transform) -> GameObjectId {
        let id = GameObjectId(self.objects.len() as u32);
        self.objects.push(GameObject {
            id,
            model,
            transform,
        });
        self.revision += 1;
        id
    }

    /// Spawn one object per position, in order, all sharing `model`, with
    /// identity rotation and uniform `scale`.
    pub fn spawn_layout(&mut self, model: MeshHandle, positions: &[Vec3], scale: f32) {
        self.objects.reserve(positions.len());
        let first = self.objects.len() as u32;
        self.objects
            .extend(positions.iter().enumerate().map(|(i, &p)| GameObject {
                id: GameObjectId(first + i as u32),
                model,
                transform: Transform::at(p, scale),
            }));
        self.revision += 1;
        tracing::debug!(
            "spawned {} instances of mesh {}",
            positions.len(),
            model.index()
        );
    }

    /// Build a scene from the volume layout for `count`.
    pub fn from_layout(model: MeshHandle, count: usize) -> Self {
        let positions = gridscene_layout::gen_volume(count);
        let mut scene = Self::new();
        scene.spawn_layout(model, &positions, INSTANCE_SCALE);
        scene
    }

    pub fn get(&self, id: GameObjectId) -> Option<&GameObject> {
        self.objects.get(id.0 as usize)
    }

    /// Replace an object's transform. Returns false if the id is unknown.
    pub fn set_transform(&mut self, id: GameObjectId, transform: Transform) -> bool {
        match self.objects.get_mut(id.0 as usize) {
            Some(object) => {
                object.transform = transform;
                self.revision += 1;
                true
            }
            None => false,
        }
    }

    pub fn objects(&self) -> &[GameObject] {
        &self.objects
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameObject> {
        self.objects.iter()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Counter bumped on every mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}
