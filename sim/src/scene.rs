use std::sync::Arc;

use crate::body::BodyDef;
use crate::entity::{Entity, Layer, MaterialKind, MeshHandle, ObjectId, Transform, VisualObject};
use crate::error::SimError;
use crate::geometry::{MeshBuffers, Vec3};
use crate::world::World;

/// Geometry a render surface can turn into a drawable mesh.
#[derive(Clone, Debug)]
pub enum MeshAsset {
    Sphere { radius: f32 },
    Cuboid { half_extents: Vec3 },
    /// Generated mesh; platform buffers are shared with their trimesh collider.
    Indexed(Arc<MeshBuffers>),
}

#[derive(Clone, Debug, Default)]
pub struct MeshLibrary {
    assets: Vec<MeshAsset>,
}

impl MeshLibrary {
    pub fn add(&mut self, asset: MeshAsset) -> MeshHandle {
        self.assets.push(asset);
        MeshHandle((self.assets.len() - 1) as u32)
    }

    pub fn get(&self, handle: MeshHandle) -> Option<&MeshAsset> {
        self.assets.get(handle.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

/// Visual side of the session: bound entities, decorations and their meshes.
///
/// Append-only: nothing is ever removed during a session.
#[derive(Debug, Default)]
pub struct Scene {
    entities: Vec<Entity>,
    decorations: Vec<VisualObject>,
    meshes: MeshLibrary,
    next_id: u32,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_object_id(&mut self) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn add_mesh(&mut self, asset: MeshAsset) -> MeshHandle {
        self.meshes.add(asset)
    }

    /// Create a visual object and its rigid body together.
    ///
    /// If the body is rejected nothing is added, so an entity never exists
    /// without its physics counterpart.
    pub fn spawn(
        &mut self,
        world: &mut World,
        mesh: MeshHandle,
        material: MaterialKind,
        layer: Layer,
        body: &BodyDef,
    ) -> Result<ObjectId, SimError> {
        let handle = world.add_body(body)?;
        let id = self.next_object_id();
        let visual = VisualObject {
            id,
            mesh,
            material,
            layer,
            transform: Transform::new(body.translation, body.rotation),
        };
        self.entities.push(Entity::new(visual, handle));
        Ok(id)
    }

    /// Add an object that no body drives.
    pub fn add_decoration(
        &mut self,
        mesh: MeshHandle,
        material: MaterialKind,
        transform: Transform,
    ) -> ObjectId {
        let id = self.next_object_id();
        self.decorations.push(VisualObject {
            id,
            mesh,
            material,
            layer: Layer::Default,
            transform,
        });
        id
    }

    pub fn entity(&self, id: ObjectId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id() == id)
    }

    pub fn decoration_mut(&mut self, id: ObjectId) -> Option<&mut VisualObject> {
        self.decorations.iter_mut().find(|d| d.id == id)
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn decorations(&self) -> &[VisualObject] {
        &self.decorations
    }

    pub fn meshes(&self) -> &MeshLibrary {
        &self.meshes
    }

    /// Every visual object: bound entities first, then decorations.
    pub fn objects(&self) -> impl Iterator<Item = &VisualObject> {
        self.entities
            .iter()
            .map(Entity::visual)
            .chain(self.decorations.iter())
    }

    pub fn sync(&mut self, world: &World) {
        sync_all(&mut self.entities, world);
    }
}

/// Copy each body's pose verbatim into its visual transform.
///
/// Runs once per frame after `World::step` and before rendering.
pub fn sync_all(entities: &mut [Entity], world: &World) {
    for entity in entities {
        if let Some((translation, rotation)) = world.pose(entity.body()) {
            entity.set_transform(Transform::new(translation, rotation));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::ShapeDef;
    use crate::config::PhysicsConfig;

    fn setup() -> (World, Scene, ObjectId) {
        let mut world = World::new(&PhysicsConfig::default());
        let mut scene = Scene::new();
        let mesh = scene.add_mesh(MeshAsset::Sphere { radius: 0.5 });
        let def = BodyDef::dynamic(ShapeDef::Sphere { radius: 0.5 }, Vec3::new(0.0, 5.0, 0.0), 1.0);
        let id = scene
            .spawn(&mut world, mesh, MaterialKind::Ball, Layer::Default, &def)
            .unwrap();
        (world, scene, id)
    }

    #[test]
    fn sync_copies_body_pose() {
        let (mut world, mut scene, id) = setup();
        for _ in 0..10 {
            world.step(1.0 / 60.0);
        }
        scene.sync(&world);

        let entity = scene.entity(id).unwrap();
        let (translation, rotation) = world.pose(entity.body()).unwrap();
        assert_eq!(entity.visual().transform.translation, translation);
        assert_eq!(entity.visual().transform.rotation, rotation);
        assert!(translation.y < 5.0);
    }

    #[test]
    fn sync_twice_is_idempotent() {
        let (mut world, mut scene, _) = setup();
        world.step(0.0);
        scene.sync(&world);
        let first: Vec<_> = scene.objects().cloned().collect();
        scene.sync(&world);
        let second: Vec<_> = scene.objects().cloned().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn rejected_body_creates_no_entity() {
        let (mut world, mut scene, _) = setup();
        let mesh = scene.add_mesh(MeshAsset::Sphere { radius: 0.5 });
        let bad = BodyDef::dynamic(
            ShapeDef::Sphere { radius: 0.5 },
            Vec3::new(f32::NAN, 0.0, 0.0),
            1.0,
        );
        assert!(
            scene
                .spawn(&mut world, mesh, MaterialKind::Ball, Layer::Default, &bad)
                .is_err()
        );
        assert_eq!(scene.entities().len(), 1);
        assert_eq!(world.body_count(), 1);
    }

    #[test]
    fn decorations_are_left_alone_by_sync() {
        let (mut world, mut scene, _) = setup();
        let slab = scene.add_mesh(MeshAsset::Cuboid {
            half_extents: Vec3::new(5.0, 0.05, 5.0),
        });
        let at = Transform::from_translation(Vec3::new(0.0, -3.0, 0.0));
        let id = scene.add_decoration(slab, MaterialKind::Laser, at);

        world.step(0.0);
        scene.sync(&world);
        assert_eq!(scene.decoration_mut(id).unwrap().transform, at);
        assert_eq!(scene.objects().count(), 2);
    }
}
