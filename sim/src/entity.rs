/*!
Visual objects and their physics bindings.

An [`Entity`] is the typed pair of one visual object and the rigid body it
mirrors. Both halves are created together by `Scene::spawn` and live for the
whole session. Decorative objects without a body are plain [`VisualObject`]s.
*/

use crate::geometry::{Quat, Vec3};
use crate::world::BodyHandle;

/// A rigid transform (isometry) in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
}

impl Transform {
    #[inline]
    pub fn new(translation: Vec3, rotation: Quat) -> Self {
        Self {
            translation,
            rotation,
        }
    }

    #[inline]
    pub fn from_translation(translation: Vec3) -> Self {
        Self::new(translation, Quat::identity())
    }
}

/// Stable id of a visual object, unique within a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u32);

/// Index into the session's `MeshLibrary`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MeshHandle(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MaterialKind {
    Ball,
    Platform,
    Obstacle,
    Laser,
}

/// Visibility group an object belongs to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Layer {
    #[default]
    Default,
    Obstacles,
}

#[derive(Clone, Debug, PartialEq)]
pub struct VisualObject {
    pub id: ObjectId,
    pub mesh: MeshHandle,
    pub material: MaterialKind,
    pub layer: Layer,
    pub transform: Transform,
}

/// One visual object bound to one rigid body.
///
/// The visual transform is only ever written by [`sync_all`](crate::scene::sync_all).
#[derive(Clone, Debug)]
pub struct Entity {
    visual: VisualObject,
    body: BodyHandle,
}

impl Entity {
    pub(crate) fn new(visual: VisualObject, body: BodyHandle) -> Self {
        Self { visual, body }
    }

    #[inline]
    pub fn visual(&self) -> &VisualObject {
        &self.visual
    }

    #[inline]
    pub fn body(&self) -> BodyHandle {
        self.body
    }

    #[inline]
    pub fn id(&self) -> ObjectId {
        self.visual.id
    }

    pub(crate) fn set_transform(&mut self, transform: Transform) {
        self.visual.transform = transform;
    }
}
