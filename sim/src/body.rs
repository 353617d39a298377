use std::sync::Arc;

use rapier3d::{na::Translation3, parry::shape::TriMeshFlags, prelude::*};

use crate::error::SimError;
use crate::geometry::{MeshBuffers, Quat, Vec3};

/// Whether the simulation integrates a body or only collides against it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BodyKind {
    Dynamic,
    Static,
}

/// Collision shapes a body can carry.
#[derive(Clone, Debug)]
pub enum ShapeDef {
    /// Ball (meters).
    Sphere { radius: f32 },

    /// Axis-aligned box in body space with given half-extents (meters).
    Cuboid { half_extents: Vec3 },

    /// Infinite half-space whose outward normal is the body's local +Y.
    Plane,

    /// Concave triangle mesh.
    ///
    /// Holds the very buffers the visual mesh is drawn from; nothing is copied
    /// or simplified on the way into rapier.
    Trimesh(Arc<MeshBuffers>),
}

impl ShapeDef {
    pub fn to_shared_shape(&self) -> Result<SharedShape, SimError> {
        Ok(match self {
            ShapeDef::Sphere { radius } => SharedShape::ball(*radius),
            ShapeDef::Cuboid { half_extents } => {
                SharedShape::cuboid(half_extents.x, half_extents.y, half_extents.z)
            }
            ShapeDef::Plane => SharedShape::halfspace(Vector::y_axis()),
            // Internal edges get corrected normals so seams between cap
            // triangles act as one flat surface.
            ShapeDef::Trimesh(mesh) => SharedShape::trimesh_with_flags(
                mesh.positions.clone(),
                mesh.indices.clone(),
                TriMeshFlags::FIX_INTERNAL_EDGES,
            )
            .map_err(|e| SimError::Trimesh(format!("{e:?}")))?,
        })
    }

    fn is_finite(&self) -> bool {
        match self {
            ShapeDef::Sphere { radius } => radius.is_finite(),
            ShapeDef::Cuboid { half_extents } => half_extents.iter().all(|v| v.is_finite()),
            ShapeDef::Plane => true,
            ShapeDef::Trimesh(mesh) => mesh.positions.iter().all(|p| p.iter().all(|v| v.is_finite())),
        }
    }
}

/// Everything needed to register one rigid body with the [`World`](crate::World).
#[derive(Clone, Debug)]
pub struct BodyDef {
    pub kind: BodyKind,
    pub shape: ShapeDef,
    /// Ignored for static bodies.
    pub mass: f32,
    /// World-space translation.
    pub translation: Vec3,
    /// World-space rotation (unit quaternion).
    pub rotation: Quat,
    pub linvel: Vec3,
    pub angvel: Vec3,
    /// Multiplicative spin decay applied every step.
    pub angular_damping: f32,
}

impl BodyDef {
    pub fn fixed(shape: ShapeDef, translation: Vec3) -> Self {
        Self {
            kind: BodyKind::Static,
            shape,
            mass: 0.0,
            translation,
            rotation: Quat::identity(),
            linvel: Vec3::zeros(),
            angvel: Vec3::zeros(),
            angular_damping: 0.0,
        }
    }

    pub fn dynamic(shape: ShapeDef, translation: Vec3, mass: f32) -> Self {
        Self {
            kind: BodyKind::Dynamic,
            mass,
            ..Self::fixed(shape, translation)
        }
    }

    pub fn with_angular_damping(mut self, damping: f32) -> Self {
        self.angular_damping = damping;
        self
    }

    pub fn with_linvel(mut self, linvel: Vec3) -> Self {
        self.linvel = linvel;
        self
    }

    pub fn validate(&self) -> Result<(), SimError> {
        let finite = self.translation.iter().all(|v| v.is_finite())
            && self.rotation.coords.iter().all(|v| v.is_finite())
            && self.linvel.iter().all(|v| v.is_finite())
            && self.angvel.iter().all(|v| v.is_finite())
            && self.mass.is_finite()
            && self.angular_damping.is_finite()
            && self.shape.is_finite();
        if finite {
            Ok(())
        } else {
            Err(SimError::NonFinite("body definition"))
        }
    }
}

pub fn rigid_body_from_def(def: &BodyDef) -> RigidBody {
    let iso = Isometry::from_parts(Translation3::from(def.translation), def.rotation);
    match def.kind {
        BodyKind::Static => RigidBodyBuilder::fixed().pose(iso).build(),
        BodyKind::Dynamic => RigidBodyBuilder::dynamic()
            .pose(iso)
            .linvel(def.linvel)
            .angvel(def.angvel)
            .angular_damping(def.angular_damping)
            .build(),
    }
}

/// Build a Rapier collider from a `BodyDef`.
///
/// The pose lives on the rigid body, so the collider is created with identity
/// local transform.
pub fn collider_from_def(def: &BodyDef) -> Result<Collider, SimError> {
    let builder = ColliderBuilder::new(def.shape.to_shared_shape()?);
    let builder = match def.kind {
        BodyKind::Dynamic => builder.mass(def.mass),
        BodyKind::Static => builder,
    };
    Ok(builder.build())
}
