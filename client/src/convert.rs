//! Conversions from simulation math types to bevy's.

use bevy::prelude::*;
use holefall_sim::geometry;

#[inline]
pub fn vec3(v: &geometry::Vec3) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

#[inline]
pub fn point3(p: &geometry::Point3) -> Vec3 {
    Vec3::new(p.x, p.y, p.z)
}

#[inline]
pub fn quat(q: &geometry::Quat) -> Quat {
    Quat::from_xyzw(q.i, q.j, q.k, q.w)
}

pub fn transform(t: &holefall_sim::Transform) -> Transform {
    Transform {
        translation: vec3(&t.translation),
        rotation: quat(&t.rotation),
        ..default()
    }
}
