/*!
Core geometry types and math aliases shared by the geometry stages.

No algorithms live here beyond bookkeeping on the buffers themselves.
*/

use nalgebra as na;
use rapier3d::parry::bounding_volume::Aabb;

use crate::error::SimError;

/// Common math aliases for clarity and consistency.
pub type Vec2 = na::Vector2<f32>;
pub type Vec3 = na::Vector3<f32>;
pub type Point3 = na::Point3<f32>;
pub type Quat = na::UnitQuaternion<f32>;

/// Parameters of one platform.
///
/// `hole_center` is measured in the outline frame: from the platform's
/// min-x/min-z corner, so it ranges over `[0, width] x [0, depth]`.
/// `origin` is where the center of the slab lands in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlatformSpec {
    pub origin: Vec3,
    /// Width (x), thickness (y), depth (z).
    pub size: Vec3,
    pub hole_radius: f32,
    pub hole_center: Vec2,
}

impl PlatformSpec {
    #[inline]
    pub fn width(&self) -> f32 {
        self.size.x
    }

    #[inline]
    pub fn thickness(&self) -> f32 {
        self.size.y
    }

    #[inline]
    pub fn depth(&self) -> f32 {
        self.size.z
    }

    /// Hole center relative to the slab center, on the (x, z) plane.
    #[inline]
    pub fn hole_local(&self) -> Vec2 {
        Vec2::new(
            self.hole_center.x - self.width() * 0.5,
            self.hole_center.y - self.depth() * 0.5,
        )
    }

    /// World-space point at the middle of the hole, halfway through the slab.
    #[inline]
    pub fn hole_world(&self) -> Vec3 {
        let local = self.hole_local();
        self.origin + Vec3::new(local.x, 0.0, local.y)
    }

    /// Reject specs that would produce degenerate or self-intersecting geometry.
    pub fn validate(&self) -> Result<(), SimError> {
        let finite = self.origin.iter().all(|v| v.is_finite())
            && self.size.iter().all(|v| v.is_finite())
            && self.hole_center.iter().all(|v| v.is_finite())
            && self.hole_radius.is_finite();
        if !finite {
            return Err(SimError::NonFinite("platform spec"));
        }
        if self.size.iter().any(|s| *s <= 0.0) {
            return Err(SimError::InvalidPlatform("size must be positive"));
        }
        if self.hole_radius <= 0.0 {
            return Err(SimError::InvalidPlatform("hole radius must be positive"));
        }
        if self.hole_radius >= self.width().min(self.depth()) * 0.5 {
            return Err(SimError::InvalidPlatform(
                "hole radius must be below half the smaller platform dimension",
            ));
        }

        let c = self.hole_center;
        if c.x < 0.0 || c.x > self.width() || c.y < 0.0 || c.y > self.depth() {
            return Err(SimError::InvalidPlatform("hole center outside the footprint"));
        }

        let r = self.hole_radius;
        if c.x - r <= 0.0 || c.x + r >= self.width() || c.y - r <= 0.0 || c.y + r >= self.depth()
        {
            return Err(SimError::InvalidPlatform("hole crosses the platform edge"));
        }

        Ok(())
    }
}

/// Indexed triangle mesh with shared vertices.
///
/// This is the single representation handed to both the renderer and rapier.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshBuffers {
    pub positions: Vec<Point3>,
    pub indices: Vec<[u32; 3]>,
}

impl MeshBuffers {
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    pub fn aabb(&self) -> Aabb {
        let mut iter = self.positions.iter();
        let Some(first) = iter.next() else {
            return Aabb::new(Point3::origin(), Point3::origin());
        };
        let (mins, maxs) = iter.fold((*first, *first), |(lo, hi), p| (lo.inf(p), hi.sup(p)));
        Aabb::new(mins, maxs)
    }

    pub fn translate(&mut self, offset: &Vec3) {
        for p in &mut self.positions {
            *p += *offset;
        }
    }

    pub fn rotate(&mut self, rotation: &Quat) {
        for p in &mut self.positions {
            *p = rotation * *p;
        }
    }

    /// Move the bounding-box center to the local origin.
    pub fn recenter(&mut self) {
        let center = self.aabb().center();
        self.translate(&-center.coords);
    }

    /// Flat `[x, y, z]` positions, the layout GPU vertex buffers expect.
    pub fn positions_flat(&self) -> Vec<[f32; 3]> {
        self.positions.iter().map(|p| [p.x, p.y, p.z]).collect()
    }

    pub fn indices_flat(&self) -> Vec<u32> {
        self.indices.iter().flatten().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> PlatformSpec {
        PlatformSpec {
            origin: Vec3::zeros(),
            size: Vec3::new(20.0, 1.0, 20.0),
            hole_radius: 1.0,
            hole_center: Vec2::new(5.0, 12.0),
        }
    }

    #[test]
    fn valid_spec_passes() {
        assert_eq!(spec().validate(), Ok(()));
    }

    #[test]
    fn oversized_hole_is_rejected() {
        let s = PlatformSpec {
            hole_radius: 10.0,
            hole_center: Vec2::new(10.0, 10.0),
            ..spec()
        };
        assert!(matches!(s.validate(), Err(SimError::InvalidPlatform(_))));
    }

    #[test]
    fn hole_outside_footprint_is_rejected() {
        let s = PlatformSpec {
            hole_center: Vec2::new(-3.0, 10.0),
            ..spec()
        };
        assert!(matches!(s.validate(), Err(SimError::InvalidPlatform(_))));
    }

    #[test]
    fn hole_touching_edge_is_rejected() {
        let s = PlatformSpec {
            hole_center: Vec2::new(0.5, 10.0),
            ..spec()
        };
        assert!(s.validate().is_err());
    }

    #[test]
    fn nan_is_non_finite() {
        let s = PlatformSpec {
            hole_radius: f32::NAN,
            ..spec()
        };
        assert_eq!(s.validate(), Err(SimError::NonFinite("platform spec")));
    }

    #[test]
    fn hole_local_is_relative_to_slab_center() {
        let local = spec().hole_local();
        assert!((local.x - -5.0).abs() < 1.0e-6);
        assert!((local.y - 2.0).abs() < 1.0e-6);
    }

    #[test]
    fn recenter_moves_box_center_to_origin() {
        let mut mesh = MeshBuffers {
            positions: vec![Point3::new(1.0, 2.0, 3.0), Point3::new(5.0, 4.0, 9.0)],
            indices: vec![],
        };
        mesh.recenter();
        let aabb = mesh.aabb();
        assert!(aabb.center().coords.norm() < 1.0e-6);
        assert!((aabb.maxs.x - 2.0).abs() < 1.0e-6);
    }
}
