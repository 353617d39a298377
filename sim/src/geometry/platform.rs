use std::f32::consts::FRAC_PI_2;
use std::sync::Arc;

use super::extrude::extrude;
use super::outline::{Outline, Point2};
use super::types::{MeshBuffers, PlatformSpec, Quat, Vec3};
use super::weld::weld;
use crate::body::ShapeDef;
use crate::constants::WELD_TOLERANCE;
use crate::error::SimError;

/// Visual mesh plus the collision shape built from the very same buffers.
///
/// Both are expressed around the slab center; the caller places them at
/// `PlatformSpec::origin`.
#[derive(Clone, Debug)]
pub struct PlatformGeometry {
    pub mesh: Arc<MeshBuffers>,
    pub shape: ShapeDef,
}

/// Build the slab-with-hole mesh for `spec` and its matching trimesh shape.
///
/// Steps: outline with hole, extrude by the thickness, weld, recenter on the local
/// origin, then rotate +90 degrees about X so the extrusion axis points along -Y
/// and the outline's second axis maps onto +Z.
pub fn build_platform(spec: &PlatformSpec, segments: u32) -> Result<PlatformGeometry, SimError> {
    spec.validate()?;

    let outline = Outline::rect_with_hole(
        spec.width(),
        spec.depth(),
        Point2::new(spec.hole_center.x, spec.hole_center.y),
        spec.hole_radius,
        segments,
    );
    let soup = extrude(&outline, spec.thickness());

    let mut mesh = weld(&soup, WELD_TOLERANCE);
    mesh.recenter();
    mesh.rotate(&Quat::from_axis_angle(&Vec3::x_axis(), FRAC_PI_2));

    log::debug!(
        "platform mesh: {} vertices, {} triangles (from {} soup triangles)",
        mesh.vertex_count(),
        mesh.triangle_count(),
        soup.len()
    );

    let mesh = Arc::new(mesh);
    Ok(PlatformGeometry {
        shape: ShapeDef::Trimesh(Arc::clone(&mesh)),
        mesh,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Vec2;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    fn spec(hole: Vec2) -> PlatformSpec {
        PlatformSpec {
            origin: Vec3::new(0.0, -15.0, 0.0),
            size: Vec3::new(20.0, 1.0, 14.0),
            hole_radius: 1.0,
            hole_center: hole,
        }
    }

    #[test]
    fn collision_shape_matches_visual_mesh() {
        for hole in [Vec2::new(10.0, 7.0), Vec2::new(2.0, 2.0), Vec2::new(18.5, 12.0)] {
            let geometry = build_platform(&spec(hole), 48).unwrap();
            let shared = geometry.shape.to_shared_shape().unwrap();
            let trimesh = shared.as_trimesh().unwrap();

            assert_eq!(trimesh.vertices().len(), geometry.mesh.vertex_count());
            assert_eq!(trimesh.indices().len(), geometry.mesh.triangle_count());

            let visual = geometry.mesh.aabb();
            let physical = shared.compute_local_aabb();
            assert!((visual.mins - physical.mins).norm() < 1.0e-5);
            assert!((visual.maxs - physical.maxs).norm() < 1.0e-5);
        }
    }

    #[test]
    fn collision_shape_matches_visual_mesh_across_random_specs() {
        let mut rng = Pcg32::seed_from_u64(0x51ab);
        for _ in 0..2_000 {
            let width: f32 = rng.random_range(4.0..40.0);
            let depth = rng.random_range(4.0..40.0);
            let thickness = rng.random_range(0.2..3.0);
            let radius = rng.random_range(0.1..(width.min(depth) * 0.5 - 0.1));
            let segments = rng.random_range(8..=96);
            let hole = Vec2::new(
                rng.random_range((radius + 0.05)..(width - radius - 0.05)),
                rng.random_range((radius + 0.05)..(depth - radius - 0.05)),
            );
            let s = PlatformSpec {
                origin: Vec3::new(0.0, rng.random_range(-200.0..0.0), 0.0),
                size: Vec3::new(width, thickness, depth),
                hole_radius: radius,
                hole_center: hole,
            };

            let geometry = build_platform(&s, segments).unwrap();
            let shared = geometry.shape.to_shared_shape().unwrap();
            let trimesh = shared.as_trimesh().unwrap();
            assert_eq!(trimesh.vertices().len(), geometry.mesh.vertex_count(), "{s:?}");
            assert_eq!(trimesh.indices().len(), geometry.mesh.triangle_count(), "{s:?}");

            let visual = geometry.mesh.aabb();
            let physical = shared.compute_local_aabb();
            assert!((visual.mins - physical.mins).norm() < 1.0e-4, "{s:?}");
            assert!((visual.maxs - physical.maxs).norm() < 1.0e-4, "{s:?}");

            let half = Vec3::new(width, thickness, depth) * 0.5;
            assert!((visual.maxs.coords - half).norm() < 1.0e-3, "{s:?}");
            assert!((visual.mins.coords + half).norm() < 1.0e-3, "{s:?}");
        }
    }

    #[test]
    fn slab_is_centered_and_stood_up() {
        let geometry = build_platform(&spec(Vec2::new(10.0, 7.0)), 32).unwrap();
        let aabb = geometry.mesh.aabb();
        assert!((aabb.maxs.x - 10.0).abs() < 1.0e-4);
        assert!((aabb.maxs.y - 0.5).abs() < 1.0e-4);
        assert!((aabb.maxs.z - 7.0).abs() < 1.0e-4);
        assert!(aabb.center().coords.norm() < 1.0e-4);
    }

    #[test]
    fn welding_leaves_only_cap_vertices() {
        let segments = 32;
        let geometry = build_platform(&spec(Vec2::new(10.0, 7.0)), segments).unwrap();
        // Each cap has one vertex per hole segment, one per ray end and the 4 corners.
        let per_cap = segments as usize * 2 + 4;
        assert_eq!(geometry.mesh.vertex_count(), per_cap * 2);
    }

    #[test]
    fn hole_lands_at_local_hole_position() {
        let s = spec(Vec2::new(4.0, 9.0));
        let geometry = build_platform(&s, 64).unwrap();
        let local = s.hole_local();
        // No vertex may sit strictly inside the hole.
        for p in &geometry.mesh.positions {
            let d = Vec2::new(p.x - local.x, p.z - local.y).norm();
            assert!(d >= 1.0 - 1.0e-4);
        }
    }

    #[test]
    fn shared_buffers_are_the_same_allocation() {
        let geometry = build_platform(&spec(Vec2::new(10.0, 7.0)), 16).unwrap();
        let ShapeDef::Trimesh(buffers) = &geometry.shape else {
            panic!("platform shape must be a trimesh");
        };
        assert!(Arc::ptr_eq(buffers, &geometry.mesh));
    }

    #[test]
    fn malformed_spec_fails_fast() {
        let bad = PlatformSpec {
            hole_radius: 8.0,
            ..spec(Vec2::new(10.0, 7.0))
        };
        assert!(matches!(build_platform(&bad, 16), Err(SimError::InvalidPlatform(_))));
    }
}
