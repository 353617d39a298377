use std::collections::HashMap;

use super::extrude::Triangle;
use super::types::{MeshBuffers, Point3};

/// Merge coincident vertices of a triangle soup into an indexed mesh.
///
/// Positions are snapped to a `tolerance` grid for lookup; the first position seen
/// for a grid cell is the one kept. Triangles that collapse after welding are dropped.
/// Output order follows first appearance, so the same soup always welds identically.
pub fn weld(soup: &[Triangle], tolerance: f32) -> MeshBuffers {
    let inv = 1.0 / tolerance.max(f32::EPSILON);
    let key = |p: &Point3| {
        (
            (p.x * inv).round() as i64,
            (p.y * inv).round() as i64,
            (p.z * inv).round() as i64,
        )
    };

    let mut lookup: HashMap<(i64, i64, i64), u32> = HashMap::with_capacity(soup.len());
    let mut mesh = MeshBuffers::default();

    for tri in soup {
        let idx = (*tri).map(|p| {
            *lookup.entry(key(&p)).or_insert_with(|| {
                mesh.positions.push(p);
                (mesh.positions.len() - 1) as u32
            })
        });
        if idx[0] != idx[1] && idx[1] != idx[2] && idx[0] != idx[2] {
            mesh.indices.push(idx);
        }
    }

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_corners_collapse() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(1.0, 0.0, 0.0);
        let c = Point3::new(1.0, 1.0, 0.0);
        let d = Point3::new(0.0, 1.0, 0.0);
        let mesh = weld(&[[a, b, c], [a, c, d]], 1.0e-4);

        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.indices, vec![[0, 1, 2], [0, 2, 3]]);
    }

    #[test]
    fn near_duplicates_within_tolerance_merge() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let a2 = Point3::new(1.0e-6, 0.0, 0.0);
        let b = Point3::new(1.0, 0.0, 0.0);
        let c = Point3::new(0.0, 1.0, 0.0);
        let mesh = weld(&[[a, b, c], [a2, c, b]], 1.0e-4);
        assert_eq!(mesh.vertex_count(), 3);
    }

    #[test]
    fn collapsed_triangles_are_dropped() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(0.0, 0.0, 1.0e-7);
        let c = Point3::new(0.0, 1.0, 0.0);
        let mesh = weld(&[[a, b, c]], 1.0e-4);
        assert!(mesh.indices.is_empty());
    }
}
