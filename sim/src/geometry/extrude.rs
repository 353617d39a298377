//! Linear extrusion of an [`Outline`] into a closed prism (no bevels).
//!
//! The outline lives on the z = 0 plane and is pushed along +Z by `height`.
//! Output is an unindexed triangle soup with outward-facing winding: every
//! face carries its own copies of its corners, as a raw extrusion does.

use super::outline::{Outline, Point2};
use super::types::Point3;

pub type Triangle = [Point3; 3];

pub fn extrude(outline: &Outline, height: f32) -> Vec<Triangle> {
    let lift = |p: &Point2, z: f32| Point3::new(p.x, p.y, z);

    let wall_count = (outline.outer.len() + outline.hole.len()) * 2;
    let mut soup = Vec::with_capacity(outline.cap.len() * 2 + wall_count);

    // Caps: the top keeps the outline's CCW winding (+Z normal), the bottom is flipped.
    for [a, b, c] in &outline.cap {
        soup.push([lift(a, height), lift(b, height), lift(c, height)]);
        soup.push([lift(a, 0.0), lift(c, 0.0), lift(b, 0.0)]);
    }

    // Walls: for an edge a -> b the material sits on the left, so the quad
    // (a0, b0, b1, a1) faces right, away from the solid.
    for ring in [&outline.outer, &outline.hole] {
        for (i, a) in ring.iter().enumerate() {
            let b = &ring[(i + 1) % ring.len()];
            let (a0, b0) = (lift(a, 0.0), lift(b, 0.0));
            let (a1, b1) = (lift(a, height), lift(b, height));
            soup.push([a0, b0, b1]);
            soup.push([a0, b1, a1]);
        }
    }

    soup
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Divergence theorem: sum of signed tetrahedron volumes against the origin.
    fn signed_volume(soup: &[Triangle]) -> f32 {
        soup.iter()
            .map(|[a, b, c]| a.coords.dot(&b.coords.cross(&c.coords)) / 6.0)
            .sum()
    }

    #[test]
    fn volume_is_cap_area_times_height() {
        let outline = Outline::rect_with_hole(8.0, 6.0, Point2::new(3.0, 3.0), 1.0, 24);
        let soup = extrude(&outline, 2.0);
        let expected = outline.cap_area() * 2.0;
        assert!((signed_volume(&soup) - expected).abs() < 1.0e-2);
    }

    #[test]
    fn triangle_count_covers_caps_and_walls() {
        let outline = Outline::rect_with_hole(8.0, 6.0, Point2::new(3.0, 3.0), 1.0, 24);
        let soup = extrude(&outline, 1.0);
        let walls = (outline.outer.len() + outline.hole.len()) * 2;
        assert_eq!(soup.len(), outline.cap.len() * 2 + walls);
    }
}
