//! 2D outline of a platform: a `width x depth` rectangle with one circular hole.
//!
//! The cap is triangulated by casting a ray from the hole center through every
//! hole vertex out to the rectangle. Each wedge between two consecutive rays is
//! convex, so a fan from its inner vertex covers it without overlaps. Rectangle
//! corners that fall inside a wedge are inserted into that wedge's outer chain.

use std::f32::consts::TAU;

use nalgebra as na;

pub type Point2 = na::Point2<f32>;

/// Corners closer than this (radians) to a ray are treated as lying on it.
const CORNER_ANGLE_EPS: f32 = 1.0e-5;

#[derive(Clone, Debug)]
pub struct Outline {
    /// Outer boundary, counter-clockwise. Contains the rectangle corners plus every
    /// point where a hole ray meets the rectangle, so the walls share the cap's vertices.
    pub outer: Vec<Point2>,
    /// Hole boundary, clockwise (the material is on the left of every edge).
    pub hole: Vec<Point2>,
    /// Cap triangles, counter-clockwise.
    pub cap: Vec<[Point2; 3]>,
}

impl Outline {
    /// Build the outline of a `width x depth` rectangle spanning `[0, width] x [0, depth]`
    /// with a hole of `radius` at `center`.
    ///
    /// The caller guarantees the circle lies strictly inside the rectangle
    /// (see `PlatformSpec::validate`).
    pub fn rect_with_hole(
        width: f32,
        depth: f32,
        center: Point2,
        radius: f32,
        segments: u32,
    ) -> Self {
        let n = segments.max(3) as usize;
        let step = TAU / n as f32;

        let rays: Vec<(Point2, Point2)> = (0..n)
            .map(|i| {
                let angle = step * i as f32;
                let dir = na::Vector2::new(angle.cos(), angle.sin());
                let inner = center + dir * radius;
                let outer = center + dir * ray_to_rect(width, depth, &center, &dir);
                (inner, outer)
            })
            .collect();

        // Bucket each rectangle corner into the wedge that contains it.
        let corners = [
            Point2::new(0.0, 0.0),
            Point2::new(width, 0.0),
            Point2::new(width, depth),
            Point2::new(0.0, depth),
        ];
        let mut wedge_corners: Vec<Vec<(f32, Point2)>> = vec![Vec::new(); n];
        for corner in corners {
            let d = corner - center;
            let angle = d.y.atan2(d.x).rem_euclid(TAU);
            let slot = angle / step;
            let nearest = slot.round();
            if (slot - nearest).abs() * step < CORNER_ANGLE_EPS {
                // The ray already passes through this corner.
                continue;
            }
            let wedge = (slot.floor() as usize).min(n - 1);
            wedge_corners[wedge].push((angle, corner));
        }
        for bucket in &mut wedge_corners {
            bucket.sort_by(|a, b| a.0.total_cmp(&b.0));
        }

        let mut outer = Vec::with_capacity(n + 4);
        let mut cap = Vec::new();
        for i in 0..n {
            let j = (i + 1) % n;
            let (h_i, r_i) = rays[i];
            let (h_j, r_j) = rays[j];

            outer.push(r_i);
            let mut chain = vec![r_i];
            for &(_, corner) in &wedge_corners[i] {
                outer.push(corner);
                chain.push(corner);
            }
            chain.push(r_j);
            chain.push(h_j);

            for pair in chain.windows(2) {
                cap.push([h_i, pair[0], pair[1]]);
            }
        }

        let hole = rays.iter().rev().map(|(inner, _)| *inner).collect();

        Self { outer, hole, cap }
    }

    /// Signed area of the cap (positive when counter-clockwise).
    pub fn cap_area(&self) -> f32 {
        self.cap
            .iter()
            .map(|[a, b, c]| {
                let ab = b - a;
                let ac = c - a;
                0.5 * (ab.x * ac.y - ab.y * ac.x)
            })
            .sum()
    }
}

/// Distance along `dir` from `origin` (inside the rectangle) to its boundary.
fn ray_to_rect(width: f32, depth: f32, origin: &Point2, dir: &na::Vector2<f32>) -> f32 {
    let axis = |o: f32, d: f32, hi: f32| {
        if d > 0.0 {
            (hi - o) / d
        } else if d < 0.0 {
            -o / d
        } else {
            f32::INFINITY
        }
    };
    axis(origin.x, dir.x, width).min(axis(origin.y, dir.y, depth))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn cap_area_matches_rectangle_minus_polygon_hole() {
        let segments = 48;
        let radius = 1.5;
        let outline = Outline::rect_with_hole(20.0, 12.0, Point2::new(7.0, 4.0), radius, segments);

        // Area of the inscribed regular polygon that approximates the hole.
        let n = segments as f32;
        let hole_area = 0.5 * n * radius * radius * (2.0 * PI / n).sin();
        let expected = 20.0 * 12.0 - hole_area;

        assert!((outline.cap_area() - expected).abs() < 1.0e-2);
    }

    #[test]
    fn every_cap_triangle_is_counter_clockwise() {
        let outline = Outline::rect_with_hole(10.0, 10.0, Point2::new(2.0, 8.0), 1.0, 32);
        for [a, b, c] in &outline.cap {
            let ab = b - a;
            let ac = c - a;
            assert!(ab.x * ac.y - ab.y * ac.x > 0.0);
        }
    }

    #[test]
    fn outer_ring_contains_all_corners() {
        let outline = Outline::rect_with_hole(10.0, 6.0, Point2::new(5.0, 3.0), 1.0, 16);
        for corner in [
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 6.0),
            Point2::new(0.0, 6.0),
        ] {
            assert!(outline.outer.iter().any(|p| (p - corner).norm() < 1.0e-5));
        }
        assert_eq!(outline.hole.len(), 16);
    }

    #[test]
    fn ray_hits_nearest_side() {
        let d = ray_to_rect(10.0, 4.0, &Point2::new(5.0, 2.0), &na::Vector2::new(1.0, 0.0));
        assert!((d - 5.0).abs() < 1.0e-6);
        let d = ray_to_rect(10.0, 4.0, &Point2::new(5.0, 2.0), &na::Vector2::new(0.0, -1.0));
        assert!((d - 2.0).abs() < 1.0e-6);
    }
}
