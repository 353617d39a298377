//! Procedural obstacle placement on a platform.
//!
//! Positions are drawn uniformly over the platform footprint (minus a margin)
//! and rejected when they land in the square keep-out zone around the hole.
//! Obstacles are not tested against each other; overlapping cubes are allowed.

use rand::Rng;

use crate::config::ObstacleConfig;
use crate::geometry::{PlatformSpec, Vec3};

/// Height of an obstacle center above the platform origin (meters).
pub const OBSTACLE_LIFT: f32 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScatterParams {
    pub count: usize,
    /// Half-width of the L-infinity keep-out square around the hole center.
    pub exclusion_radius: f32,
    /// Distance kept between obstacle centers and the platform edge.
    pub margin: f32,
    pub max_attempts: u32,
}

impl From<&ObstacleConfig> for ScatterParams {
    fn from(cfg: &ObstacleConfig) -> Self {
        Self {
            count: cfg.count,
            exclusion_radius: cfg.exclusion_radius,
            margin: cfg.margin,
            max_attempts: cfg.max_attempts,
        }
    }
}

/// Lazy sequence of world-space obstacle centers for one platform.
///
/// Yields at most `params.count` items. An obstacle whose every attempt lands in
/// the keep-out zone is skipped with a warning, so the count is advisory.
pub struct ObstacleScatter<'a, R: Rng> {
    spec: PlatformSpec,
    params: ScatterParams,
    rng: &'a mut R,
    remaining: usize,
    skipped: usize,
}

impl<'a, R: Rng> ObstacleScatter<'a, R> {
    pub fn new(spec: &PlatformSpec, params: ScatterParams, rng: &'a mut R) -> Self {
        Self {
            spec: *spec,
            remaining: params.count,
            params,
            rng,
            skipped: 0,
        }
    }

    /// Obstacles dropped so far because placement ran out of attempts.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Sample one position in the slab-centered frame, or `None` once the
    /// attempt budget is spent.
    fn sample_local(&mut self) -> Option<(f32, f32)> {
        let half_x = (self.spec.width() * 0.5 - self.params.margin).max(0.0);
        let half_z = (self.spec.depth() * 0.5 - self.params.margin).max(0.0);
        let hole = self.spec.hole_local();
        let r = self.params.exclusion_radius;

        for _ in 0..self.params.max_attempts {
            let x = self.rng.random_range(-half_x..=half_x);
            let z = self.rng.random_range(-half_z..=half_z);
            if !in_keep_out(x - hole.x, z - hole.y, r) {
                return Some((x, z));
            }
        }
        None
    }
}

impl<R: Rng> Iterator for ObstacleScatter<'_, R> {
    type Item = Vec3;

    fn next(&mut self) -> Option<Vec3> {
        while self.remaining > 0 {
            self.remaining -= 1;
            match self.sample_local() {
                Some((x, z)) => {
                    let o = self.spec.origin;
                    return Some(Vec3::new(o.x + x, o.y + OBSTACLE_LIFT, o.z + z));
                }
                None => {
                    self.skipped += 1;
                    log::warn!(
                        "obstacle skipped after {} attempts (platform at y={})",
                        self.params.max_attempts,
                        self.spec.origin.y
                    );
                }
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}

/// L-infinity keep-out test: both offsets strictly inside the radius.
#[inline]
pub fn in_keep_out(dx: f32, dz: f32, radius: f32) -> bool {
    dx.abs() < radius && dz.abs() < radius
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn spec() -> PlatformSpec {
        PlatformSpec {
            origin: Vec3::new(3.0, -30.0, -2.0),
            size: Vec3::new(20.0, 1.0, 20.0),
            hole_radius: 1.0,
            hole_center: Vec2::new(12.0, 6.0),
        }
    }

    fn params() -> ScatterParams {
        ScatterParams {
            count: 50,
            exclusion_radius: 2.0,
            margin: 1.0,
            max_attempts: 64,
        }
    }

    #[test]
    fn yields_exactly_count_when_space_allows() {
        let mut rng = Pcg32::seed_from_u64(1);
        let positions: Vec<_> = ObstacleScatter::new(&spec(), params(), &mut rng).collect();
        assert_eq!(positions.len(), 50);
    }

    #[test]
    fn positions_stay_inside_margin_and_sit_on_platform() {
        let s = spec();
        let mut rng = Pcg32::seed_from_u64(2);
        for p in ObstacleScatter::new(&s, params(), &mut rng) {
            assert!((p.x - s.origin.x).abs() <= 9.0 + 1.0e-5);
            assert!((p.z - s.origin.z).abs() <= 9.0 + 1.0e-5);
            assert!((p.y - (s.origin.y + OBSTACLE_LIFT)).abs() < 1.0e-6);
        }
    }

    #[test]
    fn exhausted_placements_are_skipped_not_looped() {
        // Keep-out covers the whole footprint: every attempt fails.
        let p = ScatterParams {
            exclusion_radius: 100.0,
            max_attempts: 8,
            ..params()
        };
        let mut rng = Pcg32::seed_from_u64(3);
        let mut scatter = ObstacleScatter::new(&spec(), p, &mut rng);
        assert_eq!(scatter.next(), None);
        assert_eq!(scatter.skipped(), 50);
    }

    #[test]
    fn same_seed_same_layout() {
        let mut a = Pcg32::seed_from_u64(42);
        let mut b = Pcg32::seed_from_u64(42);
        let first: Vec<_> = ObstacleScatter::new(&spec(), params(), &mut a).collect();
        let second: Vec<_> = ObstacleScatter::new(&spec(), params(), &mut b).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn keep_out_is_chebyshev() {
        assert!(in_keep_out(1.9, -1.9, 2.0));
        assert!(!in_keep_out(2.0, 0.0, 2.0));
        assert!(!in_keep_out(0.5, 2.5, 2.0));
    }
}
