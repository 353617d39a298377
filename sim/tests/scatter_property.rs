use holefall_sim::{
    ObstacleScatter, ScatterParams,
    geometry::{PlatformSpec, Vec2, Vec3},
};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

#[test]
fn no_obstacle_inside_hole_keep_out_over_many_runs() {
    let mut rng = Pcg32::seed_from_u64(0x5eed);
    let params = ScatterParams {
        count: 5,
        exclusion_radius: 2.0,
        margin: 1.0,
        max_attempts: 64,
    };

    for _ in 0..10_000 {
        let spec = PlatformSpec {
            origin: Vec3::new(0.0, rng.random_range(-100.0..0.0), 0.0),
            size: Vec3::new(20.0, 1.0, 20.0),
            hole_radius: 1.0,
            hole_center: Vec2::new(rng.random_range(1.5..=18.5), rng.random_range(1.5..=18.5)),
        };
        let hole = spec.hole_local();

        let placed: Vec<_> = ObstacleScatter::new(&spec, params, &mut rng).collect();
        assert!(placed.len() <= params.count);
        for p in placed {
            let dx = (p.x - spec.origin.x - hole.x).abs();
            let dz = (p.z - spec.origin.z - hole.y).abs();
            assert!(
                dx.max(dz) >= params.exclusion_radius,
                "obstacle at ({dx}, {dz}) from hole"
            );
        }
    }
}
