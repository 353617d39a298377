//! The game loop: one owned session holding the world, the scene and the input state.
//!
//! Per tick, always in this order:
//! sample clock -> compute intention -> apply torque -> step world -> sync visuals.
//! Rendering happens outside, from [`GameSession::frame`], after `tick` returns.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::body::{BodyDef, ShapeDef};
use crate::clock::SimulationClock;
use crate::config::{GameConfig, Tuning};
use crate::entity::{Layer, MaterialKind, MeshHandle, ObjectId, Transform, VisualObject};
use crate::error::SimError;
use crate::geometry::{PlatformSpec, Point3, Vec2, Vec3, build_platform};
use crate::input::{Key, MovementState};
use crate::scatter::{ObstacleScatter, ScatterParams};
use crate::scene::{MeshAsset, MeshLibrary, Scene};
use crate::world::{BodyHandle, World};

/// Half-height of the decorative laser slab (meters).
const LASER_HALF_HEIGHT: f32 = 0.05;

/// One appended platform and the obstacles scattered on it.
#[derive(Clone, Debug)]
pub struct PlatformRecord {
    pub spec: PlatformSpec,
    pub object: ObjectId,
    pub obstacles: Vec<ObjectId>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    pub eye: Point3,
    pub target: Point3,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

/// Everything a render surface needs to draw one frame.
pub struct RenderFrame<'a> {
    pub objects: Vec<&'a VisualObject>,
    pub meshes: &'a MeshLibrary,
    pub camera: CameraPose,
    pub tuning: &'a Tuning,
    pub viewport: Viewport,
}

pub struct GameSession {
    config: GameConfig,
    tuning: Tuning,
    world: World,
    scene: Scene,
    movement: MovementState,
    clock: SimulationClock,
    rng: Pcg32,
    ball: ObjectId,
    ball_body: BodyHandle,
    obstacle_mesh: MeshHandle,
    platforms: Vec<PlatformRecord>,
    laser: ObjectId,
    obstacles_visible: bool,
    viewport: Viewport,
}

impl GameSession {
    /// Build a session with the ball and the first platform at y = 0.
    pub fn new(config: GameConfig) -> Result<Self, SimError> {
        config.validate()?;

        let mut world = World::new(&config.physics);
        let mut scene = Scene::new();

        let ball_mesh = scene.add_mesh(MeshAsset::Sphere {
            radius: config.ball.radius,
        });
        let ball_def = BodyDef::dynamic(
            ShapeDef::Sphere {
                radius: config.ball.radius,
            },
            Vec3::new(0.0, config.ball.spawn_height, 0.0),
            config.ball.mass,
        )
        .with_angular_damping(config.ball.angular_damping);
        let ball = scene.spawn(
            &mut world,
            ball_mesh,
            MaterialKind::Ball,
            Layer::Default,
            &ball_def,
        )?;
        let ball_body = scene
            .entity(ball)
            .map(|e| e.body())
            .ok_or(SimError::UnknownBody)?;

        let half = config.obstacles.size * 0.5;
        let obstacle_mesh = scene.add_mesh(MeshAsset::Cuboid {
            half_extents: Vec3::repeat(half),
        });

        let [width, thickness, _] = config.platform.size;
        let laser_mesh = scene.add_mesh(MeshAsset::Cuboid {
            half_extents: Vec3::new(width * 0.5, LASER_HALF_HEIGHT, LASER_HALF_HEIGHT),
        });
        let laser = scene.add_decoration(
            laser_mesh,
            MaterialKind::Laser,
            Transform::from_translation(Vec3::new(0.0, -thickness - 1.0, 0.0)),
        );

        let mut session = Self {
            clock: SimulationClock::new(
                config.physics.fixed_time_step,
                config.physics.max_sub_steps,
            ),
            rng: Pcg32::seed_from_u64(config.seed),
            tuning: config.tuning.clone(),
            config,
            world,
            scene,
            movement: MovementState::default(),
            ball,
            ball_body,
            obstacle_mesh,
            platforms: Vec::new(),
            laser,
            obstacles_visible: true,
            viewport: Viewport::default(),
        };
        session.add_platform(Vec3::zeros())?;

        log::info!(
            "session started: seed {}, {} bodies",
            session.config.seed,
            session.world.body_count()
        );
        Ok(session)
    }

    /// Run one frame of simulation. `now_ms` is the host's frame timestamp.
    ///
    /// Returns the number of fixed physics steps taken.
    pub fn tick(&mut self, now_ms: f64) -> u32 {
        let elapsed = self.clock.sample(now_ms);

        let intention = self.movement.intention();
        if let Some(torque) = intention.torque(self.tuning.ball_speed) {
            if let Err(e) = self.world.apply_torque(self.ball_body, torque) {
                log::warn!("ball torque dropped: {e}");
            }
        }

        let substeps = self.world.step(elapsed);
        self.scene.sync(&self.world);
        substeps
    }

    pub fn key_down(&mut self, key: Key) {
        if self.movement.key_down(key) {
            return;
        }
        match key {
            Key::NextPlatform => {
                if let Err(e) = self.advance_platform() {
                    log::error!("could not append platform: {e}");
                }
            }
            Key::ToggleObstacles => self.toggle_obstacles(),
            _ => {}
        }
    }

    pub fn key_up(&mut self, key: Key) {
        self.movement.key_up(key);
    }

    /// Append a platform one spacing below the last one. Older platforms are kept.
    pub fn advance_platform(&mut self) -> Result<Vec3, SimError> {
        let last_y = self.platforms.last().map_or(0.0, |p| p.spec.origin.y);
        let origin = Vec3::new(0.0, last_y - self.config.platform.spacing, 0.0);
        self.add_platform(origin)?;
        Ok(origin)
    }

    fn add_platform(&mut self, origin: Vec3) -> Result<(), SimError> {
        let pc = &self.config.platform;
        let [width, thickness, depth] = pc.size;
        let border = pc.hole_border;
        let hole_center = Vec2::new(
            self.rng.random_range(border..=width - border),
            self.rng.random_range(border..=depth - border),
        );
        let spec = PlatformSpec {
            origin,
            size: Vec3::new(width, thickness, depth),
            hole_radius: pc.hole_radius,
            hole_center,
        };

        let geometry = build_platform(&spec, pc.hole_segments)?;
        let mesh = self.scene.add_mesh(MeshAsset::Indexed(geometry.mesh.clone()));
        let object = self.scene.spawn(
            &mut self.world,
            mesh,
            MaterialKind::Platform,
            Layer::Default,
            &BodyDef::fixed(geometry.shape, origin),
        )?;

        let cube = ShapeDef::Cuboid {
            half_extents: Vec3::repeat(self.config.obstacles.size * 0.5),
        };
        let params = ScatterParams::from(&self.config.obstacles);
        let mut obstacles = Vec::with_capacity(params.count);
        for position in ObstacleScatter::new(&spec, params, &mut self.rng) {
            obstacles.push(self.scene.spawn(
                &mut self.world,
                self.obstacle_mesh,
                MaterialKind::Obstacle,
                Layer::Obstacles,
                &BodyDef::fixed(cube.clone(), position),
            )?);
        }

        log::info!(
            "platform {} at y={} (hole at {:.2}, {:.2}, {} obstacles)",
            self.platforms.len(),
            origin.y,
            hole_center.x,
            hole_center.y,
            obstacles.len()
        );
        self.platforms.push(PlatformRecord {
            spec,
            object,
            obstacles,
        });
        Ok(())
    }

    pub fn toggle_obstacles(&mut self) {
        self.obstacles_visible = !self.obstacles_visible;
        log::debug!("obstacle layer visible: {}", self.obstacles_visible);
    }

    pub fn obstacles_visible(&self) -> bool {
        self.obstacles_visible
    }

    /// Move the decorative laser slab. It has no body, so this is the only way it moves.
    pub fn set_laser_height(&mut self, y: f32) {
        if let Some(laser) = self.scene.decoration_mut(self.laser) {
            laser.transform.translation.y = y;
        }
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn camera(&self) -> CameraPose {
        let target = self
            .scene
            .entity(self.ball)
            .map_or(Vec3::zeros(), |e| e.visual().transform.translation);
        let tilt = self.tuning.camera_tilt;
        let dist = self.tuning.camera_distance;
        let offset = Vec3::new(0.0, dist * tilt.sin(), dist * tilt.cos());
        CameraPose {
            eye: Point3::from(target + offset),
            target: Point3::from(target),
        }
    }

    pub fn frame(&self) -> RenderFrame<'_> {
        let objects = self
            .scene
            .objects()
            .filter(|o| self.obstacles_visible || o.layer != Layer::Obstacles)
            .collect();
        RenderFrame {
            objects,
            meshes: self.scene.meshes(),
            camera: self.camera(),
            tuning: &self.tuning,
            viewport: self.viewport,
        }
    }

    pub fn ball_position(&self) -> Vec3 {
        self.world.translation(self.ball_body).unwrap_or_else(Vec3::zeros)
    }

    pub fn ball_body(&self) -> BodyHandle {
        self.ball_body
    }

    pub fn platforms(&self) -> &[PlatformRecord] {
        &self.platforms
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Debug-panel access. Edits take effect on the next tick.
    pub fn tuning_mut(&mut self) -> &mut Tuning {
        &mut self.tuning
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> GameSession {
        GameSession::new(GameConfig::default()).unwrap()
    }

    #[test]
    fn new_session_has_ball_first_platform_and_obstacles() {
        let s = session();
        assert_eq!(s.platforms().len(), 1);
        assert_eq!(s.platforms()[0].spec.origin, Vec3::zeros());
        let obstacles = s.platforms()[0].obstacles.len();
        assert!(obstacles <= s.config().obstacles.count);
        // Ball + platform + obstacles.
        assert_eq!(s.world().body_count(), 2 + obstacles);
    }

    #[test]
    fn invalid_config_fails_at_startup() {
        let mut cfg = GameConfig::default();
        cfg.platform.hole_radius = 50.0;
        assert!(GameSession::new(cfg).is_err());
    }

    #[test]
    fn toggle_hides_obstacle_layer_only() {
        let mut s = session();
        let all = s.frame().objects.len();
        s.key_down(Key::ToggleObstacles);
        assert!(!s.obstacles_visible());
        let visible = s.frame().objects.len();
        assert_eq!(all - visible, s.platforms()[0].obstacles.len());
        assert!(s.frame().objects.iter().all(|o| o.layer != Layer::Obstacles));

        s.key_up(Key::ToggleObstacles);
        s.key_down(Key::ToggleObstacles);
        assert_eq!(s.frame().objects.len(), all);
    }

    #[test]
    fn camera_follows_ball_with_tilt() {
        let mut s = session();
        s.tuning_mut().camera_tilt = std::f32::consts::FRAC_PI_2;
        s.tick(0.0);
        let cam = s.camera();
        let ball = s.ball_position();
        assert!((cam.target.coords - ball).norm() < 1.0e-5);
        // Straight overhead.
        assert!((cam.eye.y - ball.y - s.tuning().camera_distance).abs() < 1.0e-4);
    }

    #[test]
    fn laser_moves_only_when_told() {
        let mut s = session();
        s.tick(0.0);
        s.tick(16.0);
        let laser = |s: &GameSession| {
            s.scene()
                .decorations()
                .iter()
                .find(|d| d.material == MaterialKind::Laser)
                .map(|d| d.transform.translation.y)
        };
        let before = laser(&s);
        s.set_laser_height(-7.5);
        assert_ne!(laser(&s), before);
        assert_eq!(laser(&s), Some(-7.5));
    }

    #[test]
    fn resize_updates_aspect() {
        let mut s = session();
        s.resize(Viewport {
            width: 1920,
            height: 1080,
        });
        assert!((s.frame().viewport.aspect() - 16.0 / 9.0).abs() < 1.0e-6);
    }
}
