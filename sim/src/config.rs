//! Session configuration.
//!
//! Every section is `#[serde(default)]`, so a TOML file only needs to list the
//! values it overrides. Call [`GameConfig::validate`] before building a session;
//! `GameSession::new` does this itself.

use serde::Deserialize;
use std::{fs, path::Path};

use crate::constants::{
    BALL_ANGULAR_DAMPING, BALL_MASS, BALL_RADIUS, BALL_SPAWN_HEIGHT, FIXED_TIME_STEP,
    GRAVITY_MPS2, HOLE_BORDER, HOLE_RADIUS, HOLE_SEGMENTS, MAX_SUB_STEPS, OBSTACLE_COUNT,
    OBSTACLE_EXCLUSION_RADIUS, OBSTACLE_MARGIN, OBSTACLE_MAX_ATTEMPTS, OBSTACLE_SIZE,
    PLATFORM_SIZE, PLATFORM_SPACING,
};
use crate::error::SimError;

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    /// Seed for hole and obstacle placement.
    pub seed: u64,
    pub physics: PhysicsConfig,
    pub ball: BallConfig,
    pub platform: PlatformConfig,
    pub obstacles: ObstacleConfig,
    pub tuning: Tuning,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Downward acceleration (m/s^2, positive).
    pub gravity: f32,
    pub fixed_time_step: f32,
    pub max_sub_steps: u32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: GRAVITY_MPS2,
            fixed_time_step: FIXED_TIME_STEP,
            max_sub_steps: MAX_SUB_STEPS,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct BallConfig {
    pub radius: f32,
    pub mass: f32,
    pub angular_damping: f32,
    /// Spawn height above the first platform's origin.
    pub spawn_height: f32,
}

impl Default for BallConfig {
    fn default() -> Self {
        Self {
            radius: BALL_RADIUS,
            mass: BALL_MASS,
            angular_damping: BALL_ANGULAR_DAMPING,
            spawn_height: BALL_SPAWN_HEIGHT,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlatformConfig {
    /// Width (x), thickness (y), depth (z).
    pub size: [f32; 3],
    pub hole_radius: f32,
    /// Keep-out band along the edges when sampling a hole center.
    pub hole_border: f32,
    pub spacing: f32,
    pub hole_segments: u32,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            size: PLATFORM_SIZE,
            hole_radius: HOLE_RADIUS,
            hole_border: HOLE_BORDER,
            spacing: PLATFORM_SPACING,
            hole_segments: HOLE_SEGMENTS,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ObstacleConfig {
    pub count: usize,
    pub exclusion_radius: f32,
    pub margin: f32,
    pub size: f32,
    pub max_attempts: u32,
}

impl Default for ObstacleConfig {
    fn default() -> Self {
        Self {
            count: OBSTACLE_COUNT,
            exclusion_radius: OBSTACLE_EXCLUSION_RADIUS,
            margin: OBSTACLE_MARGIN,
            size: OBSTACLE_SIZE,
            max_attempts: OBSTACLE_MAX_ATTEMPTS,
        }
    }
}

/// Live-editable knobs exposed to the debug panel.
///
/// Only `ball_speed`, `camera_tilt` and `camera_distance` affect the session;
/// the rest are passed through to the render surface untouched.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Tuning {
    /// Torque magnitude applied while a movement key is held.
    pub ball_speed: f32,
    /// Camera elevation above the ball, in radians.
    pub camera_tilt: f32,
    pub camera_distance: f32,
    /// Camera exposure (EV100).
    pub exposure: f32,
    /// Bloom intensity, 0 disables it.
    pub bloom_strength: f32,
    /// Brightness a pixel needs before it starts to glow.
    pub bloom_threshold: f32,
    /// Spread of the glow, 0 (tight) to 1 (wide).
    pub bloom_radius: f32,
    /// sRGB color of the laser slab.
    pub laser_color: [f32; 3],
    pub laser_emissive: f32,
    pub laser_roughness: f32,
    pub laser_transmission: f32,
    pub laser_ior: f32,
    pub laser_thickness: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            ball_speed: 5.0,
            camera_tilt: 0.6,
            camera_distance: 10.0,
            exposure: 9.0,
            bloom_strength: 0.3,
            bloom_threshold: 0.6,
            bloom_radius: 0.8,
            laser_color: [1.0, 0.1, 0.1],
            laser_emissive: 4.0,
            laser_roughness: 0.2,
            laser_transmission: 0.8,
            laser_ior: 1.5,
            laser_thickness: 0.5,
        }
    }
}

impl GameConfig {
    pub fn from_toml_str(data: &str) -> Result<Self, SimError> {
        toml::from_str(data).map_err(|e| SimError::Config(format!("parse TOML: {e}")))
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let data = fs::read_to_string(&path)
            .map_err(|e| SimError::Config(format!("read {}: {e}", path.as_ref().display())))?;
        Self::from_toml_str(&data)
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    ///
    /// A file that exists but fails to parse is still an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, SimError> {
        if path.as_ref().exists() {
            Self::load_from_file(path)
        } else {
            log::info!("no config at {}, using defaults", path.as_ref().display());
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<(), SimError> {
        let fail = |msg: &str| Err(SimError::Config(msg.to_string()));

        let p = &self.physics;
        if !(p.fixed_time_step.is_finite() && p.fixed_time_step > 0.0) {
            return fail("physics.fixed_time_step must be > 0");
        }
        if p.max_sub_steps == 0 {
            return fail("physics.max_sub_steps must be >= 1");
        }
        if !p.gravity.is_finite() {
            return fail("physics.gravity must be finite");
        }

        let b = &self.ball;
        if !(b.radius > 0.0 && b.mass > 0.0 && b.angular_damping >= 0.0) {
            return fail("ball radius and mass must be > 0, damping >= 0");
        }

        let pl = &self.platform;
        if pl.size.iter().any(|s| !(s.is_finite() && *s > 0.0)) {
            return fail("platform.size components must be > 0");
        }
        if !(pl.hole_radius > 0.0) {
            return fail("platform.hole_radius must be > 0");
        }
        if pl.hole_radius >= pl.hole_border {
            return fail("platform.hole_radius must be smaller than platform.hole_border");
        }
        if pl.hole_border * 2.0 >= pl.size[0].min(pl.size[2]) {
            return fail("platform.hole_border leaves no room for a hole");
        }
        if pl.hole_segments < 3 {
            return fail("platform.hole_segments must be >= 3");
        }
        if !(pl.spacing > 0.0) {
            return fail("platform.spacing must be > 0");
        }

        let t = &self.tuning;
        if !(t.bloom_strength >= 0.0 && t.bloom_threshold >= 0.0) {
            return fail("tuning.bloom_strength and tuning.bloom_threshold must be >= 0");
        }
        if !(0.0..=1.0).contains(&t.bloom_radius) {
            return fail("tuning.bloom_radius must be within [0, 1]");
        }

        let o = &self.obstacles;
        if !(o.size > 0.0 && o.margin >= 0.0 && o.exclusion_radius >= 0.0) {
            return fail("obstacle size must be > 0, margin and exclusion >= 0");
        }
        if o.margin * 2.0 >= pl.size[0].min(pl.size[2]) {
            return fail("obstacles.margin leaves no room on the platform");
        }

        Ok(())
    }
}
