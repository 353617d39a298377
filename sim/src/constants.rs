/// Fixed simulation step in seconds.
///
/// Every integration step advances the physics world by exactly this much.
/// Variable frame durations are consumed in multiples of it.
pub const FIXED_TIME_STEP: f32 = 1.0 / 120.0;

/// Upper bound on fixed steps taken by a single `World::step` call.
///
/// A backlog beyond the cap is dropped (modulo one step), not carried over.
pub const MAX_SUB_STEPS: u32 = 10;

/// Gravity magnitude in meters per second squared (positive value).
pub const GRAVITY_MPS2: f32 = 9.82;

/// Vertical distance between consecutive platforms (meters).
pub const PLATFORM_SPACING: f32 = 15.0;

/// Default platform footprint width (x), thickness (y) and depth (z), in meters.
pub const PLATFORM_SIZE: [f32; 3] = [20.0, 1.0, 20.0];

/// Default radius of the hole cut through each platform (meters).
pub const HOLE_RADIUS: f32 = 1.0;

/// Minimum distance between a sampled hole center and the platform border (meters).
pub const HOLE_BORDER: f32 = 1.5;

/// Number of straight segments approximating the hole circle.
pub const HOLE_SEGMENTS: u32 = 48;

pub const BALL_RADIUS: f32 = 0.5;
pub const BALL_MASS: f32 = 1.0;
pub const BALL_ANGULAR_DAMPING: f32 = 0.5;

/// Height above the first platform's origin at which the ball spawns (meters).
pub const BALL_SPAWN_HEIGHT: f32 = 3.0;

pub const OBSTACLE_COUNT: usize = 50;

/// Half-width of the square around the hole center kept free of obstacles (meters).
pub const OBSTACLE_EXCLUSION_RADIUS: f32 = 2.0;

/// Distance kept between obstacle centers and the platform edge (meters).
pub const OBSTACLE_MARGIN: f32 = 1.0;

/// Edge length of an obstacle cube (meters).
pub const OBSTACLE_SIZE: f32 = 1.0;

/// Rejection-sampling attempts per obstacle before it is skipped.
pub const OBSTACLE_MAX_ATTEMPTS: u32 = 64;

/// Tolerance used when welding coincident vertices (meters).
pub const WELD_TOLERANCE: f32 = 1.0e-4;
