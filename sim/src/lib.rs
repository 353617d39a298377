pub mod body;
pub mod clock;
pub mod config;
pub mod constants;
pub mod entity;
pub mod error;
pub mod geometry;
pub mod input;
pub mod scatter;
pub mod scene;
pub mod session;
pub mod world;

pub use body::{BodyDef, BodyKind, ShapeDef};
pub use clock::SimulationClock;
pub use config::{GameConfig, Tuning};
pub use constants::{FIXED_TIME_STEP, PLATFORM_SPACING};
pub use entity::{Entity, Layer, MaterialKind, MeshHandle, ObjectId, Transform, VisualObject};
pub use error::SimError;
pub use geometry::{MeshBuffers, PlatformGeometry, PlatformSpec, build_platform};
pub use input::{Key, MovementIntention, MovementState};
pub use scatter::{ObstacleScatter, ScatterParams};
pub use scene::{MeshAsset, MeshLibrary, Scene, sync_all};
pub use session::{CameraPose, GameSession, PlatformRecord, RenderFrame, Viewport};
pub use world::{BodyHandle, World};
