/*!
Procedural platform geometry.

A platform is a rectangular slab with a round hole punched through it. The
same buffers feed both the visual mesh and the physics trimesh, so every
rendered seam is also a collision edge. The pipeline is split in stages:

- types:    PlatformSpec, MeshBuffers and math aliases
- outline:  2D rectangle-with-hole outline and its cap triangulation
- extrude:  linear extrusion of the outline into a triangle soup
- weld:     merge coincident vertices into an indexed mesh
- platform: the full pipeline (validate, extrude, weld, recenter, stand up)
*/

pub mod extrude;
pub mod outline;
pub mod platform;
pub mod types;
pub mod weld;

pub use outline::Outline;
pub use platform::{PlatformGeometry, build_platform};
pub use types::{MeshBuffers, PlatformSpec, Point3, Quat, Vec2, Vec3};
pub use weld::weld;
