use std::fmt;

/// Errors surfaced by the simulation core.
///
/// Everything here is a configuration or input problem. A well-formed session
/// never produces one from inside the frame loop.
#[derive(Clone, Debug, PartialEq)]
pub enum SimError {
    /// Platform parameters would produce degenerate or self-intersecting geometry.
    InvalidPlatform(&'static str),
    /// A NaN or infinite value reached a physics input.
    NonFinite(&'static str),
    /// Rapier refused to build a triangle mesh from the welded buffers.
    Trimesh(String),
    /// The handle does not refer to a body registered in this world.
    UnknownBody,
    /// Configuration could not be read, parsed or validated.
    Config(String),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::InvalidPlatform(why) => write!(f, "invalid platform: {why}"),
            SimError::NonFinite(what) => write!(f, "non-finite {what}"),
            SimError::Trimesh(why) => write!(f, "trimesh rejected: {why}"),
            SimError::UnknownBody => write!(f, "unknown body handle"),
            SimError::Config(why) => write!(f, "config: {why}"),
        }
    }
}

impl std::error::Error for SimError {}
