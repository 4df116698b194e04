//! Setup failures
//!
//! Everything that can go wrong happens while a simulation is being built.
//! Once a `Simulation` exists, play has no error paths: a collision is a
//! phase change, not a failure.

use thiserror::Error;

use crate::sim::ObstacleKind;

/// Fatal problems found while building a simulation from a scene and tuning.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SetupError {
    /// A required named anchor is absent from the scene
    #[error("{role} anchor `{name}` not found in scene")]
    MissingAnchor { role: &'static str, name: String },

    /// Total obstacle transforms does not match the pool capacity
    #[error("expected {expected} obstacles in scene, found {found}")]
    ObstacleCount { expected: usize, found: usize },

    /// Per-kind obstacle count does not match the configured split
    #[error("expected {expected} {kind:?} obstacles, found {found}")]
    KindSplit {
        kind: ObstacleKind,
        expected: usize,
        found: usize,
    },

    /// Spawn and despawn anchors coincide along the travel plane
    #[error("spawn and despawn anchors do not define a travel direction")]
    DegenerateTrack,

    /// Lateral range is narrower than the two steering margins
    #[error("lateral range [{min}, {max}] is too narrow for a margin of {margin}")]
    LateralRangeTooNarrow { min: f32, max: f32, margin: f32 },

    /// The scene must hold exactly one camera
    #[error("expecting scene to have exactly one camera, but it has {0}")]
    CameraCount(usize),

    /// A camera refers to a transform the scene does not have
    #[error("camera refers to missing transform {0}")]
    DanglingCamera(usize),

    /// A tuning value is out of range
    #[error("invalid tuning: {0}")]
    Tuning(String),

    /// Tuning file could not be parsed
    #[error("failed to parse tuning: {0}")]
    TuningParse(String),
}

impl From<serde_json::Error> for SetupError {
    fn from(err: serde_json::Error) -> Self {
        SetupError::TuningParse(err.to_string())
    }
}
