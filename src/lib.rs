//! Hamster Dash - endless-runner simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (obstacle pool, swept collision, run state)
//! - `scene`: Named transforms supplied by the host scene
//! - `platform`: Raw input tracking
//! - `presentation`: Read-only frame snapshot for the renderer
//! - `tuning`: Data-driven game balance
//! - `error`: Setup failures

pub mod error;
pub mod platform;
pub mod presentation;
pub mod scene;
pub mod sim;
pub mod tuning;

pub use error::SetupError;
pub use presentation::Frame;
pub use scene::{Camera, Scene, Transform};
pub use tuning::Tuning;

use glam::Vec3;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, the rate the balance constants were tuned at)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Obstacle slots in the pool. Fixed for the lifetime of a run.
    pub const POOL_CAPACITY: usize = 12;
    /// Spawning stops while this many obstacles are active (keeps one slot free)
    pub const MAX_ACTIVE_OBSTACLES: usize = POOL_CAPACITY - 1;

    /// Lean applied to the actor while steering (degrees per unit of intent)
    pub const LEAN_DEGREES: f32 = 10.0;
    /// Length of a full jump arc, in time units
    pub const JUMP_DURATION: f32 = 1.0;
}

/// Track axes. The actor steers along Y and jumps along Z; obstacles travel
/// in the XZ plane.
pub mod axis {
    use glam::Vec3;

    pub const LATERAL: Vec3 = Vec3::Y;
    pub const VERTICAL: Vec3 = Vec3::Z;
}

/// Replace the lateral (Y) component of a point
#[inline]
pub fn with_lateral(mut p: Vec3, lateral: f32) -> Vec3 {
    p.y = lateral;
    p
}
