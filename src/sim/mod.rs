//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only
//! - Seeded RNG only
//! - Stable iteration order (by pool slot)
//! - No rendering or platform dependencies

pub mod actor;
pub mod collision;
pub mod pool;
pub mod rng;
pub mod setup;
pub mod state;
pub mod tick;
pub mod track;

pub use actor::{Actor, JumpState};
pub use collision::{segment_distance, swept_contact_time, swept_sphere_contact};
pub use pool::{Advance, Obstacle, ObstacleKind, ObstaclePool, SpawnSchedule};
pub use rng::{RandomSource, SeededRng};
pub use setup::SceneAnchors;
pub use state::{RunPhase, RunState, SimEvent};
pub use tick::{FrameClock, Simulation};
pub use track::TrackGeometry;
