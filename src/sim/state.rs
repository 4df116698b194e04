//! Run state and simulation events

use serde::{Deserialize, Serialize};

use super::pool::ObstacleKind;

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    /// Active gameplay
    Playing,
    /// Actor was hit; waiting for reset
    Dead,
}

/// Something that happened during a tick, for hosts that want to react
/// (sounds, particles, logging)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    /// Progress wrapped; `score` is the new total
    Scored { score: u32 },
    Spawned { slot: usize, kind: ObstacleKind },
    Despawned { slot: usize },
    /// Obstacle in `slot` reached the actor
    Died { slot: usize, score: u32 },
    Jumped,
    Reset,
}

/// Score, difficulty and the progress cycle that drives scoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunState {
    pub phase: RunPhase,
    pub score: u32,
    /// Difficulty scalar: scales obstacle speed, steering speed and scoring rate
    pub difficulty: f32,
    /// Cycles through [0, 1); each wrap scores a point
    pub progress: f32,
}

impl RunState {
    pub fn new(baseline_difficulty: f32) -> Self {
        Self {
            phase: RunPhase::Playing,
            score: 0,
            difficulty: baseline_difficulty,
            progress: 0.0,
        }
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.phase == RunPhase::Dead
    }

    /// Advance progress at the current difficulty, then ramp the difficulty.
    /// Returns the number of wraps (points scored) this step.
    pub fn advance(&mut self, dt: f32, ramp: f32) -> u32 {
        self.progress += dt * self.difficulty;
        let wraps = self.progress.floor();
        if wraps >= 1.0 {
            // Keep the overshoot so long runs don't drift
            self.progress -= wraps;
            self.score = self.score.saturating_add(wraps as u32);
        }
        self.difficulty += dt * ramp;
        wraps.max(0.0) as u32
    }
}
