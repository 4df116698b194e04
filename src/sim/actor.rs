//! The player-controlled actor
//!
//! Steers along the lateral axis, leans into turns, rolls with run progress
//! and can make one jump at a time.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};

use crate::axis;
use crate::consts::{JUMP_DURATION, LEAN_DEGREES};

/// Jump progress
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum JumpState {
    Grounded,
    /// In the air, `elapsed` time units since takeoff
    Airborne { elapsed: f32 },
}

/// The actor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub position: Vec3,
    /// Resting placement, restored on reset
    pub base_position: Vec3,
    pub radius: f32,
    /// Cosmetic, rebuilt every tick from lean and roll
    pub rotation: Quat,
    pub jump: JumpState,
}

impl Actor {
    pub fn new(base_position: Vec3, radius: f32) -> Self {
        Self {
            position: base_position,
            base_position,
            radius,
            rotation: Quat::IDENTITY,
            jump: JumpState::Grounded,
        }
    }

    pub fn reset(&mut self) {
        self.position = self.base_position;
        self.rotation = Quat::IDENTITY;
        self.jump = JumpState::Grounded;
    }

    /// Move laterally by `intent × distance`, clamped to `bounds`.
    /// Returns the lateral change actually applied.
    pub fn steer(&mut self, intent: f32, distance: f32, bounds: (f32, f32)) -> f32 {
        if intent == 0.0 {
            return 0.0;
        }
        let old_y = self.position.y;
        self.position.y = (old_y + intent * distance).clamp(bounds.0, bounds.1);
        self.position.y - old_y
    }

    /// Lean into the steering intent, then roll by a full turn per progress cycle
    pub fn pose(&mut self, intent: f32, progress: f32) {
        let lean = Quat::from_axis_angle(axis::VERTICAL, (intent * LEAN_DEGREES).to_radians());
        let roll = Quat::from_axis_angle(axis::LATERAL, TAU * progress);
        self.rotation = lean * roll;
    }

    /// Take off if grounded. Returns false when already airborne.
    pub fn start_jump(&mut self) -> bool {
        match self.jump {
            JumpState::Grounded => {
                self.jump = JumpState::Airborne { elapsed: 0.0 };
                true
            }
            JumpState::Airborne { .. } => false,
        }
    }

    /// Follow the arc `sin(π t) × height` and land once t reaches the jump duration
    pub fn advance_jump(&mut self, dt: f32, height: f32) {
        let JumpState::Airborne { elapsed } = self.jump else {
            return;
        };
        if elapsed >= JUMP_DURATION {
            self.jump = JumpState::Grounded;
            self.position.z = self.base_position.z;
        } else {
            self.position.z = self.base_position.z + (PI * elapsed).sin() * height;
            self.jump = JumpState::Airborne {
                elapsed: elapsed + dt,
            };
        }
    }

    /// Time since takeoff, if airborne
    pub fn jump_elapsed(&self) -> Option<f32> {
        match self.jump {
            JumpState::Grounded => None,
            JumpState::Airborne { elapsed } => Some(elapsed),
        }
    }
}
