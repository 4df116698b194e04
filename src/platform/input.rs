//! Logical button tracking
//!
//! Each button keeps a held flag that persists across ticks until a release
//! arrives, and a press counter that the simulation clears at the end of
//! every tick.

use serde::{Deserialize, Serialize};

/// One logical button
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    /// Presses seen since the last tick ended
    pub downs: u8,
    /// Currently held
    pub pressed: bool,
}

impl Button {
    pub fn press(&mut self) {
        self.downs = self.downs.saturating_add(1);
        self.pressed = true;
    }

    pub fn release(&mut self) {
        self.pressed = false;
    }

    /// Pressed at least once this tick
    #[inline]
    pub fn went_down(&self) -> bool {
        self.downs > 0
    }
}

/// The six buttons the game understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogicalButton {
    SteerLeft,
    SteerRight,
    /// Tracked but unused by gameplay
    Forward,
    /// Tracked but unused by gameplay
    Backward,
    Reset,
    Jump,
}

impl LogicalButton {
    /// Map a key name (as reported by `KeyboardEvent.key`) to a button
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "a" | "A" => Some(LogicalButton::SteerLeft),
            "d" | "D" => Some(LogicalButton::SteerRight),
            "w" | "W" => Some(LogicalButton::Forward),
            "s" | "S" => Some(LogicalButton::Backward),
            "r" | "R" => Some(LogicalButton::Reset),
            " " => Some(LogicalButton::Jump),
            _ => None,
        }
    }
}

/// Held state and per-tick press counts for every logical button
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputState {
    pub left: Button,
    pub right: Button,
    pub forward: Button,
    pub backward: Button,
    pub reset: Button,
    pub jump: Button,
}

impl InputState {
    pub fn button(&self, which: LogicalButton) -> &Button {
        match which {
            LogicalButton::SteerLeft => &self.left,
            LogicalButton::SteerRight => &self.right,
            LogicalButton::Forward => &self.forward,
            LogicalButton::Backward => &self.backward,
            LogicalButton::Reset => &self.reset,
            LogicalButton::Jump => &self.jump,
        }
    }

    pub fn button_mut(&mut self, which: LogicalButton) -> &mut Button {
        match which {
            LogicalButton::SteerLeft => &mut self.left,
            LogicalButton::SteerRight => &mut self.right,
            LogicalButton::Forward => &mut self.forward,
            LogicalButton::Backward => &mut self.backward,
            LogicalButton::Reset => &mut self.reset,
            LogicalButton::Jump => &mut self.jump,
        }
    }

    /// Feed a raw key event. Returns true if the key belongs to the game.
    pub fn handle_key(&mut self, key: &str, down: bool) -> bool {
        let Some(which) = LogicalButton::from_key(key) else {
            return false;
        };
        let button = self.button_mut(which);
        if down {
            button.press();
        } else {
            button.release();
        }
        true
    }

    /// Steering intent: +1 left, -1 right, 0 when neither or both are held
    pub fn steer(&self) -> f32 {
        f32::from(u8::from(self.left.pressed)) - f32::from(u8::from(self.right.pressed))
    }

    /// Clear the press counters; held state is left alone
    pub fn end_tick(&mut self) {
        for which in [
            LogicalButton::SteerLeft,
            LogicalButton::SteerRight,
            LogicalButton::Forward,
            LogicalButton::Backward,
            LogicalButton::Reset,
            LogicalButton::Jump,
        ] {
            self.button_mut(which).downs = 0;
        }
    }
}
