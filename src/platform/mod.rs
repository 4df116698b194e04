//! Platform abstraction layer
//!
//! Translates the host's raw key events into the logical button state the
//! simulation samples once per tick.

pub mod input;

pub use input::{Button, InputState, LogicalButton};
