//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events (key codes, touch zones, button hit-testing)
//! - Storage lives with `Settings` and `HighScores`

pub mod input;

pub use input::{Button, Rect, TouchZones, end_buttons, key_direction, start_buttons, touch_zones};
