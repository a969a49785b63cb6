//! Basket movement from held directional input

use serde::{Deserialize, Serialize};

use crate::consts::PADDLE_DAMPING;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    Stop,
    Left,
    Right,
}

/// Horizontal span of the basket
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub start: f32,
    pub end: f32,
}

/// Damped horizontal motion of the basket
///
/// Pressing a direction moves at full speed; releasing lets the basket
/// coast, losing 10% of its speed per frame.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaddleController {
    pub direction: Direction,
    /// Pixels per frame
    pub speed: f32,
    /// An input is held
    pub moving: bool,
    /// Key code of the last press; only its release stops the basket
    pub pressed_key: Option<u32>,
    max_speed: f32,
}

impl PaddleController {
    pub fn new(max_speed: f32) -> Self {
        Self {
            max_speed,
            ..Default::default()
        }
    }

    /// Last press wins
    pub fn press(&mut self, direction: Direction, key: u32) {
        self.pressed_key = Some(key);
        self.moving = true;
        self.speed = self.max_speed;
        self.direction = direction;
    }

    /// Release a key; ignored unless it is the remembered one
    pub fn release(&mut self, key: u32) -> bool {
        if self.pressed_key == Some(key) {
            self.moving = false;
            true
        } else {
            false
        }
    }

    /// Release regardless of which key is remembered (touch end)
    pub fn release_any(&mut self) {
        self.moving = false;
    }

    /// Move the basket one frame and clamp it inside `[inset, width - inset]`
    ///
    /// The returned span is always exactly `length` wide. Hitting either
    /// bound stops the basket dead.
    pub fn advance(&mut self, start: f32, length: f32, width: f32, inset: f32) -> Span {
        if !self.moving {
            self.speed *= PADDLE_DAMPING;
        }

        let mut start = match self.direction {
            Direction::Right => start + self.speed,
            Direction::Left => start - self.speed,
            Direction::Stop => start,
        };

        if start < inset {
            self.speed = 0.0;
            start = inset;
        } else if start + length > width - inset {
            self.speed = 0.0;
            start = width - inset - length;
        }

        Span {
            start,
            end: start + length,
        }
    }
}
