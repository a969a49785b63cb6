//! Input mapping and hit-testing
//!
//! Buttons are laid out on a 960-pixel-high reference canvas and scaled to
//! the real one, so the menus look the same on every screen.

use glam::Vec2;

use crate::sim::entities::Color;
use crate::sim::{Direction, Viewport};

pub const KEY_A: u32 = 65;
pub const KEY_D: u32 = 68;
pub const KEY_LEFT: u32 = 37;
pub const KEY_RIGHT: u32 = 39;
pub const KEY_Q: u32 = 81;

/// Remembered key for a left touch
pub const TOUCH_LEFT_KEY: u32 = KEY_A;
/// Remembered key for a right touch
pub const TOUCH_RIGHT_KEY: u32 = KEY_D;

/// Steering direction for a key code
pub fn key_direction(code: u32) -> Option<Direction> {
    match code {
        KEY_A | KEY_LEFT => Some(Direction::Left),
        KEY_D | KEY_RIGHT => Some(Direction::Right),
        _ => None,
    }
}

/// Axis-aligned rectangle, top-left origin, y down
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Edges count as inside
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.x + self.w && p.y >= self.y && p.y <= self.y + self.h
    }

    pub fn scaled(&self, s: f32) -> Self {
        Self::new(self.x * s, self.y * s, self.w * s, self.h * s)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

/// A labelled rectangle in reference coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct Button {
    /// Reference-space rectangle
    pub rect: Rect,
    pub scale_ratio: f32,
    pub color: Color,
    pub label: &'static str,
}

impl Button {
    /// Rectangle in canvas pixels
    pub fn screen_rect(&self) -> Rect {
        self.rect.scaled(self.scale_ratio)
    }

    /// Does a canvas-space point land on this button
    pub fn hit(&self, point: Vec2) -> bool {
        self.screen_rect().contains(point)
    }
}

/// Reference-space canvas dimensions
#[derive(Debug, Clone, Copy)]
struct Reference {
    ratio: f32,
    width: f32,
    height: f32,
}

impl Reference {
    fn of(viewport: Viewport) -> Self {
        let ratio = viewport.scale_ratio();
        Self {
            ratio,
            width: viewport.width / ratio,
            height: viewport.height / ratio,
        }
    }

    fn button(&self, rect: Rect, color: Color, label: &'static str) -> Button {
        Button {
            rect,
            scale_ratio: self.ratio,
            color,
            label,
        }
    }
}

const AMBER: Color = Color::rgb(255, 193, 7);
const BROWN: Color = Color::rgb(121, 85, 72);
const NAVY: Color = Color::rgb(30, 85, 116);

/// Start menu buttons
#[derive(Debug, Clone)]
pub struct StartButtons {
    pub time_limited: Button,
    pub score_limited: Button,
}

pub fn start_buttons(viewport: Viewport) -> StartButtons {
    let r = Reference::of(viewport);
    let (hw, hh) = (r.width / 2.0, r.height / 2.0);
    StartButtons {
        time_limited: r.button(Rect::new(hw - 200.0, hh - 50.0, 400.0, 100.0), AMBER, "Time Limited"),
        score_limited: r.button(
            Rect::new(hw - 200.0, hh - 50.0 + hh * 0.3, 400.0, 100.0),
            BROWN,
            "Score Limited",
        ),
    }
}

/// Result screen buttons
#[derive(Debug, Clone)]
pub struct EndButtons {
    pub menu: Button,
    pub share: Button,
    pub replay: Button,
}

pub fn end_buttons(viewport: Viewport) -> EndButtons {
    let r = Reference::of(viewport);
    let (hw, hh) = (r.width / 2.0, r.height / 2.0);
    EndButtons {
        menu: r.button(Rect::new(0.0, hh, hw, hh / 2.0), AMBER, "Menu"),
        share: r.button(Rect::new(hw, hh, hw, hh / 2.0), BROWN, "Share"),
        replay: r.button(Rect::new(0.0, hh * 1.5, r.width, hh / 2.0), NAVY, "Replay"),
    }
}

/// Left and right steering zones along the bottom of the play screen
#[derive(Debug, Clone)]
pub struct TouchZones {
    pub left: Button,
    pub right: Button,
}

impl TouchZones {
    /// Which direction a canvas point steers, if any
    pub fn direction_at(&self, point: Vec2) -> Option<(Direction, u32)> {
        if self.left.hit(point) {
            Some((Direction::Left, TOUCH_LEFT_KEY))
        } else if self.right.hit(point) {
            Some((Direction::Right, TOUCH_RIGHT_KEY))
        } else {
            None
        }
    }
}

pub fn touch_zones(viewport: Viewport) -> TouchZones {
    let r = Reference::of(viewport);
    let hw = r.width / 2.0;
    let top = r.height / 16.0 * 13.0;
    let h = r.height / 16.0 * 3.0;
    TouchZones {
        left: r.button(Rect::new(0.0, top, hw, h), AMBER.with_alpha(0.05), "Left"),
        right: r.button(Rect::new(hw, top, hw, h), BROWN.with_alpha(0.05), "Right"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(key_direction(65), Some(Direction::Left));
        assert_eq!(key_direction(37), Some(Direction::Left));
        assert_eq!(key_direction(68), Some(Direction::Right));
        assert_eq!(key_direction(39), Some(Direction::Right));
        assert_eq!(key_direction(KEY_Q), None);
    }

    #[test]
    fn test_rect_edges_inclusive() {
        let r = Rect::new(10.0, 10.0, 20.0, 20.0);
        assert!(r.contains(Vec2::new(10.0, 30.0)));
        assert!(!r.contains(Vec2::new(30.1, 15.0)));
    }

    #[test]
    fn test_buttons_scale_with_height() {
        // Half the reference height: everything shrinks by half
        let buttons = start_buttons(Viewport::new(960.0, 480.0));
        let rect = buttons.time_limited.screen_rect();
        assert_eq!(rect.w, 200.0);
        assert_eq!(rect.h, 50.0);
        assert!((rect.center().x - 480.0).abs() < 1e-3);
        assert!(buttons.time_limited.hit(Vec2::new(480.0, 240.0)));
        assert!(!buttons.score_limited.hit(Vec2::new(480.0, 240.0)));
    }

    #[test]
    fn test_end_buttons_tile_lower_half() {
        let vp = Viewport::new(800.0, 960.0);
        let b = end_buttons(vp);
        assert!(b.menu.hit(Vec2::new(100.0, 500.0)));
        assert!(b.share.hit(Vec2::new(700.0, 500.0)));
        assert!(b.replay.hit(Vec2::new(400.0, 900.0)));
        assert!(!b.menu.hit(Vec2::new(100.0, 100.0)));
    }

    #[test]
    fn test_touch_zones() {
        let zones = touch_zones(Viewport::new(800.0, 960.0));
        assert_eq!(
            zones.direction_at(Vec2::new(100.0, 900.0)),
            Some((Direction::Left, TOUCH_LEFT_KEY))
        );
        assert_eq!(
            zones.direction_at(Vec2::new(700.0, 900.0)),
            Some((Direction::Right, TOUCH_RIGHT_KEY))
        );
        assert_eq!(zones.direction_at(Vec2::new(400.0, 100.0)), None);
    }
}
