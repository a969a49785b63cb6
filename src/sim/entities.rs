//! Entity factories and visual styles
//!
//! Every factory registers shapes in the physics space and hands back the
//! handles; game-side state (lifecycle, colors) is kept by the caller.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::config::SessionConfig;
use crate::consts::*;
use crate::physics::{Body, BodyHandle, CollisionCategory, Shape, ShapeHandle, Space};

/// RGBA color with a fractional alpha channel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// CSS `rgba(...)` string for the canvas
    pub fn to_rgba_string(&self) -> String {
        format!("rgba({},{},{},{})", self.r, self.g, self.b, self.a)
    }
}

/// Ball fill colors, picked by shape id
pub const BALL_PALETTE: [Color; 7] = [
    Color::rgb(0xff, 0x57, 0x22),
    Color::rgb(0xaa, 0xaa, 0xaa),
    Color::rgb(0xf4, 0x43, 0x36),
    Color::rgb(0x60, 0x7d, 0x8b),
    Color::rgb(0xff, 0xc1, 0x07),
    Color::rgb(0x79, 0x55, 0x48),
    Color::rgb(0x4c, 0xaf, 0x50),
];

pub const PIN_COLOR: Color = Color::rgb(0x44, 0x44, 0x44);
pub const BASKET_COLOR: Color = Color::rgb(0x1e, 0x55, 0x74);
pub const LINE_COLOR: Color = Color::rgba(0, 0, 0, 0.3);
/// Score and timer text
pub const TEXT_COLOR: Color = Color::rgb(0x1e, 0x55, 0x74);
/// Score or timer that has hit its limit
pub const HIGHLIGHT_COLOR: Color = Color::rgb(255, 193, 7);

/// Style of a static shape; walls are invisible
pub fn field_style(category: CollisionCategory) -> Option<Color> {
    match category {
        CollisionCategory::Pin => Some(PIN_COLOR),
        CollisionCategory::Basket => Some(BASKET_COLOR),
        CollisionCategory::Line => Some(LINE_COLOR),
        CollisionCategory::Wall | CollisionCategory::Ball => None,
    }
}

/// Handles of the static playfield geometry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Field {
    pub walls: Vec<ShapeHandle>,
    pub pins: Vec<ShapeHandle>,
    pub line: ShapeHandle,
    pub basket: ShapeHandle,
}

impl Field {
    /// Every shape of the field, basket last
    pub fn all_shapes(&self) -> impl Iterator<Item = ShapeHandle> + '_ {
        self.walls
            .iter()
            .chain(self.pins.iter())
            .copied()
            .chain([self.line, self.basket])
    }
}

/// A freshly spawned ball
#[derive(Debug, Clone, Copy)]
pub struct SpawnedBall {
    pub body: BodyHandle,
    pub shape: ShapeHandle,
    pub color: Color,
}

/// Four walls along the canvas edges
pub fn add_walls(space: &mut Space, config: &SessionConfig) -> Vec<ShapeHandle> {
    let (w, h) = (config.viewport.width, config.viewport.height);
    let edges = [
        (Vec2::new(0.0, 0.0), Vec2::new(w, 0.0)),
        (Vec2::new(0.0, h), Vec2::new(w, h)),
        (Vec2::new(0.0, 0.0), Vec2::new(0.0, h)),
        (Vec2::new(w, 0.0), Vec2::new(w, h)),
    ];
    let body = space.static_body();
    edges
        .into_iter()
        .map(|(a, b)| {
            space.add_shape(
                Shape::segment(body, a, b, 0.0, CollisionCategory::Wall).with_elasticity(WALL_ELASTICITY),
            )
        })
        .collect()
}

/// Pin positions in a triangular lattice, top row first
///
/// Odd rows shift right by half a pitch. Rows run from 7/8 of the height
/// down to 3/8.
pub fn pin_lattice(config: &SessionConfig) -> Vec<Vec2> {
    let radius = config.pin_radius;
    let strike_x = radius * 2.0 + config.ball_radius * 3.0;
    let strike_y = strike_x * 0.5 * (std::f32::consts::PI / 3.0).tan();

    let h = config.viewport.height;
    let w = config.viewport.width;
    let first_row_y = h / 8.0 * 7.0;
    let last_row_y = h / 8.0 * 3.0;
    let num_rows = (first_row_y - last_row_y) / strike_y;

    let mut pins = Vec::new();
    let mut y = first_row_y;
    let mut row = 0u32;
    while (row as f32) < num_rows {
        let mut x = if row % 2 == 0 {
            radius + strike_x
        } else {
            radius + strike_x * 1.5
        };
        while x < w - radius - strike_x {
            pins.push(Vec2::new(x, y));
            x += strike_x;
        }
        y -= strike_y;
        row += 1;
    }
    pins
}

/// The pin field
pub fn add_field(space: &mut Space, config: &SessionConfig) -> Vec<ShapeHandle> {
    let body = space.static_body();
    let pins: Vec<ShapeHandle> = pin_lattice(config)
        .into_iter()
        .map(|pos| {
            space.add_shape(
                Shape::circle(body, config.pin_radius, pos, CollisionCategory::Pin).with_elasticity(PIN_ELASTICITY),
            )
        })
        .collect();
    log::debug!("Pin field: {} pins", pins.len());
    pins
}

/// The divider line the basket travels along
pub fn add_line(space: &mut Space, config: &SessionConfig) -> ShapeHandle {
    let y = config.line_y();
    let body = space.static_body();
    space.add_shape(Shape::segment(
        body,
        Vec2::new(0.0, y),
        Vec2::new(config.viewport.width, y),
        LINE_RADIUS,
        CollisionCategory::Line,
    ))
}

/// Where the basket starts: centered horizontally
pub fn basket_home(config: &SessionConfig) -> f32 {
    config.viewport.width / 2.0 - config.basket_length / 2.0
}

/// The basket, starting at `start_x`
pub fn add_basket(space: &mut Space, config: &SessionConfig, start_x: f32) -> ShapeHandle {
    let y = config.line_y();
    let body = space.static_body();
    space.add_shape(Shape::segment(
        body,
        Vec2::new(start_x, y),
        Vec2::new(start_x + config.basket_length, y),
        config.pin_radius,
        CollisionCategory::Basket,
    ))
}

/// Walls, pins, line and basket in one go
pub fn add_playfield(space: &mut Space, config: &SessionConfig, basket_start_x: f32) -> Field {
    Field {
        walls: add_walls(space, config),
        pins: add_field(space, config),
        line: add_line(space, config),
        basket: add_basket(space, config, basket_start_x),
    }
}

/// One ball at a random x near the top, at rest and fully transparent
pub fn add_ball<R: Rng>(space: &mut Space, config: &SessionConfig, rng: &mut R) -> SpawnedBall {
    let radius = config.ball_radius;
    let span = (config.viewport.width - radius * 2.0).max(0.0);
    let x = radius + span * rng.random::<f32>();
    let pos = Vec2::new(x, config.spawn_y());

    let body = space.add_body(Body::new_dynamic(config.ball_mass, pos));
    let shape = space.add_shape(
        Shape::circle(body, radius, Vec2::ZERO, CollisionCategory::Ball).with_elasticity(config.ball_elasticity),
    );
    let color = BALL_PALETTE[shape.id() as usize % BALL_PALETTE.len()].with_alpha(0.0);

    log::debug!("Ball spawned at ({:.1}, {:.1})", pos.x, pos.y);
    SpawnedBall { body, shape, color }
}
