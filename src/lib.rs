//! Pinfall - balls fall through a pin field into a moving basket
//!
//! Core modules:
//! - `physics`: Fixed-step world of circle and segment shapes with contact reporting
//! - `sim`: Session simulation (entities, collision policy, fades, paddle, frame loop)
//! - `renderer`: Drawing onto a 2D surface (canvas on the web)
//! - `platform`: Input mapping and hit-testing
//! - `scene`: Start menu, play and result scenes

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod highscores;
pub mod physics;
pub mod platform;
pub mod renderer;
pub mod scene;
pub mod settings;
pub mod sim;

pub use highscores::HighScores;
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep; the world always assumes 60 Hz
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Gravity in world units/s² (world y points up)
    pub const GRAVITY: f32 = -500.0;
    /// Contact solver passes per step
    pub const SOLVER_ITERATIONS: u32 = 10;
    /// Allowed overlap before positional correction kicks in
    pub const COLLISION_SLOP: f32 = 0.5;

    /// Opacity gained per frame while a ball fades in (~50 frames)
    pub const FADE_IN_STEP: f32 = 0.02;
    /// Opacity lost per frame while a ball fades out (~5 frames)
    pub const FADE_OUT_STEP: f32 = 0.2;

    /// Basket speed multiplier per frame once input is released
    pub const PADDLE_DAMPING: f32 = 0.9;
    /// Basket speed (px/frame) while a direction is held
    pub const BASKET_VELOCITY_MAX: f32 = 8.0;
    /// Basket is never shorter than this
    pub const BASKET_MIN_LENGTH: f32 = 100.0;

    /// Ball defaults
    pub const BALL_MASS: f32 = 3.0;
    pub const BALL_ELASTICITY: f32 = 0.99;
    pub const PIN_ELASTICITY: f32 = 0.8;
    pub const WALL_ELASTICITY: f32 = 1.0;
    /// Thickness radius of the divider line
    pub const LINE_RADIUS: f32 = 2.0;

    /// Interval timers
    pub const SPAWN_INTERVAL_MS: i32 = 2000;
    pub const CLOCK_INTERVAL_MS: i32 = 1000;

    /// Layout reference height for menus and touch zones
    pub const REFERENCE_CANVAS_HEIGHT: f32 = 960.0;
    /// Smallest viewport edge the simulation accepts
    pub const MIN_VIEWPORT_DIM: f32 = 64.0;
}

/// Flip a world point (y up) into canvas space (y down)
#[inline]
pub fn world_to_canvas(point: Vec2, canvas_height: f32) -> Vec2 {
    Vec2::new(point.x, canvas_height - point.y)
}

/// Flip a canvas point (y down) into world space (y up)
#[inline]
pub fn canvas_to_world(point: Vec2, canvas_height: f32) -> Vec2 {
    Vec2::new(point.x, canvas_height - point.y)
}
