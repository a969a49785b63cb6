//! Session state and core simulation types

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::config::{GameMode, SessionConfig};
use super::entities::{self, Field, SpawnedBall};
use super::lifecycle::{EntityId, LifecycleTable};
use super::paddle::{PaddleController, Span};
use super::policy::{self, CollisionEvent};
use crate::physics::{Body, CollisionCategory, Geometry, Shape, Space};

/// Whether the frame loop is still scheduling ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    Running,
    /// Terminal; the result has been produced
    Stopped,
}

/// Points caught in the basket
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score(u32);

impl Score {
    pub fn value(&self) -> u32 {
        self.0
    }

    pub fn increment(&mut self) {
        self.0 += 1;
    }
}

/// Whole seconds, counting down in time-limited mode and up otherwise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timer(i32);

impl Timer {
    pub fn new(start: i32) -> Self {
        Self(start)
    }

    pub fn value(&self) -> i32 {
        self.0
    }

    pub fn tick_up(&mut self) {
        self.0 += 1;
    }

    pub fn tick_down(&mut self) {
        self.0 -= 1;
    }
}

/// What the session hands to the result screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionResult {
    pub mode: GameMode,
    /// Final score (time-limited) or seconds spent (score-limited)
    pub value: i32,
}

/// Sounds requested by the simulation, drained by the host each frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundCue {
    /// Ball hit a pin
    Bounce,
    /// Ball crossed the divider line
    Goal,
    /// Ball landed in the basket
    Scored,
    GameStart,
    GameOver,
    ButtonTouch,
}

impl SoundCue {
    /// Relative playback volume
    pub fn volume(self) -> f32 {
        match self {
            SoundCue::Bounce => 0.1,
            _ => 1.0,
        }
    }
}

/// One play-through: physics world, balls, basket, score and clock
#[derive(Debug)]
pub struct Session {
    pub config: SessionConfig,
    pub space: Space,
    pub field: Field,
    pub balls: LifecycleTable,
    pub paddle: PaddleController,
    pub score: Score,
    pub timer: Timer,
    pub phase: SessionPhase,
    /// Smoothed frames per second (display only)
    pub fps: f32,
    /// Frames run so far
    pub frames: u64,
    pub seed: u64,
    pub(crate) events: Vec<CollisionEvent>,
    pub(crate) cues: Vec<SoundCue>,
    pub(crate) result: Option<SessionResult>,
    pub(crate) rng: Pcg32,
}

impl Session {
    /// Build the field, register the handlers and drop the first ball
    pub fn new(config: SessionConfig, seed: u64) -> Self {
        let mut space = Space::new();
        policy::register_handlers(&mut space);
        let field = entities::add_playfield(&mut space, &config, entities::basket_home(&config));

        let timer = match config.mode {
            GameMode::TimeLimited => Timer::new(config.time_limit_secs),
            GameMode::ScoreLimited => Timer::new(0),
        };

        let mut session = Self {
            config,
            space,
            field,
            balls: LifecycleTable::new(),
            paddle: PaddleController::new(config.basket_velocity_max),
            score: Score::default(),
            timer,
            phase: SessionPhase::Running,
            fps: 0.0,
            frames: 0,
            seed,
            events: Vec::new(),
            cues: vec![SoundCue::GameStart],
            result: None,
            rng: Pcg32::seed_from_u64(seed),
        };
        session.spawn_ball();

        log::info!(
            "Session started: {:?} on {}x{} (seed {})",
            config.mode,
            config.viewport.width,
            config.viewport.height,
            seed
        );
        session
    }

    /// Spawn a ball at a random x along the top of the field
    pub fn spawn_ball(&mut self) -> EntityId {
        let spawned = entities::add_ball(&mut self.space, &self.config, &mut self.rng);
        self.balls.insert(spawned)
    }

    /// Spawn a ball at an exact world position (used by demos and tests)
    pub fn spawn_ball_at(&mut self, pos: Vec2) -> EntityId {
        let body = self
            .space
            .add_body(Body::new_dynamic(self.config.ball_mass, pos));
        let shape = self.space.add_shape(
            Shape::circle(body, self.config.ball_radius, Vec2::ZERO, CollisionCategory::Ball)
                .with_elasticity(self.config.ball_elasticity),
        );
        let color = entities::BALL_PALETTE[shape.id() as usize % entities::BALL_PALETTE.len()];
        self.balls.insert(SpawnedBall { body, shape, color })
    }

    pub fn is_running(&self) -> bool {
        self.phase == SessionPhase::Running
    }

    pub fn mode(&self) -> GameMode {
        self.config.mode
    }

    /// Final result, once the session has stopped
    pub fn result(&self) -> Option<SessionResult> {
        self.result
    }

    /// Stop without a result (scene teardown)
    pub fn stop(&mut self) {
        self.phase = SessionPhase::Stopped;
    }

    /// Take the sound cues raised since the last call
    pub fn take_cues(&mut self) -> Vec<SoundCue> {
        std::mem::take(&mut self.cues)
    }

    /// Current basket endpoints in world space
    pub fn basket_endpoints(&self) -> Option<(Vec2, Vec2)> {
        match self.space.world_geometry(self.field.basket)? {
            Geometry::Segment { a, b, .. } => Some((a, b)),
            Geometry::Circle { .. } => None,
        }
    }

    /// Move the basket so its left end sits at `start_x`
    pub fn place_basket(&mut self, start_x: f32) {
        let y = self.config.line_y();
        let span = Span {
            start: start_x,
            end: start_x + self.config.basket_length,
        };
        self.space.set_segment_endpoints(
            self.field.basket,
            Vec2::new(span.start, y),
            Vec2::new(span.end, y),
        );
    }

    /// World position of a ball, if it is still in the space
    pub fn ball_position(&self, id: EntityId) -> Option<Vec2> {
        let record = self.balls.get(id)?;
        self.space.body(record.body).map(|b| b.pos)
    }
}
