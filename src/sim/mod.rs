//! Session simulation
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by handle and entity ID)
//! - No rendering or platform dependencies

pub mod config;
pub mod entities;
pub mod lifecycle;
pub mod paddle;
pub mod policy;
pub mod resize;
pub mod state;
pub mod tick;

pub use config::{GameMode, Rules, SessionConfig, Viewport};
pub use entities::{Color, Field};
pub use lifecycle::{BallRecord, EntityId, Lifecycle, LifecycleTable};
pub use paddle::{Direction, PaddleController};
pub use policy::{CollisionEvent, CollisionKind};
pub use resize::resize;
pub use state::{Score, Session, SessionPhase, SessionResult, SoundCue, Timer};
pub use tick::{FrameOutcome, check_termination, frame, on_clock_second, on_spawn_interval};
