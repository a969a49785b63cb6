//! Fixed-step 2D physics world
//!
//! Dynamic circles fall under gravity and collide with static circles and
//! capsule segments. The world follows a few hard rules:
//! - Fixed timestep only (the caller picks dt, nothing reads a clock)
//! - Stable iteration order (by handle)
//! - Structural changes requested around a step are queued and applied after it

pub mod collision;
pub mod shape;
pub mod space;

pub use collision::{CollisionResult, bounce_velocity, circle_circle, circle_segment, closest_point_on_segment};
pub use shape::{Body, BodyHandle, BodyKind, CollisionCategory, Geometry, Shape, ShapeHandle};
pub use space::{Contact, PostStep, Response, Space, StepReport};
