//! Bodies, shapes and collision categories

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Stable handle to a body in a [`Space`](super::Space)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BodyHandle(pub(crate) u32);

/// Stable handle to a shape in a [`Space`](super::Space)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ShapeHandle(pub(crate) u32);

impl ShapeHandle {
    pub fn id(self) -> u32 {
        self.0
    }
}

/// Tag used to pick the pairwise handler for a contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CollisionCategory {
    Ball,
    Wall,
    Pin,
    Basket,
    Line,
}

impl CollisionCategory {
    /// Static playfield geometry that is rebuilt on resize
    pub fn is_field(self) -> bool {
        matches!(
            self,
            CollisionCategory::Wall
                | CollisionCategory::Pin
                | CollisionCategory::Line
                | CollisionCategory::Basket
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyKind {
    /// Never moves; infinite mass
    Static,
    /// Integrated every step
    Dynamic,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub kind: BodyKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub mass: f32,
}

impl Body {
    pub fn new_static() -> Self {
        Self {
            kind: BodyKind::Static,
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            mass: f32::INFINITY,
        }
    }

    pub fn new_dynamic(mass: f32, pos: Vec2) -> Self {
        Self {
            kind: BodyKind::Dynamic,
            pos,
            vel: Vec2::ZERO,
            mass,
        }
    }

    #[inline]
    pub fn is_static(&self) -> bool {
        self.kind == BodyKind::Static
    }

    /// Inverse mass (0 for static bodies)
    #[inline]
    pub fn inv_mass(&self) -> f32 {
        if self.is_static() || self.mass <= 0.0 {
            0.0
        } else {
            1.0 / self.mass
        }
    }
}

/// Collision geometry, expressed relative to the owning body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    Circle { offset: Vec2, radius: f32 },
    /// Capsule: segment a-b thickened by radius
    Segment { a: Vec2, b: Vec2, radius: f32 },
}

/// A shape attached to a body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shape {
    pub body: BodyHandle,
    pub geometry: Geometry,
    pub elasticity: f32,
    pub friction: f32,
    pub category: CollisionCategory,
}

impl Shape {
    pub fn circle(body: BodyHandle, radius: f32, offset: Vec2, category: CollisionCategory) -> Self {
        Self {
            body,
            geometry: Geometry::Circle { offset, radius },
            elasticity: 0.0,
            friction: 0.0,
            category,
        }
    }

    pub fn segment(body: BodyHandle, a: Vec2, b: Vec2, radius: f32, category: CollisionCategory) -> Self {
        Self {
            body,
            geometry: Geometry::Segment { a, b, radius },
            elasticity: 0.0,
            friction: 0.0,
            category,
        }
    }

    pub fn with_elasticity(mut self, elasticity: f32) -> Self {
        self.elasticity = elasticity;
        self
    }

    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }

    /// Circle radius, or the thickness radius of a segment
    pub fn radius(&self) -> f32 {
        match self.geometry {
            Geometry::Circle { radius, .. } | Geometry::Segment { radius, .. } => radius,
        }
    }
}
