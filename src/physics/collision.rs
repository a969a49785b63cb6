//! Collision detection and response for circles and capsule segments
//!
//! Every dynamic shape in the game is a circle, so the only narrow-phase
//! tests needed are circle-vs-circle and circle-vs-segment.

use glam::Vec2;

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Closest point on the other shape's surface
    pub point: Vec2,
    /// Surface normal at collision (pointing toward the circle's center)
    pub normal: Vec2,
    /// Penetration depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec2::ZERO,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Closest point to `p` on the segment a-b
pub fn closest_point_on_segment(p: Vec2, a: Vec2, b: Vec2) -> Vec2 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < 0.0001 {
        return a; // Degenerate segment
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Check a circle against another circle
pub fn circle_circle(center: Vec2, radius: f32, other: Vec2, other_radius: f32) -> CollisionResult {
    let delta = center - other;
    let dist = delta.length();
    let reach = radius + other_radius;

    if dist >= reach {
        return CollisionResult::miss();
    }

    // Concentric circles: push straight up
    let normal = if dist > 0.0001 { delta / dist } else { Vec2::Y };
    CollisionResult {
        hit: true,
        point: other + normal * other_radius,
        normal,
        penetration: reach - dist,
    }
}

/// Check a circle against a segment thickened by `seg_radius`
pub fn circle_segment(center: Vec2, radius: f32, a: Vec2, b: Vec2, seg_radius: f32) -> CollisionResult {
    let closest = closest_point_on_segment(center, a, b);
    let delta = center - closest;
    let dist = delta.length();
    let reach = radius + seg_radius;

    if dist >= reach {
        return CollisionResult::miss();
    }

    let normal = if dist > 0.0001 {
        delta / dist
    } else {
        // Center on the segment itself: use the perpendicular
        let along = (b - a).normalize_or_zero();
        let perp = Vec2::new(-along.y, along.x);
        if perp == Vec2::ZERO { Vec2::Y } else { perp }
    };

    CollisionResult {
        hit: true,
        point: closest + normal * seg_radius,
        normal,
        penetration: reach - dist,
    }
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Velocity after hitting a surface with the given restitution and friction
///
/// Only the approaching normal component is affected by restitution;
/// friction removes tangential speed proportional to the normal impulse.
pub fn bounce_velocity(velocity: Vec2, normal: Vec2, restitution: f32, friction: f32) -> Vec2 {
    let vn = velocity.dot(normal);
    if vn >= 0.0 {
        return velocity; // Separating already
    }
    if restitution >= 1.0 && friction <= 0.0 {
        return reflect_velocity(velocity, normal);
    }

    let normal_impulse = -(1.0 + restitution) * vn;
    let mut out = velocity + normal * normal_impulse;

    if friction > 0.0 {
        let tangent = Vec2::new(-normal.y, normal.x);
        let vt = out.dot(tangent);
        let max_change = friction * normal_impulse;
        let change = vt.clamp(-max_change, max_change);
        out -= tangent * change;
    }

    out
}
