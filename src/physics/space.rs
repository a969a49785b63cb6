//! The physics space: bodies, shapes, handlers and the fixed step

use std::collections::{BTreeMap, BTreeSet};

use glam::Vec2;

use super::collision::{bounce_velocity, circle_circle, circle_segment};
use super::shape::{Body, BodyHandle, CollisionCategory, Geometry, Shape, ShapeHandle};
use crate::consts::{COLLISION_SLOP, GRAVITY, SOLVER_ITERATIONS};

/// Whether a registered category pair gets a physical response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    /// Report the contact and resolve it physically
    Accept,
    /// Report the contact but let the shapes pass through each other
    Ignore,
}

/// A contact that began during a step, for a registered category pair
///
/// `shapes.0` always carries `categories.0`, matching the order the
/// handler was registered with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub shapes: (ShapeHandle, ShapeHandle),
    pub categories: (CollisionCategory, CollisionCategory),
    pub point: Vec2,
}

/// Structural change deferred until the current step has resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostStep {
    RemoveShape(ShapeHandle),
    /// Removes the body and every shape still attached to it
    RemoveBody(BodyHandle),
}

/// What happened during one step
#[derive(Debug, Clone, Default)]
pub struct StepReport {
    /// Contacts that began this step (registered pairs only)
    pub contacts: Vec<Contact>,
    /// Shapes removed by the post-step queue
    pub removed_shapes: Vec<ShapeHandle>,
    /// Bodies removed by the post-step queue
    pub removed_bodies: Vec<BodyHandle>,
}

/// Physics world
#[derive(Debug, Clone)]
pub struct Space {
    pub gravity: Vec2,
    pub iterations: u32,
    pub collision_slop: f32,
    bodies: BTreeMap<BodyHandle, Body>,
    shapes: BTreeMap<ShapeHandle, Shape>,
    handlers: BTreeMap<(CollisionCategory, CollisionCategory), Response>,
    /// Shape pairs (ordered low, high) overlapping at the end of the last step
    touching: BTreeSet<(ShapeHandle, ShapeHandle)>,
    post_step: Vec<PostStep>,
    static_body: BodyHandle,
    next_id: u32,
    steps: u64,
}

impl Default for Space {
    fn default() -> Self {
        Self::new()
    }
}

impl Space {
    pub fn new() -> Self {
        let static_body = BodyHandle(0);
        let mut bodies = BTreeMap::new();
        bodies.insert(static_body, Body::new_static());
        Self {
            gravity: Vec2::new(0.0, GRAVITY),
            iterations: SOLVER_ITERATIONS,
            collision_slop: COLLISION_SLOP,
            bodies,
            shapes: BTreeMap::new(),
            handlers: BTreeMap::new(),
            touching: BTreeSet::new(),
            post_step: Vec::new(),
            static_body,
            next_id: 1,
            steps: 0,
        }
    }

    /// The shared static body; its shapes use world coordinates directly
    pub fn static_body(&self) -> BodyHandle {
        self.static_body
    }

    fn next_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn add_body(&mut self, body: Body) -> BodyHandle {
        let handle = BodyHandle(self.next_id());
        self.bodies.insert(handle, body);
        handle
    }

    pub fn add_shape(&mut self, shape: Shape) -> ShapeHandle {
        let handle = ShapeHandle(self.next_id());
        self.shapes.insert(handle, shape);
        handle
    }

    /// Register a pairwise handler; contacts between these categories are reported
    pub fn add_collision_handler(&mut self, a: CollisionCategory, b: CollisionCategory, response: Response) {
        self.handlers.insert((a, b), response);
    }

    /// Queue a structural change for the end of the next step
    pub fn add_post_step(&mut self, op: PostStep) {
        self.post_step.push(op);
    }

    pub fn pending_post_step(&self) -> usize {
        self.post_step.len()
    }

    pub fn body(&self, handle: BodyHandle) -> Option<&Body> {
        self.bodies.get(&handle)
    }

    pub fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut Body> {
        self.bodies.get_mut(&handle)
    }

    pub fn shape(&self, handle: ShapeHandle) -> Option<&Shape> {
        self.shapes.get(&handle)
    }

    pub fn contains_shape(&self, handle: ShapeHandle) -> bool {
        self.shapes.contains_key(&handle)
    }

    pub fn contains_body(&self, handle: BodyHandle) -> bool {
        self.bodies.contains_key(&handle)
    }

    /// All shapes in handle order
    pub fn shapes(&self) -> impl Iterator<Item = (ShapeHandle, &Shape)> {
        self.shapes.iter().map(|(h, s)| (*h, s))
    }

    /// All bodies in handle order (including the static body)
    pub fn bodies(&self) -> impl Iterator<Item = (BodyHandle, &Body)> {
        self.bodies.iter().map(|(h, b)| (*h, b))
    }

    pub fn bodies_mut(&mut self) -> impl Iterator<Item = (BodyHandle, &mut Body)> {
        self.bodies.iter_mut().map(|(h, b)| (*h, b))
    }

    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    pub fn step_count(&self) -> u64 {
        self.steps
    }

    /// World-space geometry of a shape (offsets resolved against its body)
    pub fn world_geometry(&self, handle: ShapeHandle) -> Option<Geometry> {
        let shape = self.shapes.get(&handle)?;
        let body = self.bodies.get(&shape.body)?;
        Some(match shape.geometry {
            Geometry::Circle { offset, radius } => Geometry::Circle {
                offset: body.pos + offset,
                radius,
            },
            Geometry::Segment { a, b, radius } => Geometry::Segment {
                a: body.pos + a,
                b: body.pos + b,
                radius,
            },
        })
    }

    /// Move the endpoints of a segment shape; false if it isn't one
    pub fn set_segment_endpoints(&mut self, handle: ShapeHandle, a: Vec2, b: Vec2) -> bool {
        match self.shapes.get_mut(&handle) {
            Some(Shape {
                geometry: Geometry::Segment { a: sa, b: sb, .. },
                ..
            }) => {
                *sa = a;
                *sb = b;
                true
            }
            _ => false,
        }
    }

    /// Response registered for a category pair, in either order
    pub fn handler(&self, a: CollisionCategory, b: CollisionCategory) -> Option<Response> {
        self.handlers
            .get(&(a, b))
            .or_else(|| self.handlers.get(&(b, a)))
            .copied()
    }

    /// Advance the world by one fixed step
    pub fn step(&mut self, dt: f32) -> StepReport {
        self.steps += 1;

        let gravity = self.gravity;
        for body in self.bodies.values_mut().filter(|b| !b.is_static()) {
            body.vel += gravity * dt;
            body.pos += body.vel * dt;
        }

        // Only circles on dynamic bodies move; everything else is an obstacle
        let movers: Vec<ShapeHandle> = self
            .shapes
            .iter()
            .filter(|(_, s)| matches!(s.geometry, Geometry::Circle { .. }))
            .filter(|(_, s)| self.bodies.get(&s.body).is_some_and(|b| !b.is_static()))
            .map(|(h, _)| *h)
            .collect();
        let all: Vec<ShapeHandle> = self.shapes.keys().copied().collect();

        let mut now_touching = BTreeSet::new();
        let mut contact_points = BTreeMap::new();
        for _ in 0..self.iterations.max(1) {
            for &mover in &movers {
                for &other in &all {
                    if mover == other {
                        continue;
                    }
                    if let Some(point) = self.solve_pair(mover, other) {
                        let key = ordered(mover, other);
                        now_touching.insert(key);
                        contact_points.entry(key).or_insert(point);
                    }
                }
            }
        }

        let mut report = StepReport::default();
        for key in now_touching.difference(&self.touching) {
            if let Some(contact) = self.contact_for(*key, contact_points.get(key).copied()) {
                report.contacts.push(contact);
            }
        }
        self.touching = now_touching;

        self.run_post_step(&mut report);
        report
    }

    /// Resolve one mover against another shape; returns the contact point on overlap
    fn solve_pair(&mut self, mover: ShapeHandle, other: ShapeHandle) -> Option<Vec2> {
        let sa = self.shapes.get(&mover)?;
        let sb = self.shapes.get(&other)?;
        if sa.body == sb.body {
            return None;
        }
        let ba = self.bodies.get(&sa.body)?;
        let bb = self.bodies.get(&sb.body)?;

        // Dynamic pairs are solved once, from the lower handle
        if !bb.is_static() && matches!(sb.geometry, Geometry::Circle { .. }) && other < mover {
            return None;
        }

        let Geometry::Circle { offset, radius } = sa.geometry else {
            return None;
        };
        let center = ba.pos + offset;
        let result = match sb.geometry {
            Geometry::Circle {
                offset: other_offset,
                radius: other_radius,
            } => circle_circle(center, radius, bb.pos + other_offset, other_radius),
            Geometry::Segment { a, b, radius: seg_radius } => {
                circle_segment(center, radius, bb.pos + a, bb.pos + b, seg_radius)
            }
        };
        if !result.hit {
            return None;
        }

        if self.handler(sa.category, sb.category) == Some(Response::Ignore) {
            return Some(result.point);
        }

        let inv_a = ba.inv_mass();
        let inv_b = bb.inv_mass();
        let inv_sum = inv_a + inv_b;
        if inv_sum <= 0.0 {
            return Some(result.point);
        }

        let restitution = sa.elasticity * sb.elasticity;
        let friction = sa.friction * sb.friction;
        let normal = result.normal;
        let correction = (result.penetration - self.collision_slop).max(0.0);

        let rel = ba.vel - bb.vel;
        let dv = bounce_velocity(rel, normal, restitution, friction) - rel;
        let share_a = inv_a / inv_sum;
        let share_b = inv_b / inv_sum;

        let (body_a, body_b) = (sa.body, sb.body);
        if let Some(body) = self.bodies.get_mut(&body_a) {
            body.vel += dv * share_a;
            body.pos += normal * correction * share_a;
        }
        if share_b > 0.0 {
            if let Some(body) = self.bodies.get_mut(&body_b) {
                body.vel -= dv * share_b;
                body.pos -= normal * correction * share_b;
            }
        }

        Some(result.point)
    }

    fn contact_for(&self, (low, high): (ShapeHandle, ShapeHandle), point: Option<Vec2>) -> Option<Contact> {
        let cat_low = self.shapes.get(&low)?.category;
        let cat_high = self.shapes.get(&high)?.category;
        let point = point.unwrap_or(Vec2::ZERO);

        if self.handlers.contains_key(&(cat_low, cat_high)) {
            Some(Contact {
                shapes: (low, high),
                categories: (cat_low, cat_high),
                point,
            })
        } else if self.handlers.contains_key(&(cat_high, cat_low)) {
            Some(Contact {
                shapes: (high, low),
                categories: (cat_high, cat_low),
                point,
            })
        } else {
            None
        }
    }

    fn run_post_step(&mut self, report: &mut StepReport) {
        for op in std::mem::take(&mut self.post_step) {
            match op {
                PostStep::RemoveShape(handle) => {
                    if self.shapes.remove(&handle).is_some() {
                        report.removed_shapes.push(handle);
                    } else {
                        log::debug!("post-step: shape {:?} already removed", handle);
                    }
                }
                PostStep::RemoveBody(handle) => {
                    if handle == self.static_body {
                        log::warn!("post-step: refusing to remove the static body");
                        continue;
                    }
                    if self.bodies.remove(&handle).is_none() {
                        log::debug!("post-step: body {:?} already removed", handle);
                        continue;
                    }
                    report.removed_bodies.push(handle);
                    let attached: Vec<ShapeHandle> = self
                        .shapes
                        .iter()
                        .filter(|(_, s)| s.body == handle)
                        .map(|(h, _)| *h)
                        .collect();
                    for shape in attached {
                        self.shapes.remove(&shape);
                        report.removed_shapes.push(shape);
                    }
                }
            }
        }

        if !report.removed_shapes.is_empty() {
            let shapes = &self.shapes;
            self.touching
                .retain(|(a, b)| shapes.contains_key(a) && shapes.contains_key(b));
        }
    }
}

#[inline]
fn ordered(a: ShapeHandle, b: ShapeHandle) -> (ShapeHandle, ShapeHandle) {
    if a <= b { (a, b) } else { (b, a) }
}
