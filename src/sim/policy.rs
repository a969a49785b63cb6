//! Collision policy
//!
//! The physics step only reports contact begins. They are turned into
//! `CollisionEvent`s, queued, and drained once per frame here, so game state
//! never changes while the solver is running.

use serde::{Deserialize, Serialize};

use super::lifecycle::{EntityId, LifecycleTable};
use super::state::{Score, SoundCue};
use crate::physics::{CollisionCategory, Contact, Response, ShapeHandle, Space};

/// The three ball pairings the game reacts to
///
/// Declaration order is resolution order: when one ball begins touching
/// several things in the same step, the basket is handled first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CollisionKind {
    BallBasket,
    BallLine,
    BallPin,
}

impl CollisionKind {
    pub fn categories(self) -> (CollisionCategory, CollisionCategory) {
        let other = match self {
            CollisionKind::BallBasket => CollisionCategory::Basket,
            CollisionKind::BallLine => CollisionCategory::Line,
            CollisionKind::BallPin => CollisionCategory::Pin,
        };
        (CollisionCategory::Ball, other)
    }

    pub fn from_categories(categories: (CollisionCategory, CollisionCategory)) -> Option<Self> {
        match categories {
            (CollisionCategory::Ball, CollisionCategory::Basket) => Some(CollisionKind::BallBasket),
            (CollisionCategory::Ball, CollisionCategory::Line) => Some(CollisionKind::BallLine),
            (CollisionCategory::Ball, CollisionCategory::Pin) => Some(CollisionKind::BallPin),
            _ => None,
        }
    }
}

/// A queued contact begin between a ball and something it cares about
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionEvent {
    pub kind: CollisionKind,
    pub categories: (CollisionCategory, CollisionCategory),
    pub ball: ShapeHandle,
    pub other: ShapeHandle,
    /// None when the ball has no record (already removed)
    pub entity: Option<EntityId>,
}

/// Register the three handlers; all keep the physical response
pub fn register_handlers(space: &mut Space) {
    for kind in [CollisionKind::BallPin, CollisionKind::BallLine, CollisionKind::BallBasket] {
        let (a, b) = kind.categories();
        space.add_collision_handler(a, b, Response::Accept);
    }
}

/// Turn a step's contacts into events, in resolution order
pub fn events_from_contacts(contacts: &[Contact], balls: &LifecycleTable) -> Vec<CollisionEvent> {
    let mut events: Vec<CollisionEvent> = contacts
        .iter()
        .filter_map(|contact| {
            let kind = CollisionKind::from_categories(contact.categories)?;
            Some(CollisionEvent {
                kind,
                categories: contact.categories,
                ball: contact.shapes.0,
                other: contact.shapes.1,
                entity: balls.id_for_shape(contact.shapes.0),
            })
        })
        .collect();
    // Stable: contacts of the same kind keep their step order
    events.sort_by_key(|e| e.kind);
    events
}

/// Apply a batch of events to the session state
///
/// Pin contacts only cue a bounce. Line and basket contacts each claim a
/// live ball, so a ball produces at most one goal or score in its life.
pub fn resolve(
    events: impl IntoIterator<Item = CollisionEvent>,
    balls: &mut LifecycleTable,
    score: &mut Score,
    cues: &mut Vec<SoundCue>,
) {
    for event in events {
        match event.kind {
            CollisionKind::BallPin => cues.push(SoundCue::Bounce),
            CollisionKind::BallLine | CollisionKind::BallBasket => {
                let Some(record) = event.entity.and_then(|id| balls.get_mut(id)) else {
                    log::debug!("Contact for unknown ball {:?}", event.ball);
                    continue;
                };
                if !record.is_live() {
                    continue;
                }
                record.claim();
                if event.kind == CollisionKind::BallBasket {
                    score.increment();
                    cues.push(SoundCue::Scored);
                    log::debug!("Ball {:?} caught, score {}", event.entity, score.value());
                } else {
                    cues.push(SoundCue::Goal);
                    log::debug!("Ball {:?} crossed the line", event.entity);
                }
            }
        }
    }
}
