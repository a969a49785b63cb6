//! Ball lifecycle: fade-in, fade-out and deferred removal
//!
//! Each ball owns a `BallRecord` keyed by a stable `EntityId`. The physics
//! shape only carries a handle; all game-side flags live here.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::entities::{Color, SpawnedBall};
use crate::consts::{FADE_IN_STEP, FADE_OUT_STEP};
use crate::physics::{BodyHandle, ShapeHandle};

/// Stable identifier of a ball for the lifetime of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Where a ball is in its life
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lifecycle {
    /// Fading in; `claimed` once it touched the line or basket mid-fade
    Spawning { claimed: bool },
    /// Fully visible and in play
    Active,
    /// Fading out after reaching the line or the basket
    FadingOut,
    /// Invisible; removal has been queued with the physics space
    PendingRemoval,
}

/// What `advance` did this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    None,
    /// Fade-in finished
    Born,
    /// Fade-out finished; the caller must queue removal now
    Expired,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BallRecord {
    pub body: BodyHandle,
    pub shape: ShapeHandle,
    /// Fill color; the alpha channel is the fade value
    pub color: Color,
    pub state: Lifecycle,
}

impl BallRecord {
    pub fn new(spawned: SpawnedBall) -> Self {
        Self {
            body: spawned.body,
            shape: spawned.shape,
            color: spawned.color.with_alpha(0.0),
            state: Lifecycle::Spawning { claimed: false },
        }
    }

    #[inline]
    pub fn alpha(&self) -> f32 {
        self.color.a
    }

    pub fn is_born(&self) -> bool {
        matches!(self.state, Lifecycle::Spawning { .. })
    }

    pub fn is_dead(&self) -> bool {
        matches!(self.state, Lifecycle::FadingOut | Lifecycle::PendingRemoval)
    }

    /// Can still trigger a goal or a score
    pub fn is_live(&self) -> bool {
        matches!(self.state, Lifecycle::Spawning { claimed: false } | Lifecycle::Active)
    }

    /// Mark the ball as caught or lost; false if it was already claimed
    pub fn claim(&mut self) -> bool {
        match self.state {
            Lifecycle::Spawning { claimed: false } => {
                self.state = Lifecycle::Spawning { claimed: true };
                true
            }
            Lifecycle::Active => {
                self.state = Lifecycle::FadingOut;
                true
            }
            _ => false,
        }
    }

    /// One frame of fading
    pub fn advance(&mut self) -> Transition {
        match self.state {
            Lifecycle::Spawning { claimed } => {
                if self.color.a >= 1.0 {
                    self.state = if claimed {
                        Lifecycle::FadingOut
                    } else {
                        Lifecycle::Active
                    };
                    Transition::Born
                } else {
                    self.color.a = (self.color.a + FADE_IN_STEP).min(1.0);
                    Transition::None
                }
            }
            Lifecycle::FadingOut => {
                if self.color.a <= 0.0 {
                    self.state = Lifecycle::PendingRemoval;
                    Transition::Expired
                } else {
                    self.color.a = (self.color.a - FADE_OUT_STEP).max(0.0);
                    Transition::None
                }
            }
            Lifecycle::Active | Lifecycle::PendingRemoval => Transition::None,
        }
    }
}

/// All live ball records, iterated in id order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LifecycleTable {
    records: BTreeMap<EntityId, BallRecord>,
    by_shape: BTreeMap<ShapeHandle, EntityId>,
    next_id: u32,
}

impl LifecycleTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, spawned: SpawnedBall) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.by_shape.insert(spawned.shape, id);
        self.records.insert(id, BallRecord::new(spawned));
        id
    }

    pub fn get(&self, id: EntityId) -> Option<&BallRecord> {
        self.records.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut BallRecord> {
        self.records.get_mut(&id)
    }

    pub fn id_for_shape(&self, shape: ShapeHandle) -> Option<EntityId> {
        self.by_shape.get(&shape).copied()
    }

    /// Drop the record once its shape has left the physics space
    pub fn remove_shape(&mut self, shape: ShapeHandle) -> Option<BallRecord> {
        let id = self.by_shape.remove(&shape)?;
        self.records.remove(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &BallRecord)> {
        self.records.iter().map(|(id, r)| (*id, r))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut BallRecord)> {
        self.records.iter_mut().map(|(id, r)| (*id, r))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Advance every record one frame; returns the ones that just expired
    pub fn advance_all(&mut self) -> Vec<EntityId> {
        self.records
            .iter_mut()
            .filter_map(|(id, record)| (record.advance() == Transition::Expired).then_some(*id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entities::BALL_PALETTE;

    fn record() -> BallRecord {
        BallRecord::new(SpawnedBall {
            body: BodyHandle(1),
            shape: ShapeHandle(2),
            color: BALL_PALETTE[0],
        })
    }

    fn frames_until(record: &mut BallRecord, want: Transition) -> usize {
        for frame in 1..=1000 {
            if record.advance() == want {
                return frame;
            }
        }
        panic!("{:?} never happened", want);
    }

    #[test]
    fn test_new_record_is_transparent_and_spawning() {
        let r = record();
        assert_eq!(r.alpha(), 0.0);
        assert!(r.is_born());
        assert!(!r.is_dead());
        assert!(r.is_live());
    }

    #[test]
    fn test_fade_in_takes_about_fifty_frames() {
        let mut r = record();
        let frames = frames_until(&mut r, Transition::Born);
        assert!((50..=52).contains(&frames), "took {} frames", frames);
        assert_eq!(r.state, Lifecycle::Active);
        assert_eq!(r.alpha(), 1.0);
    }

    #[test]
    fn test_fade_out_and_single_expiry() {
        let mut r = record();
        frames_until(&mut r, Transition::Born);
        assert!(r.claim());
        assert!(r.is_dead());

        let frames = frames_until(&mut r, Transition::Expired);
        assert!(frames <= 7, "took {} frames", frames);
        assert_eq!(r.state, Lifecycle::PendingRemoval);

        // Expiry is reported once
        for _ in 0..10 {
            assert_eq!(r.advance(), Transition::None);
        }
    }

    #[test]
    fn test_claim_while_spawning_defers_death() {
        let mut r = record();
        r.advance();
        assert!(r.claim());
        assert!(!r.is_live());
        assert!(!r.is_dead());
        assert!(!r.claim());

        frames_until(&mut r, Transition::Born);
        assert_eq!(r.state, Lifecycle::FadingOut);
    }

    #[test]
    fn test_dead_ball_cannot_be_claimed_again() {
        let mut r = record();
        frames_until(&mut r, Transition::Born);
        assert!(r.claim());
        assert!(!r.claim());
    }

    #[test]
    fn test_table_lookup_and_removal() {
        let mut table = LifecycleTable::new();
        let spawned = SpawnedBall {
            body: BodyHandle(4),
            shape: ShapeHandle(5),
            color: BALL_PALETTE[1],
        };
        let id = table.insert(spawned);
        assert_eq!(table.id_for_shape(ShapeHandle(5)), Some(id));
        assert_eq!(table.len(), 1);

        assert!(table.remove_shape(ShapeHandle(5)).is_some());
        assert!(table.remove_shape(ShapeHandle(5)).is_none());
        assert!(table.is_empty());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Opacity never drops while fading in, and never rises while fading out
            #[test]
            fn prop_fades_are_monotonic(claim_at in 0usize..80) {
                let mut r = record();
                let mut last = r.alpha();
                let mut claimed = false;
                for frame in 0..200 {
                    if frame == claim_at {
                        claimed = r.claim();
                    }
                    let born = r.is_born();
                    let dying = r.is_dead();
                    r.advance();
                    if born {
                        prop_assert!(r.alpha() >= last);
                    }
                    if dying {
                        prop_assert!(r.alpha() <= last);
                    }
                    prop_assert!(!(r.is_born() && r.is_dead()));
                    last = r.alpha();
                }
                prop_assert!(claimed);
                prop_assert_eq!(r.state, Lifecycle::PendingRemoval);
            }
        }
    }
}
