//! Side-channel collaborators: animation queue and activity feed.
//!
//! The rules call these at fixed points (damage applied, spell cast, card
//! burned, ...) and never look at what happens next. Implementations must
//! not call back into the engine.

use std::cell::RefCell;

use super::entity::TargetRef;
use super::player::PlayerId;
use crate::cards::CardId;

/// Animation categories the rules emit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnimationKind {
    Damage,
    Heal,
    Death,
    Summon,
    SpellCast,
    CardBurn,
    Attack,
    Discover,
}

/// Data attached to an animation request.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct AnimationPayload {
    pub source: Option<TargetRef>,
    pub target: Option<TargetRef>,
    pub card: Option<CardId>,
    pub amount: Option<i32>,
}

impl AnimationPayload {
    #[must_use]
    pub fn on(target: TargetRef) -> Self {
        Self {
            target: Some(target),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn card(card: CardId) -> Self {
        Self {
            card: Some(card),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_amount(mut self, amount: i32) -> Self {
        self.amount = Some(amount);
        self
    }

    #[must_use]
    pub fn from_source(mut self, source: TargetRef) -> Self {
        self.source = Some(source);
        self
    }
}

/// Activity feed categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActivityKind {
    CardPlayed,
    SpellCast,
    CardBurn,
    Attack,
    Death,
    TurnEnd,
}

/// Fire-and-forget sink for presentation side effects.
pub trait EventSink {
    /// Queue an animation.
    fn queue_animation(&self, kind: AnimationKind, payload: AnimationPayload);

    /// Record an entry in the activity feed.
    fn log_activity(&self, kind: ActivityKind, actor: PlayerId, summary: &str);

    /// Wall-clock milliseconds used to stamp game log events.
    fn now_millis(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// Discards everything and stamps log events with 0, which keeps state
/// comparisons deterministic.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn queue_animation(&self, _kind: AnimationKind, _payload: AnimationPayload) {}

    fn log_activity(&self, _kind: ActivityKind, _actor: PlayerId, _summary: &str) {}

    fn now_millis(&self) -> u64 {
        0
    }
}

/// Records every call, for tests and replays.
#[derive(Debug, Default)]
pub struct RecordingSink {
    animations: RefCell<Vec<(AnimationKind, AnimationPayload)>>,
    activities: RefCell<Vec<(ActivityKind, PlayerId, String)>>,
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of queued animations.
    #[must_use]
    pub fn animations(&self) -> Vec<(AnimationKind, AnimationPayload)> {
        self.animations.borrow().clone()
    }

    /// Snapshot of activity entries.
    #[must_use]
    pub fn activities(&self) -> Vec<(ActivityKind, PlayerId, String)> {
        self.activities.borrow().clone()
    }

    /// Number of animations of one kind.
    #[must_use]
    pub fn animation_count(&self, kind: AnimationKind) -> usize {
        self.animations.borrow().iter().filter(|(k, _)| *k == kind).count()
    }
}

impl EventSink for RecordingSink {
    fn queue_animation(&self, kind: AnimationKind, payload: AnimationPayload) {
        self.animations.borrow_mut().push((kind, payload));
    }

    fn log_activity(&self, kind: ActivityKind, actor: PlayerId, summary: &str) {
        self.activities
            .borrow_mut()
            .push((kind, actor, summary.to_string()));
    }

    fn now_millis(&self) -> u64 {
        0
    }
}
