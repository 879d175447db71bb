//! The player-visible game log.
//!
//! An ordered, append-only sequence of typed events. The serialized shape
//! (`id`, `type`, `player`, `text`, `turn`, `timestamp`, and the optional
//! `card_id`/`target_id`/`value`) is what history viewers read, so field
//! names are fixed.
//!
//! This is not diagnostic logging; that goes through the `log` facade.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::entity::InstanceId;
use super::player::PlayerId;
use crate::cards::CardId;

/// Kind tag of a log event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogEventKind {
    Damage,
    Heal,
    Armor,
    Death,
    Effect,
    QuestStarted,
    Draw,
    Burn,
    Fatigue,
    Summon,
    Buff,
    Discover,
    Deathrattle,
    CardPlayed,
    SpellCast,
    Attack,
    Freeze,
    Silence,
    Transform,
    MindControl,
    TurnStart,
    TurnEnd,
    GameOver,
}

/// One entry in the game log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEvent {
    /// Position in the log, starting at 1.
    pub id: u64,

    #[serde(rename = "type")]
    pub kind: LogEventKind,

    /// The acting player.
    pub player: PlayerId,

    /// Human-readable summary.
    pub text: String,

    pub turn: u32,

    /// Milliseconds, as reported by the event sink.
    pub timestamp: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_id: Option<CardId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_id: Option<InstanceId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<i32>,
}

impl LogEvent {
    /// Attach the card this event is about.
    #[must_use]
    pub fn with_card(mut self, card: CardId) -> Self {
        self.card_id = Some(card);
        self
    }

    /// Attach the affected instance.
    #[must_use]
    pub fn with_target(mut self, target: InstanceId) -> Self {
        self.target_id = Some(target);
        self
    }

    /// Attach a numeric amount (damage dealt, health healed, ...).
    #[must_use]
    pub fn with_value(mut self, value: i32) -> Self {
        self.value = Some(value);
        self
    }
}

/// Append-only event log backed by a persistent vector.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameLog {
    events: Vector<LogEvent>,
}

impl GameLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start building an event. The id is assigned on `push`.
    #[must_use]
    pub fn event(
        kind: LogEventKind,
        player: PlayerId,
        text: impl Into<String>,
        turn: u32,
        timestamp: u64,
    ) -> LogEvent {
        LogEvent {
            id: 0,
            kind,
            player,
            text: text.into(),
            turn,
            timestamp,
            card_id: None,
            target_id: None,
            value: None,
        }
    }

    /// Append an event, assigning it the next id.
    pub fn push(&mut self, mut event: LogEvent) {
        event.id = self.events.len() as u64 + 1;
        self.events.push_back(event);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Iterate in append order.
    pub fn iter(&self) -> impl Iterator<Item = &LogEvent> {
        self.events.iter()
    }

    /// Iterate over events of one kind.
    pub fn of_kind(&self, kind: LogEventKind) -> impl Iterator<Item = &LogEvent> {
        self.events.iter().filter(move |e| e.kind == kind)
    }

    /// Count events of one kind.
    #[must_use]
    pub fn count(&self, kind: LogEventKind) -> usize {
        self.of_kind(kind).count()
    }

    /// The most recent event.
    #[must_use]
    pub fn last(&self) -> Option<&LogEvent> {
        self.events.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_assigns_ids() {
        let mut log = GameLog::new();
        log.push(GameLog::event(LogEventKind::Draw, PlayerId::FIRST, "drew", 1, 0));
        log.push(GameLog::event(LogEventKind::Burn, PlayerId::FIRST, "burned", 1, 0));

        let ids: Vec<_> = log.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(log.count(LogEventKind::Burn), 1);
    }

    #[test]
    fn test_event_shape() {
        let event = GameLog::event(LogEventKind::QuestStarted, PlayerId::SECOND, "quest", 3, 99)
            .with_card(CardId::new(5))
            .with_value(2);
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "quest_started");
        assert_eq!(json["player"], 1);
        assert_eq!(json["turn"], 3);
        assert_eq!(json["timestamp"], 99);
        assert_eq!(json["card_id"], 5);
        assert!(json.get("target_id").is_none());
    }
}
