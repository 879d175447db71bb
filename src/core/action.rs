//! Player actions.
//!
//! Everything a player can do on their turn, as a value the orchestrator
//! can queue, log, or replay:
//! - play a card from hand, optionally aimed at a target
//! - attack with a minion or the hero
//! - answer a pending Discover
//! - end the turn
//!
//! ```
//! use ccg_rules::core::{Action, InstanceId, PlayerId, TargetRef};
//!
//! let play = Action::play(InstanceId::new(5)).targeting(TargetRef::Hero(PlayerId::SECOND));
//! assert_eq!(play.target(), Some(TargetRef::Hero(PlayerId::SECOND)));
//! ```

use serde::{Deserialize, Serialize};

use super::entity::{InstanceId, TargetRef};
use crate::cards::CardId;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Play a card from hand.
    PlayCard {
        instance: InstanceId,
        #[serde(default)]
        target: Option<TargetRef>,
    },
    /// Attack with a minion, or with the hero when `attacker` is a hero.
    Attack {
        attacker: TargetRef,
        defender: TargetRef,
    },
    /// Answer a pending Discover; `None` declines.
    Discover { choice: Option<CardId> },
    EndTurn,
}

impl Action {
    /// Play a card with no target.
    #[must_use]
    pub fn play(instance: InstanceId) -> Self {
        Action::PlayCard { instance, target: None }
    }

    /// Attack `defender` with `attacker`.
    #[must_use]
    pub fn attack(attacker: TargetRef, defender: TargetRef) -> Self {
        Action::Attack { attacker, defender }
    }

    /// Aim a `PlayCard` at a target. Other actions are returned unchanged.
    #[must_use]
    pub fn targeting(self, chosen: TargetRef) -> Self {
        match self {
            Action::PlayCard { instance, .. } => Action::PlayCard {
                instance,
                target: Some(chosen),
            },
            other => other,
        }
    }

    /// The chosen target, for actions that carry one.
    #[must_use]
    pub fn target(&self) -> Option<TargetRef> {
        match self {
            Action::PlayCard { target, .. } => *target,
            Action::Attack { defender, .. } => Some(*defender),
            Action::Discover { .. } | Action::EndTurn => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PlayerId;

    #[test]
    fn test_targeting_only_affects_play() {
        let end = Action::EndTurn.targeting(TargetRef::Hero(PlayerId::FIRST));
        assert_eq!(end, Action::EndTurn);
        assert_eq!(end.target(), None);
    }

    #[test]
    fn test_action_serialization() {
        let action = Action::attack(
            TargetRef::Minion(InstanceId::new(3)),
            TargetRef::Hero(PlayerId::SECOND),
        );
        let json = serde_json::to_string(&action).unwrap();
        let back: Action = serde_json::from_str(&json).unwrap();
        assert_eq!(back, action);
        assert!(json.contains(r#""action":"attack""#));
    }
}
