//! Rules errors.
//!
//! None of these abort a game. Effect-level failures are reported back
//! through `ResolveResult::Failed` and the state is left as it was;
//! action-level rejections leave the input state untouched.

use thiserror::Error;

use super::entity::{InstanceId, TargetRef};
use super::player::PlayerId;
use crate::cards::CardId;
use crate::zones::Zone;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RulesError {
    #[error("Invalid target: {target}")]
    InvalidTarget { target: TargetRef },

    #[error("Effect needs a target but none was supplied")]
    MissingTarget,

    #[error("Unknown effect kind: {kind}")]
    UnknownEffectKind { kind: String },

    #[error("{zone:?} of {player} is full")]
    CapacityExceeded { zone: Zone, player: PlayerId },

    #[error("Deck of {player} is empty (fatigue {fatigue})")]
    ExhaustedResource { player: PlayerId, fatigue: i32 },

    #[error("Deathrattle drain stopped after {passes} passes")]
    RecursionLimit { passes: usize },

    #[error("It is not {player}'s turn")]
    NotYourTurn { player: PlayerId },

    #[error("The game is over")]
    GameOver,

    #[error("A Discover choice is pending")]
    DiscoveryPending,

    #[error("No Discover choice is pending")]
    NoDiscoveryPending,

    #[error("Card {card} is not one of the offered options")]
    InvalidChoice { card: CardId },

    #[error("{instance} is not in the hand of {player}")]
    CardNotInHand { instance: InstanceId, player: PlayerId },

    #[error("Not enough mana: need {need}, have {have}")]
    NotEnoughMana { need: i32, have: i32 },

    #[error("{attacker} cannot attack: {reason}")]
    CannotAttack { attacker: TargetRef, reason: String },

    #[error("Card {card} is not in the catalog")]
    MissingDefinition { card: CardId },
}

impl RulesError {
    /// Is this one of the effect-resolution failures (as opposed to a
    /// rejected player action)?
    pub fn is_effect_failure(&self) -> bool {
        matches!(
            self,
            RulesError::InvalidTarget { .. }
                | RulesError::MissingTarget
                | RulesError::UnknownEffectKind { .. }
                | RulesError::CapacityExceeded { .. }
                | RulesError::ExhaustedResource { .. }
                | RulesError::RecursionLimit { .. }
                | RulesError::MissingDefinition { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = RulesError::NotEnoughMana { need: 5, have: 2 };
        assert_eq!(err.to_string(), "Not enough mana: need 5, have 2");

        let err = RulesError::RecursionLimit { passes: 30 };
        assert_eq!(err.to_string(), "Deathrattle drain stopped after 30 passes");
    }

    #[test]
    fn test_effect_failure_classification() {
        assert!(RulesError::UnknownEffectKind { kind: "x".into() }.is_effect_failure());
        assert!(RulesError::RecursionLimit { passes: 1 }.is_effect_failure());
        assert!(!RulesError::GameOver.is_effect_failure());
        assert!(!RulesError::DiscoveryPending.is_effect_failure());
    }
}
