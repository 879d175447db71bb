//! Rules configuration.
//!
//! `RulesConfig` holds every numeric limit the engine enforces. The defaults
//! are the standard constructed-play values; tests and variants override
//! individual fields through the `with_*` builders.
//!
//! ```
//! use ccg_rules::core::RulesConfig;
//!
//! let config = RulesConfig::default().with_max_hand_size(10);
//! assert_eq!(config.max_hand_size, 10);
//! assert_eq!(config.max_battlefield_size, 7);
//! ```

use serde::{Deserialize, Serialize};

/// Numeric limits and constants used by the rules.
///
/// Deserializes with every field optional; missing fields take the
/// default value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Cards a hand may hold at rest. Draws beyond this burn.
    pub max_hand_size: usize,

    /// Minions one battlefield may hold.
    pub max_battlefield_size: usize,

    /// Hero starting (and maximum) health.
    pub starting_health: i32,

    /// Mana crystal ceiling.
    pub max_mana: i32,

    /// Deathrattle drain passes before the sweeper gives up.
    pub deathrattle_pass_limit: usize,

    /// Options offered by a Discover when the effect does not say.
    pub discover_options: usize,

    /// Extra damage taken by Vulnerable or Bleeding minions (each).
    pub status_bonus_damage: i32,

    /// Attack lost while Weakened.
    pub weakened_penalty: i32,

    /// Damage a Poisoned minion takes at the start of its controller's turn.
    pub poison_damage: i32,

    /// Opening hand for the first player.
    pub starting_hand_size: usize,

    /// Extra opening cards for the second player.
    pub second_player_bonus_cards: usize,

    /// Upper bound on any repeat count read from card data (draws, hits,
    /// copies, summons).
    pub max_effect_repeats: u32,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            max_hand_size: 7,
            max_battlefield_size: 7,
            starting_health: 30,
            max_mana: 10,
            deathrattle_pass_limit: 30,
            discover_options: 3,
            status_bonus_damage: 3,
            weakened_penalty: 3,
            poison_damage: 3,
            starting_hand_size: 3,
            second_player_bonus_cards: 1,
            max_effect_repeats: 100,
        }
    }
}

impl RulesConfig {
    /// Set the hand capacity.
    #[must_use]
    pub fn with_max_hand_size(mut self, size: usize) -> Self {
        self.max_hand_size = size;
        self
    }

    /// Set the battlefield capacity.
    #[must_use]
    pub fn with_max_battlefield_size(mut self, size: usize) -> Self {
        self.max_battlefield_size = size;
        self
    }

    /// Set hero starting health.
    #[must_use]
    pub fn with_starting_health(mut self, health: i32) -> Self {
        self.starting_health = health;
        self
    }

    /// Set the deathrattle drain cap.
    #[must_use]
    pub fn with_deathrattle_pass_limit(mut self, passes: usize) -> Self {
        self.deathrattle_pass_limit = passes;
        self
    }

    /// Set the default Discover option count.
    #[must_use]
    pub fn with_discover_options(mut self, count: usize) -> Self {
        self.discover_options = count;
        self
    }

    /// Clamp a data-driven repeat count.
    #[must_use]
    pub fn repeats(&self, count: u32) -> u32 {
        count.min(self.max_effect_repeats)
    }

    /// Set opening hand sizes.
    #[must_use]
    pub fn with_opening_hand(mut self, first: usize, second_bonus: usize) -> Self {
        self.starting_hand_size = first;
        self.second_player_bonus_cards = second_bonus;
        self
    }
}
