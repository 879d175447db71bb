//! Card instances - runtime card state.
//!
//! `CardInstance` is a live occurrence of a definition in a hand, on a
//! battlefield, or in a graveyard. It tracks current stats, keywords
//! granted at runtime, status flags, and buffs.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::definition::{CardDefinition, CardId};
use super::keywords::{Keyword, KeywordSet};
use crate::core::entity::InstanceId;
use crate::core::player::PlayerId;
use crate::effects::EffectDescriptor;

/// Status flags on an instance.
///
/// Per-turn flags (`rush_only`, `attacks_this_turn`) are reset by the turn
/// cycle; the rest persist until cleared by an effect or by silence.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusFlags {
    pub divine_shield: bool,
    pub frozen: bool,
    pub stealth: bool,
    pub silenced: bool,
    pub summoning_sick: bool,
    /// Entered with Rush this turn: may attack minions only.
    pub rush_only: bool,
    pub immune: bool,
    pub vulnerable: bool,
    pub bleeding: bool,
    pub weakened: bool,
    pub poisoned: bool,
    pub attacks_this_turn: u8,
}

/// A stat buff attached to an instance. Silence strips these.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Enchantment {
    pub source: Option<CardId>,
    pub attack: i32,
    pub health: i32,
}

/// A card instance in a game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardInstance {
    pub id: InstanceId,

    /// Reference to the card definition. Transform effects rewrite this.
    pub card_id: CardId,

    /// Who started with this card.
    pub owner: PlayerId,

    pub attack: i32,

    /// Current health. May go negative until the next death sweep.
    pub health: i32,

    pub max_health: i32,

    /// Added to the printed mana cost while in hand.
    #[serde(default)]
    pub cost_modifier: i32,

    /// Keywords granted at runtime.
    #[serde(default)]
    pub granted: KeywordSet,

    #[serde(default)]
    pub flags: StatusFlags,

    #[serde(default)]
    pub enchantments: SmallVec<[Enchantment; 2]>,

    /// Deathrattles attached by effects, in grant order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub granted_deathrattles: Vec<EffectDescriptor>,

    /// Player to return this minion to at end of turn (temporary control).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_to: Option<PlayerId>,
}

impl CardInstance {
    /// Create a fresh instance with the definition's printed stats.
    #[must_use]
    pub fn new(id: InstanceId, definition: &CardDefinition, owner: PlayerId) -> Self {
        Self {
            id,
            card_id: definition.id,
            owner,
            attack: definition.attack,
            health: definition.health,
            max_health: definition.health,
            cost_modifier: 0,
            granted: KeywordSet::new(),
            flags: StatusFlags::default(),
            enchantments: SmallVec::new(),
            granted_deathrattles: Vec::new(),
            return_to: None,
        }
    }

    /// Reset to a freshly drawn copy of `definition`, keeping the id.
    ///
    /// Used when an instance leaves the battlefield for the hand and when
    /// it is transformed.
    pub fn reset_to(&mut self, definition: &CardDefinition) {
        *self = Self::new(self.id, definition, self.owner);
    }

    /// Does the instance currently have `keyword`?
    ///
    /// Printed keywords are suppressed by silence; granted ones are
    /// cleared by it.
    #[must_use]
    pub fn has_keyword(&self, definition: &CardDefinition, keyword: Keyword) -> bool {
        (!self.flags.silenced && definition.has_keyword(keyword)) || self.granted.contains(keyword)
    }

    /// Deathrattles that fire when this instance dies: the printed one
    /// unless silenced, then every granted one.
    pub fn deathrattles<'a>(
        &'a self,
        definition: &'a CardDefinition,
    ) -> impl Iterator<Item = &'a EffectDescriptor> + 'a {
        definition
            .deathrattle
            .as_ref()
            .filter(|_| !self.flags.silenced)
            .into_iter()
            .chain(self.granted_deathrattles.iter())
    }

    #[must_use]
    pub fn is_damaged(&self) -> bool {
        self.health < self.max_health
    }

    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    /// Attacks allowed per turn given Windfury variants.
    #[must_use]
    pub fn max_attacks(&self, definition: &CardDefinition) -> u8 {
        if self.has_keyword(definition, Keyword::MegaWindfury) {
            4
        } else if self.has_keyword(definition, Keyword::Windfury) {
            2
        } else {
            1
        }
    }

    /// Attach a buff and apply it to current stats.
    pub fn enchant(&mut self, source: Option<CardId>, attack: i32, health: i32) {
        self.attack = self.attack.saturating_add(attack).max(0);
        self.max_health = self.max_health.saturating_add(health);
        self.health = self.health.saturating_add(health);
        self.enchantments.push(Enchantment { source, attack, health });
    }

    /// Remove text, buffs, and granted abilities. Health is capped at the
    /// printed value.
    pub fn silence(&mut self, definition: &CardDefinition) {
        self.enchantments.clear();
        self.granted.clear();
        self.granted_deathrattles.clear();
        self.attack = definition.attack;
        self.max_health = definition.health;
        self.health = self.health.min(self.max_health);

        let attacks = self.flags.attacks_this_turn;
        let sick = self.flags.summoning_sick;
        self.flags = StatusFlags {
            silenced: true,
            summoning_sick: sick,
            attacks_this_turn: attacks,
            ..StatusFlags::default()
        };
    }
}
