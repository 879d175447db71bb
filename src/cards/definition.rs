//! Card definitions - static card data.
//!
//! `CardDefinition` holds the immutable properties of a card: cost, type,
//! printed stats, keywords, and the effect descriptors that fire when the
//! card is played, dies, or sits on the battlefield across a turn boundary.
//!
//! Instance-specific data (current health, status flags, zone) is stored
//! separately in `CardInstance`.

use serde::{Deserialize, Serialize};

use super::keywords::{Keyword, KeywordSet};
use crate::effects::EffectDescriptor;
use crate::turns::TurnEffect;

/// Unique identifier for a card definition.
///
/// This identifies the "type" of card (e.g., "Fireball"),
/// not a specific instance in a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Card type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardType {
    Minion,
    Spell,
    Weapon,
    Hero,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    #[default]
    Common,
    Rare,
    Epic,
    Legendary,
}

/// Static card definition.
///
/// `attack`/`health` are the printed minion stats; for weapons `attack` is
/// the weapon attack and `durability` its charges; for hero cards `armor`
/// is gained on play.
///
/// ## Example
///
/// ```
/// use ccg_rules::cards::{CardDefinition, CardId, Keyword};
///
/// let guard = CardDefinition::minion(CardId::new(1), "Shieldbearer", 1, 0, 4)
///     .with_keyword(Keyword::Taunt);
///
/// assert!(guard.is_minion());
/// assert!(guard.has_keyword(Keyword::Taunt));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardDefinition {
    pub id: CardId,

    pub name: String,

    pub mana_cost: i32,

    #[serde(rename = "type")]
    pub card_type: CardType,

    #[serde(default)]
    pub rarity: Rarity,

    #[serde(default)]
    pub keywords: KeywordSet,

    #[serde(default)]
    pub attack: i32,

    #[serde(default)]
    pub health: i32,

    #[serde(default)]
    pub durability: i32,

    #[serde(default)]
    pub armor: i32,

    // === Effects ===
    /// Fires when the card is played from hand.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battlecry: Option<EffectDescriptor>,

    /// Fires after the instance dies and is swept.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deathrattle: Option<EffectDescriptor>,

    /// Resolves when a spell is cast.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spell_effect: Option<EffectDescriptor>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_of_turn: Option<TurnEffect>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_of_turn: Option<TurnEffect>,
}

impl CardDefinition {
    fn base(id: CardId, name: impl Into<String>, mana_cost: i32, card_type: CardType) -> Self {
        Self {
            id,
            name: name.into(),
            mana_cost,
            card_type,
            rarity: Rarity::Common,
            keywords: KeywordSet::new(),
            attack: 0,
            health: 0,
            durability: 0,
            armor: 0,
            battlecry: None,
            deathrattle: None,
            spell_effect: None,
            start_of_turn: None,
            end_of_turn: None,
        }
    }

    /// Create a minion definition.
    #[must_use]
    pub fn minion(id: CardId, name: impl Into<String>, mana_cost: i32, attack: i32, health: i32) -> Self {
        let mut card = Self::base(id, name, mana_cost, CardType::Minion);
        card.attack = attack;
        card.health = health;
        card
    }

    /// Create a spell definition.
    #[must_use]
    pub fn spell(id: CardId, name: impl Into<String>, mana_cost: i32, effect: EffectDescriptor) -> Self {
        let mut card = Self::base(id, name, mana_cost, CardType::Spell);
        card.spell_effect = Some(effect);
        card
    }

    /// Create a weapon definition.
    #[must_use]
    pub fn weapon(id: CardId, name: impl Into<String>, mana_cost: i32, attack: i32, durability: i32) -> Self {
        let mut card = Self::base(id, name, mana_cost, CardType::Weapon);
        card.attack = attack;
        card.durability = durability;
        card
    }

    /// Create a hero card definition.
    #[must_use]
    pub fn hero(id: CardId, name: impl Into<String>, mana_cost: i32, armor: i32) -> Self {
        let mut card = Self::base(id, name, mana_cost, CardType::Hero);
        card.armor = armor;
        card
    }

    #[must_use]
    pub fn with_keyword(mut self, keyword: Keyword) -> Self {
        self.keywords.insert(keyword);
        self
    }

    #[must_use]
    pub fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = rarity;
        self
    }

    /// Attach a battlecry. Also adds the Battlecry keyword.
    #[must_use]
    pub fn with_battlecry(mut self, effect: EffectDescriptor) -> Self {
        self.keywords.insert(Keyword::Battlecry);
        self.battlecry = Some(effect);
        self
    }

    /// Attach a deathrattle. Also adds the Deathrattle keyword.
    #[must_use]
    pub fn with_deathrattle(mut self, effect: EffectDescriptor) -> Self {
        self.keywords.insert(Keyword::Deathrattle);
        self.deathrattle = Some(effect);
        self
    }

    #[must_use]
    pub fn with_start_of_turn(mut self, effect: TurnEffect) -> Self {
        self.start_of_turn = Some(effect);
        self
    }

    #[must_use]
    pub fn with_end_of_turn(mut self, effect: TurnEffect) -> Self {
        self.end_of_turn = Some(effect);
        self
    }

    #[must_use]
    pub fn has_keyword(&self, keyword: Keyword) -> bool {
        self.keywords.contains(keyword)
    }

    #[must_use]
    pub fn is_minion(&self) -> bool {
        self.card_type == CardType::Minion
    }

    #[must_use]
    pub fn is_spell(&self) -> bool {
        self.card_type == CardType::Spell
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::EffectKind;

    #[test]
    fn test_card_id() {
        let id = CardId::new(42);
        assert_eq!(id.raw(), 42);
        assert_eq!(format!("{}", id), "Card(42)");
    }

    #[test]
    fn test_minion_builder() {
        let card = CardDefinition::minion(CardId::new(1), "Boar", 1, 1, 1)
            .with_keyword(Keyword::Charge)
            .with_rarity(Rarity::Rare);

        assert_eq!(card.attack, 1);
        assert_eq!(card.health, 1);
        assert_eq!(card.rarity, Rarity::Rare);
        assert!(card.has_keyword(Keyword::Charge));
        assert!(card.is_minion());
    }

    #[test]
    fn test_deathrattle_adds_keyword() {
        let card = CardDefinition::minion(CardId::new(2), "Egg", 1, 0, 2)
            .with_deathrattle(EffectDescriptor::new(EffectKind::Draw { count: 1 }));

        assert!(card.has_keyword(Keyword::Deathrattle));
        assert!(card.deathrattle.is_some());
    }

    #[test]
    fn test_definition_from_json() {
        let json = r#"{
            "id": 7,
            "name": "Arcane Shot",
            "mana_cost": 1,
            "type": "spell",
            "spell_effect": {"type": "damage", "amount": 2}
        }"#;
        let card: CardDefinition = serde_json::from_str(json).unwrap();

        assert!(card.is_spell());
        assert_eq!(card.rarity, Rarity::Common);
        assert_eq!(
            card.spell_effect.map(|e| e.kind),
            Some(EffectKind::Damage { amount: 2, targets: Default::default() })
        );
    }
}
