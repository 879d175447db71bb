//! Effect descriptors.
//!
//! An `EffectDescriptor` is the data form of a card ability: a kind tag
//! with its payload (`EffectKind`), an optional targeting spec for the
//! player's choice, and an optional secondary effect that resolves after
//! the primary one.
//!
//! Descriptors are plain serde data so card content can be authored as
//! JSON:
//!
//! ```
//! use ccg_rules::effects::{EffectDescriptor, EffectKind, Selector};
//!
//! let json = r#"{"type": "heal", "amount": 3, "secondary": {"type": "draw", "count": 1}}"#;
//! let effect: EffectDescriptor = serde_json::from_str(json).unwrap();
//!
//! assert_eq!(effect.kind, EffectKind::Heal { amount: 3, targets: Selector::Chosen });
//! assert!(effect.secondary.is_some());
//! ```
//!
//! Tags the engine does not know deserialize to `EffectKind::Unknown`,
//! keeping the raw tag, and are reported by the dispatcher instead of
//! failing the whole card. A known tag whose payload does not parse is
//! treated the same way.

use serde::{Deserialize, Serialize};

use super::targeting::TargetSpec;
use crate::cards::{CardDefinition, CardId, CardType, Keyword, Rarity};
use crate::core::CostScope;

/// Which minions or heroes an effect touches.
///
/// `Chosen` uses the target supplied with the action, re-validated against
/// the descriptor's `TargetSpec`. Everything else is computed from the
/// state when the effect resolves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selector {
    #[default]
    Chosen,
    /// The minion that owns the effect.
    Source,
    FriendlyHero,
    EnemyHero,
    AllMinions,
    FriendlyMinions,
    EnemyMinions,
    /// Friendly minions except the source.
    OtherFriendlyMinions,
    AllCharacters,
    FriendlyCharacters,
    EnemyCharacters,
    RandomEnemyMinion,
    RandomFriendlyMinion,
    RandomEnemyCharacter,
    /// Minions next to the source.
    Adjacent,
}

/// Whose side a player-level effect applies to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    #[default]
    Friendly,
    Enemy,
    Both,
}

/// Filter over the catalog for random generation and Discover.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct CardPool {
    pub card_type: Option<CardType>,
    pub rarity: Option<Rarity>,
    pub min_cost: Option<i32>,
    pub max_cost: Option<i32>,
    pub keyword: Option<Keyword>,
}

impl CardPool {
    /// Any minion.
    #[must_use]
    pub fn minions() -> Self {
        Self {
            card_type: Some(CardType::Minion),
            ..Self::default()
        }
    }

    /// Any spell.
    #[must_use]
    pub fn spells() -> Self {
        Self {
            card_type: Some(CardType::Spell),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_cost(mut self, min: i32, max: i32) -> Self {
        self.min_cost = Some(min);
        self.max_cost = Some(max);
        self
    }

    #[must_use]
    pub fn matches(&self, card: &CardDefinition) -> bool {
        self.card_type.map_or(true, |t| card.card_type == t)
            && self.rarity.map_or(true, |r| card.rarity == r)
            && self.min_cost.map_or(true, |c| card.mana_cost >= c)
            && self.max_cost.map_or(true, |c| card.mana_cost <= c)
            && self.keyword.map_or(true, |k| card.has_keyword(k))
    }
}

/// Runtime statuses an effect can inflict.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Poisoned,
    Vulnerable,
    Bleeding,
    Weakened,
}

/// Gate for `EffectKind::Conditional`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    /// Another card was played earlier this turn.
    Combo,
    /// The controller's hero is below max health.
    HeroDamaged,
    HandEmpty,
    /// The controller has no minions besides the source.
    BoardEmpty,
}

/// Effect kind and payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EffectKind {
    // === Damage and destruction ===
    Damage {
        amount: i32,
        #[serde(default)]
        targets: Selector,
    },
    /// `hits` separate 1-target hits, each at a random enemy character.
    RandomDamage { amount: i32, hits: u32 },
    /// The chosen minion and its neighbours.
    CleaveDamage { amount: i32 },
    /// Damage the chosen target by the controller's armor.
    DamageEqualToArmor,
    /// Recognized but has no effect.
    DamageConditional,
    /// `amount` divided evenly over the enemy minions, the remainder going
    /// one point each to the leftmost.
    SplitDamage { amount: i32 },
    Destroy {
        #[serde(default)]
        targets: Selector,
    },
    DestroyRandom,

    // === Healing and hero ===
    Heal {
        amount: i32,
        #[serde(default)]
        targets: Selector,
    },
    GainArmor { amount: i32 },
    SetHeroHealth {
        amount: i32,
        #[serde(default)]
        side: Side,
    },

    // === Stats ===
    Buff {
        attack: i32,
        health: i32,
        #[serde(default)]
        targets: Selector,
    },
    /// Buff minions in the controller's hand.
    BuffHand { attack: i32, health: i32 },
    SetStats {
        #[serde(default)]
        attack: Option<i32>,
        #[serde(default)]
        health: Option<i32>,
        #[serde(default)]
        targets: Selector,
    },
    SwapStats {
        #[serde(default)]
        targets: Selector,
    },
    /// Each target's current health is doubled; maximum health rises by
    /// the same amount.
    DoubleHealth {
        #[serde(default)]
        targets: Selector,
    },

    // === Cards and zones ===
    Draw { count: u32 },
    DrawBoth { count: u32 },
    /// Draw until the hand holds `hand_size` cards (never past capacity).
    DrawUntil {
        #[serde(default = "three")]
        hand_size: u32,
    },
    /// Draw the first cards of a type from anywhere in the deck.
    DrawByType { card_type: CardType, count: u32 },
    Mill {
        count: u32,
        #[serde(default)]
        side: Side,
    },
    /// Discard random cards from the controller's hand.
    Discard { count: u32 },
    ShuffleIntoDeck {
        card: CardId,
        #[serde(default = "one")]
        copies: u32,
        #[serde(default)]
        side: Side,
    },
    AddToHand {
        card: CardId,
        #[serde(default = "one")]
        count: u32,
    },
    AddRandomToHand {
        #[serde(default)]
        pool: CardPool,
        #[serde(default = "one")]
        count: u32,
    },
    /// Put a fresh copy of each target minion into the controller's hand.
    CopyToHand {
        #[serde(default)]
        targets: Selector,
    },
    /// Recognized but has no effect.
    ReturnToHand,
    /// Take a random card from the opponent's hand.
    StealCard,
    /// Fresh copies of random cards in the opponent's deck, into hand.
    CopyFromOpponentDeck {
        #[serde(default = "one")]
        count: u32,
    },
    SwapDecks,

    // === Summons ===
    Summon {
        card: CardId,
        #[serde(default = "one")]
        count: u32,
        #[serde(default)]
        side: Side,
    },
    SummonRandom {
        #[serde(default = "CardPool::minions")]
        pool: CardPool,
        #[serde(default = "one")]
        count: u32,
    },
    /// Summon an exact copy (stats and buffs) of each target minion.
    SummonCopy {
        #[serde(default)]
        targets: Selector,
    },
    SummonMultiple { cards: Vec<CardId> },
    /// Summon random distinct friendly minions that died this game.
    Resurrect {
        #[serde(default = "one")]
        count: u32,
    },
    /// Put a random minion from the controller's hand into play.
    SummonFromHand,
    /// Return the most expensive minion in the controller's graveyard to
    /// play at full health.
    SummonHighestCostFromGraveyard,

    // === Control and transformation ===
    MindControl {
        #[serde(default)]
        targets: Selector,
        #[serde(default)]
        temporary: bool,
    },
    Transform {
        into: CardId,
        #[serde(default)]
        targets: Selector,
    },
    TransformRandom {
        #[serde(default = "CardPool::minions")]
        pool: CardPool,
        #[serde(default)]
        targets: Selector,
    },
    /// The source minion becomes a copy of the chosen minion.
    TransformIntoCopy,
    /// Every card in a deck becomes `into`.
    TransformDeck {
        into: CardId,
        #[serde(default)]
        side: Side,
    },
    /// A random card in the controller's hand becomes `into`.
    TransformRandomInHand { into: CardId },

    // === Flags ===
    Freeze {
        #[serde(default)]
        targets: Selector,
    },
    Silence {
        #[serde(default)]
        targets: Selector,
    },
    GrantKeyword {
        keyword: Keyword,
        #[serde(default)]
        targets: Selector,
    },
    GrantDivineShield {
        #[serde(default)]
        targets: Selector,
    },
    /// Immune until the end of the current turn.
    GrantImmunity {
        #[serde(default)]
        targets: Selector,
    },
    GrantDeathrattle {
        effect: Box<EffectDescriptor>,
        #[serde(default)]
        targets: Selector,
    },
    ApplyStatus {
        status: Status,
        #[serde(default)]
        targets: Selector,
    },

    // === Weapons ===
    EquipWeapon { card: CardId },
    BuffWeapon {
        #[serde(default)]
        attack: i32,
        #[serde(default)]
        durability: i32,
    },
    DestroyWeapon {
        #[serde(default = "enemy")]
        side: Side,
    },

    // === Meta ===
    GainMana {
        amount: i32,
        /// Gain empty crystals instead of usable mana this turn.
        #[serde(default)]
        crystals: bool,
    },
    ReduceCost {
        amount: i32,
        scope: CostScope,
        #[serde(default)]
        spells_only: bool,
    },
    /// Reduce the cost of every card currently in hand.
    ReduceHandCost { amount: i32 },
    /// Remove usable mana from the opponent, floored at zero.
    ReduceOpponentMana { amount: i32 },
    ExtraTurn,
    Discover {
        #[serde(default)]
        pool: CardPool,
        #[serde(default)]
        count: Option<usize>,
    },
    StartQuest { description: String, goal: i32 },
    Conditional {
        condition: Condition,
        effect: Box<EffectDescriptor>,
        #[serde(default)]
        otherwise: Option<Box<EffectDescriptor>>,
    },
    Sequence { effects: Vec<EffectDescriptor> },

    /// A tag the engine has no handler for.
    #[serde(skip_deserializing)]
    Unknown { kind: String },
}

fn one() -> u32 {
    1
}

fn three() -> u32 {
    3
}

fn enemy() -> Side {
    Side::Enemy
}

impl EffectKind {
    /// The serialized tag, for logs and error reports.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            EffectKind::Damage { .. } => "damage",
            EffectKind::RandomDamage { .. } => "random_damage",
            EffectKind::CleaveDamage { .. } => "cleave_damage",
            EffectKind::DamageEqualToArmor => "damage_equal_to_armor",
            EffectKind::DamageConditional => "damage_conditional",
            EffectKind::SplitDamage { .. } => "split_damage",
            EffectKind::Destroy { .. } => "destroy",
            EffectKind::DestroyRandom => "destroy_random",
            EffectKind::Heal { .. } => "heal",
            EffectKind::GainArmor { .. } => "gain_armor",
            EffectKind::SetHeroHealth { .. } => "set_hero_health",
            EffectKind::Buff { .. } => "buff",
            EffectKind::BuffHand { .. } => "buff_hand",
            EffectKind::SetStats { .. } => "set_stats",
            EffectKind::SwapStats { .. } => "swap_stats",
            EffectKind::DoubleHealth { .. } => "double_health",
            EffectKind::Draw { .. } => "draw",
            EffectKind::DrawBoth { .. } => "draw_both",
            EffectKind::DrawUntil { .. } => "draw_until",
            EffectKind::DrawByType { .. } => "draw_by_type",
            EffectKind::Mill { .. } => "mill",
            EffectKind::Discard { .. } => "discard",
            EffectKind::ShuffleIntoDeck { .. } => "shuffle_into_deck",
            EffectKind::AddToHand { .. } => "add_to_hand",
            EffectKind::AddRandomToHand { .. } => "add_random_to_hand",
            EffectKind::CopyToHand { .. } => "copy_to_hand",
            EffectKind::ReturnToHand => "return_to_hand",
            EffectKind::StealCard => "steal_card",
            EffectKind::CopyFromOpponentDeck { .. } => "copy_from_opponent_deck",
            EffectKind::SwapDecks => "swap_decks",
            EffectKind::Summon { .. } => "summon",
            EffectKind::SummonRandom { .. } => "summon_random",
            EffectKind::SummonCopy { .. } => "summon_copy",
            EffectKind::SummonMultiple { .. } => "summon_multiple",
            EffectKind::Resurrect { .. } => "resurrect",
            EffectKind::SummonFromHand => "summon_from_hand",
            EffectKind::SummonHighestCostFromGraveyard => "summon_highest_cost_from_graveyard",
            EffectKind::MindControl { .. } => "mind_control",
            EffectKind::Transform { .. } => "transform",
            EffectKind::TransformRandom { .. } => "transform_random",
            EffectKind::TransformIntoCopy => "transform_into_copy",
            EffectKind::TransformDeck { .. } => "transform_deck",
            EffectKind::TransformRandomInHand { .. } => "transform_random_in_hand",
            EffectKind::Freeze { .. } => "freeze",
            EffectKind::Silence { .. } => "silence",
            EffectKind::GrantKeyword { .. } => "grant_keyword",
            EffectKind::GrantDivineShield { .. } => "grant_divine_shield",
            EffectKind::GrantImmunity { .. } => "grant_immunity",
            EffectKind::GrantDeathrattle { .. } => "grant_deathrattle",
            EffectKind::ApplyStatus { .. } => "apply_status",
            EffectKind::EquipWeapon { .. } => "equip_weapon",
            EffectKind::BuffWeapon { .. } => "buff_weapon",
            EffectKind::DestroyWeapon { .. } => "destroy_weapon",
            EffectKind::GainMana { .. } => "gain_mana",
            EffectKind::ReduceCost { .. } => "reduce_cost",
            EffectKind::ReduceHandCost { .. } => "reduce_hand_cost",
            EffectKind::ReduceOpponentMana { .. } => "reduce_opponent_mana",
            EffectKind::ExtraTurn => "extra_turn",
            EffectKind::Discover { .. } => "discover",
            EffectKind::StartQuest { .. } => "start_quest",
            EffectKind::Conditional { .. } => "conditional",
            EffectKind::Sequence { .. } => "sequence",
            EffectKind::Unknown { kind } => kind.as_str(),
        }
    }

    /// The selector driving this kind, for kinds that take one.
    #[must_use]
    pub fn selector(&self) -> Option<Selector> {
        match self {
            EffectKind::Damage { targets, .. }
            | EffectKind::Destroy { targets }
            | EffectKind::Heal { targets, .. }
            | EffectKind::Buff { targets, .. }
            | EffectKind::SetStats { targets, .. }
            | EffectKind::SwapStats { targets }
            | EffectKind::DoubleHealth { targets }
            | EffectKind::CopyToHand { targets }
            | EffectKind::SummonCopy { targets }
            | EffectKind::MindControl { targets, .. }
            | EffectKind::Transform { targets, .. }
            | EffectKind::TransformRandom { targets, .. }
            | EffectKind::Freeze { targets }
            | EffectKind::Silence { targets }
            | EffectKind::GrantKeyword { targets, .. }
            | EffectKind::GrantDivineShield { targets }
            | EffectKind::GrantImmunity { targets }
            | EffectKind::GrantDeathrattle { targets, .. }
            | EffectKind::ApplyStatus { targets, .. } => Some(*targets),
            EffectKind::CleaveDamage { .. }
            | EffectKind::DamageEqualToArmor
            | EffectKind::TransformIntoCopy => Some(Selector::Chosen),
            EffectKind::DestroyRandom => Some(Selector::RandomEnemyMinion),
            _ => None,
        }
    }

    /// Does this kind need a player-chosen target?
    #[must_use]
    pub fn needs_target(&self) -> bool {
        self.selector() == Some(Selector::Chosen)
    }

    /// Target spec used when the descriptor does not carry one.
    ///
    /// Damage and healing may hit heroes; everything else touches minions.
    #[must_use]
    pub fn default_target_spec(&self) -> TargetSpec {
        match self {
            EffectKind::Damage { .. }
            | EffectKind::Heal { .. }
            | EffectKind::DamageEqualToArmor
            | EffectKind::Freeze { .. }
            | EffectKind::GrantImmunity { .. } => TargetSpec::any_character(),
            EffectKind::MindControl { .. } | EffectKind::TransformIntoCopy => {
                TargetSpec::enemy_minion()
            }
            _ => TargetSpec::any_minion(),
        }
    }
}

/// A complete effect: kind, targeting, and an optional follow-up.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawDescriptor")]
pub struct EffectDescriptor {
    #[serde(flatten)]
    pub kind: EffectKind,

    /// What the player may choose for `Selector::Chosen`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<TargetSpec>,

    /// Resolves after the primary effect, against the resulting state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary: Option<Box<EffectDescriptor>>,
}

impl EffectDescriptor {
    #[must_use]
    pub fn new(kind: EffectKind) -> Self {
        Self {
            kind,
            target: None,
            secondary: None,
        }
    }

    /// Restrict what the player may choose.
    #[must_use]
    pub fn with_target(mut self, spec: TargetSpec) -> Self {
        self.target = Some(spec);
        self
    }

    /// Chain a follow-up effect, appended after any existing chain.
    #[must_use]
    pub fn then(mut self, next: EffectDescriptor) -> Self {
        match self.secondary.take() {
            Some(existing) => self.secondary = Some(Box::new(existing.then(next))),
            None => self.secondary = Some(Box::new(next)),
        }
        self
    }

    /// The `TargetSpec` a chosen target is validated against.
    #[must_use]
    pub fn target_spec(&self) -> TargetSpec {
        self.target
            .clone()
            .unwrap_or_else(|| self.kind.default_target_spec())
    }

    // === Constructors ===

    /// Damage to the chosen target.
    #[must_use]
    pub fn damage(amount: i32) -> Self {
        Self::new(EffectKind::Damage { amount, targets: Selector::Chosen })
    }

    /// Damage to every minion matching `targets`.
    #[must_use]
    pub fn damage_all(amount: i32, targets: Selector) -> Self {
        Self::new(EffectKind::Damage { amount, targets })
    }

    #[must_use]
    pub fn heal(amount: i32) -> Self {
        Self::new(EffectKind::Heal { amount, targets: Selector::Chosen })
    }

    #[must_use]
    pub fn buff(attack: i32, health: i32, targets: Selector) -> Self {
        Self::new(EffectKind::Buff { attack, health, targets })
    }

    #[must_use]
    pub fn draw(count: u32) -> Self {
        Self::new(EffectKind::Draw { count })
    }

    #[must_use]
    pub fn summon(card: CardId, count: u32) -> Self {
        Self::new(EffectKind::Summon { card, count, side: Side::Friendly })
    }

    #[must_use]
    pub fn discover(pool: CardPool) -> Self {
        Self::new(EffectKind::Discover { pool, count: None })
    }

    #[must_use]
    pub fn sequence(effects: impl IntoIterator<Item = EffectDescriptor>) -> Self {
        Self::new(EffectKind::Sequence { effects: effects.into_iter().collect() })
    }
}

/// Wire form of a descriptor. The kind falls back to its bare tag when it
/// is not one the engine can read.
#[derive(Deserialize)]
struct RawDescriptor {
    #[serde(flatten)]
    kind: RawKind,
    #[serde(default)]
    target: Option<TargetSpec>,
    #[serde(default)]
    secondary: Option<Box<EffectDescriptor>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawKind {
    Known(EffectKind),
    Other {
        #[serde(rename = "type")]
        tag: String,
    },
}

impl From<RawDescriptor> for EffectDescriptor {
    fn from(raw: RawDescriptor) -> Self {
        let kind = match raw.kind {
            RawKind::Known(kind) => kind,
            RawKind::Other { tag } => EffectKind::Unknown { kind: tag },
        };
        Self {
            kind,
            target: raw.target,
            secondary: raw.secondary,
        }
    }
}

impl From<EffectKind> for EffectDescriptor {
    fn from(kind: EffectKind) -> Self {
        Self::new(kind)
    }
}
