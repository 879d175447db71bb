//! Game state.
//!
//! ## PlayerState
//!
//! One seat's mana, hero, weapon, the four zones, and per-turn counters:
//! - deck: ordered definitions, top at the front
//! - hand / battlefield / graveyard: ordered `CardInstance`s
//!
//! ## GameState
//!
//! Both players plus turn bookkeeping, the transient deathrattle queue, the
//! pending Discover choice, the game log, and the RNG.
//!
//! Every collection is an `im` persistent structure, so cloning a state is
//! O(1) and a caller holding the previous state sees an untouched snapshot.

use im::Vector;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::entity::InstanceId;
use super::game_log::GameLog;
use super::player::{PlayerId, PlayerMap};
use super::rng::GameRng;
use crate::cards::{CardId, CardInstance};
use crate::effects::{Discovery, EffectDescriptor};
use crate::zones::Zone;

/// Whether the game is still being played.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Active,
    GameOver,
}

/// An equipped weapon.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Weapon {
    pub card_id: CardId,
    pub attack: i32,
    pub durability: i32,
}

/// How long a cost reduction lasts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostScope {
    /// Consumed by the next matching card played.
    NextCard,
    /// Applies to every matching card until end of turn.
    ThisTurn,
}

/// A pending mana cost reduction.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CostModifier {
    pub amount: i32,
    pub scope: CostScope,
    #[serde(default)]
    pub spells_only: bool,
}

/// An active quest.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Quest {
    pub source: Option<CardId>,
    pub description: String,
    pub progress: i32,
    pub goal: i32,
}

/// A deathrattle waiting for the drain loop.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PendingDeathrattle {
    pub instance: InstanceId,
    pub card_id: CardId,
    pub controller: PlayerId,
    pub effect: EffectDescriptor,
}

/// One player's side of the table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    // === Resources ===
    pub mana: i32,
    pub max_mana: i32,

    // === Hero ===
    pub hero_health: i32,
    pub max_health: i32,
    pub armor: i32,
    pub weapon: Option<Weapon>,
    #[serde(default)]
    pub hero_frozen: bool,
    #[serde(default)]
    pub hero_immune: bool,
    #[serde(default)]
    pub hero_attacks_this_turn: u8,

    // === Zones ===
    pub deck: Vector<CardId>,
    pub hand: Vector<CardInstance>,
    pub battlefield: Vector<CardInstance>,
    pub graveyard: Vector<CardInstance>,

    // === Counters ===
    pub fatigue: i32,
    #[serde(default)]
    pub cards_played_this_turn: u32,
    #[serde(default)]
    pub cost_modifiers: SmallVec<[CostModifier; 2]>,
    #[serde(default)]
    pub quest: Option<Quest>,
}

impl PlayerState {
    /// A fresh seat with the given hero health and deck.
    #[must_use]
    pub fn new(health: i32, deck: impl IntoIterator<Item = CardId>) -> Self {
        Self {
            mana: 0,
            max_mana: 0,
            hero_health: health,
            max_health: health,
            armor: 0,
            weapon: None,
            hero_frozen: false,
            hero_immune: false,
            hero_attacks_this_turn: 0,
            deck: deck.into_iter().collect(),
            hand: Vector::new(),
            battlefield: Vector::new(),
            graveyard: Vector::new(),
            fatigue: 0,
            cards_played_this_turn: 0,
            cost_modifiers: SmallVec::new(),
            quest: None,
        }
    }

    /// The ordered instances of one zone. The deck holds definitions and
    /// has no instances.
    #[must_use]
    pub fn zone(&self, zone: Zone) -> Option<&Vector<CardInstance>> {
        match zone {
            Zone::Deck => None,
            Zone::Hand => Some(&self.hand),
            Zone::Battlefield => Some(&self.battlefield),
            Zone::Graveyard => Some(&self.graveyard),
        }
    }

    /// Mutable access to one instance zone.
    pub fn zone_mut(&mut self, zone: Zone) -> Option<&mut Vector<CardInstance>> {
        match zone {
            Zone::Deck => None,
            Zone::Hand => Some(&mut self.hand),
            Zone::Battlefield => Some(&mut self.battlefield),
            Zone::Graveyard => Some(&mut self.graveyard),
        }
    }

    /// Position of an instance within a zone.
    #[must_use]
    pub fn position(&self, zone: Zone, id: InstanceId) -> Option<usize> {
        self.zone(zone)?.iter().position(|c| c.id == id)
    }

    #[must_use]
    pub fn is_hero_damaged(&self) -> bool {
        self.hero_health < self.max_health
    }
}

/// Full game state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameState {
    pub players: PlayerMap<PlayerState>,

    // === Turn ===
    pub turn_owner: PlayerId,
    /// Turn number (starts at 1).
    pub turn_number: u32,
    pub phase: Phase,
    pub winner: Option<PlayerId>,
    /// Players owed an extra turn, in grant order.
    #[serde(default)]
    pub extra_turns: Vector<PlayerId>,

    // === Resolution ===
    pub pending_deathrattles: Vector<PendingDeathrattle>,
    /// Set while the sweeper's drain loop runs.
    #[serde(skip)]
    pub draining: bool,
    pub discovery: Discovery,
    /// Discovers opened while another was pending, oldest first.
    #[serde(default)]
    pub queued_discoveries: Vector<Discovery>,

    // === History ===
    pub log: GameLog,

    /// Deterministic RNG.
    pub rng: GameRng,

    next_instance: u32,
}

impl GameState {
    /// Create a game state with empty decks and both heroes at `health`.
    #[must_use]
    pub fn new(seed: u64, health: i32) -> Self {
        Self {
            players: PlayerMap::new(|_| PlayerState::new(health, [])),
            turn_owner: PlayerId::FIRST,
            turn_number: 1,
            phase: Phase::Active,
            winner: None,
            extra_turns: Vector::new(),
            pending_deathrattles: Vector::new(),
            draining: false,
            discovery: Discovery::default(),
            queued_discoveries: Vector::new(),
            log: GameLog::new(),
            rng: GameRng::new(seed),
            next_instance: 1,
        }
    }

    /// Replace a player's deck (top first).
    #[must_use]
    pub fn with_deck(mut self, player: PlayerId, deck: impl IntoIterator<Item = CardId>) -> Self {
        self.players[player].deck = deck.into_iter().collect();
        self
    }

    /// Allocate a new instance ID.
    pub fn alloc_instance(&mut self) -> InstanceId {
        let id = InstanceId(self.next_instance);
        self.next_instance += 1;
        id
    }

    #[must_use]
    pub fn player(&self, player: PlayerId) -> &PlayerState {
        &self.players[player]
    }

    pub fn player_mut(&mut self, player: PlayerId) -> &mut PlayerState {
        &mut self.players[player]
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    // === Lookup ===

    /// Find which battlefield holds a minion, and where.
    #[must_use]
    pub fn find_minion(&self, id: InstanceId) -> Option<(PlayerId, usize)> {
        PlayerId::both().find_map(|p| {
            self.players[p]
                .battlefield
                .iter()
                .position(|c| c.id == id)
                .map(|i| (p, i))
        })
    }

    /// A minion on either battlefield.
    #[must_use]
    pub fn minion(&self, id: InstanceId) -> Option<&CardInstance> {
        let (player, index) = self.find_minion(id)?;
        self.players[player].battlefield.get(index)
    }

    /// Mutable access to a minion on either battlefield.
    pub fn minion_mut(&mut self, id: InstanceId) -> Option<&mut CardInstance> {
        let (player, index) = self.find_minion(id)?;
        self.players[player].battlefield.get_mut(index)
    }

    /// The player whose battlefield holds `id`.
    #[must_use]
    pub fn controller_of(&self, id: InstanceId) -> Option<PlayerId> {
        self.find_minion(id).map(|(p, _)| p)
    }

    /// Ids of a player's minions in board order.
    #[must_use]
    pub fn minion_ids(&self, player: PlayerId) -> Vec<InstanceId> {
        self.players[player].battlefield.iter().map(|c| c.id).collect()
    }

    /// Locate an instance in any zone of either player.
    #[must_use]
    pub fn locate(&self, id: InstanceId) -> Option<(PlayerId, Zone, usize)> {
        for player in PlayerId::both() {
            for zone in [Zone::Hand, Zone::Battlefield, Zone::Graveyard] {
                if let Some(i) = self.players[player].position(zone, id) {
                    return Some((player, zone, i));
                }
            }
        }
        None
    }

    /// Every instance in every zone, with where it lives.
    pub fn all_instances(&self) -> impl Iterator<Item = (PlayerId, Zone, &CardInstance)> {
        self.players.iter().flat_map(|(p, ps)| {
            ps.hand
                .iter()
                .map(move |c| (p, Zone::Hand, c))
                .chain(ps.battlefield.iter().map(move |c| (p, Zone::Battlefield, c)))
                .chain(ps.graveyard.iter().map(move |c| (p, Zone::Graveyard, c)))
        })
    }
}
