//! Zone manager for card movement.
//!
//! `ZoneManager` owns every transition between the four zones of a player:
//! - drawing (with hand burn and fatigue)
//! - moving instances between hand, battlefield, graveyard, and deck
//! - summoning fresh instances
//! - milling, discarding, and shuffling cards into the deck
//!
//! Every operation takes the id it was handed at face value and quietly
//! does nothing when the instance is no longer where the caller expected;
//! a previous effect in the same chain may already have moved it.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::cards::{CardDefinition, CardId, CardInstance, Keyword};
use crate::combat::CombatResolver;
use crate::core::{
    ActivityKind, AnimationKind, AnimationPayload, GameState, InstanceId, LogEventKind, PlayerId,
    RulesError,
};
use crate::effects::ResolverContext;

/// The four zones of a player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    Deck,
    Hand,
    Battlefield,
    Graveyard,
}

/// Position for inserting a card into an ordered zone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZonePosition {
    /// Front of the zone (top of deck, leftmost minion).
    Top,
    /// Back of the zone.
    Bottom,
    /// Insert at a specific index, clamped to the zone length.
    Index(usize),
    /// Anywhere, chosen by the game RNG.
    Random,
}

/// What a single draw did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawOutcome {
    /// The card entered the hand as this instance.
    Drawn(InstanceId),
    /// The hand was full; the card left the deck and is gone.
    Burned(CardId),
    /// The deck was empty; the hero took this much fatigue damage.
    Fatigue(i32),
}

/// Moves cards between zones.
pub struct ZoneManager;

impl ZoneManager {
    // === Capacity ===

    #[must_use]
    pub fn hand_has_room(state: &GameState, player: PlayerId, ctx: &ResolverContext) -> bool {
        state.players[player].hand.len() < ctx.config.max_hand_size
    }

    #[must_use]
    pub fn board_has_room(state: &GameState, player: PlayerId, ctx: &ResolverContext) -> bool {
        state.players[player].battlefield.len() < ctx.config.max_battlefield_size
    }

    // === Draw ===

    /// Draw the top card of `player`'s deck.
    ///
    /// An empty deck increments the fatigue counter and deals that much
    /// damage to the hero. A full hand burns the card.
    pub fn draw(state: &mut GameState, player: PlayerId, ctx: &ResolverContext) -> DrawOutcome {
        let Some(card) = state.players[player].deck.pop_front() else {
            return Self::fatigue(state, player, ctx);
        };
        Self::receive_drawn(state, player, card, ctx)
    }

    /// Draw `count` cards, stopping early if the game ends.
    ///
    /// `count` is clamped to `RulesConfig::max_effect_repeats`.
    pub fn draw_many(
        state: &mut GameState,
        player: PlayerId,
        count: u32,
        ctx: &ResolverContext,
    ) -> Vec<DrawOutcome> {
        let mut outcomes = Vec::new();
        for _ in 0..ctx.config.repeats(count) {
            if state.is_game_over() {
                break;
            }
            outcomes.push(Self::draw(state, player, ctx));
        }
        outcomes
    }

    /// Draw the first card in the deck matching `predicate`, wherever it
    /// sits. Returns `None` when nothing matches.
    pub fn draw_matching(
        state: &mut GameState,
        player: PlayerId,
        predicate: impl Fn(&CardDefinition) -> bool,
        ctx: &ResolverContext,
    ) -> Option<DrawOutcome> {
        let index = state.players[player]
            .deck
            .iter()
            .position(|card| ctx.catalog.by_id(*card).map_or(false, |d| predicate(d.as_ref())))?;
        let card = state.players[player].deck.remove(index);
        Some(Self::receive_drawn(state, player, card, ctx))
    }

    fn receive_drawn(
        state: &mut GameState,
        player: PlayerId,
        card: CardId,
        ctx: &ResolverContext,
    ) -> DrawOutcome {
        if !Self::hand_has_room(state, player, ctx) {
            Self::burn(state, player, card, ctx);
            return DrawOutcome::Burned(card);
        }

        let Some(def) = ctx.definition(card) else {
            log::warn!("{} drew {} which is not in the catalog; discarding", player, card);
            return DrawOutcome::Burned(card);
        };

        let id = state.alloc_instance();
        state.players[player]
            .hand
            .push_back(CardInstance::new(id, &def, player));

        debug!("{} drew {} as {}", player, def.name, id);
        let event = ctx
            .event(state, LogEventKind::Draw, player, format!("{} drew a card", player))
            .with_card(card)
            .with_target(id);
        state.log.push(event);
        DrawOutcome::Drawn(id)
    }

    fn burn(state: &mut GameState, player: PlayerId, card: CardId, ctx: &ResolverContext) {
        let name = ctx.card_name(card);
        debug!("{} burned {} (hand full)", player, name);

        let event = ctx
            .event(
                state,
                LogEventKind::Burn,
                player,
                format!("{}'s hand is full: {} was burned", player, name),
            )
            .with_card(card);
        state.log.push(event);

        ctx.sink
            .queue_animation(AnimationKind::CardBurn, AnimationPayload::card(card));
        ctx.sink
            .log_activity(ActivityKind::CardBurn, player, &format!("{} was burned", name));
    }

    fn fatigue(state: &mut GameState, player: PlayerId, ctx: &ResolverContext) -> DrawOutcome {
        state.players[player].fatigue += 1;
        let damage = state.players[player].fatigue;
        debug!("{}", RulesError::ExhaustedResource { player, fatigue: damage });

        let event = ctx
            .event(
                state,
                LogEventKind::Fatigue,
                player,
                format!("{} has no cards left and takes {} fatigue damage", player, damage),
            )
            .with_value(damage);
        state.log.push(event);

        CombatResolver::damage_hero(state, player, damage, ctx);
        DrawOutcome::Fatigue(damage)
    }

    // === Generated cards ===

    /// Put a fresh copy of `definition` into `player`'s hand.
    ///
    /// A full hand burns the generated card, exactly like a draw.
    pub fn add_to_hand(
        state: &mut GameState,
        player: PlayerId,
        definition: &CardDefinition,
        ctx: &ResolverContext,
    ) -> Option<InstanceId> {
        if !Self::hand_has_room(state, player, ctx) {
            Self::burn(state, player, definition.id, ctx);
            return None;
        }
        let id = state.alloc_instance();
        state.players[player]
            .hand
            .push_back(CardInstance::new(id, definition, player));
        Some(id)
    }

    /// Create and place a fresh minion.
    ///
    /// Returns `None` without side effects when the battlefield is full.
    pub fn summon(
        state: &mut GameState,
        player: PlayerId,
        definition: &CardDefinition,
        position: ZonePosition,
        ctx: &ResolverContext,
    ) -> Option<InstanceId> {
        if !Self::board_has_room(state, player, ctx) {
            debug!("{} cannot summon {}: battlefield full", player, definition.name);
            return None;
        }
        let id = state.alloc_instance();
        let instance = CardInstance::new(id, definition, player);
        Self::place_on_battlefield(state, player, instance, definition, position);

        let event = ctx
            .event(
                state,
                LogEventKind::Summon,
                player,
                format!("{} summoned {}", player, definition.name),
            )
            .with_card(definition.id)
            .with_target(id);
        state.log.push(event);
        ctx.sink.queue_animation(
            AnimationKind::Summon,
            AnimationPayload::card(definition.id),
        );
        Some(id)
    }

    /// Insert an instance into a battlefield, applying entry flags.
    ///
    /// The caller has already checked capacity.
    pub(crate) fn place_on_battlefield(
        state: &mut GameState,
        player: PlayerId,
        mut instance: CardInstance,
        definition: &CardDefinition,
        position: ZonePosition,
    ) {
        Self::enter_battlefield(&mut instance, definition);
        let len = state.players[player].battlefield.len();
        let index = match position {
            ZonePosition::Top => 0,
            ZonePosition::Bottom => len,
            ZonePosition::Index(i) => i.min(len),
            ZonePosition::Random => state.rng.below(len + 1),
        };
        state.players[player].battlefield.insert(index, instance);
    }

    /// Reset per-zone flags for a minion entering play.
    ///
    /// Charge and Rush skip summoning sickness; Rush alone restricts the
    /// minion to attacking minions this turn.
    pub fn enter_battlefield(instance: &mut CardInstance, definition: &CardDefinition) {
        let charge = instance.has_keyword(definition, Keyword::Charge);
        let rush = instance.has_keyword(definition, Keyword::Rush);

        instance.flags.summoning_sick = !(charge || rush);
        instance.flags.rush_only = rush && !charge;
        instance.flags.attacks_this_turn = 0;
        instance.flags.frozen = false;
        instance.flags.divine_shield = instance.has_keyword(definition, Keyword::DivineShield);
        instance.flags.stealth = instance.has_keyword(definition, Keyword::Stealth);
        instance.flags.immune = instance.has_keyword(definition, Keyword::Immune);
    }

    // === Movement ===

    /// Move an instance between two of `player`'s zones.
    ///
    /// - into the battlefield: no-op when full; entry flags are applied
    /// - into the hand: the instance is reset to a fresh copy; a full hand
    ///   sends it to the graveyard instead
    /// - into the deck: the instance dissolves back into its card id,
    ///   shuffled in at a random position
    ///
    /// Returns the zone the card ended up in, or `None` if nothing moved.
    pub fn move_card(
        state: &mut GameState,
        id: InstanceId,
        from: Zone,
        to: Zone,
        player: PlayerId,
        ctx: &ResolverContext,
    ) -> Option<Zone> {
        if from == to {
            return None;
        }
        let index = state.players[player].position(from, id)?;
        let def = state
            .players[player]
            .zone(from)
            .and_then(|z| z.get(index))
            .and_then(|c| ctx.definition(c.card_id));

        if to == Zone::Battlefield && !Self::board_has_room(state, player, ctx) {
            return None;
        }

        let mut instance = state.players[player].zone_mut(from)?.remove(index);
        match to {
            Zone::Battlefield => {
                let Some(def) = def else {
                    state.players[player].graveyard.push_back(instance);
                    return Some(Zone::Graveyard);
                };
                Self::place_on_battlefield(state, player, instance, &def, ZonePosition::Bottom);
                Some(Zone::Battlefield)
            }
            Zone::Hand => {
                if let Some(def) = &def {
                    instance.reset_to(def);
                }
                if Self::hand_has_room(state, player, ctx) {
                    state.players[player].hand.push_back(instance);
                    Some(Zone::Hand)
                } else {
                    debug!("{} returned to a full hand and was destroyed", id);
                    state.players[player].graveyard.push_back(instance);
                    Some(Zone::Graveyard)
                }
            }
            Zone::Graveyard => {
                state.players[player].graveyard.push_back(instance);
                Some(Zone::Graveyard)
            }
            Zone::Deck => {
                Self::place_in_deck(state, player, instance.card_id, ZonePosition::Random);
                Some(Zone::Deck)
            }
        }
    }

    /// Move a minion from one battlefield to the other, keeping its stats.
    ///
    /// The minion is summoning sick on its new side unless it has Charge
    /// or Rush. No-op when the destination is full.
    pub fn change_control(
        state: &mut GameState,
        id: InstanceId,
        to: PlayerId,
        ctx: &ResolverContext,
    ) -> bool {
        let Some((from, index)) = state.find_minion(id) else {
            return false;
        };
        if from == to || !Self::board_has_room(state, to, ctx) {
            return false;
        }
        let instance = state.players[from].battlefield.remove(index);
        let Some(def) = ctx.definition(instance.card_id) else {
            state.players[from].battlefield.insert(index, instance);
            return false;
        };
        Self::place_on_battlefield(state, to, instance, &def, ZonePosition::Bottom);
        true
    }

    // === Deck ===

    /// Insert a card id into a deck.
    pub fn place_in_deck(state: &mut GameState, player: PlayerId, card: CardId, position: ZonePosition) {
        let len = state.players[player].deck.len();
        let index = match position {
            ZonePosition::Top => 0,
            ZonePosition::Bottom => len,
            ZonePosition::Index(i) => i.min(len),
            ZonePosition::Random => state.rng.below(len + 1),
        };
        state.players[player].deck.insert(index, card);
    }

    /// Shuffle a player's deck.
    pub fn shuffle_deck(state: &mut GameState, player: PlayerId) {
        let mut cards: Vec<CardId> = state.players[player].deck.iter().copied().collect();
        state.rng.shuffle(&mut cards);
        state.players[player].deck = cards.into_iter().collect();
    }

    /// Remove the top `count` cards of a deck for good.
    pub fn mill(
        state: &mut GameState,
        player: PlayerId,
        count: u32,
        ctx: &ResolverContext,
    ) -> Vec<CardId> {
        let mut milled = Vec::new();
        for _ in 0..ctx.config.repeats(count) {
            let Some(card) = state.players[player].deck.pop_front() else {
                break;
            };
            milled.push(card);
        }
        if !milled.is_empty() {
            let text = format!("{} lost {} card(s) from their deck", player, milled.len());
            let event = ctx
                .event(state, LogEventKind::Effect, player, text)
                .with_value(milled.len() as i32);
            state.log.push(event);
        }
        milled
    }

    /// Discard random cards from a hand into the graveyard.
    pub fn discard_random(
        state: &mut GameState,
        player: PlayerId,
        count: u32,
        ctx: &ResolverContext,
    ) -> Vec<InstanceId> {
        let mut discarded = Vec::new();
        for _ in 0..ctx.config.repeats(count) {
            let len = state.players[player].hand.len();
            if len == 0 {
                break;
            }
            let index = state.rng.below(len);
            let instance = state.players[player].hand.remove(index);
            discarded.push(instance.id);
            state.players[player].graveyard.push_back(instance);
        }
        if !discarded.is_empty() {
            let text = format!("{} discarded {} card(s)", player, discarded.len());
            ctx.log(state, LogEventKind::Effect, player, text);
        }
        discarded
    }
}
