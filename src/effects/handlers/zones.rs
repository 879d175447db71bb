//! Card-movement handlers: draw, mill, discard, shuffle, generate.

use crate::cards::{CardDefinition, CardId, CardType};
use crate::core::{GameState, LogEventKind, PlayerId, RulesError, TargetRef};
use crate::effects::context::ResolverContext;
use crate::effects::dispatcher::ResolveResult;
use crate::effects::effect::CardPool;
use crate::zones::{ZoneManager, ZonePosition};

pub(crate) fn draw(
    state: &mut GameState,
    players: &[PlayerId],
    count: u32,
    ctx: &ResolverContext,
) -> ResolveResult {
    for player in players {
        ZoneManager::draw_many(state, *player, count, ctx);
    }
    (count > 0).into()
}

/// Draw until the hand holds `hand_size` cards, capped at hand capacity.
pub(crate) fn draw_until(
    state: &mut GameState,
    player: PlayerId,
    hand_size: u32,
    ctx: &ResolverContext,
) -> ResolveResult {
    let goal = usize::try_from(hand_size).unwrap_or(usize::MAX).min(ctx.config.max_hand_size);
    let have = state.players[player].hand.len();
    if have >= goal {
        return ResolveResult::Skipped;
    }
    let missing = u32::try_from(goal - have).unwrap_or(u32::MAX);
    ZoneManager::draw_many(state, player, missing, ctx);
    ResolveResult::Success
}

/// Draw cards of one type from anywhere in the deck.
pub(crate) fn draw_by_type(
    state: &mut GameState,
    player: PlayerId,
    card_type: CardType,
    count: u32,
    ctx: &ResolverContext,
) -> ResolveResult {
    let mut drawn = false;
    for _ in 0..ctx.config.repeats(count) {
        if ZoneManager::draw_matching(state, player, |d| d.card_type == card_type, ctx).is_none() {
            break;
        }
        drawn = true;
    }
    drawn.into()
}

pub(crate) fn mill(
    state: &mut GameState,
    players: &[PlayerId],
    count: u32,
    ctx: &ResolverContext,
) -> ResolveResult {
    let milled: usize = players
        .iter()
        .map(|p| ZoneManager::mill(state, *p, count, ctx).len())
        .sum();
    (milled > 0).into()
}

pub(crate) fn discard(
    state: &mut GameState,
    player: PlayerId,
    count: u32,
    ctx: &ResolverContext,
) -> ResolveResult {
    (!ZoneManager::discard_random(state, player, count, ctx).is_empty()).into()
}

pub(crate) fn shuffle_into_deck(
    state: &mut GameState,
    players: &[PlayerId],
    card: CardId,
    copies: u32,
    ctx: &ResolverContext,
) -> ResolveResult {
    if !ctx.catalog.contains(card) {
        return ResolveResult::Failed(RulesError::MissingDefinition { card });
    }
    let copies = ctx.config.repeats(copies);
    for player in players {
        for _ in 0..copies {
            ZoneManager::place_in_deck(state, *player, card, ZonePosition::Random);
        }
        let text = format!(
            "{} shuffled {} into {}'s deck",
            ctx.card_name(card),
            copies,
            player
        );
        let event = ctx
            .event(state, LogEventKind::Effect, *player, text)
            .with_card(card)
            .with_value(copies as i32);
        state.log.push(event);
    }
    ResolveResult::Success
}

pub(crate) fn add_to_hand(
    state: &mut GameState,
    player: PlayerId,
    card: CardId,
    count: u32,
    ctx: &ResolverContext,
) -> ResolveResult {
    let Some(def) = ctx.definition(card) else {
        return ResolveResult::Failed(RulesError::MissingDefinition { card });
    };
    // The first card that does not fit is burned; the rest are not made.
    for _ in 0..ctx.config.repeats(count) {
        if ZoneManager::add_to_hand(state, player, &def, ctx).is_none() {
            break;
        }
    }
    ResolveResult::Success
}

/// Move a random card from the opponent's hand into `player`'s. Skipped
/// when there is nothing to take or no room for it.
pub(crate) fn steal_card(state: &mut GameState, player: PlayerId, ctx: &ResolverContext) -> ResolveResult {
    let opponent = player.opponent();
    let len = state.players[opponent].hand.len();
    if len == 0 || !ZoneManager::hand_has_room(state, player, ctx) {
        return ResolveResult::Skipped;
    }
    let index = state.rng.below(len);
    let mut card = state.players[opponent].hand.remove(index);
    card.owner = player;
    let (id, card_id) = (card.id, card.card_id);
    state.players[player].hand.push_back(card);

    let event = ctx
        .event(state, LogEventKind::Effect, player, format!("{} stole a card from {}", player, opponent))
        .with_card(card_id)
        .with_target(id);
    state.log.push(event);
    ResolveResult::Success
}

/// Copy random cards from the opponent's deck into `player`'s hand. The
/// deck is left as it was; copying stops once the hand is full.
pub(crate) fn copy_from_opponent_deck(
    state: &mut GameState,
    player: PlayerId,
    count: u32,
    ctx: &ResolverContext,
) -> ResolveResult {
    let deck: Vec<CardId> = state.players[player.opponent()].deck.iter().copied().collect();
    let mut copied = 0;
    for _ in 0..ctx.config.repeats(count) {
        if !ZoneManager::hand_has_room(state, player, ctx) {
            break;
        }
        let Some(def) = state.rng.choose(&deck).and_then(|card| ctx.definition(*card)) else {
            break;
        };
        ZoneManager::add_to_hand(state, player, &def, ctx);
        copied += 1;
    }
    if copied == 0 {
        return ResolveResult::Skipped;
    }
    let event = ctx
        .event(
            state,
            LogEventKind::Effect,
            player,
            format!("{} copied {} card(s) from {}'s deck", player, copied, player.opponent()),
        )
        .with_value(copied);
    state.log.push(event);
    ResolveResult::Success
}

/// Exchange the two decks.
pub(crate) fn swap_decks(state: &mut GameState, player: PlayerId, ctx: &ResolverContext) -> ResolveResult {
    let opponent = player.opponent();
    let theirs = std::mem::take(&mut state.players[opponent].deck);
    let ours = std::mem::replace(&mut state.players[player].deck, theirs);
    state.players[opponent].deck = ours;
    ctx.log(state, LogEventKind::Effect, player, format!("{} swapped decks with {}", player, opponent));
    ResolveResult::Success
}

/// Catalog cards matching `pool`, in id order.
pub(crate) fn pool_cards(pool: &CardPool, ctx: &ResolverContext) -> Vec<std::sync::Arc<CardDefinition>> {
    ctx.catalog.find(|d| pool.matches(d)).cloned().collect()
}

pub(crate) fn add_random_to_hand(
    state: &mut GameState,
    player: PlayerId,
    pool: &CardPool,
    count: u32,
    ctx: &ResolverContext,
) -> ResolveResult {
    let candidates = pool_cards(pool, ctx);
    if candidates.is_empty() {
        return ResolveResult::Skipped;
    }
    for _ in 0..ctx.config.repeats(count) {
        let Some(def) = state.rng.choose(&candidates).cloned() else {
            break;
        };
        if ZoneManager::add_to_hand(state, player, &def, ctx).is_none() {
            break;
        }
    }
    ResolveResult::Success
}

/// Fresh copies of each target minion's card, into `player`'s hand.
pub(crate) fn copy_to_hand(
    state: &mut GameState,
    player: PlayerId,
    targets: &[TargetRef],
    ctx: &ResolverContext,
) -> ResolveResult {
    let cards: Vec<CardId> = targets
        .iter()
        .filter_map(|t| t.as_minion())
        .filter_map(|id| state.minion(id).map(|m| m.card_id))
        .collect();
    let mut added = false;
    for card in cards {
        if let Some(def) = ctx.definition(card) {
            ZoneManager::add_to_hand(state, player, &def, ctx);
            added = true;
        }
    }
    added.into()
}
