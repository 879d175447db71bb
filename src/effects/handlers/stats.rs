//! Stat handlers: buffs, set, swap.

use crate::cards::CardType;
use crate::core::{GameState, LogEventKind, PlayerId, TargetRef};
use crate::effects::context::{EffectContext, ResolverContext};
use crate::effects::dispatcher::ResolveResult;

/// Add an enchantment to each minion target.
pub(crate) fn buff(
    state: &mut GameState,
    targets: &[TargetRef],
    attack: i32,
    health: i32,
    ectx: &EffectContext,
    ctx: &ResolverContext,
) -> ResolveResult {
    let mut applied = false;
    for id in targets.iter().filter_map(|t| t.as_minion()) {
        let Some(minion) = state.minion_mut(id) else {
            continue;
        };
        minion.enchant(ectx.source_card, attack, health);
        let card = minion.card_id;
        applied = true;

        let event = ctx
            .event(
                state,
                LogEventKind::Buff,
                ectx.controller,
                format!("{} gets +{}/+{}", ctx.card_name(card), attack, health),
            )
            .with_card(card)
            .with_target(id);
        state.log.push(event);
    }
    applied.into()
}

/// Buff every minion card in a hand.
pub(crate) fn buff_hand(
    state: &mut GameState,
    player: PlayerId,
    attack: i32,
    health: i32,
    ectx: &EffectContext,
    ctx: &ResolverContext,
) -> ResolveResult {
    let mut count = 0;
    for card in state.players[player].hand.iter_mut() {
        let is_minion = ctx
            .catalog
            .by_id(card.card_id)
            .map_or(false, |d| d.card_type == CardType::Minion);
        if is_minion {
            card.enchant(ectx.source_card, attack, health);
            count += 1;
        }
    }
    if count == 0 {
        return ResolveResult::Skipped;
    }
    let event = ctx
        .event(
            state,
            LogEventKind::Buff,
            player,
            format!("{} minion(s) in hand get +{}/+{}", count, attack, health),
        )
        .with_value(count);
    state.log.push(event);
    ResolveResult::Success
}

/// Overwrite attack and/or health. Health also becomes the new maximum.
pub(crate) fn set_stats(
    state: &mut GameState,
    targets: &[TargetRef],
    attack: Option<i32>,
    health: Option<i32>,
    ctx: &ResolverContext,
) -> ResolveResult {
    let mut applied = false;
    for id in targets.iter().filter_map(|t| t.as_minion()) {
        let Some(minion) = state.minion_mut(id) else {
            continue;
        };
        if let Some(attack) = attack {
            minion.attack = attack.max(0);
        }
        if let Some(health) = health {
            minion.health = health;
            minion.max_health = health;
        }
        let (card, a, h) = (minion.card_id, minion.attack, minion.health);
        applied = true;
        let player = state.controller_of(id).unwrap_or_default();
        let event = ctx
            .event(
                state,
                LogEventKind::Buff,
                player,
                format!("{} becomes {}/{}", ctx.card_name(card), a, h),
            )
            .with_target(id);
        state.log.push(event);
    }
    applied.into()
}

/// Swap attack and health.
pub(crate) fn swap_stats(
    state: &mut GameState,
    targets: &[TargetRef],
    ctx: &ResolverContext,
) -> ResolveResult {
    let mut applied = false;
    for id in targets.iter().filter_map(|t| t.as_minion()) {
        let Some(minion) = state.minion_mut(id) else {
            continue;
        };
        let attack = minion.attack;
        minion.attack = minion.health.max(0);
        minion.health = attack;
        minion.max_health = attack;
        let card = minion.card_id;
        applied = true;
        let player = state.controller_of(id).unwrap_or_default();
        ctx.log(
            state,
            LogEventKind::Buff,
            player,
            format!("{} swaps attack and health", ctx.card_name(card)),
        );
    }
    applied.into()
}

/// Double current health; the gain is added to maximum health too.
pub(crate) fn double_health(
    state: &mut GameState,
    targets: &[TargetRef],
    ectx: &EffectContext,
    ctx: &ResolverContext,
) -> ResolveResult {
    let mut applied = false;
    for id in targets.iter().filter_map(|t| t.as_minion()) {
        let Some(minion) = state.minion_mut(id) else {
            continue;
        };
        let gain = minion.health.max(0);
        minion.health = minion.health.saturating_add(gain);
        minion.max_health = minion.max_health.saturating_add(gain);
        let card = minion.card_id;
        applied = true;

        let event = ctx
            .event(
                state,
                LogEventKind::Buff,
                ectx.controller,
                format!("{}'s health is doubled", ctx.card_name(card)),
            )
            .with_card(card)
            .with_target(id)
            .with_value(gain);
        state.log.push(event);
    }
    applied.into()
}
