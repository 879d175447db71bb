//! Damage, destruction, healing, and hero-health handlers.

use crate::combat::{CombatResolver, DeathSweeper};
use crate::core::{GameState, LogEventKind, PlayerId, TargetRef};
use crate::effects::context::{EffectContext, ResolverContext};
use crate::effects::dispatcher::{EffectDispatcher, ResolveResult};
use crate::effects::targeting::{TargetFilter, TargetResolver, TargetSpec};

fn source_of(ectx: &EffectContext) -> Option<TargetRef> {
    ectx.source.map(TargetRef::Minion)
}

/// One hit per target as a single wave, followed by one sweep.
pub(crate) fn damage(
    state: &mut GameState,
    targets: &[TargetRef],
    amount: i32,
    ectx: &EffectContext,
    ctx: &ResolverContext,
) -> ResolveResult {
    if amount <= 0 {
        return ResolveResult::Skipped;
    }
    let source = source_of(ectx);
    match targets {
        [single] => {
            CombatResolver::deal_damage(state, *single, amount, source, ctx);
        }
        _ => {
            CombatResolver::deal_aoe(state, targets, amount, source, ctx);
        }
    }
    ResolveResult::Success
}

/// `hits` separate hits, each at a random living enemy character picked
/// when the hit lands.
pub(crate) fn random_damage(
    state: &mut GameState,
    amount: i32,
    hits: u32,
    ectx: &EffectContext,
    ctx: &ResolverContext,
) -> ResolveResult {
    let spec = TargetSpec::enemy_character().with_filter(TargetFilter::All);
    let source = source_of(ectx);
    let mut landed = false;

    for _ in 0..ctx.config.repeats(hits) {
        if state.is_game_over() {
            break;
        }
        let pool: Vec<TargetRef> = TargetResolver::valid_targets(state, ectx.controller, &spec, ctx.catalog)
            .into_iter()
            .filter(|t| t.as_minion().map_or(true, |id| {
                state.minion(id).map_or(false, |m| !m.is_dead())
            }))
            .collect();
        let Some(target) = state.rng.choose(&pool).copied() else {
            break;
        };
        CombatResolver::deal_damage(state, target, amount, source, ctx);
        landed = true;
    }
    landed.into()
}

/// The chosen minion and its neighbours, as one wave.
pub(crate) fn cleave(
    state: &mut GameState,
    targets: &[TargetRef],
    amount: i32,
    ectx: &EffectContext,
    ctx: &ResolverContext,
) -> ResolveResult {
    let mut wave = targets.to_vec();
    for target in targets {
        if let Some(id) = target.as_minion() {
            wave.extend(EffectDispatcher::adjacent(state, id));
        }
    }
    CombatResolver::deal_aoe(state, &wave, amount, source_of(ectx), ctx);
    ResolveResult::Success
}

/// Split `amount` over the enemy battlefield as one wave. Each minion
/// takes an equal share; the leftmost take one extra until the remainder
/// runs out. A zero share is not a hit.
pub(crate) fn split_damage(
    state: &mut GameState,
    amount: i32,
    ectx: &EffectContext,
    ctx: &ResolverContext,
) -> ResolveResult {
    let enemies = state.minion_ids(ectx.controller.opponent());
    if amount <= 0 || enemies.is_empty() {
        return ResolveResult::Skipped;
    }
    let count = i32::try_from(enemies.len()).unwrap_or(i32::MAX);
    let (share, extra) = (amount / count, amount % count);
    let source = source_of(ectx);
    for (i, id) in (0..).zip(enemies) {
        let hit = if i < extra { share + 1 } else { share };
        CombatResolver::damage_minion(state, id, hit, source, ctx);
    }
    ResolveResult::Success
}

/// Destroy minion targets regardless of shields. Heroes are ignored.
pub(crate) fn destroy(
    state: &mut GameState,
    targets: &[TargetRef],
    ectx: &EffectContext,
    ctx: &ResolverContext,
) -> ResolveResult {
    let mut destroyed = false;
    for id in targets.iter().filter_map(|t| t.as_minion()) {
        if CombatResolver::destroy_minion(state, id) {
            destroyed = true;
            let name = state
                .minion(id)
                .map(|m| ctx.card_name(m.card_id))
                .unwrap_or_default();
            let event = ctx
                .event(state, LogEventKind::Effect, ectx.controller, format!("{} is destroyed", name))
                .with_target(id);
            state.log.push(event);
        }
    }
    DeathSweeper::remove_dead(state, ctx);
    destroyed.into()
}

pub(crate) fn heal(
    state: &mut GameState,
    targets: &[TargetRef],
    amount: i32,
    ectx: &EffectContext,
    ctx: &ResolverContext,
) -> ResolveResult {
    let source = source_of(ectx);
    for target in targets {
        CombatResolver::heal(state, *target, amount, source, ctx);
    }
    ResolveResult::Success
}

pub(crate) fn gain_armor(
    state: &mut GameState,
    player: PlayerId,
    amount: i32,
    ctx: &ResolverContext,
) -> ResolveResult {
    CombatResolver::gain_armor(state, player, amount, ctx);
    (amount > 0).into()
}

/// Set hero health outright. Maximum health rises to match if needed.
pub(crate) fn set_hero_health(
    state: &mut GameState,
    players: &[PlayerId],
    amount: i32,
    ctx: &ResolverContext,
) -> ResolveResult {
    for player in players {
        let seat = &mut state.players[*player];
        seat.hero_health = amount.max(0);
        seat.max_health = seat.max_health.max(seat.hero_health);
        let event = ctx
            .event(
                state,
                LogEventKind::Effect,
                *player,
                format!("{}'s hero health is set to {}", player, amount),
            )
            .with_value(amount);
        state.log.push(event);
    }
    CombatResolver::check_game_over(state, ctx);
    ResolveResult::Success
}
