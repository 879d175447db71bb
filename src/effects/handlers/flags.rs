//! Status-flag handlers: freeze, silence, keyword and status grants.

use crate::cards::Keyword;
use crate::core::{GameState, LogEventKind, TargetRef};
use crate::effects::context::ResolverContext;
use crate::effects::dispatcher::ResolveResult;
use crate::effects::effect::{EffectDescriptor, Status};

pub(crate) fn freeze(
    state: &mut GameState,
    targets: &[TargetRef],
    ctx: &ResolverContext,
) -> ResolveResult {
    let mut frozen = false;
    for target in targets {
        let (player, label) = match *target {
            TargetRef::Hero(p) => {
                state.players[p].hero_frozen = true;
                (p, format!("{}'s hero", p))
            }
            TargetRef::Minion(id) => {
                let Some(player) = state.controller_of(id) else {
                    continue;
                };
                let Some(minion) = state.minion_mut(id) else {
                    continue;
                };
                minion.flags.frozen = true;
                let card = minion.card_id;
                (player, ctx.card_name(card))
            }
        };
        frozen = true;
        ctx.log(state, LogEventKind::Freeze, player, format!("{} is frozen", label));
    }
    frozen.into()
}

pub(crate) fn silence(
    state: &mut GameState,
    targets: &[TargetRef],
    ctx: &ResolverContext,
) -> ResolveResult {
    let mut silenced = false;
    for id in targets.iter().filter_map(|t| t.as_minion()) {
        let Some(player) = state.controller_of(id) else {
            continue;
        };
        let Some(def) = state.minion(id).and_then(|m| ctx.definition(m.card_id)) else {
            continue;
        };
        if let Some(minion) = state.minion_mut(id) {
            minion.silence(&def);
            silenced = true;
        }
        let event = ctx
            .event(state, LogEventKind::Silence, player, format!("{} is silenced", def.name))
            .with_card(def.id)
            .with_target(id);
        state.log.push(event);
    }
    silenced.into()
}

/// Grant a keyword. Keywords with a runtime flag set it immediately.
pub(crate) fn grant_keyword(
    state: &mut GameState,
    targets: &[TargetRef],
    keyword: Keyword,
    ctx: &ResolverContext,
) -> ResolveResult {
    let mut granted = false;
    for id in targets.iter().filter_map(|t| t.as_minion()) {
        let Some(player) = state.controller_of(id) else {
            continue;
        };
        let Some(minion) = state.minion_mut(id) else {
            continue;
        };
        minion.granted.insert(keyword);
        match keyword {
            Keyword::DivineShield => minion.flags.divine_shield = true,
            Keyword::Stealth => minion.flags.stealth = true,
            Keyword::Charge => {
                minion.flags.summoning_sick = false;
                minion.flags.rush_only = false;
            }
            Keyword::Rush if minion.flags.summoning_sick => {
                minion.flags.summoning_sick = false;
                minion.flags.rush_only = true;
            }
            _ => {}
        }
        let card = minion.card_id;
        granted = true;
        let event = ctx
            .event(
                state,
                LogEventKind::Buff,
                player,
                format!("{} gains {:?}", ctx.card_name(card), keyword),
            )
            .with_target(id);
        state.log.push(event);
    }
    granted.into()
}

pub(crate) fn grant_divine_shield(state: &mut GameState, targets: &[TargetRef]) -> ResolveResult {
    let mut granted = false;
    for id in targets.iter().filter_map(|t| t.as_minion()) {
        if let Some(minion) = state.minion_mut(id) {
            minion.flags.divine_shield = true;
            granted = true;
        }
    }
    granted.into()
}

/// Immune until end of turn.
pub(crate) fn grant_immunity(state: &mut GameState, targets: &[TargetRef]) -> ResolveResult {
    let mut granted = false;
    for target in targets {
        match *target {
            TargetRef::Hero(p) => {
                state.players[p].hero_immune = true;
                granted = true;
            }
            TargetRef::Minion(id) => {
                if let Some(minion) = state.minion_mut(id) {
                    minion.flags.immune = true;
                    granted = true;
                }
            }
        }
    }
    granted.into()
}

pub(crate) fn grant_deathrattle(
    state: &mut GameState,
    targets: &[TargetRef],
    effect: &EffectDescriptor,
) -> ResolveResult {
    let mut granted = false;
    for id in targets.iter().filter_map(|t| t.as_minion()) {
        if let Some(minion) = state.minion_mut(id) {
            minion.granted_deathrattles.push(effect.clone());
            minion.granted.insert(Keyword::Deathrattle);
            granted = true;
        }
    }
    granted.into()
}

pub(crate) fn apply_status(
    state: &mut GameState,
    targets: &[TargetRef],
    status: Status,
) -> ResolveResult {
    let mut applied = false;
    for id in targets.iter().filter_map(|t| t.as_minion()) {
        if let Some(minion) = state.minion_mut(id) {
            let flags = &mut minion.flags;
            match status {
                Status::Poisoned => flags.poisoned = true,
                Status::Vulnerable => flags.vulnerable = true,
                Status::Bleeding => flags.bleeding = true,
                Status::Weakened => flags.weakened = true,
            }
            applied = true;
        }
    }
    applied.into()
}
