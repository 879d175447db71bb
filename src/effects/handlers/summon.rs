//! Summon handlers.

use crate::cards::{CardId, CardType};
use crate::core::{GameState, InstanceId, LogEventKind, PlayerId, RulesError, TargetRef};
use crate::effects::context::{EffectContext, ResolverContext};
use crate::effects::dispatcher::ResolveResult;
use crate::effects::effect::CardPool;
use crate::zones::{Zone, ZoneManager, ZonePosition};

use super::zones::pool_cards;

/// Summoned minions go to the right of the source when it is on the
/// summoning player's battlefield, otherwise to the end.
fn position(state: &GameState, player: PlayerId, ectx: &EffectContext) -> ZonePosition {
    ectx.source
        .and_then(|id| state.find_minion(id))
        .filter(|(side, _)| *side == player)
        .map_or(ZonePosition::Bottom, |(_, index)| ZonePosition::Index(index + 1))
}

pub(crate) fn summon(
    state: &mut GameState,
    players: &[PlayerId],
    card: CardId,
    count: u32,
    ectx: &EffectContext,
    ctx: &ResolverContext,
) -> ResolveResult {
    let Some(def) = ctx.definition(card) else {
        return ResolveResult::Failed(RulesError::MissingDefinition { card });
    };
    let mut summoned = false;
    for player in players {
        for _ in 0..ctx.config.repeats(count) {
            if !ZoneManager::board_has_room(state, *player, ctx) {
                break;
            }
            let at = position(state, *player, ectx);
            summoned |= ZoneManager::summon(state, *player, &def, at, ctx).is_some();
        }
    }
    summoned.into()
}

pub(crate) fn summon_random(
    state: &mut GameState,
    player: PlayerId,
    pool: &CardPool,
    count: u32,
    ectx: &EffectContext,
    ctx: &ResolverContext,
) -> ResolveResult {
    let candidates: Vec<_> = pool_cards(pool, ctx)
        .into_iter()
        .filter(|d| d.card_type == CardType::Minion)
        .collect();
    let mut summoned = false;
    for _ in 0..ctx.config.repeats(count) {
        if !ZoneManager::board_has_room(state, player, ctx) {
            break;
        }
        let Some(def) = state.rng.choose(&candidates).cloned() else {
            return ResolveResult::Skipped;
        };
        let at = position(state, player, ectx);
        summoned |= ZoneManager::summon(state, player, &def, at, ctx).is_some();
    }
    summoned.into()
}

/// Summon exact copies of each target minion, buffs and damage included.
pub(crate) fn summon_copy(
    state: &mut GameState,
    player: PlayerId,
    targets: &[TargetRef],
    ectx: &EffectContext,
    ctx: &ResolverContext,
) -> ResolveResult {
    let originals: Vec<_> = targets
        .iter()
        .filter_map(|t| t.as_minion())
        .filter_map(|id| state.minion(id).cloned())
        .collect();
    let mut summoned = false;
    for original in originals {
        if !ZoneManager::board_has_room(state, player, ctx) {
            break;
        }
        let Some(def) = ctx.definition(original.card_id) else {
            continue;
        };
        let mut copy = original;
        copy.id = state.alloc_instance();
        copy.owner = player;
        copy.return_to = None;
        let id = copy.id;
        let at = position(state, player, ectx);
        ZoneManager::place_on_battlefield(state, player, copy, &def, at);
        summoned = true;

        let event = ctx
            .event(
                state,
                LogEventKind::Summon,
                player,
                format!("{} summoned a copy of {}", player, def.name),
            )
            .with_card(def.id)
            .with_target(id);
        state.log.push(event);
    }
    summoned.into()
}

pub(crate) fn summon_multiple(
    state: &mut GameState,
    player: PlayerId,
    cards: &[CardId],
    ectx: &EffectContext,
    ctx: &ResolverContext,
) -> ResolveResult {
    let results = cards
        .iter()
        .map(|card| summon(state, &[player], *card, 1, ectx, ctx))
        .collect::<Vec<_>>();
    ResolveResult::combine(results)
}

/// Summon random distinct friendly minions from the graveyard.
pub(crate) fn resurrect(
    state: &mut GameState,
    player: PlayerId,
    count: u32,
    ectx: &EffectContext,
    ctx: &ResolverContext,
) -> ResolveResult {
    let mut dead: Vec<CardId> = state.players[player]
        .graveyard
        .iter()
        .map(|c| c.card_id)
        .filter(|id| ctx.definition(*id).map_or(false, |d| d.card_type == CardType::Minion))
        .collect();
    dead.sort();
    dead.dedup();
    if dead.is_empty() {
        return ResolveResult::Skipped;
    }

    let picks = state.rng.choose_distinct(&dead, count as usize);
    let mut summoned = false;
    for card in picks {
        if let Some(def) = ctx.definition(card) {
            let at = position(state, player, ectx);
            summoned |= ZoneManager::summon(state, player, &def, at, ctx).is_some();
        }
    }
    summoned.into()
}

fn log_summon(state: &mut GameState, player: PlayerId, id: InstanceId, card: CardId, ctx: &ResolverContext) {
    let event = ctx
        .event(
            state,
            LogEventKind::Summon,
            player,
            format!("{} summoned {}", player, ctx.card_name(card)),
        )
        .with_card(card)
        .with_target(id);
    state.log.push(event);
}

/// Move a random minion card from `player`'s hand onto the battlefield.
pub(crate) fn summon_from_hand(state: &mut GameState, player: PlayerId, ctx: &ResolverContext) -> ResolveResult {
    if !ZoneManager::board_has_room(state, player, ctx) {
        return ResolveResult::Skipped;
    }
    let minions: Vec<(InstanceId, CardId)> = state.players[player]
        .hand
        .iter()
        .filter(|c| ctx.definition(c.card_id).map_or(false, |d| d.card_type == CardType::Minion))
        .map(|c| (c.id, c.card_id))
        .collect();
    let Some((id, card)) = state.rng.choose(&minions).copied() else {
        return ResolveResult::Skipped;
    };
    match ZoneManager::move_card(state, id, Zone::Hand, Zone::Battlefield, player, ctx) {
        Some(Zone::Battlefield) => {
            log_summon(state, player, id, card, ctx);
            ResolveResult::Success
        }
        _ => ResolveResult::Skipped,
    }
}

/// Return the most expensive minion in `player`'s graveyard to the
/// battlefield as a fresh copy. Ties go to the one that died first.
pub(crate) fn summon_highest_cost_from_graveyard(
    state: &mut GameState,
    player: PlayerId,
    ctx: &ResolverContext,
) -> ResolveResult {
    if !ZoneManager::board_has_room(state, player, ctx) {
        return ResolveResult::Skipped;
    }
    let mut best: Option<(i32, InstanceId, std::sync::Arc<crate::cards::CardDefinition>)> = None;
    for dead in state.players[player].graveyard.iter() {
        let Some(def) = ctx.definition(dead.card_id).filter(|d| d.card_type == CardType::Minion) else {
            continue;
        };
        if best.as_ref().map_or(true, |(cost, _, _)| def.mana_cost > *cost) {
            best = Some((def.mana_cost, dead.id, def));
        }
    }
    let Some((_, id, def)) = best else {
        return ResolveResult::Skipped;
    };
    if let Some(dead) = state.players[player].graveyard.iter_mut().find(|c| c.id == id) {
        dead.reset_to(&def);
    }
    match ZoneManager::move_card(state, id, Zone::Graveyard, Zone::Battlefield, player, ctx) {
        Some(Zone::Battlefield) => {
            log_summon(state, player, id, def.id, ctx);
            ResolveResult::Success
        }
        _ => ResolveResult::Skipped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardCatalog, CardDefinition, CardInstance};
    use crate::core::{InstanceId, NullSink, RulesConfig};

    const P0: PlayerId = PlayerId::FIRST;
    const P1: PlayerId = PlayerId::SECOND;

    fn catalog() -> CardCatalog {
        [
            CardDefinition::minion(CardId::new(1), "Grunt", 2, 2, 3),
            CardDefinition::minion(CardId::new(2), "Wisp", 0, 1, 1),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_summon_next_to_source() {
        let (catalog, config) = (catalog(), RulesConfig::default());
        let ctx = ResolverContext::new(&catalog, &config, &NullSink);
        let mut state = GameState::new(1, 30);
        let def = catalog.by_id(CardId::new(1)).unwrap().clone();
        for _ in 0..2 {
            let id = state.alloc_instance();
            state.players[P0].battlefield.push_back(CardInstance::new(id, &def, P0));
        }
        let ectx = EffectContext::new(P0).with_source(InstanceId::new(1), CardId::new(1));

        summon(&mut state, &[P0], CardId::new(2), 1, &ectx, &ctx);
        let board: Vec<CardId> = state.player(P0).battlefield.iter().map(|m| m.card_id).collect();
        assert_eq!(board, vec![CardId::new(1), CardId::new(2), CardId::new(1)]);
    }

    #[test]
    fn test_summon_for_both_sides() {
        let (catalog, config) = (catalog(), RulesConfig::default());
        let ctx = ResolverContext::new(&catalog, &config, &NullSink);
        let mut state = GameState::new(1, 30);

        summon(&mut state, &[P0, P1], CardId::new(2), 2, &EffectContext::new(P0), &ctx);
        assert_eq!(state.player(P0).battlefield.len(), 2);
        assert_eq!(state.player(P1).battlefield.len(), 2);
    }

    #[test]
    fn test_summon_copy_keeps_buffs() {
        let (catalog, config) = (catalog(), RulesConfig::default());
        let ctx = ResolverContext::new(&catalog, &config, &NullSink);
        let mut state = GameState::new(1, 30);
        let def = catalog.by_id(CardId::new(1)).unwrap().clone();
        let id = state.alloc_instance();
        let mut original = CardInstance::new(id, &def, P1);
        original.enchant(None, 2, 2);
        state.players[P1].battlefield.push_back(original);

        summon_copy(&mut state, P0, &[TargetRef::Minion(id)], &EffectContext::new(P0), &ctx);
        let copy = &state.player(P0).battlefield[0];
        assert_ne!(copy.id, id);
        assert_eq!((copy.attack, copy.health), (4, 5));
        assert_eq!(copy.owner, P0);
    }

    #[test]
    fn test_resurrect_distinct() {
        let (catalog, config) = (catalog(), RulesConfig::default());
        let ctx = ResolverContext::new(&catalog, &config, &NullSink);
        let mut state = GameState::new(1, 30);
        let def = catalog.by_id(CardId::new(2)).unwrap().clone();
        for _ in 0..3 {
            let id = state.alloc_instance();
            state.players[P0].graveyard.push_back(CardInstance::new(id, &def, P0));
        }

        resurrect(&mut state, P0, 3, &EffectContext::new(P0), &ctx);
        assert_eq!(state.player(P0).battlefield.len(), 1);
    }

    #[test]
    fn test_summon_from_hand_moves_minion() {
        let (catalog, config) = (catalog(), RulesConfig::default());
        let ctx = ResolverContext::new(&catalog, &config, &NullSink);
        let mut state = GameState::new(1, 30);
        let def = catalog.by_id(CardId::new(2)).unwrap().clone();
        let id = state.alloc_instance();
        state.players[P0].hand.push_back(CardInstance::new(id, &def, P0));

        assert_eq!(summon_from_hand(&mut state, P0, &ctx), ResolveResult::Success);
        assert!(state.player(P0).hand.is_empty());
        assert_eq!(state.player(P0).battlefield[0].id, id);
        assert_eq!(summon_from_hand(&mut state, P0, &ctx), ResolveResult::Skipped);
    }

    #[test]
    fn test_highest_cost_returns_fresh() {
        let (catalog, config) = (catalog(), RulesConfig::default());
        let ctx = ResolverContext::new(&catalog, &config, &NullSink);
        let mut state = GameState::new(1, 30);
        for card in [2, 1] {
            let def = catalog.by_id(CardId::new(card)).unwrap().clone();
            let id = state.alloc_instance();
            let mut dead = CardInstance::new(id, &def, P0);
            dead.health = 0;
            state.players[P0].graveyard.push_back(dead);
        }

        assert_eq!(summon_highest_cost_from_graveyard(&mut state, P0, &ctx), ResolveResult::Success);
        let grunt = &state.player(P0).battlefield[0];
        assert_eq!(grunt.card_id, CardId::new(1));
        assert_eq!(grunt.health, 3);
        assert_eq!(state.player(P0).graveyard.len(), 1);
    }
}
