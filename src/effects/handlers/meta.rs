//! Weapons, mana, cost modifiers, extra turns, quests, and conditions.

use log::debug;

use crate::cards::{CardId, CardType};
use crate::core::{
    CostModifier, CostScope, GameState, LogEventKind, PlayerId, Quest, RulesError, Weapon,
};
use crate::effects::context::{EffectContext, ResolverContext};
use crate::effects::dispatcher::ResolveResult;
use crate::effects::effect::Condition;

// === Weapons ===

/// Equip a weapon card, replacing any current weapon.
pub(crate) fn equip_weapon(
    state: &mut GameState,
    player: PlayerId,
    card: CardId,
    ctx: &ResolverContext,
) -> ResolveResult {
    let Some(def) = ctx.definition(card) else {
        return ResolveResult::Failed(RulesError::MissingDefinition { card });
    };
    if def.card_type != CardType::Weapon {
        debug!("{} is not a weapon", def.name);
        return ResolveResult::Skipped;
    }
    state.players[player].weapon = Some(Weapon {
        card_id: def.id,
        attack: def.attack,
        durability: def.durability.max(1),
    });
    let event = ctx
        .event(state, LogEventKind::Effect, player, format!("{} equips {}", player, def.name))
        .with_card(def.id);
    state.log.push(event);
    ResolveResult::Success
}

pub(crate) fn buff_weapon(
    state: &mut GameState,
    player: PlayerId,
    attack: i32,
    durability: i32,
) -> ResolveResult {
    match state.players[player].weapon.as_mut() {
        Some(weapon) => {
            weapon.attack = (weapon.attack + attack).max(0);
            weapon.durability += durability;
            ResolveResult::Success
        }
        None => ResolveResult::Skipped,
    }
}

pub(crate) fn destroy_weapon(state: &mut GameState, players: &[PlayerId]) -> ResolveResult {
    let mut destroyed = false;
    for player in players {
        destroyed |= state.players[*player].weapon.take().is_some();
    }
    destroyed.into()
}

// === Mana ===

/// Gain usable mana this turn, or empty crystals, capped at the mana limit.
pub(crate) fn gain_mana(
    state: &mut GameState,
    player: PlayerId,
    amount: i32,
    crystals: bool,
    ctx: &ResolverContext,
) -> ResolveResult {
    let cap = ctx.config.max_mana;
    let seat = &mut state.players[player];
    if crystals {
        seat.max_mana = (seat.max_mana + amount).clamp(0, cap);
    } else {
        seat.mana = (seat.mana + amount).clamp(0, cap);
    }
    let (mana, max) = (seat.mana, seat.max_mana);
    debug!("{} mana now {}/{}", player, mana, max);
    ResolveResult::Success
}

pub(crate) fn reduce_cost(
    state: &mut GameState,
    player: PlayerId,
    amount: i32,
    scope: CostScope,
    spells_only: bool,
) -> ResolveResult {
    state.players[player].cost_modifiers.push(CostModifier {
        amount,
        scope,
        spells_only,
    });
    ResolveResult::Success
}

pub(crate) fn reduce_hand_cost(state: &mut GameState, player: PlayerId, amount: i32) -> ResolveResult {
    let hand = &mut state.players[player].hand;
    if hand.is_empty() {
        return ResolveResult::Skipped;
    }
    for card in hand.iter_mut() {
        card.cost_modifier -= amount;
    }
    ResolveResult::Success
}

/// Take usable mana away from the controller's opponent.
pub(crate) fn reduce_opponent_mana(
    state: &mut GameState,
    controller: PlayerId,
    amount: i32,
    ctx: &ResolverContext,
) -> ResolveResult {
    let opponent = controller.opponent();
    let seat = &mut state.players[opponent];
    if amount <= 0 || seat.mana == 0 {
        return ResolveResult::Skipped;
    }
    let lost = seat.mana.min(amount);
    seat.mana -= lost;
    let event = ctx
        .event(
            state,
            LogEventKind::Effect,
            controller,
            format!("{} loses {} mana", opponent, lost),
        )
        .with_value(lost);
    state.log.push(event);
    ResolveResult::Success
}

// === Turn structure ===

pub(crate) fn extra_turn(state: &mut GameState, player: PlayerId, ctx: &ResolverContext) -> ResolveResult {
    state.extra_turns.push_back(player);
    ctx.log(
        state,
        LogEventKind::Effect,
        player,
        format!("{} will take an extra turn", player),
    );
    ResolveResult::Success
}

pub(crate) fn start_quest(
    state: &mut GameState,
    player: PlayerId,
    description: &str,
    goal: i32,
    ectx: &EffectContext,
    ctx: &ResolverContext,
) -> ResolveResult {
    state.players[player].quest = Some(Quest {
        source: ectx.source_card,
        description: description.to_string(),
        progress: 0,
        goal,
    });
    let mut event = ctx
        .event(
            state,
            LogEventKind::QuestStarted,
            player,
            format!("{} started a quest: {}", player, description),
        )
        .with_value(goal);
    if let Some(card) = ectx.source_card {
        event = event.with_card(card);
    }
    state.log.push(event);
    ResolveResult::Success
}

// === Conditions ===

#[must_use]
pub(crate) fn condition_holds(state: &GameState, condition: Condition, ectx: &EffectContext) -> bool {
    let seat = &state.players[ectx.controller];
    match condition {
        Condition::Combo => seat.cards_played_this_turn > 0,
        Condition::HeroDamaged => seat.is_hero_damaged(),
        Condition::HandEmpty => seat.hand.is_empty(),
        Condition::BoardEmpty => seat
            .battlefield
            .iter()
            .all(|m| Some(m.id) == ectx.source),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardCatalog, CardDefinition, CardInstance};
    use crate::core::{InstanceId, NullSink, RulesConfig};

    const P0: PlayerId = PlayerId::FIRST;

    fn catalog() -> CardCatalog {
        [
            CardDefinition::weapon(CardId::new(1), "Axe", 2, 3, 2),
            CardDefinition::minion(CardId::new(2), "Grunt", 2, 2, 3),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_equip_and_buff_weapon() {
        let (catalog, config) = (catalog(), RulesConfig::default());
        let ctx = ResolverContext::new(&catalog, &config, &NullSink);
        let mut state = GameState::new(1, 30);

        assert_eq!(equip_weapon(&mut state, P0, CardId::new(1), &ctx), ResolveResult::Success);
        buff_weapon(&mut state, P0, 1, 1);
        let weapon = state.player(P0).weapon.clone().unwrap();
        assert_eq!((weapon.attack, weapon.durability), (4, 3));

        assert_eq!(equip_weapon(&mut state, P0, CardId::new(2), &ctx), ResolveResult::Skipped);
    }

    #[test]
    fn test_gain_mana_is_capped() {
        let (catalog, config) = (catalog(), RulesConfig::default());
        let ctx = ResolverContext::new(&catalog, &config, &NullSink);
        let mut state = GameState::new(1, 30);
        state.players[P0].max_mana = 9;

        gain_mana(&mut state, P0, 3, true, &ctx);
        assert_eq!(state.player(P0).max_mana, 10);
        gain_mana(&mut state, P0, 2, false, &ctx);
        assert_eq!(state.player(P0).mana, 2);
    }

    #[test]
    fn test_quest_logs() {
        let (catalog, config) = (catalog(), RulesConfig::default());
        let ctx = ResolverContext::new(&catalog, &config, &NullSink);
        let mut state = GameState::new(1, 30);

        start_quest(&mut state, P0, "Play 5 minions", 5, &EffectContext::new(P0), &ctx);
        assert_eq!(state.player(P0).quest.as_ref().unwrap().goal, 5);
        assert_eq!(state.log.count(LogEventKind::QuestStarted), 1);
    }

    #[test]
    fn test_conditions() {
        let catalog = catalog();
        let mut state = GameState::new(1, 30);
        let ectx = EffectContext::new(P0);
        assert!(condition_holds(&state, Condition::HandEmpty, &ectx));
        assert!(condition_holds(&state, Condition::BoardEmpty, &ectx));
        assert!(!condition_holds(&state, Condition::Combo, &ectx));

        let def = catalog.by_id(CardId::new(2)).unwrap();
        let id = state.alloc_instance();
        state.players[P0].battlefield.push_back(CardInstance::new(id, def, P0));
        assert!(!condition_holds(&state, Condition::BoardEmpty, &ectx));
        let own = EffectContext::new(P0).with_source(id, CardId::new(2));
        assert!(condition_holds(&state, Condition::BoardEmpty, &own));
        assert!(state.minion(InstanceId::new(1)).is_some());
    }

    #[test]
    fn test_reduce_opponent_mana_floors_at_zero() {
        let (catalog, config) = (catalog(), RulesConfig::default());
        let ctx = ResolverContext::new(&catalog, &config, &NullSink);
        let mut state = GameState::new(1, 30);
        state.players[PlayerId::SECOND].mana = 3;

        reduce_opponent_mana(&mut state, P0, 2, &ctx);
        assert_eq!(state.player(PlayerId::SECOND).mana, 1);
        reduce_opponent_mana(&mut state, P0, 5, &ctx);
        assert_eq!(state.player(PlayerId::SECOND).mana, 0);
        assert_eq!(reduce_opponent_mana(&mut state, P0, 1, &ctx), ResolveResult::Skipped);
    }
}
