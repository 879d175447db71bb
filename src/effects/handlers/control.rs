//! Control and transformation handlers.

use log::debug;

use crate::cards::{CardDefinition, CardId, CardType};
use crate::core::{GameState, InstanceId, LogEventKind, PlayerId, TargetRef};
use crate::effects::context::{EffectContext, ResolverContext};
use crate::effects::dispatcher::ResolveResult;
use crate::effects::effect::CardPool;
use crate::zones::ZoneManager;

use super::zones::pool_cards;

/// Take control of each target minion.
///
/// Temporary control lets the minion attack this turn and sends it back
/// at end of turn.
pub(crate) fn mind_control(
    state: &mut GameState,
    controller: PlayerId,
    targets: &[TargetRef],
    temporary: bool,
    ctx: &ResolverContext,
) -> ResolveResult {
    let mut taken = false;
    for id in targets.iter().filter_map(|t| t.as_minion()) {
        let Some(previous) = state.controller_of(id) else {
            continue;
        };
        if !ZoneManager::change_control(state, id, controller, ctx) {
            debug!("mind control of {} skipped", id);
            continue;
        }
        taken = true;
        let mut card = None;
        if let Some(minion) = state.minion_mut(id) {
            card = Some(minion.card_id);
            if temporary {
                minion.return_to = Some(previous);
                minion.flags.summoning_sick = false;
                minion.flags.rush_only = false;
            }
        }
        let name = card.map(|c| ctx.card_name(c)).unwrap_or_default();
        let text = if temporary {
            format!("{} takes control of {} until end of turn", controller, name)
        } else {
            format!("{} takes control of {}", controller, name)
        };
        let event = ctx
            .event(state, LogEventKind::MindControl, controller, text)
            .with_target(id);
        state.log.push(event);
    }
    taken.into()
}

/// Turn a battlefield minion into a fresh copy of `definition`, keeping
/// its id, owner, and slot.
fn become_card(
    state: &mut GameState,
    id: InstanceId,
    definition: &CardDefinition,
    ctx: &ResolverContext,
) -> bool {
    let Some(player) = state.controller_of(id) else {
        return false;
    };
    let Some(minion) = state.minion_mut(id) else {
        return false;
    };
    let from = minion.card_id;
    minion.reset_to(definition);
    ZoneManager::enter_battlefield(minion, definition);

    let text = format!("{} becomes {}", ctx.card_name(from), definition.name);
    let event = ctx
        .event(state, LogEventKind::Transform, player, text)
        .with_card(definition.id)
        .with_target(id);
    state.log.push(event);
    true
}

pub(crate) fn transform(
    state: &mut GameState,
    targets: &[TargetRef],
    into: CardId,
    ctx: &ResolverContext,
) -> ResolveResult {
    let Some(def) = ctx.definition(into) else {
        return ResolveResult::Failed(crate::core::RulesError::MissingDefinition { card: into });
    };
    let mut changed = false;
    for id in targets.iter().filter_map(|t| t.as_minion()) {
        changed |= become_card(state, id, &def, ctx);
    }
    changed.into()
}

pub(crate) fn transform_random(
    state: &mut GameState,
    targets: &[TargetRef],
    pool: &CardPool,
    ctx: &ResolverContext,
) -> ResolveResult {
    let candidates: Vec<_> = pool_cards(pool, ctx)
        .into_iter()
        .filter(|d| d.card_type == CardType::Minion)
        .collect();
    let mut changed = false;
    for id in targets.iter().filter_map(|t| t.as_minion()) {
        let Some(def) = state.rng.choose(&candidates).cloned() else {
            return ResolveResult::Skipped;
        };
        changed |= become_card(state, id, &def, ctx);
    }
    changed.into()
}

/// The source minion becomes an exact copy of the chosen minion.
pub(crate) fn transform_into_copy(
    state: &mut GameState,
    targets: &[TargetRef],
    ectx: &EffectContext,
    ctx: &ResolverContext,
) -> ResolveResult {
    let Some(source) = ectx.source.filter(|id| state.find_minion(*id).is_some()) else {
        return ResolveResult::Skipped;
    };
    let Some(model) = targets
        .iter()
        .filter_map(|t| t.as_minion())
        .find_map(|id| state.minion(id).cloned())
    else {
        return ResolveResult::Skipped;
    };
    let Some(def) = ctx.definition(model.card_id) else {
        return ResolveResult::Skipped;
    };

    let Some(minion) = state.minion_mut(source) else {
        return ResolveResult::Skipped;
    };
    let (id, owner, flags) = (minion.id, minion.owner, minion.flags.clone());
    *minion = model;
    minion.id = id;
    minion.owner = owner;
    minion.return_to = None;
    minion.flags.summoning_sick = flags.summoning_sick;
    minion.flags.attacks_this_turn = flags.attacks_this_turn;

    let player = state.controller_of(source).unwrap_or(owner);
    let event = ctx
        .event(
            state,
            LogEventKind::Transform,
            player,
            format!("A minion becomes a copy of {}", def.name),
        )
        .with_card(def.id)
        .with_target(source);
    state.log.push(event);
    ResolveResult::Success
}

/// Every card in each deck becomes `into`.
pub(crate) fn transform_deck(
    state: &mut GameState,
    players: &[PlayerId],
    into: CardId,
    ctx: &ResolverContext,
) -> ResolveResult {
    if !ctx.catalog.contains(into) {
        return ResolveResult::Failed(crate::core::RulesError::MissingDefinition { card: into });
    }
    for player in players {
        let size = state.players[*player].deck.len();
        state.players[*player].deck = std::iter::repeat(into).take(size).collect();
        let event = ctx
            .event(
                state,
                LogEventKind::Transform,
                *player,
                format!("Every card in {}'s deck becomes {}", player, ctx.card_name(into)),
            )
            .with_card(into)
            .with_value(size as i32);
        state.log.push(event);
    }
    ResolveResult::Success
}

/// A random card in `player`'s hand becomes a fresh `into`, keeping its id.
pub(crate) fn transform_random_in_hand(
    state: &mut GameState,
    player: PlayerId,
    into: CardId,
    ctx: &ResolverContext,
) -> ResolveResult {
    let Some(def) = ctx.definition(into) else {
        return ResolveResult::Failed(crate::core::RulesError::MissingDefinition { card: into });
    };
    let len = state.players[player].hand.len();
    if len == 0 {
        return ResolveResult::Skipped;
    }
    let index = state.rng.below(len);
    let Some(card) = state.players[player].hand.get_mut(index) else {
        return ResolveResult::Skipped;
    };
    let (id, from) = (card.id, card.card_id);
    card.reset_to(&def);

    let text = format!("{} in hand becomes {}", ctx.card_name(from), def.name);
    let event = ctx
        .event(state, LogEventKind::Transform, player, text)
        .with_card(def.id)
        .with_target(id);
    state.log.push(event);
    ResolveResult::Success
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardCatalog, CardInstance, Keyword};
    use crate::core::{NullSink, RulesConfig};

    const P0: PlayerId = PlayerId::FIRST;
    const P1: PlayerId = PlayerId::SECOND;

    fn catalog() -> CardCatalog {
        [
            CardDefinition::minion(CardId::new(1), "Dragon", 8, 8, 8).with_keyword(Keyword::Taunt),
            CardDefinition::minion(CardId::new(2), "Sheep", 1, 1, 1),
        ]
        .into_iter()
        .collect()
    }

    fn setup(catalog: &CardCatalog) -> (GameState, InstanceId) {
        let mut state = GameState::new(1, 30);
        let def = catalog.by_id(CardId::new(1)).unwrap();
        let id = state.alloc_instance();
        let mut dragon = CardInstance::new(id, def, P1);
        dragon.enchant(None, 2, 2);
        state.players[P1].battlefield.push_back(dragon);
        (state, id)
    }

    #[test]
    fn test_transform_resets_buffs() {
        let catalog = catalog();
        let config = RulesConfig::default();
        let ctx = ResolverContext::new(&catalog, &config, &NullSink);
        let (mut state, id) = setup(&catalog);

        transform(&mut state, &[TargetRef::Minion(id)], CardId::new(2), &ctx);
        let sheep = state.minion(id).unwrap();
        assert_eq!(sheep.card_id, CardId::new(2));
        assert_eq!((sheep.attack, sheep.health), (1, 1));
        assert!(sheep.enchantments.is_empty());
    }

    #[test]
    fn test_temporary_mind_control() {
        let catalog = catalog();
        let config = RulesConfig::default();
        let ctx = ResolverContext::new(&catalog, &config, &NullSink);
        let (mut state, id) = setup(&catalog);

        mind_control(&mut state, P0, &[TargetRef::Minion(id)], true, &ctx);
        assert_eq!(state.controller_of(id), Some(P0));
        let minion = state.minion(id).unwrap();
        assert_eq!(minion.return_to, Some(P1));
        assert!(!minion.flags.summoning_sick);
        assert_eq!(minion.attack, 10);
    }

    #[test]
    fn test_transform_deck() {
        let catalog = catalog();
        let config = RulesConfig::default();
        let ctx = ResolverContext::new(&catalog, &config, &NullSink);
        let mut state = GameState::new(1, 30).with_deck(P1, [CardId::new(1), CardId::new(1)]);

        transform_deck(&mut state, &[P1], CardId::new(2), &ctx);
        assert!(state.player(P1).deck.iter().all(|c| *c == CardId::new(2)));
        assert_eq!(state.player(P1).deck.len(), 2);
    }

    #[test]
    fn test_transform_random_in_hand_keeps_id() {
        let catalog = catalog();
        let config = RulesConfig::default();
        let ctx = ResolverContext::new(&catalog, &config, &NullSink);
        let mut state = GameState::new(1, 30);
        let def = catalog.by_id(CardId::new(1)).unwrap();
        let id = state.alloc_instance();
        state.players[P0].hand.push_back(CardInstance::new(id, def, P0));

        assert!(transform_random_in_hand(&mut state, P0, CardId::new(99), &ctx).is_failed());
        transform_random_in_hand(&mut state, P0, CardId::new(2), &ctx);
        let card = &state.player(P0).hand[0];
        assert_eq!((card.id, card.card_id), (id, CardId::new(2)));
    }
}
