//! Start- and end-of-turn processing.
//!
//! Triggers run in board order over a snapshot of the acting player's
//! minion ids. Each minion is looked up again before it acts, because an
//! earlier trigger in the same pass may have destroyed, bounced, or stolen
//! it. Silenced minions have no text and never trigger.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::cards::CardId;
use crate::combat::{CombatResolver, DeathSweeper};
use crate::core::{
    ActivityKind, CostScope, GameState, InstanceId, LogEventKind, PlayerId, TargetRef,
};
use crate::effects::{
    EffectContext, EffectDescriptor, EffectDispatcher, EffectKind, ResolveResult,
    ResolverContext, Selector, Side,
};
use crate::zones::{Zone, ZoneManager};

/// 50% chance to draw a card at the start of its controller's turn.
pub const FISHING_MASTER: CardId = CardId::new(20607);

/// Swaps places with a random minion in hand at the start of turn.
pub const CLOCKWORK_AUTOMATON: CardId = CardId::new(5103);

/// Deals 1 damage to every enemy minion at the end of turn.
pub const JORMUNGANDRS_COIL: CardId = CardId::new(20621);

/// Which side of the turn boundary a trigger fires on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnPhase {
    Start,
    End,
}

/// A start- or end-of-turn trigger printed on a minion.
///
/// "Friendly" and "enemy" are relative to the minion's controller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TurnEffect {
    /// Heal every friendly minion.
    HealAll {
        #[serde(default = "one")]
        amount: i32,
    },
    BuffSelf {
        #[serde(default)]
        attack: i32,
        #[serde(default)]
        health: i32,
    },
    /// Buff one random other friendly minion.
    Buff {
        #[serde(default = "one")]
        attack: i32,
        #[serde(default = "one")]
        health: i32,
    },
    DestroyAllMinions,
    TransformRandomEnemy { into: CardId },
    /// Reduce the cost of every card in hand.
    ReduceCost {
        #[serde(default = "one")]
        amount: i32,
    },
    /// Sub-effects in order.
    Compound { effects: Vec<TurnEffect> },
    SummonToken {
        card: CardId,
        #[serde(default = "one_token")]
        count: u32,
    },
    /// Damage every enemy minion.
    Damage {
        #[serde(default = "one")]
        amount: i32,
    },
    /// `amount` single points of damage, each at a random living enemy minion.
    DamageSplitRandomly {
        #[serde(default = "one")]
        amount: i32,
    },
}

fn one() -> i32 {
    1
}

fn one_token() -> u32 {
    1
}

/// Cards whose turn behavior is keyed on their id rather than a
/// `TurnEffect`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LegacyTrigger {
    FishingMaster,
    ClockworkAutomaton,
    JormungandrsCoil,
}

impl LegacyTrigger {
    fn lookup(card: CardId, phase: TurnPhase) -> Option<Self> {
        match (card, phase) {
            (FISHING_MASTER, TurnPhase::Start) => Some(Self::FishingMaster),
            (CLOCKWORK_AUTOMATON, TurnPhase::Start) => Some(Self::ClockworkAutomaton),
            (JORMUNGANDRS_COIL, TurnPhase::End) => Some(Self::JormungandrsCoil),
            _ => None,
        }
    }
}

/// Runs turn-boundary triggers and upkeep.
pub struct TurnCycleProcessor;

impl TurnCycleProcessor {
    // === Upkeep ===

    /// Ready `player` for a new turn: one more mana crystal (capped),
    /// a full refill, and every minion awake with its attacks restored.
    pub fn refresh(state: &mut GameState, player: PlayerId, ctx: &ResolverContext) {
        let seat = &mut state.players[player];
        seat.max_mana = (seat.max_mana + 1).min(ctx.config.max_mana);
        seat.mana = seat.max_mana;
        seat.hero_attacks_this_turn = 0;
        for minion in seat.battlefield.iter_mut() {
            minion.flags.summoning_sick = false;
            minion.flags.attacks_this_turn = 0;
        }
        debug!("{} refreshed to {} mana", player, seat.max_mana);
    }

    /// Start of the turn owner's turn: minion triggers, then poison.
    pub fn start_of_turn(state: &mut GameState, ctx: &ResolverContext) {
        let player = state.turn_owner;
        let text = format!("Turn {}: {} begins", state.turn_number, player);
        ctx.log(state, LogEventKind::TurnStart, player, text);

        Self::run_triggers(state, player, TurnPhase::Start, ctx);
        Self::apply_poison(state, player, ctx);
    }

    /// End of the turn owner's turn: minion triggers, then the per-turn
    /// flags are cleared and borrowed minions go home.
    pub fn end_of_turn(state: &mut GameState, ctx: &ResolverContext) {
        let player = state.turn_owner;
        Self::run_triggers(state, player, TurnPhase::End, ctx);
        Self::clear_turn_flags(state, player);
        Self::return_borrowed(state, player, ctx);
        DeathSweeper::remove_dead(state, ctx);

        let text = format!("{} ends turn {}", player, state.turn_number);
        ctx.sink.log_activity(ActivityKind::TurnEnd, player, &text);
        ctx.log(state, LogEventKind::TurnEnd, player, text);
    }

    fn run_triggers(state: &mut GameState, player: PlayerId, phase: TurnPhase, ctx: &ResolverContext) {
        for id in state.minion_ids(player) {
            if state.is_game_over() {
                break;
            }
            let Some(minion) = state.players[player].battlefield.iter().find(|m| m.id == id) else {
                continue;
            };
            if minion.flags.silenced {
                continue;
            }
            let card = minion.card_id;
            let ectx = EffectContext::new(player).with_source(id, card);

            if let Some(legacy) = LegacyTrigger::lookup(card, phase) {
                Self::run_legacy(state, legacy, &ectx, ctx);
                continue;
            }
            let Some(def) = ctx.definition(card) else {
                continue;
            };
            let effect = match phase {
                TurnPhase::Start => def.start_of_turn.as_ref(),
                TurnPhase::End => def.end_of_turn.as_ref(),
            };
            if let Some(effect) = effect {
                debug!("{:?} of turn trigger on {}", phase, def.name);
                Self::apply(state, effect, &ectx, ctx);
            }
        }
    }

    // === Generic triggers ===

    /// Apply one turn effect on behalf of the minion in `ectx`.
    pub fn apply(
        state: &mut GameState,
        effect: &TurnEffect,
        ectx: &EffectContext,
        ctx: &ResolverContext,
    ) -> ResolveResult {
        let dispatch = |state: &mut GameState, kind: EffectKind| {
            EffectDispatcher::apply(state, &EffectDescriptor::new(kind), ectx, ctx)
        };
        match effect {
            TurnEffect::HealAll { amount } => dispatch(
                state,
                EffectKind::Heal { amount: *amount, targets: Selector::FriendlyMinions },
            ),
            TurnEffect::BuffSelf { attack, health } => dispatch(
                state,
                EffectKind::Buff { attack: *attack, health: *health, targets: Selector::Source },
            ),
            TurnEffect::Buff { attack, health } => {
                Self::buff_random_other(state, *attack, *health, ectx, ctx)
            }
            TurnEffect::DestroyAllMinions => {
                dispatch(state, EffectKind::Destroy { targets: Selector::AllMinions })
            }
            TurnEffect::TransformRandomEnemy { into } => dispatch(
                state,
                EffectKind::Transform { into: *into, targets: Selector::RandomEnemyMinion },
            ),
            TurnEffect::ReduceCost { amount } => {
                dispatch(state, EffectKind::ReduceHandCost { amount: *amount })
            }
            TurnEffect::Compound { effects } => {
                let results: Vec<ResolveResult> = effects
                    .iter()
                    .map(|e| Self::apply(state, e, ectx, ctx))
                    .collect();
                ResolveResult::combine(results)
            }
            TurnEffect::SummonToken { card, count } => dispatch(
                state,
                EffectKind::Summon { card: *card, count: *count, side: Side::Friendly },
            ),
            TurnEffect::Damage { amount } => dispatch(
                state,
                EffectKind::Damage { amount: *amount, targets: Selector::EnemyMinions },
            ),
            TurnEffect::DamageSplitRandomly { amount } => {
                Self::split_damage(state, *amount, ectx, ctx)
            }
        }
    }

    fn buff_random_other(
        state: &mut GameState,
        attack: i32,
        health: i32,
        ectx: &EffectContext,
        ctx: &ResolverContext,
    ) -> ResolveResult {
        let others: Vec<InstanceId> = state
            .minion_ids(ectx.controller)
            .into_iter()
            .filter(|id| Some(*id) != ectx.source)
            .collect();
        let Some(&target) = state.rng.choose(&others) else {
            debug!("no other friendly minion to buff");
            return ResolveResult::Skipped;
        };
        let Some(minion) = state.minion_mut(target) else {
            return ResolveResult::Skipped;
        };
        minion.enchant(ectx.source_card, attack, health);
        let name = ctx.card_name(minion.card_id);
        let event = ctx
            .event(
                state,
                LogEventKind::Buff,
                ectx.controller,
                format!("{} gets +{}/+{}", name, attack, health),
            )
            .with_target(target);
        state.log.push(event);
        ResolveResult::Success
    }

    fn split_damage(
        state: &mut GameState,
        amount: i32,
        ectx: &EffectContext,
        ctx: &ResolverContext,
    ) -> ResolveResult {
        let enemy = ectx.opponent();
        let source = ectx.source.map(TargetRef::Minion);
        let mut landed = 0;
        for _ in 0..amount.max(0) {
            let living: Vec<TargetRef> = state.players[enemy]
                .battlefield
                .iter()
                .filter(|m| !m.is_dead())
                .map(|m| TargetRef::Minion(m.id))
                .collect();
            let Some(&target) = state.rng.choose(&living) else {
                break;
            };
            CombatResolver::apply_damage(state, target, 1, source, ctx);
            landed += 1;
        }
        if landed == 0 {
            return ResolveResult::Skipped;
        }
        DeathSweeper::remove_dead(state, ctx);
        let name = ectx.source_card.map(|c| ctx.card_name(c)).unwrap_or_default();
        let text = format!("{} dealt {} damage split among enemy minions", name, landed);
        Self::log_effect(state, ectx, text, ctx);
        ResolveResult::Success
    }

    // === Legacy triggers ===

    fn run_legacy(
        state: &mut GameState,
        trigger: LegacyTrigger,
        ectx: &EffectContext,
        ctx: &ResolverContext,
    ) {
        debug!("legacy trigger {:?}", trigger);
        match trigger {
            LegacyTrigger::FishingMaster => Self::fishing_master(state, ectx, ctx),
            LegacyTrigger::ClockworkAutomaton => Self::clockwork_automaton(state, ectx, ctx),
            LegacyTrigger::JormungandrsCoil => Self::jormungandrs_coil(state, ectx, ctx),
        }
    }

    fn fishing_master(state: &mut GameState, ectx: &EffectContext, ctx: &ResolverContext) {
        let player = ectx.controller;
        if state.rng.chance(0.5) {
            let text = format!("Fishing Master caught an extra card for {}", player);
            Self::log_effect(state, ectx, text, ctx);
            ZoneManager::draw(state, player, ctx);
        } else {
            Self::log_effect(state, ectx, "Fishing Master didn't catch anything this turn".to_string(), ctx);
        }
    }

    /// Swap the automaton with a random minion from hand, slot for slot.
    fn clockwork_automaton(state: &mut GameState, ectx: &EffectContext, ctx: &ResolverContext) {
        let player = ectx.controller;
        let Some(id) = ectx.source else {
            return;
        };
        let candidates: Vec<InstanceId> = state.players[player]
            .hand
            .iter()
            .filter(|c| {
                ctx.definition(c.card_id)
                    .map_or(false, |d| d.is_minion() && d.attack > 0 && d.health > 0)
            })
            .map(|c| c.id)
            .collect();
        let Some(&pick) = state.rng.choose(&candidates) else {
            let text = "Clockwork Automaton tried to swap but found no minions in hand".to_string();
            Self::log_effect(state, ectx, text, ctx);
            return;
        };

        let seat = &state.players[player];
        let (Some(board_index), Some(hand_index)) =
            (seat.position(Zone::Battlefield, id), seat.position(Zone::Hand, pick))
        else {
            return;
        };
        let Some(incoming_def) = seat.hand.get(hand_index).and_then(|c| ctx.definition(c.card_id)) else {
            return;
        };
        let outgoing_def = ectx.source_card.and_then(|c| ctx.definition(c));

        let seat = &mut state.players[player];
        let mut outgoing = seat.battlefield.remove(board_index);
        let mut incoming = seat.hand.remove(hand_index);
        if let Some(def) = &outgoing_def {
            outgoing.reset_to(def);
        }
        ZoneManager::enter_battlefield(&mut incoming, &incoming_def);
        seat.battlefield.insert(board_index, incoming);
        seat.hand.insert(hand_index, outgoing);

        let text = format!("Clockwork Automaton swapped places with {}", incoming_def.name);
        Self::log_effect(state, ectx, text, ctx);
    }

    fn jormungandrs_coil(state: &mut GameState, ectx: &EffectContext, ctx: &ResolverContext) {
        let targets: Vec<TargetRef> = state
            .minion_ids(ectx.opponent())
            .into_iter()
            .map(TargetRef::Minion)
            .collect();
        if targets.is_empty() {
            let text = "Jormungandr's Coil tried to deal damage, but found no enemy minions".to_string();
            Self::log_effect(state, ectx, text, ctx);
            return;
        }
        let text = "Jormungandr's Coil dealt 1 damage to all enemy minions".to_string();
        Self::log_effect(state, ectx, text, ctx);
        CombatResolver::deal_aoe(state, &targets, 1, ectx.source.map(TargetRef::Minion), ctx);
    }

    // === Status and flags ===

    fn apply_poison(state: &mut GameState, player: PlayerId, ctx: &ResolverContext) {
        let poisoned: Vec<TargetRef> = state.players[player]
            .battlefield
            .iter()
            .filter(|m| m.flags.poisoned)
            .map(|m| TargetRef::Minion(m.id))
            .collect();
        if poisoned.is_empty() {
            return;
        }
        debug!("{} poisoned minion(s) take damage", poisoned.len());
        CombatResolver::deal_aoe(state, &poisoned, ctx.config.poison_damage, None, ctx);
    }

    fn clear_turn_flags(state: &mut GameState, player: PlayerId) {
        let seat = &mut state.players[player];
        seat.hero_frozen = false;
        seat.hero_immune = false;
        seat.cards_played_this_turn = 0;
        seat.cost_modifiers.retain(|m| m.scope != CostScope::ThisTurn);
        for minion in seat.battlefield.iter_mut() {
            minion.flags.frozen = false;
            minion.flags.rush_only = false;
            minion.flags.immune = false;
        }
    }

    /// Send temporarily controlled minions back. One that cannot fit on
    /// its home battlefield is destroyed.
    fn return_borrowed(state: &mut GameState, player: PlayerId, ctx: &ResolverContext) {
        let borrowed: Vec<(InstanceId, PlayerId)> = state.players[player]
            .battlefield
            .iter()
            .filter_map(|m| m.return_to.map(|home| (m.id, home)))
            .collect();

        for (id, home) in borrowed {
            let Some(minion) = state.minion_mut(id) else {
                continue;
            };
            minion.return_to = None;
            let name = ctx.card_name(minion.card_id);
            if home == player {
                continue;
            }
            if ZoneManager::change_control(state, id, home, ctx) {
                let event = ctx
                    .event(state, LogEventKind::MindControl, home, format!("{} returns to {}", name, home))
                    .with_target(id);
                state.log.push(event);
            } else {
                CombatResolver::destroy_minion(state, id);
                let event = ctx
                    .event(
                        state,
                        LogEventKind::Effect,
                        player,
                        format!("{} has nowhere to return and is destroyed", name),
                    )
                    .with_target(id);
                state.log.push(event);
            }
        }
    }

    fn log_effect(state: &mut GameState, ectx: &EffectContext, text: String, ctx: &ResolverContext) {
        let mut event = ctx.event(state, LogEventKind::Effect, ectx.controller, text);
        if let Some(card) = ectx.source_card {
            event = event.with_card(card);
        }
        state.log.push(event);
    }
}
