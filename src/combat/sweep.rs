//! Death sweep: mark, then drain.
//!
//! `mark` moves every battlefield minion at or below zero health to its
//! graveyard through `ZoneManager` and queues its deathrattles on `GameState::pending_deathrattles`.
//! `drain` then runs the queue in waves: each pass takes everything queued
//! so far, and any minions those deathrattles kill are queued for the next
//! pass. Minions that die together therefore resolve together.
//!
//! The drain is guarded by `GameState::draining`: a deathrattle's own
//! trailing sweep only marks, and the outer loop picks up the new deaths.
//! After `deathrattle_pass_limit` passes the queue is dropped and the game
//! continues from whatever state was reached.

use log::{debug, warn};

use crate::cards::{CardInstance, Keyword};
use crate::core::{
    ActivityKind, AnimationKind, AnimationPayload, GameState, LogEventKind, PendingDeathrattle,
    PlayerId, RulesError, TargetRef,
};
use crate::effects::{EffectContext, EffectDescriptor, EffectDispatcher, ResolverContext};
use crate::zones::{Zone, ZoneManager};

/// What one `remove_dead` call did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Minions moved to a graveyard by this call's own scans.
    pub deaths: usize,
    /// Deathrattles executed.
    pub deathrattles_run: usize,
    /// Drain passes run.
    pub passes: usize,
    /// The drain hit its pass limit.
    pub halted: bool,
}

impl SweepReport {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.deaths == 0 && self.deathrattles_run == 0
    }

    /// `RecursionLimit` when the drain was cut short.
    #[must_use]
    pub fn limit_error(&self) -> Option<RulesError> {
        self.halted.then_some(RulesError::RecursionLimit { passes: self.passes })
    }
}

/// Removes dead minions and resolves their deathrattles.
pub struct DeathSweeper;

impl DeathSweeper {
    /// Sweep both battlefields and drain the deathrattle queue.
    ///
    /// A second call with no damage in between does nothing.
    pub fn remove_dead(state: &mut GameState, ctx: &ResolverContext) -> SweepReport {
        let deaths = Self::mark(state, ctx);
        let mut report = Self::drain(state, ctx);
        report.deaths += deaths;
        report
    }

    /// Move dead minions to their graveyards and queue deathrattles.
    ///
    /// The turn owner's side is scanned first, each side in board order.
    /// Returns the number of minions moved.
    pub fn mark(state: &mut GameState, ctx: &ResolverContext) -> usize {
        let mut deaths = 0;
        let sides = [state.turn_owner, state.turn_owner.opponent()];

        for side in sides {
            let dead: Vec<CardInstance> = state.players[side]
                .battlefield
                .iter()
                .filter(|m| m.is_dead())
                .cloned()
                .collect();

            for minion in dead {
                let moved =
                    ZoneManager::move_card(state, minion.id, Zone::Battlefield, Zone::Graveyard, side, ctx);
                if moved.is_none() {
                    continue;
                }
                deaths += 1;
                let name = ctx.card_name(minion.card_id);
                debug!("{} ({}) died", name, minion.id);

                let event = ctx
                    .event(state, LogEventKind::Death, side, format!("{} died", name))
                    .with_card(minion.card_id)
                    .with_target(minion.id);
                state.log.push(event);
                ctx.sink.queue_animation(
                    AnimationKind::Death,
                    AnimationPayload::on(TargetRef::Minion(minion.id)),
                );
                ctx.sink
                    .log_activity(ActivityKind::Death, side, &format!("{} died", name));

                Self::queue_deathrattle(state, side, &minion, ctx);
            }
        }
        deaths
    }

    /// Queue the printed deathrattle, then every granted one in grant order.
    fn queue_deathrattle(
        state: &mut GameState,
        controller: PlayerId,
        minion: &CardInstance,
        ctx: &ResolverContext,
    ) {
        let def = ctx.definition(minion.card_id);
        let effects: Vec<EffectDescriptor> = match def.as_deref() {
            Some(def) => minion.deathrattles(def).cloned().collect(),
            // Granted deathrattles still fire without a definition.
            None => minion.granted_deathrattles.clone(),
        };
        if effects.is_empty() {
            if let Some(def) = def.filter(|d| minion.has_keyword(d, Keyword::Deathrattle)) {
                warn!(
                    "{} ({}) has the Deathrattle keyword but no deathrattle effect",
                    def.name, def.id
                );
            }
            return;
        }
        for effect in effects {
            state.pending_deathrattles.push_back(PendingDeathrattle {
                instance: minion.id,
                card_id: minion.card_id,
                controller,
                effect,
            });
        }
    }

    /// Run queued deathrattles in waves until the queue is empty or the
    /// pass limit is reached.
    ///
    /// Re-entrant calls return immediately; the outermost drain owns the
    /// queue.
    pub fn drain(state: &mut GameState, ctx: &ResolverContext) -> SweepReport {
        let mut report = SweepReport::default();
        if state.draining {
            return report;
        }
        state.draining = true;

        let mut passes = 0;
        while !state.pending_deathrattles.is_empty() {
            if passes >= ctx.config.deathrattle_pass_limit {
                let dropped = state.pending_deathrattles.len();
                let err = RulesError::RecursionLimit { passes };
                warn!("{}; {} deathrattle(s) dropped", err, dropped);
                state.pending_deathrattles.clear();
                let actor = state.turn_owner;
                let event = ctx
                    .event(state, LogEventKind::Effect, actor, err.to_string())
                    .with_value(dropped as i32);
                state.log.push(event);
                report.halted = true;
                break;
            }
            passes += 1;
            report.passes = passes;

            let wave = std::mem::take(&mut state.pending_deathrattles);
            for pending in wave {
                Self::run_deathrattle(state, &pending, ctx);
                report.deathrattles_run += 1;
            }
            report.deaths += Self::mark(state, ctx);
        }

        state.draining = false;
        report
    }

    fn run_deathrattle(state: &mut GameState, pending: &PendingDeathrattle, ctx: &ResolverContext) {
        let name = ctx.card_name(pending.card_id);
        debug!("resolving deathrattle of {} ({})", name, pending.instance);

        let event = ctx
            .event(
                state,
                LogEventKind::Deathrattle,
                pending.controller,
                format!("{}'s deathrattle triggers", name),
            )
            .with_card(pending.card_id)
            .with_target(pending.instance);
        state.log.push(event);

        let effect_ctx =
            EffectContext::new(pending.controller).with_source(pending.instance, pending.card_id);
        EffectDispatcher::apply(state, &pending.effect, &effect_ctx, ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardCatalog, CardDefinition, CardId, CardInstance};
    use crate::core::{InstanceId, NullSink, RulesConfig};
    use crate::effects::{EffectDescriptor, EffectKind};

    const P0: PlayerId = PlayerId::FIRST;
    const P1: PlayerId = PlayerId::SECOND;

    fn catalog() -> CardCatalog {
        [
            CardDefinition::minion(CardId::new(1), "Wisp", 0, 1, 1),
            CardDefinition::minion(CardId::new(2), "Harvest Golem", 3, 2, 3)
                .with_deathrattle(EffectDescriptor::summon(CardId::new(1), 1)),
            CardDefinition::minion(CardId::new(3), "Broken Totem", 1, 1, 1)
                .with_keyword(Keyword::Deathrattle),
        ]
        .into_iter()
        .collect()
    }

    fn place(state: &mut GameState, catalog: &CardCatalog, player: PlayerId, card: u32) -> InstanceId {
        let id = state.alloc_instance();
        let def = catalog.by_id(CardId::new(card)).unwrap();
        state.players[player]
            .battlefield
            .push_back(CardInstance::new(id, def, player));
        id
    }

    #[test]
    fn test_dead_minions_go_to_graveyard() {
        let (catalog, config) = (catalog(), RulesConfig::default());
        let ctx = ResolverContext::new(&catalog, &config, &NullSink);
        let mut state = GameState::new(1, 30);
        let a = place(&mut state, &catalog, P0, 1);
        let b = place(&mut state, &catalog, P1, 1);
        state.minion_mut(a).unwrap().health = 0;
        state.minion_mut(b).unwrap().health = -4;

        let report = DeathSweeper::remove_dead(&mut state, &ctx);
        assert_eq!(report.deaths, 2);
        assert!(state.player(P0).battlefield.is_empty());
        assert_eq!(state.player(P1).graveyard.len(), 1);
        assert_eq!(state.log.count(LogEventKind::Death), 2);
    }

    #[test]
    fn test_second_sweep_is_noop() {
        let (catalog, config) = (catalog(), RulesConfig::default());
        let ctx = ResolverContext::new(&catalog, &config, &NullSink);
        let mut state = GameState::new(1, 30);
        let a = place(&mut state, &catalog, P0, 2);
        state.minion_mut(a).unwrap().health = 0;

        DeathSweeper::remove_dead(&mut state, &ctx);
        let log_len = state.log.len();
        let report = DeathSweeper::remove_dead(&mut state, &ctx);
        assert!(report.is_empty());
        assert_eq!(state.log.len(), log_len);
    }

    #[test]
    fn test_deathrattle_summons() {
        let (catalog, config) = (catalog(), RulesConfig::default());
        let ctx = ResolverContext::new(&catalog, &config, &NullSink);
        let mut state = GameState::new(1, 30);
        let golem = place(&mut state, &catalog, P0, 2);
        state.minion_mut(golem).unwrap().health = 0;

        let report = DeathSweeper::remove_dead(&mut state, &ctx);
        assert_eq!(report.deathrattles_run, 1);
        assert_eq!(state.player(P0).battlefield.len(), 1);
        assert_eq!(state.player(P0).battlefield[0].card_id, CardId::new(1));
        assert!(state.pending_deathrattles.is_empty());
        assert!(!state.draining);
    }

    #[test]
    fn test_keyword_without_effect_is_not_queued() {
        let (catalog, config) = (catalog(), RulesConfig::default());
        let ctx = ResolverContext::new(&catalog, &config, &NullSink);
        let mut state = GameState::new(1, 30);
        let totem = place(&mut state, &catalog, P0, 3);
        state.minion_mut(totem).unwrap().health = 0;

        let report = DeathSweeper::remove_dead(&mut state, &ctx);
        assert_eq!(report.deaths, 1);
        assert_eq!(report.deathrattles_run, 0);
    }

    #[test]
    fn test_silenced_minion_has_no_deathrattle() {
        let (catalog, config) = (catalog(), RulesConfig::default());
        let ctx = ResolverContext::new(&catalog, &config, &NullSink);
        let mut state = GameState::new(1, 30);
        let golem = place(&mut state, &catalog, P0, 2);
        let def = catalog.by_id(CardId::new(2)).unwrap().clone();
        let minion = state.minion_mut(golem).unwrap();
        minion.silence(&def);
        minion.health = 0;

        let report = DeathSweeper::remove_dead(&mut state, &ctx);
        assert_eq!(report.deathrattles_run, 0);
        assert!(state.player(P0).battlefield.is_empty());
    }

    #[test]
    fn test_granted_deathrattles_run_after_printed() {
        let (catalog, config) = (catalog(), RulesConfig::default());
        let ctx = ResolverContext::new(&catalog, &config, &NullSink);
        let mut state = GameState::new(1, 30);
        let golem = place(&mut state, &catalog, P0, 2);
        let minion = state.minion_mut(golem).unwrap();
        minion.granted_deathrattles.push(EffectDescriptor::new(EffectKind::GainArmor { amount: 2 }));
        minion.granted_deathrattles.push(EffectDescriptor::new(EffectKind::GainArmor { amount: 3 }));
        minion.health = 0;

        let report = DeathSweeper::remove_dead(&mut state, &ctx);
        assert_eq!(report.deathrattles_run, 3);
        assert_eq!(state.player(P0).armor, 5);
        assert_eq!(state.player(P0).battlefield.len(), 1);
        assert_eq!(state.log.count(LogEventKind::Deathrattle), 3);
    }
}
