//! Discover: the one point where resolution waits on the player.
//!
//! Opening a Discover writes a `Discovery` into the game state and stops
//! the current chain; whatever the chain still had to do is parked as the
//! `continuation`. `Discovery::resume` consumes the player's pick against
//! the live state, adds it to hand, and runs the continuation.
//!
//! Only one Discover is presented at a time. One opened while another is
//! pending (two Discover deathrattles in one wave) waits in
//! `GameState::queued_discoveries` with its own continuation and is
//! presented once the earlier choice and its continuation are done.

use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::context::{EffectContext, ResolverContext};
use super::dispatcher::{EffectDispatcher, ResolveResult};
use super::effect::{CardPool, EffectDescriptor};
use super::handlers::zones::pool_cards;
use crate::cards::CardId;
use crate::core::{
    AnimationKind, AnimationPayload, GameState, InstanceId, LogEventKind, PlayerId, RulesError,
    TargetRef,
};
use crate::zones::ZoneManager;

/// A pending Discover choice.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Discovery {
    pub active: bool,
    pub options: Vec<CardId>,
    /// The player choosing.
    pub player: PlayerId,
    pub source: Option<InstanceId>,
    pub source_card: Option<CardId>,
    pub target: Option<TargetRef>,
    /// Effects left to resolve after the choice.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub continuation: Option<EffectDescriptor>,
}

impl Discovery {
    /// Offer up to `count` distinct cards from `pool`.
    ///
    /// An empty pool resolves as skipped without suspending.
    pub fn open(
        state: &mut GameState,
        pool: &CardPool,
        count: Option<usize>,
        ectx: &EffectContext,
        ctx: &ResolverContext,
    ) -> ResolveResult {
        let candidates: Vec<CardId> = pool_cards(pool, ctx).iter().map(|d| d.id).collect();
        let amount = count.unwrap_or(ctx.config.discover_options);
        let options = state.rng.choose_distinct(&candidates, amount);
        if options.is_empty() {
            return ResolveResult::Skipped;
        }

        info!("{} discovers from {} option(s)", ectx.controller, options.len());
        let discovery = Discovery {
            active: true,
            options: options.clone(),
            player: ectx.controller,
            source: ectx.source,
            source_card: ectx.source_card,
            target: ectx.target,
            continuation: None,
        };
        if state.discovery.active {
            debug!("a Discover is already pending; queued behind it");
            state.queued_discoveries.push_back(discovery);
        } else {
            state.discovery = discovery;
        }

        let names: Vec<String> = options.iter().map(|c| ctx.card_name(*c)).collect();
        let mut event = ctx
            .event(
                state,
                LogEventKind::Discover,
                ectx.controller,
                format!("{} is discovering: {}", ectx.controller, names.join(", ")),
            )
            .with_value(options.len() as i32);
        if let Some(card) = ectx.source_card {
            event = event.with_card(card);
        }
        state.log.push(event);
        for card in options {
            ctx.sink
                .queue_animation(AnimationKind::Discover, AnimationPayload::card(card));
        }
        ResolveResult::Success
    }

    /// Discovers waiting on a choice, the presented one included.
    #[must_use]
    pub fn pending(state: &GameState) -> usize {
        usize::from(state.discovery.active) + state.queued_discoveries.len()
    }

    /// Park `effect` on the most recently opened Discover, after whatever
    /// is already parked there.
    pub(crate) fn defer(state: &mut GameState, effect: EffectDescriptor) {
        let latest = match state.queued_discoveries.len().checked_sub(1) {
            Some(last) => state.queued_discoveries.get_mut(last),
            None => Some(&mut state.discovery),
        };
        if let Some(discovery) = latest {
            discovery.continuation = Some(match discovery.continuation.take() {
                Some(existing) => existing.then(effect),
                None => effect,
            });
        }
    }

    /// Resolve the pending choice against the current state.
    ///
    /// `None` declines: nothing is added to hand. A choice outside the
    /// offered options is rejected and the Discover stays open. Either
    /// way a valid call clears the Discover and runs the continuation,
    /// then presents the next queued Discover if nothing newer took its
    /// place.
    pub fn resume(
        state: &mut GameState,
        choice: Option<CardId>,
        ctx: &ResolverContext,
    ) -> Result<(), RulesError> {
        if !state.discovery.active {
            return Err(RulesError::NoDiscoveryPending);
        }
        if let Some(card) = choice {
            if !state.discovery.options.contains(&card) {
                return Err(RulesError::InvalidChoice { card });
            }
        }

        let pending = std::mem::take(&mut state.discovery);
        let player = pending.player;

        match choice {
            Some(card) => {
                let name = ctx.card_name(card);
                if let Some(def) = ctx.definition(card) {
                    ZoneManager::add_to_hand(state, player, &def, ctx);
                } else {
                    log::warn!("discovered {} is not in the catalog", card);
                }
                info!("{} discovered {}", player, name);
                let event = ctx
                    .event(state, LogEventKind::Discover, player, format!("{} chose {}", player, name))
                    .with_card(card);
                state.log.push(event);
            }
            None => {
                info!("{} declined to discover", player);
                ctx.log(state, LogEventKind::Discover, player, format!("{} made no choice", player));
            }
        }

        if let Some(continuation) = pending.continuation {
            let mut ectx = EffectContext::new(player).with_optional_target(pending.target);
            ectx.source = pending.source;
            ectx.source_card = pending.source_card;
            EffectDispatcher::apply(state, &continuation, &ectx, ctx);
        }
        if !state.discovery.active {
            if let Some(next) = state.queued_discoveries.pop_front() {
                info!("{} has a queued Discover", next.player);
                state.discovery = next;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardCatalog, CardDefinition};
    use crate::core::{NullSink, RulesConfig};

    const P0: PlayerId = PlayerId::FIRST;

    fn catalog() -> CardCatalog {
        (1..=5)
            .map(|i| CardDefinition::minion(CardId::new(i), format!("Minion {}", i), i as i32, 1, 1))
            .collect()
    }

    #[test]
    fn test_open_offers_distinct_options() {
        let (catalog, config) = (catalog(), RulesConfig::default());
        let ctx = ResolverContext::new(&catalog, &config, &NullSink);
        let mut state = GameState::new(9, 30);

        Discovery::open(&mut state, &CardPool::minions(), None, &EffectContext::new(P0), &ctx);
        let mut options = state.discovery.options.clone();
        assert!(state.discovery.active);
        assert_eq!(options.len(), 3);
        options.sort();
        options.dedup();
        assert_eq!(options.len(), 3);
    }

    #[test]
    fn test_resume_adds_choice() {
        let (catalog, config) = (catalog(), RulesConfig::default());
        let ctx = ResolverContext::new(&catalog, &config, &NullSink);
        let mut state = GameState::new(9, 30);
        Discovery::open(&mut state, &CardPool::minions(), None, &EffectContext::new(P0), &ctx);
        let pick = state.discovery.options[1];

        Discovery::resume(&mut state, Some(pick), &ctx).unwrap();
        assert!(!state.discovery.active);
        assert_eq!(state.player(P0).hand.len(), 1);
        assert_eq!(state.player(P0).hand[0].card_id, pick);
    }

    #[test]
    fn test_invalid_choice_keeps_discovery() {
        let (catalog, config) = (catalog(), RulesConfig::default());
        let ctx = ResolverContext::new(&catalog, &config, &NullSink);
        let mut state = GameState::new(9, 30);
        Discovery::open(&mut state, &CardPool::minions().with_cost(1, 1), Some(3), &EffectContext::new(P0), &ctx);

        let err = Discovery::resume(&mut state, Some(CardId::new(5)), &ctx);
        assert_eq!(err, Err(RulesError::InvalidChoice { card: CardId::new(5) }));
        assert!(state.discovery.active);
    }

    #[test]
    fn test_continuation_runs_after_choice() {
        let (catalog, config) = (catalog(), RulesConfig::default());
        let ctx = ResolverContext::new(&catalog, &config, &NullSink);
        let mut state = GameState::new(9, 30).with_deck(P0, [CardId::new(1)]);
        Discovery::open(&mut state, &CardPool::minions(), None, &EffectContext::new(P0), &ctx);
        Discovery::defer(&mut state, EffectDescriptor::draw(1));

        Discovery::resume(&mut state, None, &ctx).unwrap();
        assert_eq!(state.player(P0).hand.len(), 1);
        assert!(state.player(P0).deck.is_empty());
    }

    #[test]
    fn test_second_discover_waits_for_first() {
        let (catalog, config) = (catalog(), RulesConfig::default());
        let ctx = ResolverContext::new(&catalog, &config, &NullSink);
        let mut state = GameState::new(9, 30).with_deck(P0, [CardId::new(1), CardId::new(2)]);
        let ectx = EffectContext::new(P0);

        Discovery::open(&mut state, &CardPool::minions(), None, &ectx, &ctx);
        Discovery::defer(&mut state, EffectDescriptor::draw(1));
        let first = state.discovery.options.clone();
        Discovery::open(&mut state, &CardPool::minions(), None, &ectx, &ctx);
        Discovery::defer(&mut state, EffectDescriptor::draw(1));
        assert_eq!(Discovery::pending(&state), 2);
        assert_eq!(state.discovery.options, first);
        assert_eq!(state.player(P0).deck.len(), 2);

        Discovery::resume(&mut state, Some(first[0]), &ctx).unwrap();
        assert!(state.discovery.active);
        assert_eq!(Discovery::pending(&state), 1);
        assert_eq!(state.player(P0).hand.len(), 2);
        assert_eq!(state.player(P0).deck.len(), 1);

        Discovery::resume(&mut state, None, &ctx).unwrap();
        assert_eq!(Discovery::pending(&state), 0);
        assert_eq!(state.player(P0).hand.len(), 3);
        assert!(state.player(P0).deck.is_empty());
    }

    #[test]
    fn test_resume_without_discovery() {
        let (catalog, config) = (catalog(), RulesConfig::default());
        let ctx = ResolverContext::new(&catalog, &config, &NullSink);
        let mut state = GameState::new(9, 30);
        assert_eq!(Discovery::resume(&mut state, None, &ctx), Err(RulesError::NoDiscoveryPending));
    }
}
