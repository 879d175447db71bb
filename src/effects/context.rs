//! Resolution contexts.
//!
//! `ResolverContext` is the read-only environment every rules component
//! works in: the catalog, the limits, and the presentation sink. It is
//! passed by reference down every call chain instead of living in globals.
//!
//! `EffectContext` describes one effect application: who controls it,
//! which instance and card it came from, and the target the player chose.

use std::sync::Arc;

use crate::cards::{CardCatalog, CardDefinition, CardId};
use crate::core::{
    EventSink, GameLog, GameState, InstanceId, LogEvent, LogEventKind, NullSink, PlayerId,
    RulesConfig, TargetRef,
};

/// Environment shared by all rules components.
pub struct ResolverContext<'a> {
    pub catalog: &'a CardCatalog,
    pub config: &'a RulesConfig,
    pub sink: &'a dyn EventSink,
}

impl<'a> ResolverContext<'a> {
    pub fn new(catalog: &'a CardCatalog, config: &'a RulesConfig, sink: &'a dyn EventSink) -> Self {
        Self {
            catalog,
            config,
            sink,
        }
    }

    /// Context with a silent sink, for tests and headless simulation.
    pub fn headless(catalog: &'a CardCatalog, config: &'a RulesConfig) -> Self {
        Self::new(catalog, config, &NullSink)
    }

    /// Look up a definition, cloning the `Arc` so the state stays free to
    /// mutate.
    #[must_use]
    pub fn definition(&self, card: CardId) -> Option<Arc<CardDefinition>> {
        self.catalog.by_id(card).cloned()
    }

    /// Build a log event stamped with the current turn and sink time.
    #[must_use]
    pub fn event(
        &self,
        state: &GameState,
        kind: LogEventKind,
        player: PlayerId,
        text: impl Into<String>,
    ) -> LogEvent {
        GameLog::event(kind, player, text, state.turn_number, self.sink.now_millis())
    }

    /// Append a plain event to the game log.
    pub fn log(&self, state: &mut GameState, kind: LogEventKind, player: PlayerId, text: impl Into<String>) {
        let event = self.event(state, kind, player, text);
        state.log.push(event);
    }

    /// Display name for a card id, falling back to the id itself.
    #[must_use]
    pub fn card_name(&self, card: CardId) -> String {
        self.catalog
            .by_id(card)
            .map_or_else(|| card.to_string(), |d| d.name.clone())
    }
}

/// Who and what an effect application is about.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EffectContext {
    pub controller: PlayerId,
    /// The instance the effect belongs to (battlecry/deathrattle minion,
    /// the spell being cast).
    pub source: Option<InstanceId>,
    pub source_card: Option<CardId>,
    pub target: Option<TargetRef>,
}

impl EffectContext {
    #[must_use]
    pub fn new(controller: PlayerId) -> Self {
        Self {
            controller,
            source: None,
            source_card: None,
            target: None,
        }
    }

    #[must_use]
    pub fn with_source(mut self, instance: InstanceId, card: CardId) -> Self {
        self.source = Some(instance);
        self.source_card = Some(card);
        self
    }

    #[must_use]
    pub fn with_card(mut self, card: CardId) -> Self {
        self.source_card = Some(card);
        self
    }

    #[must_use]
    pub fn with_target(mut self, target: TargetRef) -> Self {
        self.target = Some(target);
        self
    }

    #[must_use]
    pub fn with_optional_target(mut self, target: Option<TargetRef>) -> Self {
        self.target = target;
        self
    }

    /// The opposing player.
    #[must_use]
    pub fn opponent(&self) -> PlayerId {
        self.controller.opponent()
    }
}
