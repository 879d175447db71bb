//! # ccg-rules
//!
//! A deterministic rules engine for a two-player collectible card game:
//! minions, spells, weapons, and hero cards played from a deck against an
//! opposing hero.
//!
//! ## Design Principles
//!
//! 1. **State In, State Out**: every operation takes a `GameState` and
//!    leaves a valid `GameState`. Rejected actions change nothing.
//!
//! 2. **Data-Driven Cards**: abilities are `EffectDescriptor` values in a
//!    `CardCatalog`, not code. New cards need no new handlers.
//!
//! 3. **Seeded Randomness**: all random choices draw from the state's
//!    `GameRng`, so a seed and an action list replay a game exactly.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: zones are `im` vectors, so cloning a
//!   state for undo or search is O(1).
//!
//! - **Presentation Sink**: animations and activity entries go to an
//!   `EventSink`; the rules never wait on it.
//!
//! ## Modules
//!
//! - `core`: ids, players, state, actions, RNG, configuration, log, errors
//! - `cards`: definitions, the catalog, and per-instance state
//! - `zones`: moving cards between deck, hand, battlefield, and graveyard
//! - `combat`: damage, healing, attacks, and the death sweep
//! - `effects`: effect descriptors, targeting, dispatch, and Discover
//! - `turns`: start/end-of-turn triggers and upkeep
//! - `rules`: `RulesEngine`, the entry point for player actions

pub mod core;
pub mod cards;
pub mod zones;
pub mod combat;
pub mod effects;
pub mod turns;
pub mod rules;

// Re-export commonly used types
pub use crate::core::{
    Action, GameLog, GameRng, GameState, InstanceId, LogEvent, LogEventKind, PlayerId,
    PlayerMap, RulesConfig, RulesError, TargetRef,
};

pub use crate::cards::{CardCatalog, CardDefinition, CardId, CardInstance, CardType, Keyword};

pub use crate::zones::{Zone, ZoneManager, ZonePosition};

pub use crate::combat::{CombatResolver, DeathSweeper};

pub use crate::effects::{
    Discovery, EffectContext, EffectDescriptor, EffectDispatcher, EffectKind, ResolveResult,
    ResolverContext, TargetResolver, TargetSpec,
};

pub use crate::turns::{TurnCycleProcessor, TurnEffect};

pub use crate::rules::{GameResult, RulesEngine};
