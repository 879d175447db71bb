//! Core engine types: ids, players, state, actions, RNG, configuration,
//! the game log, errors, and the presentation sink.

pub mod entity;
pub mod player;
pub mod rng;
pub mod config;
pub mod action;
pub mod state;
pub mod game_log;
pub mod error;
pub mod sink;

pub use entity::{InstanceId, TargetRef};
pub use player::{PlayerId, PlayerMap};
pub use rng::{GameRng, GameRngState};
pub use config::RulesConfig;
pub use action::Action;
pub use state::{
    CostModifier, CostScope, GameState, PendingDeathrattle, Phase, PlayerState, Quest, Weapon,
};
pub use game_log::{GameLog, LogEvent, LogEventKind};
pub use error::RulesError;
pub use sink::{
    ActivityKind, AnimationKind, AnimationPayload, EventSink, NullSink, RecordingSink,
};
