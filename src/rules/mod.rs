//! The action-level surface of the engine.
//!
//! `RulesEngine` owns nothing but a catalog reference, the limits, and a
//! sink. Game state is passed in and handed back, so an orchestrator can
//! keep snapshots (cheap, since the state is built on persistent
//! collections) and replay from any of them.

pub mod engine;

pub use engine::{GameResult, RulesEngine};
