//! Effect system for card abilities.
//!
//! - `EffectDescriptor` / `EffectKind`: the data form of an ability
//! - `TargetSpec` / `TargetResolver`: legal targets for a player choice
//! - `EffectDispatcher`: executes descriptors against game state
//! - `Discovery`: the pending Discover choice and its resumption
//!
//! ## Resolution
//!
//! Every ability goes through `EffectDispatcher::apply`, which resolves
//! the selector, runs the handler for the kind, then the secondary chain,
//! then a death sweep. Handlers mutate the `GameState` they are given;
//! callers that need the previous state keep a clone, which is cheap
//! because every collection is persistent.

mod context;
mod discover;
mod dispatcher;
mod effect;
mod handlers;
mod targeting;

pub use context::{EffectContext, ResolverContext};
pub use discover::Discovery;
pub use dispatcher::{EffectDispatcher, ResolveResult};
pub use effect::{CardPool, Condition, EffectDescriptor, EffectKind, Selector, Side, Status};
pub use targeting::{Allegiance, TargetFilter, TargetKind, TargetResolver, TargetSpec};
