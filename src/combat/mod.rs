//! Combat: damage application and the death sweep.
//!
//! ## Key Types
//!
//! - `CombatResolver`: hero/minion/AoE damage, healing, armor, attacks
//! - `Hit`: outcome of one damage application
//! - `DeathSweeper`: removes dead minions, drains deathrattles
//! - `SweepReport`: what a sweep did

pub mod damage;
pub mod sweep;

pub use damage::{CombatResolver, Hit};
pub use sweep::{DeathSweeper, SweepReport};
