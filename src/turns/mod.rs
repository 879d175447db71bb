//! Turn boundaries.
//!
//! - `TurnEffect`: the start/end-of-turn descriptor a card definition may carry
//! - `TurnCycleProcessor`: runs those triggers across the acting player's
//!   battlefield, plus the per-turn upkeep (mana, poison, flag resets,
//!   borrowed minions going home)
//!
//! A handful of cards predate `TurnEffect` and are still recognized by id;
//! see `FISHING_MASTER`, `CLOCKWORK_AUTOMATON`, and `JORMUNGANDRS_COIL`.

mod processor;

pub use processor::{
    TurnCycleProcessor, TurnEffect, TurnPhase, CLOCKWORK_AUTOMATON, FISHING_MASTER,
    JORMUNGANDRS_COIL,
};
