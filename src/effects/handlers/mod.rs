//! Per-family effect handlers called from `EffectDispatcher`.
//!
//! Each handler receives already-resolved targets and returns a
//! `ResolveResult`. Handlers tolerate stale instance ids by skipping them.

pub(crate) mod control;
pub(crate) mod damage;
pub(crate) mod flags;
pub(crate) mod meta;
pub(crate) mod stats;
pub(crate) mod summon;
pub(crate) mod zones;
