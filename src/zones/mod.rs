//! Zone system for card locations.
//!
//! Each player owns four zones: deck, hand, battlefield, graveyard. The
//! deck stores card ids only; the other three store `CardInstance`s.
//!
//! ## Key Types
//!
//! - `Zone`: Zone identifier
//! - `ZoneManager`: Draws, summons, and every move between zones
//! - `ZonePosition`: Position specifier for ordered zones
//! - `DrawOutcome`: What a single draw did (drawn, burned, fatigue)

pub mod manager;

pub use manager::{DrawOutcome, Zone, ZoneManager, ZonePosition};
