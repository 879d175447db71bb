//! Card system: definitions, instances, keywords, and the catalog.
//!
//! ## Key Types
//!
//! - `CardId`: Identifier for card definitions
//! - `CardDefinition`: Static card data with effect descriptors
//! - `CardInstance`: Runtime card state (stats, flags, buffs)
//! - `Keyword` / `KeywordSet`: Keyword abilities
//! - `CardCatalog`: Read-only definition lookup

pub mod catalog;
pub mod definition;
pub mod instance;
pub mod keywords;

pub use catalog::CardCatalog;
pub use definition::{CardDefinition, CardId, CardType, Rarity};
pub use instance::{CardInstance, Enchantment, StatusFlags};
pub use keywords::{Keyword, KeywordSet};
