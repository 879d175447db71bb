//! Instance identification.
//!
//! Every live card occurrence (in hand, on the battlefield, or in the
//! graveyard) has a unique `InstanceId`. Deck entries are definitions and
//! receive an id only when they are drawn.
//!
//! Heroes are not instances. Anything that can be damaged or targeted is
//! addressed through `TargetRef`, which is either a hero (by player) or a
//! minion (by instance id).
//!
//! ## Usage
//!
//! ```
//! use ccg_rules::core::{InstanceId, PlayerId, TargetRef};
//!
//! let minion = TargetRef::Minion(InstanceId::new(12));
//! let hero = TargetRef::Hero(PlayerId::new(1));
//!
//! assert!(minion.is_minion());
//! assert_eq!(hero.as_hero(), Some(PlayerId::new(1)));
//! ```

use serde::{Deserialize, Serialize};

use super::player::PlayerId;

/// Unique identifier for a card instance.
///
/// Ids are allocated monotonically by `GameState::alloc_instance` and are
/// never reused within a game, so a stale id simply stops resolving.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct InstanceId(pub u32);

impl InstanceId {
    /// Create an instance id from a raw value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// The id following this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::fmt::Display for InstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Instance({})", self.0)
    }
}

/// Anything that can be targeted, damaged, or healed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum TargetRef {
    /// A player's hero.
    Hero(PlayerId),
    /// A minion on some battlefield.
    Minion(InstanceId),
}

impl TargetRef {
    /// Is this a hero reference?
    #[must_use]
    pub const fn is_hero(self) -> bool {
        matches!(self, TargetRef::Hero(_))
    }

    /// Is this a minion reference?
    #[must_use]
    pub const fn is_minion(self) -> bool {
        matches!(self, TargetRef::Minion(_))
    }

    /// The hero's player, if this is a hero.
    #[must_use]
    pub const fn as_hero(self) -> Option<PlayerId> {
        match self {
            TargetRef::Hero(p) => Some(p),
            TargetRef::Minion(_) => None,
        }
    }

    /// The instance id, if this is a minion.
    #[must_use]
    pub const fn as_minion(self) -> Option<InstanceId> {
        match self {
            TargetRef::Minion(id) => Some(id),
            TargetRef::Hero(_) => None,
        }
    }
}

impl std::fmt::Display for TargetRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetRef::Hero(p) => write!(f, "Hero of {}", p),
            TargetRef::Minion(id) => write!(f, "{}", id),
        }
    }
}
