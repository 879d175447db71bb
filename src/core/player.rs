//! The two seats at the table.
//!
//! `PlayerId` names a seat; `PlayerMap` holds one value per seat and is
//! indexed directly by `PlayerId`, so `state.players[player]` reads the
//! way the rules talk about it.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// A seat. `FIRST` takes turn 1.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    pub const FIRST: PlayerId = PlayerId(0);
    pub const SECOND: PlayerId = PlayerId(1);

    /// Seat for a raw index; anything past 1 folds back onto a seat.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id % 2)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        (self.0 % 2) as usize
    }

    /// The other seat.
    ///
    /// ```
    /// use ccg_rules::core::PlayerId;
    ///
    /// assert_eq!(PlayerId::FIRST.opponent(), PlayerId::SECOND);
    /// assert_eq!(PlayerId::SECOND.opponent(), PlayerId::FIRST);
    /// ```
    #[must_use]
    pub const fn opponent(self) -> Self {
        Self(1 - (self.0 % 2))
    }

    /// Both seats, first player first.
    pub fn both() -> impl Iterator<Item = PlayerId> {
        [PlayerId::FIRST, PlayerId::SECOND].into_iter()
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// One value per seat.
///
/// ```
/// use ccg_rules::core::{PlayerId, PlayerMap};
///
/// let mut health: PlayerMap<i32> = PlayerMap::new(|_| 30);
/// health[PlayerId::SECOND] -= 4;
///
/// assert_eq!(health[PlayerId::FIRST], 30);
/// assert_eq!(health[PlayerId::SECOND], 26);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    seats: [T; 2],
}

impl<T> PlayerMap<T> {
    /// Build each seat's value from its id.
    pub fn new(factory: impl Fn(PlayerId) -> T) -> Self {
        Self {
            seats: [factory(PlayerId::FIRST), factory(PlayerId::SECOND)],
        }
    }

    /// Seats in turn order with their values.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        PlayerId::both().zip(self.seats.iter())
    }
}

impl<T: Default> Default for PlayerMap<T> {
    fn default() -> Self {
        Self::new(|_| T::default())
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &T {
        &self.seats[player.index()]
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut T {
        &mut self.seats[player.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seats() {
        assert_eq!(PlayerId::FIRST.index(), 0);
        assert_eq!(PlayerId::SECOND.index(), 1);
        assert_eq!(PlayerId::new(3), PlayerId::SECOND);
        assert_eq!(format!("{}", PlayerId::SECOND), "Player 1");
        for p in PlayerId::both() {
            assert_ne!(p, p.opponent());
            assert_eq!(p, p.opponent().opponent());
        }
    }

    #[test]
    fn test_map_indexing() {
        let mut mana: PlayerMap<i32> = PlayerMap::default();
        mana[PlayerId::FIRST] = 3;
        mana[PlayerId::SECOND] += 1;

        let pairs: Vec<_> = mana.iter().collect();
        assert_eq!(pairs, vec![(PlayerId::FIRST, &3), (PlayerId::SECOND, &1)]);
    }

    #[test]
    fn test_map_json() {
        let map: PlayerMap<i32> = PlayerMap::new(|p| p.index() as i32 + 1);
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"seats":[1,2]}"#);
        assert_eq!(serde_json::from_str::<PlayerMap<i32>>(&json).unwrap(), map);
    }
}
