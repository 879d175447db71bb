//! Seeded randomness for the rules.
//!
//! Deck shuffles, random targets, random summons, Discover offers, and
//! coin-flip triggers all draw from the one `GameRng` in `GameState`. A
//! seed plus the list of player actions therefore replays a game exactly,
//! and a cloned state carries its own independent copy of the stream.
//!
//! ```
//! use ccg_rules::core::GameRng;
//!
//! let mut a = GameRng::new(7);
//! let mut b = GameRng::new(7);
//! assert_eq!(a.below(100), b.below(100));
//! ```

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// ChaCha8 stream plus the seed it started from.
///
/// Serializes as a `GameRngState` (seed and word position), so a saved
/// game resumes mid-stream.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(into = "GameRngState", from = "GameRngState")]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform index in `0..upper`; `0` when `upper` is zero.
    pub fn below(&mut self, upper: usize) -> usize {
        if upper == 0 {
            return 0;
        }
        self.inner.gen_range(0..upper)
    }

    /// `true` with the given probability, clamped to `[0, 1]`.
    pub fn chance(&mut self, probability: f64) -> bool {
        self.inner.gen_bool(probability.clamp(0.0, 1.0))
    }

    pub fn shuffle<T>(&mut self, cards: &mut [T]) {
        cards.shuffle(&mut self.inner);
    }

    /// One element at random, `None` for an empty pool.
    pub fn choose<'a, T>(&mut self, pool: &'a [T]) -> Option<&'a T> {
        pool.choose(&mut self.inner)
    }

    /// Up to `amount` distinct elements in random order. A short pool
    /// yields all of it.
    pub fn choose_distinct<T: Clone>(&mut self, pool: &[T], amount: usize) -> Vec<T> {
        pool.choose_multiple(&mut self.inner, amount).cloned().collect()
    }

    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
        }
    }

    #[must_use]
    pub fn from_state(state: &GameRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
        }
    }
}

impl From<GameRngState> for GameRng {
    fn from(state: GameRngState) -> Self {
        Self::from_state(&state)
    }
}

impl From<GameRng> for GameRngState {
    fn from(rng: GameRng) -> Self {
        rng.state()
    }
}

/// Where a `GameRng` is in its stream.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRngState {
    pub seed: u64,
    /// ChaCha8 128-bit word counter.
    pub word_pos: u128,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_shuffle() {
        let mut deck_a: Vec<u32> = (1..=30).collect();
        let mut deck_b = deck_a.clone();

        GameRng::new(42).shuffle(&mut deck_a);
        GameRng::new(42).shuffle(&mut deck_b);
        assert_eq!(deck_a, deck_b);

        let mut deck_c: Vec<u32> = (1..=30).collect();
        GameRng::new(43).shuffle(&mut deck_c);
        assert_ne!(deck_a, deck_c);
    }

    #[test]
    fn test_below_stays_in_range() {
        let mut rng = GameRng::new(5);
        assert_eq!(rng.below(0), 0);
        for _ in 0..200 {
            assert!(rng.below(7) < 7);
        }
    }

    #[test]
    fn test_discover_offer_is_distinct() {
        let mut rng = GameRng::new(42);
        let pool = vec![10, 11, 12, 13, 14];

        let mut offer = rng.choose_distinct(&pool, 3);
        assert_eq!(offer.len(), 3);
        offer.sort();
        offer.dedup();
        assert_eq!(offer.len(), 3);

        assert_eq!(rng.choose_distinct(&pool, 10).len(), 5);
        assert!(rng.choose_distinct::<i32>(&[], 3).is_empty());
        assert!(rng.choose::<i32>(&[]).is_none());
    }

    #[test]
    fn test_chance_extremes() {
        let mut rng = GameRng::new(3);
        for _ in 0..20 {
            assert!(rng.chance(1.0));
            assert!(!rng.chance(0.0));
            assert!(rng.chance(7.5));
        }
    }

    #[test]
    fn test_saved_state_resumes_stream() {
        let mut rng = GameRng::new(42);
        for _ in 0..100 {
            rng.below(1000);
        }

        let saved = rng.state();
        let expected: Vec<_> = (0..10).map(|_| rng.below(1000)).collect();
        let mut restored = GameRng::from_state(&saved);
        let actual: Vec<_> = (0..10).map(|_| restored.below(1000)).collect();
        assert_eq!(expected, actual);

        let json = serde_json::to_string(&rng).unwrap();
        let mut back: GameRng = serde_json::from_str(&json).unwrap();
        assert_eq!(back.state(), rng.state());
        assert_eq!(back.below(1000), rng.below(1000));
    }
}
