//! Card keywords.
//!
//! Keywords are static markers printed on a definition or granted to an
//! instance at runtime. `KeywordSet` is a small inline set since a card
//! rarely carries more than a handful.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// A keyword ability.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Keyword {
    Taunt,
    Charge,
    Rush,
    DivineShield,
    Stealth,
    Windfury,
    MegaWindfury,
    Lifesteal,
    Poisonous,
    Battlecry,
    Deathrattle,
    Untargetable,
    Immune,
}

/// Small ordered set of keywords without duplicates.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeywordSet(SmallVec<[Keyword; 4]>);

impl KeywordSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a keyword. Returns false if it was already present.
    pub fn insert(&mut self, keyword: Keyword) -> bool {
        if self.contains(keyword) {
            return false;
        }
        self.0.push(keyword);
        true
    }

    /// Remove a keyword. Returns false if it was absent.
    pub fn remove(&mut self, keyword: Keyword) -> bool {
        match self.0.iter().position(|k| *k == keyword) {
            Some(i) => {
                self.0.remove(i);
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn contains(&self, keyword: Keyword) -> bool {
        self.0.contains(&keyword)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = Keyword> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<Keyword> for KeywordSet {
    fn from_iter<I: IntoIterator<Item = Keyword>>(iter: I) -> Self {
        let mut set = KeywordSet::new();
        for keyword in iter {
            set.insert(keyword);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_dedups() {
        let mut set = KeywordSet::new();
        assert!(set.insert(Keyword::Taunt));
        assert!(!set.insert(Keyword::Taunt));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut set: KeywordSet = [Keyword::Taunt, Keyword::DivineShield].into_iter().collect();
        assert!(set.remove(Keyword::Taunt));
        assert!(!set.remove(Keyword::Taunt));
        assert!(set.contains(Keyword::DivineShield));
    }

    #[test]
    fn test_serializes_as_list() {
        let set: KeywordSet = [Keyword::DivineShield, Keyword::Rush].into_iter().collect();
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["divine_shield","rush"]"#);
    }
}
