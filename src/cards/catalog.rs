//! Card catalog for definition lookup.
//!
//! The `CardCatalog` is the load-once table of every card definition. The
//! rules only read from it: by id, by name, or by scanning with a
//! predicate (Discover pools, random summons, resurrection filters).

use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::definition::{CardDefinition, CardId, CardType};

/// Registry of card definitions.
///
/// Definitions are held behind `Arc` so callers can keep a definition while
/// the state they looked it up for is being mutated. Iteration order is by
/// card id, which keeps random selection over `all()` deterministic.
///
/// ## Example
///
/// ```
/// use ccg_rules::cards::{CardCatalog, CardDefinition, CardId};
///
/// let mut catalog = CardCatalog::new();
/// catalog.register(CardDefinition::minion(CardId::new(1), "Wisp", 0, 1, 1));
///
/// let found = catalog.by_id(CardId::new(1)).unwrap();
/// assert_eq!(found.name, "Wisp");
/// assert!(catalog.by_name("wisp").is_some());
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardCatalog {
    cards: FxHashMap<CardId, Arc<CardDefinition>>,
    ordered: Vec<CardId>,
}

impl CardCatalog {
    /// Create a new empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a card definition, replacing any previous one with the same id.
    pub fn register(&mut self, card: CardDefinition) {
        let id = card.id;
        if self.cards.insert(id, Arc::new(card)).is_none() {
            let pos = self.ordered.partition_point(|c| *c < id);
            self.ordered.insert(pos, id);
        }
    }

    /// Get a card definition by ID.
    #[must_use]
    pub fn by_id(&self, id: CardId) -> Option<&Arc<CardDefinition>> {
        self.cards.get(&id)
    }

    /// Find a definition by name, ignoring ASCII case.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&Arc<CardDefinition>> {
        self.all().find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Check if a card ID is registered.
    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        self.cards.contains_key(&id)
    }

    /// Get the number of registered cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate over all card definitions in id order.
    pub fn all(&self) -> impl Iterator<Item = &Arc<CardDefinition>> {
        self.ordered.iter().filter_map(|id| self.cards.get(id))
    }

    /// Find cards by type.
    pub fn find_by_type(&self, card_type: CardType) -> impl Iterator<Item = &Arc<CardDefinition>> {
        self.all().filter(move |c| c.card_type == card_type)
    }

    /// Find cards matching a predicate.
    pub fn find<F>(&self, predicate: F) -> impl Iterator<Item = &Arc<CardDefinition>>
    where
        F: Fn(&CardDefinition) -> bool,
    {
        self.all().filter(move |c| predicate(c))
    }
}

impl FromIterator<CardDefinition> for CardCatalog {
    fn from_iter<I: IntoIterator<Item = CardDefinition>>(iter: I) -> Self {
        let mut catalog = CardCatalog::new();
        for card in iter {
            catalog.register(card);
        }
        catalog
    }
}
