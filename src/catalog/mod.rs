//! The card catalog as seen by the deck core: a read-only `id -> CardRef`
//! lookup that is filled before any statistics or export run.

pub mod normalize;

pub use normalize::{normalize_card, normalize_cards};

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};

use serde_json::Value;

use crate::error::Result;
use crate::models::CardRef;

// ---------------------------------------------------------------------------
// CardLookup
// ---------------------------------------------------------------------------

/// Synchronous, side-effect free card resolution by id.
pub trait CardLookup {
    fn lookup(&self, id: &str) -> Option<&CardRef>;

    /// Resolve an id, substituting [`CardRef::placeholder`] on a miss.
    fn resolve(&self, id: &str) -> Cow<'_, CardRef> {
        match self.lookup(id) {
            Some(card) => Cow::Borrowed(card),
            None => {
                tracing::debug!(card_id = id, "card not in catalog, using placeholder");
                Cow::Owned(CardRef::placeholder(id))
            }
        }
    }
}

impl CardLookup for HashMap<String, CardRef> {
    fn lookup(&self, id: &str) -> Option<&CardRef> {
        self.get(id)
    }
}

impl CardLookup for BTreeMap<String, CardRef> {
    fn lookup(&self, id: &str) -> Option<&CardRef> {
        self.get(id)
    }
}

// ---------------------------------------------------------------------------
// CardCatalog
// ---------------------------------------------------------------------------

/// In-memory catalog keyed by card id.
#[derive(Debug, Clone, Default)]
pub struct CardCatalog {
    cards: HashMap<String, CardRef>,
}

impl CardCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cards<I: IntoIterator<Item = CardRef>>(cards: I) -> Self {
        let mut catalog = Self::new();
        for card in cards {
            catalog.insert(card);
        }
        catalog
    }

    /// Build a catalog from raw card JSON (array or `{"data": [...]}`).
    pub fn from_json_value(raw: &Value) -> Result<Self> {
        Ok(Self::from_cards(normalize_cards(raw)?))
    }

    /// Insert or replace a card, returning the previous entry for that id.
    pub fn insert(&mut self, card: CardRef) -> Option<CardRef> {
        self.cards.insert(card.id.clone(), card)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.cards.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CardRef> {
        self.cards.values()
    }
}

impl CardLookup for CardCatalog {
    fn lookup(&self, id: &str) -> Option<&CardRef> {
        self.cards.get(id)
    }
}

impl FromIterator<CardRef> for CardCatalog {
    fn from_iter<I: IntoIterator<Item = CardRef>>(iter: I) -> Self {
        Self::from_cards(iter)
    }
}
