//! Deck persistence seam.
//!
//! The deck model never talks to storage itself. Callers that need to save
//! decks take a [`DeckRepository`], backed either by DuckDB
//! ([`crate::queries::DeckStore`]) or by [`InMemoryDeckRepository`].

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use crate::config;
use crate::error::{DeckError, Result};
use crate::models::DeckComposition;

/// Create/read/update/delete access to saved decks.
///
/// Concurrent writers are not coordinated: the last write wins.
pub trait DeckRepository {
    /// Save a new deck and return it with its assigned id.
    ///
    /// Any id already on `deck` is ignored. Deck names are unique.
    fn create(&self, deck: &DeckComposition) -> Result<DeckComposition>;

    fn get(&self, id: i64) -> Result<Option<DeckComposition>>;

    /// Replace a saved deck. `deck.id` selects the row.
    fn update(&self, deck: &DeckComposition) -> Result<DeckComposition>;

    fn delete(&self, id: i64) -> Result<()>;

    /// Page through decks ordered by id.
    fn list(&self, skip: usize, limit: usize) -> Result<Vec<DeckComposition>>;

    /// All decks of a format, compared case-insensitively.
    fn search_by_format(&self, format: &str) -> Result<Vec<DeckComposition>>;
}

/// Reject decks that should never reach storage: blank names, unknown color
/// codes, or zero quantities smuggled in through deserialization.
pub fn check_storable(deck: &DeckComposition) -> Result<()> {
    if deck.name.trim().is_empty() {
        return Err(DeckError::InvalidArgument("Deck name cannot be empty".into()));
    }
    if let Some(bad) = deck.colors.iter().find(|c| !config::is_color_code(c)) {
        return Err(DeckError::InvalidArgument(format!(
            "Invalid color code '{}'. Must be one of: W, U, B, R, G",
            bad
        )));
    }
    for (id, qty) in deck.mainboard.iter().chain(deck.sideboard.iter()) {
        if *qty == 0 {
            return Err(DeckError::InvalidArgument(format!(
                "Card quantity must be positive for card {}",
                id
            )));
        }
    }
    Ok(())
}

pub(crate) fn require_id(deck: &DeckComposition) -> Result<i64> {
    deck.id
        .ok_or_else(|| DeckError::InvalidArgument("Cannot update a deck without an id".into()))
}

pub(crate) fn duplicate_name(name: &str) -> DeckError {
    DeckError::InvalidArgument(format!("Deck with name '{}' already exists", name))
}

pub(crate) fn deck_not_found(id: i64) -> DeckError {
    DeckError::NotFound(format!("Deck {} not found", id))
}

// ---------------------------------------------------------------------------
// InMemoryDeckRepository
// ---------------------------------------------------------------------------

/// Process-local repository, mainly for tests and single-user tools.
#[derive(Debug)]
pub struct InMemoryDeckRepository {
    decks: RefCell<BTreeMap<i64, DeckComposition>>,
    next_id: Cell<i64>,
}

impl Default for InMemoryDeckRepository {
    fn default() -> Self {
        Self {
            decks: RefCell::new(BTreeMap::new()),
            next_id: Cell::new(1),
        }
    }
}

impl InMemoryDeckRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.decks.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.decks.borrow().is_empty()
    }

    fn name_taken(&self, name: &str, except: Option<i64>) -> bool {
        self.decks
            .borrow()
            .values()
            .any(|d| d.name == name && d.id != except)
    }
}

impl DeckRepository for InMemoryDeckRepository {
    fn create(&self, deck: &DeckComposition) -> Result<DeckComposition> {
        check_storable(deck)?;
        if self.name_taken(&deck.name, None) {
            return Err(duplicate_name(&deck.name));
        }

        let id = self.next_id.get();
        self.next_id.set(id + 1);

        let mut saved = deck.clone();
        saved.id = Some(id);
        self.decks.borrow_mut().insert(id, saved.clone());
        Ok(saved)
    }

    fn get(&self, id: i64) -> Result<Option<DeckComposition>> {
        Ok(self.decks.borrow().get(&id).cloned())
    }

    fn update(&self, deck: &DeckComposition) -> Result<DeckComposition> {
        let id = require_id(deck)?;
        check_storable(deck)?;
        if !self.decks.borrow().contains_key(&id) {
            return Err(deck_not_found(id));
        }
        if self.name_taken(&deck.name, Some(id)) {
            return Err(duplicate_name(&deck.name));
        }
        self.decks.borrow_mut().insert(id, deck.clone());
        Ok(deck.clone())
    }

    fn delete(&self, id: i64) -> Result<()> {
        self.decks
            .borrow_mut()
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| deck_not_found(id))
    }

    fn list(&self, skip: usize, limit: usize) -> Result<Vec<DeckComposition>> {
        Ok(self
            .decks
            .borrow()
            .values()
            .skip(skip)
            .take(limit)
            .cloned()
            .collect())
    }

    fn search_by_format(&self, format: &str) -> Result<Vec<DeckComposition>> {
        let wanted = format.to_lowercase();
        Ok(self
            .decks
            .borrow()
            .values()
            .filter(|d| d.format.to_lowercase() == wanted)
            .cloned()
            .collect())
    }
}
