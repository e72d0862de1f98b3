//! Deck composition, statistics, recommendations and export for MTG Arena.
//!
//! The analysis core is pure: [`DeckComposition`] holds card ids and
//! quantities, a [`CardLookup`] resolves ids to [`CardRef`]s, and the
//! functions in [`analysis`] and [`export`] turn the two into statistics,
//! advisories, validation issues and an Arena import list. Around that core,
//! [`DeckWorkshop`] wires a DuckDB card and deck store, an on-disk catalog
//! cache and a Scryfall client.
//!
//! # Quick start
//!
//! ```no_run
//! use mtga_deckbuilder::{DeckComposition, DeckRepository, DeckWorkshop, Zone};
//!
//! let workshop = DeckWorkshop::builder().build().unwrap();
//! workshop.sync_cards("legal:standard").unwrap();
//!
//! let mut deck = DeckComposition::new("Mono Red", "standard");
//! let bolt = workshop.cards().get_by_name("Lightning Strike").unwrap();
//! workshop.add_card(&mut deck, &bolt[0].id, 4, Zone::Mainboard).unwrap();
//!
//! let analysis = workshop.analyze(&deck).unwrap();
//! println!("{}", workshop.export(&deck).unwrap());
//! workshop.decks().create(&deck).unwrap();
//! # let _ = analysis;
//! ```

pub mod analysis;
#[cfg(feature = "async")]
pub mod async_client;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod connection;
pub mod error;
pub mod export;
pub mod models;
pub mod queries;
pub mod repository;
pub mod scryfall;
pub mod sql_builder;

pub use analysis::analyze_deck;
#[cfg(feature = "async")]
pub use async_client::AsyncDeckWorkshop;
pub use cache::CatalogCache;
pub use catalog::{CardCatalog, CardLookup};
pub use connection::Connection;
pub use error::{DeckError, Result};
pub use export::export_deck_list;
pub use models::deck::{add_card, remove_card};
pub use models::{
    Advisory, AdvisoryKind, CardRef, CardType, DeckAnalysis, DeckComposition, ManaCost, Priority,
    StatisticsSnapshot, ValidationIssue, ValidationRule, Zone,
};
pub use repository::{DeckRepository, InMemoryDeckRepository};
pub use scryfall::ScryfallClient;
pub use sql_builder::SqlBuilder;

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ---------------------------------------------------------------------------
// DeckWorkshopBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`DeckWorkshop`].
pub struct DeckWorkshopBuilder {
    database: Option<PathBuf>,
    cache_dir: Option<PathBuf>,
    offline: bool,
    timeout: Duration,
    scryfall_base_url: String,
}

impl Default for DeckWorkshopBuilder {
    fn default() -> Self {
        Self {
            database: None,
            cache_dir: None,
            offline: false,
            timeout: config::DEFAULT_TIMEOUT,
            scryfall_base_url: config::SCRYFALL_BASE.to_string(),
        }
    }
}

impl DeckWorkshopBuilder {
    /// Store cards and decks in a DuckDB file. Defaults to an in-memory database.
    pub fn database<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.database = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set a custom catalog cache directory.
    ///
    /// If not set, the platform cache directory is used
    /// (e.g. `~/.cache/mtga-deckbuilder` on Linux).
    pub fn cache_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.cache_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// When offline, [`DeckWorkshop::sync_cards`] only reads cached snapshots.
    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    /// HTTP timeout for Scryfall requests. Defaults to 120 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn scryfall_base_url(mut self, url: impl Into<String>) -> Self {
        self.scryfall_base_url = url.into();
        self
    }

    /// Open the database, create the schema and prepare the cache.
    ///
    /// Nothing is fetched from the network here.
    pub fn build(self) -> Result<DeckWorkshop> {
        let conn = match &self.database {
            Some(path) => Connection::open(path)?,
            None => Connection::open_in_memory()?,
        };
        let cache = CatalogCache::new(self.cache_dir, self.offline)?;
        let scryfall = if self.offline {
            None
        } else {
            Some(ScryfallClient::new(self.scryfall_base_url, self.timeout)?)
        };
        Ok(DeckWorkshop {
            conn,
            cache,
            scryfall,
        })
    }
}

// ---------------------------------------------------------------------------
// DeckWorkshop
// ---------------------------------------------------------------------------

/// Entry point tying the card store, deck store, cache and Scryfall together.
///
/// Created via [`DeckWorkshop::builder()`].
pub struct DeckWorkshop {
    conn: Connection,
    cache: CatalogCache,
    scryfall: Option<ScryfallClient>,
}

impl DeckWorkshop {
    pub fn builder() -> DeckWorkshopBuilder {
        DeckWorkshopBuilder::default()
    }

    // -- Store accessors ---------------------------------------------------

    /// Access the local card store.
    pub fn cards(&self) -> queries::CardStore<'_> {
        queries::CardStore::new(&self.conn)
    }

    /// Access saved decks. The returned store implements [`DeckRepository`].
    pub fn decks(&self) -> queries::DeckStore<'_> {
        queries::DeckStore::new(&self.conn)
    }

    pub fn cache(&self) -> &CatalogCache {
        &self.cache
    }

    // -- Catalog sync ------------------------------------------------------

    /// Load the cards for a Scryfall query into the card store.
    ///
    /// A cached snapshot is used when present; otherwise the query is fetched
    /// and snapshotted. Offline without a snapshot fails with
    /// [`DeckError::NotFound`]. Returns the number of cards stored.
    pub fn sync_cards(&self, query: &str) -> Result<usize> {
        let slug = CatalogCache::slug(query);

        let raw = match self.cache.load(&slug)? {
            Some(raw) => raw,
            None => {
                let client = self.scryfall.as_ref().ok_or_else(|| {
                    DeckError::NotFound(format!(
                        "No cached catalog for '{}' and offline mode is enabled",
                        query
                    ))
                })?;
                let raw = serde_json::Value::Array(client.search_raw(query)?);
                self.cache.store(&slug, &raw)?;
                raw
            }
        };

        let cards = catalog::normalize_cards(&raw)?;
        self.cards().upsert_many(&cards)
    }

    /// Add copies of a stored card to a deck.
    ///
    /// Fails with [`DeckError::NotFound`] if the card store has no such id;
    /// the deck is unchanged on any error.
    pub fn add_card(
        &self,
        deck: &mut DeckComposition,
        card_id: &str,
        quantity: i64,
        zone: Zone,
    ) -> Result<()> {
        if self.cards().get(card_id)?.is_none() {
            return Err(DeckError::NotFound(format!("Card {} not found", card_id)));
        }
        deck.add_card(card_id, quantity, zone)
    }

    // -- Analysis ----------------------------------------------------------

    /// Mainboard statistics using the stored card catalog.
    pub fn statistics(&self, deck: &DeckComposition) -> Result<StatisticsSnapshot> {
        let catalog = self.cards().catalog_for(deck)?;
        Ok(analysis::analyze(&deck.mainboard, &catalog))
    }

    /// Statistics, advisories and validation issues in one pass.
    pub fn analyze(&self, deck: &DeckComposition) -> Result<DeckAnalysis> {
        let catalog = self.cards().catalog_for(deck)?;
        Ok(analyze_deck(deck, &catalog))
    }

    /// Arena import list for a deck.
    pub fn export(&self, deck: &DeckComposition) -> Result<String> {
        let catalog = self.cards().catalog_for(deck)?;
        Ok(export_deck_list(deck, &catalog))
    }

    /// Return a reference to the underlying [`Connection`] for advanced usage.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for DeckWorkshop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DeckWorkshop(cache_dir={}, offline={})",
            self.cache.cache_dir.display(),
            self.cache.offline
        )
    }
}
