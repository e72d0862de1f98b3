//! Async wrapper around [`DeckWorkshop`] for use in async runtimes (Tokio, etc.).
//!
//! Every operation runs on the blocking thread pool via
//! [`tokio::task::spawn_blocking`], so DuckDB queries and Scryfall requests
//! never stall the event loop.
//!
//! # Example
//!
//! ```no_run
//! use mtga_deckbuilder::{AsyncDeckWorkshop, DeckComposition};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let workshop = AsyncDeckWorkshop::builder().offline(true).build().await.unwrap();
//!
//!     let deck = DeckComposition::new("Draft", "standard");
//!     let analysis = workshop.analyze(deck.clone()).await.unwrap();
//!     let list = workshop.export(deck).await.unwrap();
//!     # let _ = (analysis, list);
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::config;
use crate::error::{DeckError, Result};
use crate::models::{DeckAnalysis, DeckComposition};
use crate::DeckWorkshop;

// ---------------------------------------------------------------------------
// AsyncDeckWorkshopBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing an [`AsyncDeckWorkshop`].
pub struct AsyncDeckWorkshopBuilder {
    database: Option<PathBuf>,
    cache_dir: Option<PathBuf>,
    offline: bool,
    timeout: Duration,
    scryfall_base_url: Option<String>,
}

impl Default for AsyncDeckWorkshopBuilder {
    fn default() -> Self {
        Self {
            database: None,
            cache_dir: None,
            offline: false,
            timeout: config::DEFAULT_TIMEOUT,
            scryfall_base_url: None,
        }
    }
}

impl AsyncDeckWorkshopBuilder {
    pub fn database<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.database = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn cache_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.cache_dir = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn scryfall_base_url(mut self, url: impl Into<String>) -> Self {
        self.scryfall_base_url = Some(url.into());
        self
    }

    /// Build the workshop on the blocking thread pool.
    pub async fn build(self) -> Result<AsyncDeckWorkshop> {
        tokio::task::spawn_blocking(move || {
            let mut builder = DeckWorkshop::builder()
                .offline(self.offline)
                .timeout(self.timeout);
            if let Some(path) = self.database {
                builder = builder.database(path);
            }
            if let Some(dir) = self.cache_dir {
                builder = builder.cache_dir(dir);
            }
            if let Some(url) = self.scryfall_base_url {
                builder = builder.scryfall_base_url(url);
            }
            let workshop = builder.build()?;
            Ok(AsyncDeckWorkshop {
                inner: Arc::new(Mutex::new(workshop)),
            })
        })
        .await
        .map_err(|e| DeckError::InvalidArgument(format!("Task join error: {e}")))?
    }
}

// ---------------------------------------------------------------------------
// AsyncDeckWorkshop
// ---------------------------------------------------------------------------

/// Async wrapper around [`DeckWorkshop`].
///
/// The workshop is shared behind a [`Mutex`], so calls are serialized.
pub struct AsyncDeckWorkshop {
    inner: Arc<Mutex<DeckWorkshop>>,
}

impl AsyncDeckWorkshop {
    pub fn builder() -> AsyncDeckWorkshopBuilder {
        AsyncDeckWorkshopBuilder::default()
    }

    /// Run a sync workshop operation on the blocking thread pool.
    ///
    /// ```no_run
    /// # use mtga_deckbuilder::AsyncDeckWorkshop;
    /// # async fn example() -> mtga_deckbuilder::Result<()> {
    /// # let workshop = AsyncDeckWorkshop::builder().build().await?;
    /// let stored = workshop.run(|w| w.sync_cards("legal:standard")).await?;
    /// # let _ = stored;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&DeckWorkshop) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let workshop = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            let guard = workshop
                .lock()
                .map_err(|_| DeckError::InvalidArgument("workshop lock poisoned".into()))?;
            f(&guard)
        })
        .await
        .map_err(|e| DeckError::InvalidArgument(format!("Task join error: {e}")))?
    }

    pub async fn analyze(&self, deck: DeckComposition) -> Result<DeckAnalysis> {
        self.run(move |w| w.analyze(&deck)).await
    }

    pub async fn export(&self, deck: DeckComposition) -> Result<String> {
        self.run(move |w| w.export(&deck)).await
    }

    pub async fn sync_cards(&self, query: &str) -> Result<usize> {
        let query = query.to_string();
        self.run(move |w| w.sync_cards(&query)).await
    }

    /// Drop the workshop on the blocking pool.
    ///
    /// The HTTP client must not be dropped on an async worker thread.
    pub async fn close(self) -> Result<()> {
        tokio::task::spawn_blocking(move || drop(self.inner))
            .await
            .map_err(|e| DeckError::InvalidArgument(format!("Task join error: {e}")))
    }
}
