//! On-disk snapshots of fetched card catalogs.
//!
//! Each remote query is stored under a slug derived from the query text, as
//! `<slug>.json.gz` (default) or `<slug>.json`. Writes go to a temp file that
//! is renamed into place, so an interrupted write never leaves a partial
//! snapshot behind.

use std::fs;
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde_json::Value;

use crate::config;
use crate::error::{DeckError, Result};

/// File cache for raw card catalog snapshots.
pub struct CatalogCache {
    /// Directory where snapshots are stored.
    pub cache_dir: PathBuf,
    /// If true, callers must not fall back to the network on a miss.
    pub offline: bool,
    compress: bool,
}

impl CatalogCache {
    /// Create a cache rooted at `cache_dir`, or the platform default.
    ///
    /// Creates the directory if it does not exist.
    pub fn new(cache_dir: Option<PathBuf>, offline: bool) -> Result<Self> {
        let dir = cache_dir.unwrap_or_else(config::default_cache_dir);
        fs::create_dir_all(&dir)?;
        Ok(Self {
            cache_dir: dir,
            offline,
            compress: true,
        })
    }

    /// Choose between gzip (default) and plain JSON for new snapshots.
    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// File-system safe key for a query string.
    ///
    /// `"legal:standard t:creature"` becomes `"legal_standard_t_creature"`.
    pub fn slug(query: &str) -> String {
        let mut out = String::with_capacity(query.len());
        for ch in query.trim().chars() {
            if ch.is_ascii_alphanumeric() {
                out.push(ch.to_ascii_lowercase());
            } else if !out.ends_with('_') {
                out.push('_');
            }
        }
        let trimmed = out.trim_matches('_');
        if trimmed.is_empty() {
            "all".to_string()
        } else {
            trimmed.to_string()
        }
    }

    fn gz_path(&self, slug: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json.gz", slug))
    }

    fn json_path(&self, slug: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", slug))
    }

    /// Path of the existing snapshot for `slug`, preferring the gzip file.
    pub fn path_for(&self, slug: &str) -> Option<PathBuf> {
        [self.gz_path(slug), self.json_path(slug)]
            .into_iter()
            .find(|p| p.exists())
    }

    pub fn contains(&self, slug: &str) -> bool {
        self.path_for(slug).is_some()
    }

    /// Write a snapshot and return its path.
    pub fn store(&self, slug: &str, value: &Value) -> Result<PathBuf> {
        let dest = if self.compress {
            self.gz_path(slug)
        } else {
            self.json_path(slug)
        };
        let bytes = serde_json::to_vec(value)?;
        let payload = if self.compress {
            let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(&bytes)?;
            encoder.finish()?
        } else {
            bytes
        };

        write_atomic(&dest, &payload)?;

        // Drop a stale snapshot in the other encoding.
        let other = if self.compress {
            self.json_path(slug)
        } else {
            self.gz_path(slug)
        };
        if other.exists() {
            let _ = fs::remove_file(&other);
        }

        tracing::info!(path = %dest.display(), "stored catalog snapshot");
        Ok(dest)
    }

    /// Load and parse a snapshot (handles `.gz` transparently).
    ///
    /// Returns `Ok(None)` when nothing is cached. A corrupt file is deleted
    /// and reported as [`DeckError::NotFound`] so the next call refetches.
    pub fn load(&self, slug: &str) -> Result<Option<Value>> {
        let Some(path) = self.path_for(slug) else {
            return Ok(None);
        };

        match read_json(&path) {
            Ok(value) => {
                tracing::debug!(path = %path.display(), "catalog cache hit");
                Ok(Some(value))
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "corrupt cache file, removing");
                let _ = fs::remove_file(&path);
                Err(DeckError::NotFound(format!(
                    "Cache file '{}' was corrupt and has been removed. \
                     Retry to re-download. Original error: {}",
                    path.file_name()
                        .and_then(|n| n.to_str())
                        .unwrap_or("unknown"),
                    e
                )))
            }
        }
    }

    /// Remove all cached files and recreate the cache directory.
    pub fn clear(&self) -> Result<()> {
        if self.cache_dir.exists() {
            fs::remove_dir_all(&self.cache_dir)?;
            fs::create_dir_all(&self.cache_dir)?;
        }
        Ok(())
    }
}

fn read_json(path: &Path) -> Result<Value> {
    let mut contents = String::new();
    if path.extension().and_then(|e| e.to_str()) == Some("gz") {
        let file = fs::File::open(path)?;
        let mut reader = BufReader::new(GzDecoder::new(BufReader::new(file)));
        reader.read_to_string(&mut contents)?;
    } else {
        contents = fs::read_to_string(path)?;
    }
    Ok(serde_json::from_str(&contents)?)
}

/// Write to `<dest>.tmp` and rename over `dest`.
fn write_atomic(dest: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut tmp = dest.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    let result = fs::write(&tmp, bytes).and_then(|_| fs::rename(&tmp, dest));
    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    Ok(result?)
}
