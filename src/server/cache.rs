//! Document cache for the dashboard.
//!
//! The document is re-read only when the file that would be served changes:
//! a different file wins (the annotated one appears) or its modification
//! time moves.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::SystemTime;

use tracing::debug;

use crate::storage::{self, LoadedDocument, StorageError};

/// Which file would be served, and when it last changed.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Fingerprint {
    path: PathBuf,
    modified: Option<SystemTime>,
}

/// A loaded document with the fingerprint it was loaded under.
struct CacheEntry {
    fingerprint: Fingerprint,
    value: Arc<LoadedDocument>,
}

/// Reads the annotated document, falling back to the unannotated one.
pub struct DocumentSource {
    annotated: PathBuf,
    unannotated: PathBuf,
    entry: RwLock<Option<CacheEntry>>,
}

impl DocumentSource {
    pub fn new(annotated: PathBuf, unannotated: PathBuf) -> Self {
        Self {
            annotated,
            unannotated,
            entry: RwLock::new(None),
        }
    }

    pub fn annotated_path(&self) -> &Path {
        &self.annotated
    }

    pub fn unannotated_path(&self) -> &Path {
        &self.unannotated
    }

    fn fingerprint(&self) -> Option<Fingerprint> {
        [&self.annotated, &self.unannotated]
            .into_iter()
            .find_map(|path| {
                fs::metadata(path).ok().map(|meta| Fingerprint {
                    path: path.clone(),
                    modified: meta.modified().ok(),
                })
            })
    }

    /// Current document, from the cache when the file has not changed.
    pub fn get(&self) -> Result<Arc<LoadedDocument>, StorageError> {
        let fingerprint = self
            .fingerprint()
            .ok_or_else(|| StorageError::NotFound(self.unannotated.clone()))?;

        if let Ok(guard) = self.entry.read() {
            if let Some(ref entry) = *guard {
                if entry.fingerprint == fingerprint {
                    return Ok(Arc::clone(&entry.value));
                }
            }
        }

        debug!("Loading document from {}", fingerprint.path.display());
        let loaded = Arc::new(storage::load_preferred(&self.annotated, &self.unannotated)?);
        if let Ok(mut guard) = self.entry.write() {
            *guard = Some(CacheEntry {
                fingerprint,
                value: Arc::clone(&loaded),
            });
        }
        Ok(loaded)
    }

    /// `get` on the blocking pool, for use from request handlers.
    pub async fn fetch(self: Arc<Self>) -> Result<Arc<LoadedDocument>, StorageError> {
        let path = self.unannotated.clone();
        tokio::task::spawn_blocking(move || self.get())
            .await
            .unwrap_or_else(|e| {
                Err(StorageError::Io {
                    path,
                    source: io::Error::other(e),
                })
            })
    }

    /// Drop the cached document.
    pub fn invalidate(&self) {
        if let Ok(mut guard) = self.entry.write() {
            *guard = None;
        }
    }
}
