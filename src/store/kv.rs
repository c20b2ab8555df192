use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::{FavoriteRecord, FavoritesStore};
use crate::error::{StorageError, StorageResult};

/// Key-value favorites backend: the whole list lives as one JSON array
/// under a single key (a document file on disk).
///
/// Every mutation reads the full array, mutates it in memory, and writes
/// it back. Expected cardinality is small (favorites, not the full
/// species list). An unparseable document degrades to the empty list.
pub struct KvFavorites {
    path: PathBuf,
    ready: AtomicBool,
    /// Serializes read-modify-write cycles against the document.
    io: Mutex<()>,
}

impl KvFavorites {
    /// Create a store backed by the JSON document at `path`. No I/O
    /// happens until [`FavoritesStore::init`].
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            ready: AtomicBool::new(false),
            io: Mutex::new(()),
        }
    }

    fn ensure_ready(&self) -> StorageResult<()> {
        if self.ready.load(Ordering::Acquire) {
            Ok(())
        } else {
            Err(StorageError::NotInitialized)
        }
    }

    async fn read_all(&self) -> StorageResult<Vec<FavoriteRecord>> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(StorageError::Io {
                    message: e.to_string(),
                })
            }
        };

        match serde_json::from_str(&raw) {
            Ok(records) => Ok(records),
            Err(e) => {
                warn!(error = %e, path = %self.path.display(), "corrupt favorites document, treating as empty");
                Ok(Vec::new())
            }
        }
    }

    async fn write_all(&self, records: &[FavoriteRecord]) -> StorageResult<()> {
        let raw = serde_json::to_string(records).map_err(|e| StorageError::Serialize {
            message: e.to_string(),
        })?;

        tokio::fs::write(&self.path, raw)
            .await
            .map_err(|e| StorageError::Io {
                message: e.to_string(),
            })
    }
}

#[async_trait]
impl FavoritesStore for KvFavorites {
    async fn init(&self) -> StorageResult<()> {
        if self.ready.load(Ordering::Acquire) {
            debug!("favorites document already initialized");
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| StorageError::Io {
                        message: format!("Failed to create document directory: {}", e),
                    })?;
            }
        }

        self.ready.store(true, Ordering::Release);
        info!(path = %self.path.display(), "favorites document store initialized");
        Ok(())
    }

    async fn add_favorite(
        &self,
        id: i64,
        name: &str,
        image_url: Option<&str>,
    ) -> StorageResult<()> {
        self.ensure_ready()?;
        let _guard = self.io.lock().await;

        let mut records = self.read_all().await?;
        records.retain(|r| r.id != id);
        records.push(FavoriteRecord {
            id,
            name: name.to_string(),
            image_url: image_url.unwrap_or("").to_string(),
            created_at: Utc::now(),
        });

        self.write_all(&records).await
    }

    async fn remove_favorite(&self, id: i64) -> StorageResult<()> {
        self.ensure_ready()?;
        let _guard = self.io.lock().await;

        let mut records = self.read_all().await?;
        records.retain(|r| r.id != id);

        self.write_all(&records).await
    }

    async fn is_favorite(&self, id: i64) -> StorageResult<bool> {
        self.ensure_ready()?;
        let _guard = self.io.lock().await;

        Ok(self.read_all().await?.iter().any(|r| r.id == id))
    }

    async fn get_all_favorites(&self) -> StorageResult<Vec<FavoriteRecord>> {
        self.ensure_ready()?;
        let _guard = self.io.lock().await;

        let mut records = self.read_all().await?;
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }
}
