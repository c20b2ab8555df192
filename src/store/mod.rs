//! Durable local persistence of favorite pokemon.
//!
//! One contract, two interchangeable backends: a relational SQLite
//! table for platforms with a database engine, and a single-document
//! JSON key-value store for platforms without one. The backend is
//! chosen by an explicit [`BackendKind`] flag through [`create_store`],
//! never by ambient detection.

mod kv;
mod sqlite;

pub use kv::KvFavorites;
pub use sqlite::SqliteFavorites;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::StorageConfig;
use crate::error::StorageResult;

/// Which favorites backend the factory constructs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BackendKind {
    /// Relational table backend (native platforms).
    #[default]
    Sqlite,
    /// Single-key JSON document backend (web-like platforms).
    KeyValue,
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendKind::Sqlite => write!(f, "sqlite"),
            BackendKind::KeyValue => write!(f, "keyvalue"),
        }
    }
}

impl std::str::FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sqlite" | "relational" | "native" => Ok(BackendKind::Sqlite),
            "keyvalue" | "kv" | "web" => Ok(BackendKind::KeyValue),
            _ => Err(format!("Unknown storage backend: {}", s)),
        }
    }
}

/// A favorited pokemon as persisted locally.
///
/// Owned exclusively by the store; callers only ever receive copies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteRecord {
    /// Pokemon id, the primary key.
    pub id: i64,
    /// Pokemon name.
    pub name: String,
    /// Sprite URL; empty when none was supplied.
    pub image_url: String,
    /// When the favorite was (last) added.
    pub created_at: DateTime<Utc>,
}

/// Contract both favorites backends satisfy identically.
///
/// [`FavoritesStore::init`] must complete before any other operation;
/// callers are responsible for sequencing. Operations invoked earlier
/// fail with [`crate::error::StorageError::NotInitialized`].
#[async_trait]
pub trait FavoritesStore: Send + Sync {
    /// Idempotent setup: create the table or document location.
    async fn init(&self) -> StorageResult<()>;

    /// Insert or replace the record for `id`, refreshing its timestamp.
    /// A missing `image_url` is stored as the empty string.
    async fn add_favorite(&self, id: i64, name: &str, image_url: Option<&str>)
        -> StorageResult<()>;

    /// Delete the record for `id`. Removing an absent id is not an error.
    async fn remove_favorite(&self, id: i64) -> StorageResult<()>;

    /// Whether `id` is currently favorited.
    async fn is_favorite(&self, id: i64) -> StorageResult<bool>;

    /// All records, most recently favorited first.
    async fn get_all_favorites(&self) -> StorageResult<Vec<FavoriteRecord>>;
}

/// Construct the backend named by the configuration.
///
/// The store is cheap to build; the returned instance still needs
/// [`FavoritesStore::init`] before use.
pub fn create_store(config: &StorageConfig) -> Arc<dyn FavoritesStore> {
    match config.backend {
        BackendKind::Sqlite => Arc::new(SqliteFavorites::new(&config.path, config.max_connections)),
        BackendKind::KeyValue => Arc::new(KvFavorites::new(&config.path)),
    }
}
