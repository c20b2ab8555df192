use std::path::{Path, PathBuf};
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::{FavoriteRecord, FavoritesStore};
use crate::error::{StorageError, StorageResult};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS favorites (
    id INTEGER PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    image_url TEXT DEFAULT '',
    created_at TEXT NOT NULL
)
"#;

enum Location {
    File(PathBuf),
    Memory,
}

/// Relational favorites backend over a single SQLite table.
pub struct SqliteFavorites {
    location: Location,
    max_connections: u32,
    pool: RwLock<Option<SqlitePool>>,
}

impl SqliteFavorites {
    /// Create a store backed by a database file. No I/O happens until
    /// [`FavoritesStore::init`].
    pub fn new(path: &Path, max_connections: u32) -> Self {
        Self {
            location: Location::File(path.to_path_buf()),
            max_connections,
            pool: RwLock::new(None),
        }
    }

    /// Create a store backed by an in-memory database (for testing).
    pub fn in_memory() -> Self {
        Self {
            location: Location::Memory,
            // One connection: each in-memory connection is its own database.
            max_connections: 1,
            pool: RwLock::new(None),
        }
    }

    async fn pool(&self) -> StorageResult<SqlitePool> {
        self.pool
            .read()
            .await
            .as_ref()
            .cloned()
            .ok_or(StorageError::NotInitialized)
    }
}

#[async_trait]
impl FavoritesStore for SqliteFavorites {
    async fn init(&self) -> StorageResult<()> {
        let mut guard = self.pool.write().await;
        if guard.is_some() {
            debug!("favorites database already initialized");
            return Ok(());
        }

        let options = match &self.location {
            Location::Memory => SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| StorageError::Connection {
                    message: e.to_string(),
                })?,
            Location::File(path) => {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent).map_err(|e| StorageError::Connection {
                        message: format!("Failed to create database directory: {}", e),
                    })?;
                }
                SqliteConnectOptions::new()
                    .filename(path)
                    .create_if_missing(true)
                    .journal_mode(SqliteJournalMode::Wal)
            }
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(self.max_connections)
            .connect_with(options)
            .await
            .map_err(|e| StorageError::Connection {
                message: format!("Failed to connect to database: {}", e),
            })?;

        sqlx::query(SCHEMA)
            .execute(&pool)
            .await
            .map_err(|e| StorageError::Query {
                message: e.to_string(),
            })?;

        info!("favorites database initialized");
        *guard = Some(pool);
        Ok(())
    }

    async fn add_favorite(
        &self,
        id: i64,
        name: &str,
        image_url: Option<&str>,
    ) -> StorageResult<()> {
        let pool = self.pool().await?;

        sqlx::query(
            r#"
            INSERT OR REPLACE INTO favorites (id, name, image_url, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(image_url.unwrap_or(""))
        .bind(Utc::now().to_rfc3339())
        .execute(&pool)
        .await
        .map_err(|e| StorageError::Query {
            message: e.to_string(),
        })?;

        Ok(())
    }

    async fn remove_favorite(&self, id: i64) -> StorageResult<()> {
        let pool = self.pool().await?;

        sqlx::query("DELETE FROM favorites WHERE id = ?")
            .bind(id)
            .execute(&pool)
            .await
            .map_err(|e| StorageError::Query {
                message: e.to_string(),
            })?;

        Ok(())
    }

    async fn is_favorite(&self, id: i64) -> StorageResult<bool> {
        let pool = self.pool().await?;

        let row: Option<i64> =
            sqlx::query_scalar("SELECT id FROM favorites WHERE id = ? LIMIT 1")
                .bind(id)
                .fetch_optional(&pool)
                .await
                .map_err(|e| StorageError::Query {
                    message: e.to_string(),
                })?;

        Ok(row.is_some())
    }

    async fn get_all_favorites(&self) -> StorageResult<Vec<FavoriteRecord>> {
        let pool = self.pool().await?;

        let rows: Vec<FavoriteRow> = sqlx::query_as(
            r#"
            SELECT id, name, image_url, created_at
            FROM favorites
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&pool)
        .await
        .map_err(|e| StorageError::Query {
            message: e.to_string(),
        })?;

        rows.into_iter().map(FavoriteRow::into_record).collect()
    }
}

#[derive(sqlx::FromRow)]
struct FavoriteRow {
    id: i64,
    name: String,
    image_url: String,
    created_at: String,
}

impl FavoriteRow {
    fn into_record(self) -> StorageResult<FavoriteRecord> {
        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| StorageError::Query {
                message: format!("Invalid created_at '{}': {}", self.created_at, e),
            })?;

        Ok(FavoriteRecord {
            id: self.id,
            name: self.name,
            image_url: self.image_url,
            created_at,
        })
    }
}
