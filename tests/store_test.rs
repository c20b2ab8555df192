//! Integration tests for the favorites store backends.
//!
//! Both backends must satisfy the same contract; the shared checks run
//! against an in-memory SQLite store and a tempdir-backed key-value
//! document.

use std::time::Duration;

use tempfile::TempDir;

use pokedex_data::error::StorageError;
use pokedex_data::store::{FavoritesStore, KvFavorites, SqliteFavorites};

async fn sqlite_store() -> SqliteFavorites {
    let store = SqliteFavorites::in_memory();
    store.init().await.expect("init sqlite store");
    store
}

fn kv_store(dir: &TempDir) -> KvFavorites {
    KvFavorites::new(&dir.path().join("favorites.json"))
}

async fn kv_store_ready(dir: &TempDir) -> KvFavorites {
    let store = kv_store(dir);
    store.init().await.expect("init kv store");
    store
}

/// Shared contract checks both backends must pass identically.
mod contract {
    use super::*;
    use pretty_assertions::assert_eq;

    pub async fn add_and_read_back(store: &dyn FavoritesStore) {
        store
            .add_favorite(25, "pikachu", Some("https://sprites/25.png"))
            .await
            .unwrap();

        assert!(store.is_favorite(25).await.unwrap());
        assert!(!store.is_favorite(26).await.unwrap());

        let all = store.get_all_favorites().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, 25);
        assert_eq!(all[0].name, "pikachu");
        assert_eq!(all[0].image_url, "https://sprites/25.png");
    }

    pub async fn missing_image_url_defaults_to_empty(store: &dyn FavoritesStore) {
        store.add_favorite(1, "bulbasaur", None).await.unwrap();

        let all = store.get_all_favorites().await.unwrap();
        assert_eq!(all[0].image_url, "");
    }

    pub async fn upsert_replaces_record(store: &dyn FavoritesStore) {
        store.add_favorite(25, "pikachu", Some("old.png")).await.unwrap();
        let first = store.get_all_favorites().await.unwrap()[0].clone();

        tokio::time::sleep(Duration::from_millis(5)).await;
        store.add_favorite(25, "pikachu", Some("new.png")).await.unwrap();

        let all = store.get_all_favorites().await.unwrap();
        assert_eq!(all.len(), 1, "upsert must not duplicate the record");
        assert_eq!(all[0].image_url, "new.png");
        assert!(all[0].created_at >= first.created_at);
    }

    pub async fn remove_is_idempotent(store: &dyn FavoritesStore) {
        store.add_favorite(25, "pikachu", None).await.unwrap();

        store.remove_favorite(25).await.unwrap();
        assert!(!store.is_favorite(25).await.unwrap());

        // Removing an absent id succeeds and changes nothing.
        store.remove_favorite(25).await.unwrap();
        store.remove_favorite(9999).await.unwrap();
        assert_eq!(store.get_all_favorites().await.unwrap().len(), 0);
    }

    pub async fn listing_is_most_recent_first(store: &dyn FavoritesStore) {
        for (id, name) in [(1, "bulbasaur"), (4, "charmander"), (7, "squirtle")] {
            store.add_favorite(id, name, None).await.unwrap();
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        let ids: Vec<i64> = store
            .get_all_favorites()
            .await
            .unwrap()
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![7, 4, 1]);
    }

    pub async fn re_adding_moves_record_to_front(store: &dyn FavoritesStore) {
        store.add_favorite(1, "bulbasaur", None).await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
        store.add_favorite(4, "charmander", None).await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
        store.add_favorite(1, "bulbasaur", None).await.unwrap();

        let ids: Vec<i64> = store
            .get_all_favorites()
            .await
            .unwrap()
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![1, 4]);
    }
}

mod sqlite_tests {
    use super::*;

    #[tokio::test]
    async fn test_add_and_read_back() {
        contract::add_and_read_back(&sqlite_store().await).await;
    }

    #[tokio::test]
    async fn test_missing_image_url_defaults_to_empty() {
        contract::missing_image_url_defaults_to_empty(&sqlite_store().await).await;
    }

    #[tokio::test]
    async fn test_upsert_replaces_record() {
        contract::upsert_replaces_record(&sqlite_store().await).await;
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        contract::remove_is_idempotent(&sqlite_store().await).await;
    }

    #[tokio::test]
    async fn test_listing_is_most_recent_first() {
        contract::listing_is_most_recent_first(&sqlite_store().await).await;
    }

    #[tokio::test]
    async fn test_re_adding_moves_record_to_front() {
        contract::re_adding_moves_record_to_front(&sqlite_store().await).await;
    }

    #[tokio::test]
    async fn test_operations_before_init_fail() {
        let store = SqliteFavorites::in_memory();

        let err = store.is_favorite(25).await.unwrap_err();
        assert!(matches!(err, StorageError::NotInitialized));

        let err = store.add_favorite(25, "pikachu", None).await.unwrap_err();
        assert!(matches!(err, StorageError::NotInitialized));
    }

    #[tokio::test]
    async fn test_init_is_idempotent() {
        let store = SqliteFavorites::in_memory();
        store.init().await.unwrap();
        store.add_favorite(25, "pikachu", None).await.unwrap();

        store.init().await.unwrap();
        assert!(store.is_favorite(25).await.unwrap());
    }

    #[tokio::test]
    async fn test_file_backed_store_persists_across_instances() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("favorites.db");

        let store = SqliteFavorites::new(&path, 2);
        store.init().await.unwrap();
        store.add_favorite(25, "pikachu", None).await.unwrap();
        drop(store);

        let reopened = SqliteFavorites::new(&path, 2);
        reopened.init().await.unwrap();
        assert!(reopened.is_favorite(25).await.unwrap());
    }
}

mod kv_tests {
    use super::*;

    #[tokio::test]
    async fn test_add_and_read_back() {
        let dir = TempDir::new().unwrap();
        contract::add_and_read_back(&kv_store_ready(&dir).await).await;
    }

    #[tokio::test]
    async fn test_missing_image_url_defaults_to_empty() {
        let dir = TempDir::new().unwrap();
        contract::missing_image_url_defaults_to_empty(&kv_store_ready(&dir).await).await;
    }

    #[tokio::test]
    async fn test_upsert_replaces_record() {
        let dir = TempDir::new().unwrap();
        contract::upsert_replaces_record(&kv_store_ready(&dir).await).await;
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let dir = TempDir::new().unwrap();
        contract::remove_is_idempotent(&kv_store_ready(&dir).await).await;
    }

    #[tokio::test]
    async fn test_listing_is_most_recent_first() {
        let dir = TempDir::new().unwrap();
        contract::listing_is_most_recent_first(&kv_store_ready(&dir).await).await;
    }

    #[tokio::test]
    async fn test_re_adding_moves_record_to_front() {
        let dir = TempDir::new().unwrap();
        contract::re_adding_moves_record_to_front(&kv_store_ready(&dir).await).await;
    }

    #[tokio::test]
    async fn test_operations_before_init_fail() {
        let dir = TempDir::new().unwrap();
        let store = kv_store(&dir);

        let err = store.get_all_favorites().await.unwrap_err();
        assert!(matches!(err, StorageError::NotInitialized));
    }

    #[tokio::test]
    async fn test_missing_document_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let store = kv_store_ready(&dir).await;

        assert_eq!(store.get_all_favorites().await.unwrap().len(), 0);
        assert!(!store.is_favorite(25).await.unwrap());
    }

    #[tokio::test]
    async fn test_corrupt_document_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("favorites.json");
        std::fs::write(&path, "{not valid json").unwrap();

        let store = KvFavorites::new(&path);
        store.init().await.unwrap();

        assert_eq!(store.get_all_favorites().await.unwrap().len(), 0);

        // The store recovers: the next write replaces the corrupt document.
        store.add_favorite(25, "pikachu", None).await.unwrap();
        assert!(store.is_favorite(25).await.unwrap());
    }

    #[tokio::test]
    async fn test_document_layout_is_a_json_array() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("favorites.json");

        let store = KvFavorites::new(&path);
        store.init().await.unwrap();
        store.add_favorite(25, "pikachu", Some("img.png")).await.unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let entry = &parsed.as_array().unwrap()[0];
        assert_eq!(entry["id"], 25);
        assert_eq!(entry["name"], "pikachu");
        assert_eq!(entry["image_url"], "img.png");
        assert!(entry["created_at"].is_string());
    }
}
