//! # Pokedex Data Layer
//!
//! The client-side data layer of a Pokedex browsing application: a
//! request-deduplicating, freshness-window query cache over a thin
//! remote resource client and a locally persisted favorites store.
//!
//! ## Features
//!
//! - **Query cache**: at most one in-flight fetch per key, configurable
//!   freshness windows, deterministic invalidation after mutations
//! - **Infinite list**: cursor-based pagination with back-pressure
//! - **Favorites**: one contract, two backends (SQLite table or a
//!   single-document JSON key-value store), selected by an explicit flag
//! - **Evolution resolver**: three dependent cached stages flattening a
//!   recursive chain tree into ordered steps
//! - **Stats**: capped fan-out detail aggregation tolerant of partial
//!   failures
//!
//! ## Architecture
//!
//! ```text
//! UI -> DexClient (query cache) -> PokeApiClient (HTTP)
//!                               -> FavoritesStore (SQLite | JSON document)
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use pokedex_data::{Config, DexClient, ToggleFavorite};
//! use pokedex_data::api::PokeApiClient;
//! use pokedex_data::store::create_store;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let store = create_store(&config.storage);
//!     store.init().await?;
//!     let api = PokeApiClient::new(&config.api, &config.request)?;
//!     let dex = Arc::new(DexClient::new(api, store, &config));
//!
//!     let page = dex.pokemon_list(20, 0).await?;
//!     let detail = dex.pokemon_by_name(&page[0].name).await?;
//!     dex.toggle_favorite(ToggleFavorite {
//!         id: detail.id,
//!         name: detail.name.clone(),
//!         image_url: None,
//!         is_currently_favorite: false,
//!     })
//!     .await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

/// Remote resource client for the upstream Pokemon data provider.
pub mod api;
/// Generic async query cache with request deduplication.
pub mod cache;
/// Configuration management loaded from the environment.
pub mod config;
/// The query cache layer facade every read flows through.
pub mod dex;
/// Error types and result aliases for each layer.
pub mod error;
/// Logging initialization for the embedding app shell.
pub mod logging;
/// Favorites persistence behind two interchangeable backends.
pub mod store;

pub use config::Config;
pub use dex::{
    DexClient, EvolutionStep, FavoriteStats, InfiniteSnapshot, ListPage, PokemonSummary,
    ToggleFavorite,
};
pub use error::{DataError, DataResult};
