//! The query cache layer: a single chokepoint for every remote and
//! local read in the Pokedex.
//!
//! [`DexClient`] wraps the remote resource client and the favorites
//! store behind one [`crate::cache::QueryCache`] per query family. It
//! guarantees request deduplication per key, freshness windows from
//! configuration, deterministic invalidation after the toggle mutation,
//! and conversion of raw transport/storage causes into the
//! [`crate::error::DataError`] taxonomy. Construct it once at process
//! start and share it by [`Arc`]; it is never reached through ambient
//! globals.

mod detail;
mod evolution;
mod favorites;
mod list;

pub use evolution::EvolutionStep;
pub use favorites::{FavoriteStats, ToggleFavorite};
pub use list::{InfiniteSnapshot, ListPage, PokemonSummary};

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::warn;

use crate::api::{EvolutionChain, PokeApiClient, PokemonDetail, PokemonSpecies};
use crate::cache::QueryCache;
use crate::config::{Config, RequestConfig};
use crate::error::{ApiError, DataResult};
use crate::store::{FavoriteRecord, FavoritesStore};

use list::InfiniteState;

/// The cache-aware data-fetching facade every screen reads through.
pub struct DexClient {
    api: PokeApiClient,
    store: Arc<dyn FavoritesStore>,
    request: RequestConfig,

    lists: QueryCache<(u32, u32), ListPage>,
    details: QueryCache<String, PokemonDetail>,
    species: QueryCache<String, PokemonSpecies>,
    chains: QueryCache<u32, EvolutionChain>,
    steps: QueryCache<u32, Vec<EvolutionStep>>,
    favorites: QueryCache<(), Vec<FavoriteRecord>>,
    favorite_flags: QueryCache<i64, bool>,
    stats: QueryCache<(), FavoriteStats>,

    /// Cursor state per page size for the infinite list.
    infinite: Mutex<HashMap<u32, InfiniteState>>,
    toggle_pending: AtomicBool,
}

impl DexClient {
    /// Create the facade over an API client and an initialized store,
    /// with freshness windows taken from `config.cache`.
    pub fn new(api: PokeApiClient, store: Arc<dyn FavoritesStore>, config: &Config) -> Self {
        let cache = &config.cache;
        Self {
            api,
            store,
            request: config.request.clone(),
            lists: QueryCache::new(cache.list_ttl),
            details: QueryCache::new(cache.detail_ttl),
            species: QueryCache::new(cache.evolution_ttl),
            chains: QueryCache::new(cache.evolution_ttl),
            steps: QueryCache::new(cache.evolution_ttl),
            favorites: QueryCache::new(cache.favorites_ttl),
            favorite_flags: QueryCache::new(cache.favorites_ttl),
            stats: QueryCache::new(cache.favorites_ttl),
            infinite: Mutex::new(HashMap::new()),
            toggle_pending: AtomicBool::new(false),
        }
    }
}

/// Normalize a pokemon name into its cache/request form.
///
/// The upstream provider is case-sensitive and lowercase; fixing the
/// casing here makes cache keys and request paths agree by construction.
pub(crate) fn normalize_name(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}

/// Run `attempt`, allowing transparent retries for retryable failures.
///
/// `resource` names what is being fetched for error mapping and logs.
/// `NotFound` is never retried; the retry budget comes from the request
/// configuration (a single retry by default).
pub(crate) async fn with_retry<T, F, Fut>(
    request: &RequestConfig,
    resource: &str,
    mut attempt: F,
) -> DataResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let mut retries = 0;
    loop {
        match attempt().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                let err = e.into_data_error(resource);
                if err.is_retryable() && retries < request.max_retries {
                    retries += 1;
                    warn!(
                        resource = %resource,
                        retry = retries,
                        error = %err,
                        "retrying after transient failure"
                    );
                    tokio::time::sleep(Duration::from_millis(request.retry_delay_ms)).await;
                    continue;
                }
                return Err(err);
            }
        }
    }
}
