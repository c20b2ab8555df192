use std::sync::atomic::Ordering;
use std::sync::Arc;

use futures_util::future::join_all;
use tracing::debug;

use super::{with_retry, DexClient};
use crate::cache::QueryState;
use crate::error::{DataError, DataResult};
use crate::store::FavoriteRecord;

/// Detail fetches issued for stats aggregation are capped to bound the
/// remote fan-out; the count still reflects every favorite.
const STATS_DETAIL_CAP: usize = 25;

/// Variables for the favorite toggle mutation.
#[derive(Debug, Clone)]
pub struct ToggleFavorite {
    /// Pokemon id.
    pub id: i64,
    /// Pokemon name, stored on add.
    pub name: String,
    /// Sprite URL, stored on add; defaults to empty.
    pub image_url: Option<String>,
    /// Current state as the caller observed it: `true` removes,
    /// `false` adds.
    pub is_currently_favorite: bool,
}

/// Aggregate statistics over the favorites list.
#[derive(Debug, Clone, PartialEq)]
pub struct FavoriteStats {
    /// Number of favorites, counted over the whole store.
    pub count: usize,
    /// Average base experience over the sampled details.
    pub avg_base_experience: f64,
    /// Average weight in kilograms over the sampled details.
    pub avg_weight_kg: f64,
    /// Average height in meters over the sampled details.
    pub avg_height_m: f64,
}

impl FavoriteStats {
    fn empty() -> Self {
        Self {
            count: 0,
            avg_base_experience: 0.0,
            avg_weight_kg: 0.0,
            avg_height_m: 0.0,
        }
    }
}

impl DexClient {
    /// All favorite records, most recently favorited first.
    ///
    /// Zero freshness window: every read refetches from the store so
    /// the latest local mutation is always reflected, deduplicated
    /// while a read is in flight.
    pub async fn favorites(&self) -> DataResult<Arc<Vec<FavoriteRecord>>> {
        let store = Arc::clone(&self.store);
        self.favorites
            .get_or_fetch((), async move {
                store.get_all_favorites().await.map_err(DataError::from)
            })
            .await
    }

    /// Snapshot the favorites list cache entry.
    pub fn favorites_state(&self) -> QueryState<Vec<FavoriteRecord>> {
        self.favorites.peek(&())
    }

    /// Whether `id` is currently favorited. Zero freshness window.
    pub async fn is_favorite(&self, id: i64) -> DataResult<bool> {
        let store = Arc::clone(&self.store);
        let flag = self
            .favorite_flags
            .get_or_fetch(id, async move {
                store.is_favorite(id).await.map_err(DataError::from)
            })
            .await?;
        Ok(*flag)
    }

    /// Toggle a favorite: remove when `is_currently_favorite`, upsert
    /// otherwise.
    ///
    /// The only mutation in the system, and not optimistic: dependent
    /// cache entries are invalidated only after the store confirms the
    /// write, never speculatively. Storage failures propagate to the
    /// caller unfiltered.
    pub async fn toggle_favorite(&self, vars: ToggleFavorite) -> DataResult<()> {
        self.toggle_pending.store(true, Ordering::SeqCst);

        let result = if vars.is_currently_favorite {
            self.store.remove_favorite(vars.id).await
        } else {
            self.store
                .add_favorite(vars.id, &vars.name, vars.image_url.as_deref())
                .await
        };

        self.toggle_pending.store(false, Ordering::SeqCst);
        result?;

        self.favorites.invalidate(&());
        self.favorite_flags.invalidate(&vars.id);
        self.stats.invalidate(&());

        debug!(
            id = vars.id,
            removed = vars.is_currently_favorite,
            "favorite toggled"
        );
        Ok(())
    }

    /// Whether a toggle mutation is currently in flight.
    pub fn is_toggle_pending(&self) -> bool {
        self.toggle_pending.load(Ordering::SeqCst)
    }

    /// Aggregate statistics over the favorites list.
    ///
    /// Reads all favorites, samples the 25 most recent, and fans out
    /// concurrent detail fetches. Individual fetch failures only drop
    /// that entry from the averages; the aggregate never fails because
    /// one item did. `count` covers every favorite, not just the sample.
    pub async fn favorite_stats(&self) -> DataResult<Arc<FavoriteStats>> {
        let store = Arc::clone(&self.store);
        let api = self.api.clone();
        let request = self.request.clone();

        self.stats
            .get_or_fetch((), async move {
                let favorites = store.get_all_favorites().await.map_err(DataError::from)?;
                if favorites.is_empty() {
                    return Ok(FavoriteStats::empty());
                }

                let fetches = favorites.iter().take(STATS_DETAIL_CAP).map(|record| {
                    let api = api.clone();
                    let request = request.clone();
                    let id = record.id;
                    async move {
                        let resource = format!("pokemon/{}", id);
                        with_retry(&request, &resource, || api.get_pokemon_by_id(id)).await
                    }
                });

                let details: Vec<_> = join_all(fetches)
                    .await
                    .into_iter()
                    .filter_map(|result| match result {
                        Ok(detail) => Some(detail),
                        Err(e) => {
                            debug!(error = %e, "stats detail fetch failed, excluding entry");
                            None
                        }
                    })
                    .collect();

                Ok(FavoriteStats {
                    count: favorites.len(),
                    avg_base_experience: rounded_avg(
                        details.iter().map(|d| d.base_experience.unwrap_or(0) as f64),
                    ),
                    avg_weight_kg: rounded_avg(
                        details.iter().map(|d| d.weight.unwrap_or(0) as f64 / 10.0),
                    ),
                    avg_height_m: rounded_avg(
                        details.iter().map(|d| d.height.unwrap_or(0) as f64 / 10.0),
                    ),
                })
            })
            .await
    }
}

/// Average rounded to one decimal place; zero for an empty input.
fn rounded_avg(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0u32), |(sum, n), v| (sum + v, n + 1));
    if n == 0 {
        0.0
    } else {
        ((sum / n as f64) * 10.0).round() / 10.0
    }
}
