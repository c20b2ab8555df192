use std::sync::Arc;

use super::{normalize_name, with_retry, DexClient};
use crate::api::PokemonDetail;
use crate::cache::QueryState;
use crate::error::DataResult;

impl DexClient {
    /// Fetch full detail for a pokemon by name.
    ///
    /// The name is normalized at this boundary; the cache is keyed by
    /// the normalized form. Served from cache within the detail
    /// freshness window. A name the provider does not know fails with
    /// [`crate::error::DataError::NotFound`].
    pub async fn pokemon_by_name(&self, name: &str) -> DataResult<Arc<PokemonDetail>> {
        let name = normalize_name(name);
        let api = self.api.clone();
        let request = self.request.clone();

        self.details
            .get_or_fetch(name.clone(), async move {
                let resource = format!("pokemon/{}", name);
                with_retry(&request, &resource, || api.get_pokemon_by_name(&name)).await
            })
            .await
    }

    /// Snapshot the cache entry for a pokemon detail.
    pub fn detail_state(&self, name: &str) -> QueryState<PokemonDetail> {
        self.details.peek(&normalize_name(name))
    }
}
