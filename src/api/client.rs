use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::types::{EvolutionChain, PokemonDetail, PokemonListResponse, PokemonSpecies};
use crate::config::{ApiConfig, RequestConfig};
use crate::error::{ApiError, ApiResult};

/// Thin client for the upstream Pokemon resource provider.
///
/// A pure transport adapter: no caching and no retries. All resilience
/// lives in the query cache layer above it.
#[derive(Clone)]
pub struct PokeApiClient {
    client: Client,
    base_url: String,
    timeout_ms: u64,
}

impl PokeApiClient {
    /// Create a new API client.
    pub fn new(config: &ApiConfig, request: &RequestConfig) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(request.timeout_ms))
            .build()
            .map_err(|e| ApiError::Transport {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout_ms: request.timeout_ms,
        })
    }

    /// Fetch one page of the pokemon listing.
    pub async fn list_pokemon(&self, offset: u32, limit: u32) -> ApiResult<PokemonListResponse> {
        let url = format!(
            "{}/pokemon?offset={}&limit={}",
            self.base_url, offset, limit
        );
        self.get_json(&url).await
    }

    /// Fetch full detail for a pokemon by name.
    pub async fn get_pokemon_by_name(&self, name: &str) -> ApiResult<PokemonDetail> {
        let url = format!("{}/pokemon/{}", self.base_url, name);
        self.get_json(&url).await
    }

    /// Fetch full detail for a pokemon by numeric id.
    pub async fn get_pokemon_by_id(&self, id: i64) -> ApiResult<PokemonDetail> {
        let url = format!("{}/pokemon/{}", self.base_url, id);
        self.get_json(&url).await
    }

    /// Fetch species detail by name; includes the evolution chain reference.
    pub async fn get_species_by_name(&self, name: &str) -> ApiResult<PokemonSpecies> {
        let url = format!("{}/pokemon-species/{}", self.base_url, name);
        self.get_json(&url).await
    }

    /// Fetch an evolution chain tree by numeric id.
    pub async fn get_evolution_chain_by_id(&self, id: u32) -> ApiResult<EvolutionChain> {
        let url = format!("{}/evolution-chain/{}", self.base_url, id);
        self.get_json(&url).await
    }

    /// Get the base URL (for testing)
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Execute a single GET and decode the JSON body (internal)
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        debug!(url = %url, "GET");

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout {
                    timeout_ms: self.timeout_ms,
                }
            } else {
                ApiError::Transport {
                    message: e.to_string(),
                }
            }
        })?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: body,
            });
        }

        response.json().await.map_err(|e| ApiError::Decode {
            message: format!("Failed to parse response: {}", e),
        })
    }
}
