use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{with_retry, DexClient};
use crate::api::{pokemon_id_from_url, NamedResource};
use crate::cache::QueryState;
use crate::error::DataResult;

/// A pokemon as it appears in list results.
///
/// Produced fresh per list fetch. The `id` is extracted from the
/// trailing path segment of `resource_url` and is empty when the URL
/// does not match the expected shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonSummary {
    /// Pokemon id as a string; empty if extraction failed.
    pub id: String,
    /// Pokemon name.
    pub name: String,
    /// URL of the full resource.
    pub resource_url: String,
}

impl From<NamedResource> for PokemonSummary {
    fn from(resource: NamedResource) -> Self {
        Self {
            id: pokemon_id_from_url(&resource.url).unwrap_or_default(),
            name: resource.name,
            resource_url: resource.url,
        }
    }
}

/// One fetched page of the pokemon listing.
#[derive(Debug, Clone)]
pub struct ListPage {
    /// Summaries on this page.
    pub items: Vec<PokemonSummary>,
    /// Total count reported by the source.
    pub count: u32,
    /// Offset of the next page, or `None` when this page is the last.
    pub next_offset: Option<u32>,
}

pub(super) struct InfiniteState {
    pages: Vec<Arc<ListPage>>,
    /// `Some(0)` before the first fetch; `None` once exhausted.
    next_offset: Option<u32>,
    fetching: bool,
}

impl InfiniteState {
    fn new() -> Self {
        Self {
            pages: Vec::new(),
            next_offset: Some(0),
            fetching: false,
        }
    }

    fn snapshot(&self) -> InfiniteSnapshot {
        InfiniteSnapshot {
            pages: self.pages.clone(),
            has_next_page: self.next_offset.is_some(),
            is_fetching_next_page: self.fetching,
        }
    }
}

/// Observable state of an infinite list, per page size.
#[derive(Debug, Clone)]
pub struct InfiniteSnapshot {
    /// Pages fetched so far, in offset order.
    pub pages: Vec<Arc<ListPage>>,
    /// Whether another page exists beyond the fetched ones.
    pub has_next_page: bool,
    /// Whether a page fetch is currently in flight.
    pub is_fetching_next_page: bool,
}

impl InfiniteSnapshot {
    /// Total number of items across all fetched pages.
    pub fn item_count(&self) -> usize {
        self.pages.iter().map(|p| p.items.len()).sum()
    }
}

impl DexClient {
    /// Fetch a single page of the pokemon listing.
    ///
    /// Key `(limit, offset)`; served from cache within the list
    /// freshness window.
    pub async fn pokemon_list(&self, limit: u32, offset: u32) -> DataResult<Vec<PokemonSummary>> {
        Ok(self.list_page(limit, offset).await?.items.clone())
    }

    /// Snapshot the cache entry for one list page.
    pub fn list_state(&self, limit: u32, offset: u32) -> QueryState<ListPage> {
        self.lists.peek(&(limit, offset))
    }

    /// Observe the infinite list for `page_size`, fetching the first
    /// page if nothing has been fetched yet.
    pub async fn infinite_list(&self, page_size: u32) -> DataResult<InfiniteSnapshot> {
        let needs_first_page = {
            let mut states = self.infinite.lock().await;
            let state = states.entry(page_size).or_insert_with(InfiniteState::new);
            state.pages.is_empty() && !state.fetching
        };

        if needs_first_page {
            self.advance(page_size).await
        } else {
            let mut states = self.infinite.lock().await;
            let state = states.entry(page_size).or_insert_with(InfiniteState::new);
            Ok(state.snapshot())
        }
    }

    /// Fetch the next page of the infinite list.
    ///
    /// A no-op returning the current snapshot when a page fetch is
    /// already in flight or when pagination is exhausted. Pages already
    /// fetched are never re-fetched.
    pub async fn fetch_next_page(&self, page_size: u32) -> DataResult<InfiniteSnapshot> {
        self.advance(page_size).await
    }

    async fn advance(&self, page_size: u32) -> DataResult<InfiniteSnapshot> {
        let offset = {
            let mut states = self.infinite.lock().await;
            let state = states.entry(page_size).or_insert_with(InfiniteState::new);
            if state.fetching {
                return Ok(state.snapshot());
            }
            match state.next_offset {
                None => return Ok(state.snapshot()),
                Some(offset) => {
                    state.fetching = true;
                    offset
                }
            }
        };

        let result = self.list_page(page_size, offset).await;

        let mut states = self.infinite.lock().await;
        let state = states.entry(page_size).or_insert_with(InfiniteState::new);
        state.fetching = false;
        let page = result?;
        state.next_offset = page.next_offset;
        state.pages.push(page);
        Ok(state.snapshot())
    }

    /// Fetch one page through the list cache, so single-page reads and
    /// the infinite list deduplicate against each other.
    pub(super) async fn list_page(&self, limit: u32, offset: u32) -> DataResult<Arc<ListPage>> {
        let api = self.api.clone();
        let request = self.request.clone();

        self.lists
            .get_or_fetch((limit, offset), async move {
                let resource = format!("pokemon?offset={}&limit={}", offset, limit);
                let response =
                    with_retry(&request, &resource, || api.list_pokemon(offset, limit)).await?;

                let next_offset = if offset + limit < response.count {
                    Some(offset + limit)
                } else {
                    None
                };

                Ok(ListPage {
                    items: response.results.into_iter().map(PokemonSummary::from).collect(),
                    count: response.count,
                    next_offset,
                })
            })
            .await
    }
}
