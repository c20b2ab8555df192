//! Generic async query cache with request deduplication.
//!
//! Every remote or local read in the crate flows through a
//! [`QueryCache`]: one cache per query family, keyed by the query's
//! parameters. The cache guarantees at most one in-flight fetch per
//! distinct key, serves values within their freshness window without
//! refetching, and keeps stale data readable while a refetch runs.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use tokio::sync::oneshot;

use crate::error::{DataError, DataResult};

/// Lifecycle state of a cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    /// No fetch has been issued for this key.
    Idle,
    /// A fetch is in flight.
    Loading,
    /// The last fetch succeeded.
    Success,
    /// The last fetch failed.
    Error,
}

/// Snapshot of a cache entry, the `{data, isLoading, error}` triple the
/// presentation layer consumes.
#[derive(Debug, Clone)]
pub struct QueryState<T> {
    /// Last successful value, if any. Stays populated while a refetch
    /// is in flight and after invalidation.
    pub data: Option<Arc<T>>,
    /// Entry lifecycle state.
    pub status: QueryStatus,
    /// Last error, cleared by the next successful fetch.
    pub error: Option<DataError>,
}

impl<T> QueryState<T> {
    /// Snapshot for a key no fetch has ever been issued for.
    pub fn idle() -> Self {
        Self {
            data: None,
            status: QueryStatus::Idle,
            error: None,
        }
    }

    /// Whether a fetch is currently in flight.
    pub fn is_loading(&self) -> bool {
        self.status == QueryStatus::Loading
    }
}

type Waiter<T> = oneshot::Sender<DataResult<Arc<T>>>;

struct Entry<T> {
    data: Option<Arc<T>>,
    fetched_at: Option<Instant>,
    error: Option<DataError>,
    /// `Some` while a fetch is in flight; holds every caller waiting on it.
    waiters: Option<Vec<Waiter<T>>>,
}

impl<T> Entry<T> {
    fn new() -> Self {
        Self {
            data: None,
            fetched_at: None,
            error: None,
            waiters: None,
        }
    }
}

struct Inner<K, T> {
    ttl: Duration,
    entries: Mutex<HashMap<K, Entry<T>>>,
}

impl<K: Eq + Hash, T> Inner<K, T> {
    fn lock(&self) -> MutexGuard<'_, HashMap<K, Entry<T>>> {
        self.entries.lock().expect("cache mutex poisoned")
    }

    fn is_fresh(&self, fetched_at: Instant) -> bool {
        !self.ttl.is_zero() && fetched_at.elapsed() < self.ttl
    }

    fn settle(&self, key: &K, result: DataResult<T>) {
        let mut entries = self.lock();
        let entry = match entries.get_mut(key) {
            Some(entry) => entry,
            None => return,
        };
        let waiters = entry.waiters.take().unwrap_or_default();
        match result {
            Ok(value) => {
                let value = Arc::new(value);
                entry.data = Some(value.clone());
                entry.fetched_at = Some(Instant::now());
                entry.error = None;
                for tx in waiters {
                    let _ = tx.send(Ok(value.clone()));
                }
            }
            Err(err) => {
                entry.error = Some(err.clone());
                for tx in waiters {
                    let _ = tx.send(Err(err.clone()));
                }
            }
        }
    }
}

/// A deduplicating, freshness-window cache for one query family.
///
/// Cheap to clone; clones share the same entries.
pub struct QueryCache<K, T> {
    inner: Arc<Inner<K, T>>,
}

impl<K, T> Clone for QueryCache<K, T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, T> QueryCache<K, T>
where
    K: Eq + Hash + Clone + Send + 'static,
    T: Send + Sync + 'static,
{
    /// Create a cache whose entries stay fresh for `ttl` after a fetch.
    ///
    /// A zero `ttl` makes every entry permanently stale: reads always
    /// refetch, still deduplicated while in flight.
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                ttl,
                entries: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Return the cached value for `key`, or run `fetch` to produce it.
    ///
    /// A fresh value is returned without touching `fetch` (the future is
    /// dropped unpolled). If a fetch for `key` is already in flight the
    /// caller joins it and receives the same result. Otherwise `fetch`
    /// is spawned as a task, so it runs to completion even if every
    /// caller is dropped mid-flight.
    pub async fn get_or_fetch<Fut>(&self, key: K, fetch: Fut) -> DataResult<Arc<T>>
    where
        Fut: Future<Output = DataResult<T>> + Send + 'static,
    {
        let rx = {
            let mut entries = self.inner.lock();
            let entry = entries.entry(key.clone()).or_insert_with(Entry::new);

            if let (Some(data), Some(at)) = (&entry.data, entry.fetched_at) {
                if self.inner.is_fresh(at) {
                    return Ok(data.clone());
                }
            }

            let (tx, rx) = oneshot::channel();
            match entry.waiters.as_mut() {
                Some(waiters) => waiters.push(tx),
                None => {
                    entry.waiters = Some(vec![tx]);
                    let inner = Arc::clone(&self.inner);
                    let key = key.clone();
                    tokio::spawn(async move {
                        let result = fetch.await;
                        inner.settle(&key, result);
                    });
                }
            }
            rx
        };

        match rx.await {
            Ok(result) => result,
            // The fetch task can only drop its waiters by panicking.
            Err(_) => Err(DataError::Network {
                message: "fetch task failed".to_string(),
            }),
        }
    }

    /// Mark the entry for `key` stale.
    ///
    /// The cached value stays readable through [`QueryCache::peek`]; the
    /// next [`QueryCache::get_or_fetch`] refetches. An in-flight fetch is
    /// unaffected.
    pub fn invalidate(&self, key: &K) {
        let mut entries = self.inner.lock();
        if let Some(entry) = entries.get_mut(key) {
            entry.fetched_at = None;
        }
    }

    /// Snapshot the entry for `key` without fetching.
    pub fn peek(&self, key: &K) -> QueryState<T> {
        let entries = self.inner.lock();
        match entries.get(key) {
            None => QueryState::idle(),
            Some(entry) => {
                let status = if entry.waiters.is_some() {
                    QueryStatus::Loading
                } else if entry.error.is_some() {
                    QueryStatus::Error
                } else if entry.data.is_some() {
                    QueryStatus::Success
                } else {
                    QueryStatus::Idle
                };
                QueryState {
                    data: entry.data.clone(),
                    status,
                    error: entry.error.clone(),
                }
            }
        }
    }
}
