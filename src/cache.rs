//! Generic query cache — TTL staleness, stale-while-revalidate, in-flight
//! deduplication, bounded retry.
//!
//! ARCHITECTURE
//! ============
//! One slot per composite key. A slot carries the last successful value,
//! its fetch time, and at most one in-flight request shared as a
//! [`futures::future::Shared`] future: concurrent readers of one key all
//! await the same network call and observe the same result.
//!
//! Read semantics, in order:
//! - fresh cached value: served with no network call;
//! - stale cached value: served immediately while a background refetch
//!   revalidates the slot (stale-while-revalidate);
//! - no cached value (or invalidated slot): the read reports loading and
//!   resolves with the fetch.
//!
//! TRADE-OFFS
//! ==========
//! A failed refetch never evicts cached data (last-good-value-on-error);
//! readers get the prior value together with the error. In-flight requests
//! are not aborted when readers go away — a dropped reader simply never
//! observes the result.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use tokio::time::Instant;

use crate::error::ApiError;

/// Default staleness window after a successful fetch.
pub const DEFAULT_STALE_AFTER: Duration = Duration::from_secs(5 * 60);

/// Transient failures are retried this many times after the initial attempt.
const MAX_RETRIES: u32 = 3;
const RETRY_BASE_DELAY: Duration = Duration::from_millis(250);

type FetchResult<V> = Result<Arc<V>, ApiError>;
type SharedFetch<V> = Shared<BoxFuture<'static, FetchResult<V>>>;

/// Snapshot handed to query consumers: `{data, is_loading, error}`.
#[derive(Debug, Clone)]
pub struct QueryState<V> {
    /// Last known value, if any. Survives fetch failures.
    pub data: Option<Arc<V>>,
    /// True while no value exists yet or a revalidation is in flight.
    pub is_loading: bool,
    /// Failure of the most recent fetch, if it failed.
    pub error: Option<ApiError>,
}

impl<V> QueryState<V> {
    fn ready(data: Arc<V>) -> Self {
        Self { data: Some(data), is_loading: false, error: None }
    }

    fn revalidating(data: Arc<V>, error: Option<ApiError>) -> Self {
        Self { data: Some(data), is_loading: true, error }
    }

    fn failed(data: Option<Arc<V>>, error: ApiError) -> Self {
        Self { data, is_loading: false, error: Some(error) }
    }
}

struct Slot<V> {
    value: Option<Arc<V>>,
    fetched_at: Option<Instant>,
    /// Failure of the most recent completed fetch; cleared on success so
    /// stale reads keep surfacing the error until a revalidation lands.
    last_error: Option<ApiError>,
    /// Set by [`QueryCache::invalidate`]; forces the next read to refetch
    /// instead of serving the cached value.
    invalidated: bool,
    /// Bumped by [`QueryCache::invalidate`]. A fetch only publishes into the
    /// slot if the generation it started under is still current, so results
    /// from before a mutation never masquerade as post-mutation data.
    generation: u64,
    in_flight: Option<SharedFetch<V>>,
}

impl<V> Slot<V> {
    fn new() -> Self {
        Self {
            value: None,
            fetched_at: None,
            last_error: None,
            invalidated: false,
            generation: 0,
            in_flight: None,
        }
    }

    fn is_fresh(&self, stale_after: Duration) -> bool {
        !self.invalidated
            && self.value.is_some()
            && self.fetched_at.is_some_and(|at| at.elapsed() < stale_after)
    }

    /// Whether a read may be answered from the cached value while a
    /// revalidation runs in the background.
    fn can_serve_stale(&self) -> bool {
        self.value.is_some() && !self.invalidated
    }
}

/// Keyed read-through cache. Cheap to clone; clones share slots.
pub struct QueryCache<K, V> {
    inner: Arc<Mutex<HashMap<K, Slot<V>>>>,
    stale_after: Duration,
}

impl<K, V> Clone for QueryCache<K, V> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner), stale_after: self.stale_after }
    }
}

impl<K, V> Default for QueryCache<K, V>
where
    K: Eq + Hash + Clone + Send + 'static,
    V: Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

enum Plan<V> {
    Serve(QueryState<V>),
    Await(SharedFetch<V>),
    /// Serve the stale value now; the shared fetch revalidates in the
    /// background.
    Background(SharedFetch<V>, QueryState<V>),
}

impl<K, V> QueryCache<K, V>
where
    K: Eq + Hash + Clone + Send + 'static,
    V: Send + Sync + 'static,
{
    #[must_use]
    pub fn new() -> Self {
        Self::with_stale_after(DEFAULT_STALE_AFTER)
    }

    #[must_use]
    pub fn with_stale_after(stale_after: Duration) -> Self {
        Self { inner: Arc::new(Mutex::new(HashMap::new())), stale_after }
    }

    /// Read through the cache. `fetcher` is only invoked when the slot has
    /// no fresh value and no request is already in flight; retries re-invoke
    /// it, so it must be callable more than once.
    pub async fn fetch<F, Fut>(&self, key: K, fetcher: F) -> QueryState<V>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<V, ApiError>> + Send + 'static,
    {
        let plan = {
            let mut slots = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            let slot = slots.entry(key.clone()).or_insert_with(Slot::new);

            let fresh_value = slot
                .value
                .clone()
                .filter(|_| slot.is_fresh(self.stale_after));
            if let Some(value) = fresh_value {
                Plan::Serve(QueryState::ready(value))
            } else {
                let shared = match &slot.in_flight {
                    Some(shared) => shared.clone(),
                    None => {
                        let shared = self.begin_fetch(key.clone(), slot.generation, fetcher);
                        slot.in_flight = Some(shared.clone());
                        shared
                    }
                };
                let stale_value = slot.value.clone().filter(|_| slot.can_serve_stale());
                match stale_value {
                    Some(value) => Plan::Background(
                        shared,
                        QueryState::revalidating(value, slot.last_error.clone()),
                    ),
                    None => Plan::Await(shared),
                }
            }
        };

        match plan {
            Plan::Serve(state) => state,
            Plan::Background(shared, state) => {
                // Drive the revalidation independently of this reader.
                tokio::spawn(shared.map(|_| ()));
                state
            }
            Plan::Await(shared) => match shared.await {
                Ok(data) => QueryState::ready(data),
                Err(error) => {
                    let slots = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
                    let last_good = slots.get(&key).and_then(|slot| slot.value.clone());
                    QueryState::failed(last_good, error)
                }
            },
        }
    }

    /// Mark a slot stale. The next read of `key` performs a fresh fetch
    /// rather than serving the cached value. Any fetch already in flight is
    /// superseded: its result is discarded instead of published.
    pub fn invalidate(&self, key: &K) {
        let mut slots = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(slot) = slots.get_mut(key) {
            slot.invalidated = true;
            slot.generation = slot.generation.wrapping_add(1);
            slot.in_flight = None;
        }
    }

    /// Last known value for `key`, ignoring freshness.
    #[must_use]
    pub fn peek(&self, key: &K) -> Option<Arc<V>> {
        let slots = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        slots.get(key).and_then(|slot| slot.value.clone())
    }

    /// Build the shared retrying fetch future for `key`. The future
    /// publishes its outcome into the slot before resolving, unless the
    /// slot was invalidated since the fetch began.
    fn begin_fetch<F, Fut>(&self, key: K, generation: u64, fetcher: F) -> SharedFetch<V>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<V, ApiError>> + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        async move {
            let mut attempt = 0u32;
            let result = loop {
                attempt += 1;
                match fetcher().await {
                    Ok(value) => break Ok(Arc::new(value)),
                    Err(error) if error.is_retryable() && attempt <= MAX_RETRIES => {
                        tracing::debug!(attempt, error = %error, "query fetch failed, retrying");
                        tokio::time::sleep(RETRY_BASE_DELAY * attempt).await;
                    }
                    Err(error) => break Err(error),
                }
            };

            let mut slots = inner.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(slot) = slots.get_mut(&key) {
                if slot.generation == generation {
                    match &result {
                        Ok(value) => {
                            slot.value = Some(Arc::clone(value));
                            slot.fetched_at = Some(Instant::now());
                            slot.last_error = None;
                            slot.invalidated = false;
                        }
                        Err(error) => {
                            // Last good value is retained.
                            tracing::warn!(error = %error, "query fetch failed");
                            slot.last_error = Some(error.clone());
                        }
                    }
                    slot.in_flight = None;
                }
            }
            result
        }
        .boxed()
        .shared()
    }
}

#[cfg(test)]
#[path = "cache_test.rs"]
mod tests;
