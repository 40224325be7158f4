//! Fetch-with-cache orchestrator.

use std::future::Future;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use url::Url;

use super::clock::{Clock, SystemClock};
use crate::cache::{CacheStats, CacheStore};
use crate::error::Result;
use crate::offline::OfflineStore;

// == Fetch Cache ==
/// Serves reads from the in-memory cache, the network and the offline store,
/// in that order of preference.
///
/// Cloning is cheap; clones share the same store.
#[derive(Clone)]
pub struct FetchCache {
    store: Arc<RwLock<CacheStore>>,
    offline: Option<Arc<dyn OfflineStore>>,
    clock: Arc<dyn Clock>,
}

impl FetchCache {
    // == Constructor ==
    /// Creates an orchestrator over a fresh store using the system clock.
    pub fn new(max_entries: usize, cache_duration_ms: u64) -> Self {
        Self::from_store(CacheStore::new(max_entries, cache_duration_ms))
    }

    pub fn from_store(store: CacheStore) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            offline: None,
            clock: Arc::new(SystemClock),
        }
    }

    /// Adds the offline tier consulted after network and stale fallbacks.
    pub fn with_offline_store(mut self, offline: Arc<dyn OfflineStore>) -> Self {
        self.offline = Some(offline);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Sets the freshness window of the underlying store.
    ///
    /// Meant for construction time. If another clone is holding the store
    /// lock the window is left unchanged and a warning is logged.
    pub fn with_cache_duration(self, cache_duration_ms: u64) -> Self {
        match self.store.try_write() {
            Ok(mut store) => store.set_cache_duration_ms(cache_duration_ms),
            Err(_) => warn!(cache_duration_ms, "Cache store busy, duration not changed"),
        }
        self
    }

    // == Fetch With Cache ==
    /// Reads `key` through the cache.
    ///
    /// 1. A fresh entry is returned without calling `executor`.
    /// 2. Otherwise `executor` runs; a payload that decodes into `T` is stored
    ///    and returned.
    /// 3. If that fails, the expired entry for `key` seen before the request
    ///    is returned if there was one.
    /// 4. Otherwise the offline store is tried by exact key, then by the
    ///    key's path suffix; a match is promoted into the cache.
    /// 5. Otherwise the network error is returned.
    ///
    /// The clock is read once; that instant is used for every freshness check
    /// and as the timestamp of anything written.
    pub async fn fetch_with_cache<T, F, Fut>(&self, key: &str, executor: F) -> Result<T>
    where
        T: DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value>>,
    {
        let now = self.clock.now_ms();

        // Payload as of `now`, kept for the stale fallback. Writes to other
        // keys while the request is in flight may clean it out of the store.
        let stale = {
            let mut store = self.store.write().await;
            if let Some(entry) = store.get_fresh(key, now) {
                match T::deserialize(&entry.payload) {
                    Ok(data) => {
                        store.record_hit();
                        debug!(key, "Cache hit");
                        return Ok(data);
                    }
                    Err(err) => warn!(key, error = %err, "Cached payload does not decode, refetching"),
                }
            }
            store.record_miss();
            store.get(key).map(|entry| entry.payload.clone())
        };

        let network_error = match executor().await.and_then(|payload| {
            let data = T::deserialize(&payload)?;
            Ok((payload, data))
        }) {
            Ok((payload, data)) => {
                let mut store = self.store.write().await;
                store.put(key, payload, now);
                debug!(key, entries = store.len(), "Cached network response");
                return Ok(data);
            }
            Err(err) => err,
        };

        if let Some(payload) = stale {
            if let Ok(data) = T::deserialize(&payload) {
                self.store.write().await.record_stale_hit();
                warn!(key, error = %network_error, "Network request failed, using cached data");
                return Ok(data);
            }
        }

        if let Some(payload) = self.lookup_offline(key) {
            if let Ok(data) = T::deserialize(&payload) {
                let mut store = self.store.write().await;
                store.put(key, payload, now);
                store.record_offline_hit();
                info!(key, error = %network_error, "Network request failed, using offline data");
                return Ok(data);
            }
            warn!(key, "Offline payload does not decode");
        }

        warn!(key, error = %network_error, "Fetch failed with no fallback available");
        Err(network_error)
    }

    fn lookup_offline(&self, key: &str) -> Option<Value> {
        let offline = self.offline.as_ref()?;
        offline.lookup(key).or_else(|| {
            let id = resource_id(key)?;
            let found = offline.lookup_by_suffix(&id);
            if found.is_some() {
                debug!(key, resource = %id, "Offline store matched by suffix");
            }
            found
        })
    }

    // == Clear ==
    /// Drops every cached entry. Returns how many were removed.
    pub async fn clear(&self) -> usize {
        let removed = self.store.write().await.clear();
        info!(removed, "Cache cleared");
        removed
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }

    pub async fn stats(&self) -> CacheStats {
        self.store.read().await.stats()
    }

    /// Shared handle to the underlying store.
    pub fn store(&self) -> Arc<RwLock<CacheStore>> {
        Arc::clone(&self.store)
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }
}

// == Resource Identifier ==
/// Path and query of a request key, e.g. `/products/42` or
/// `/products?_page=1&_limit=12`.
///
/// Used to match offline entries stored under a different absolute URL.
pub fn resource_id(key: &str) -> Option<String> {
    let url = Url::parse(key).ok()?;
    let mut id = url.path().to_string();
    if let Some(query) = url.query() {
        id.push('?');
        id.push_str(query);
    }
    Some(id)
}
