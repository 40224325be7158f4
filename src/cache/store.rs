//! Cache Store Module
//!
//! In-memory response cache with expiry-first, size-second cleanup.

use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;

use crate::cache::{CacheEntry, CacheStats};

// == Cleanup Report ==
/// Number of entries removed by one cleanup pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupReport {
    /// Entries removed because they reached the freshness window
    pub expired: usize,
    /// Entries removed to bring the store back under its size bound
    pub evicted: usize,
}

// == Cache Store ==
/// Maps request keys to cached payloads.
///
/// The size bound is enforced by [`CacheStore::cleanup`], which every
/// [`CacheStore::put`] runs before returning. There is no background timer.
#[derive(Debug)]
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries retained after cleanup
    max_entries: usize,
    /// Freshness window in milliseconds
    cache_duration_ms: u64,
    /// Next write sequence number
    next_seq: u64,
}

impl CacheStore {
    // == Constructor ==
    /// Creates an empty store.
    ///
    /// # Arguments
    /// * `max_entries` - Size bound enforced by cleanup
    /// * `cache_duration_ms` - Age at which an entry expires
    pub fn new(max_entries: usize, cache_duration_ms: u64) -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::new(),
            max_entries,
            cache_duration_ms,
            next_seq: 0,
        }
    }

    // == Get ==
    /// Looks up an entry by key, fresh or not. No side effects.
    pub fn get(&self, key: &str) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    // == Get Fresh ==
    /// Looks up an entry that is still inside the freshness window at `now`.
    pub fn get_fresh(&self, key: &str, now: u64) -> Option<&CacheEntry> {
        self.entries
            .get(key)
            .filter(|entry| entry.is_fresh(now, self.cache_duration_ms))
    }

    // == Put ==
    /// Inserts or replaces the entry for `key` written at `now`, then runs
    /// cleanup.
    pub fn put(&mut self, key: impl Into<String>, payload: Value, now: u64) -> CleanupReport {
        let key = key.into();
        let seq = self.next_seq;
        self.next_seq += 1;

        let entry = CacheEntry::new(key.clone(), payload, now, seq);
        self.entries.insert(key, entry);

        self.cleanup(now)
    }

    // == Cleanup ==
    /// Removes expired entries, then evicts the oldest entries until the store
    /// is within its size bound.
    ///
    /// Expiry is unconditional. Eviction orders by write timestamp, ties
    /// broken by write sequence.
    pub fn cleanup(&mut self, now: u64) -> CleanupReport {
        let duration = self.cache_duration_ms;
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.is_fresh(now, duration));
        let expired = before - self.entries.len();

        let mut evicted = 0;
        if self.entries.len() > self.max_entries {
            let mut by_age: Vec<(u64, u64, String)> = self
                .entries
                .values()
                .map(|entry| (entry.timestamp, entry.seq, entry.key.clone()))
                .collect();
            by_age.sort_unstable();

            let excess = self.entries.len() - self.max_entries;
            for (_, _, key) in by_age.into_iter().take(excess) {
                self.entries.remove(&key);
                evicted += 1;
            }
        }

        self.stats.record_expirations(expired);
        self.stats.record_evictions(evicted);
        self.stats.set_total_entries(self.entries.len());

        if expired > 0 || evicted > 0 {
            debug!(expired, evicted, remaining = self.entries.len(), "Cache cleanup");
        }

        CleanupReport { expired, evicted }
    }

    // == Clear ==
    /// Empties the store. Statistics counters are kept.
    pub fn clear(&mut self) -> usize {
        let removed = self.entries.len();
        self.entries.clear();
        self.stats.set_total_entries(0);
        removed
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    pub fn record_hit(&mut self) {
        self.stats.record_hit();
    }

    pub fn record_miss(&mut self) {
        self.stats.record_miss();
    }

    pub fn record_stale_hit(&mut self) {
        self.stats.record_stale_hit();
    }

    pub fn record_offline_hit(&mut self) {
        self.stats.record_offline_hit();
    }

    // == Accessors ==
    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn cache_duration_ms(&self) -> u64 {
        self.cache_duration_ms
    }

    /// Changes the freshness window. Existing entries are judged against the
    /// new window from the next lookup or cleanup on.
    pub fn set_cache_duration_ms(&mut self, cache_duration_ms: u64) {
        self.cache_duration_ms = cache_duration_ms;
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Iterates over the stored keys in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
