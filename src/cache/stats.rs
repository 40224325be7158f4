//! Cache Statistics Module
//!
//! Tracks how fetches were served and how many entries cleanup removed.

use serde::Serialize;

// == Cache Stats ==
/// Counters for cache behaviour since process start (or the last clear).
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Fetches served from a fresh entry
    pub hits: u64,
    /// Fetches that went to the network
    pub misses: u64,
    /// Network failures answered with an expired in-memory entry
    pub stale_hits: u64,
    /// Network failures answered from the offline store
    pub offline_hits: u64,
    /// Entries removed by the size bound
    pub evictions: u64,
    /// Entries removed because they outlived the freshness window
    pub expirations: u64,
    /// Current number of entries in the cache
    pub total_entries: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Fraction of fetches answered without the network.
    ///
    /// Returns hits / (hits + misses), or 0.0 if nothing was fetched yet.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_stale_hit(&mut self) {
        self.stale_hits += 1;
    }

    pub fn record_offline_hit(&mut self) {
        self.offline_hits += 1;
    }

    pub fn record_evictions(&mut self, count: usize) {
        self.evictions += count as u64;
    }

    pub fn record_expirations(&mut self, count: usize) {
        self.expirations += count as u64;
    }

    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}
