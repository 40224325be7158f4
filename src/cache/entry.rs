//! Cache Entry Module
//!
//! Defines a single cached response with its write timestamp.

use serde_json::Value;

// == Cache Entry ==
/// A cached response payload keyed by its request URL.
///
/// Entries are never mutated in place; a refresh replaces the whole entry.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    /// Request key (fully resolved URL)
    pub key: String,
    /// Decoded response body
    pub payload: Value,
    /// Write timestamp (Unix milliseconds)
    pub timestamp: u64,
    /// Store-assigned write sequence, breaks timestamp ties
    pub seq: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry written at `timestamp`.
    pub fn new(key: impl Into<String>, payload: Value, timestamp: u64, seq: u64) -> Self {
        Self {
            key: key.into(),
            payload,
            timestamp,
            seq,
        }
    }

    // == Age ==
    /// Milliseconds elapsed since the entry was written.
    ///
    /// Saturates at zero if `now` precedes the write (clock skew).
    pub fn age_ms(&self, now: u64) -> u64 {
        now.saturating_sub(self.timestamp)
    }

    // == Is Fresh ==
    /// Returns true while the entry is younger than `duration_ms`.
    ///
    /// Boundary condition: at exactly `duration_ms` the entry is expired.
    pub fn is_fresh(&self, now: u64, duration_ms: u64) -> bool {
        self.age_ms(now) < duration_ms
    }

    // == Is Expired ==
    pub fn is_expired(&self, now: u64, duration_ms: u64) -> bool {
        !self.is_fresh(now, duration_ms)
    }
}
