//! Cache Module
//!
//! In-memory response cache with time-based expiry and size-bounded eviction.

mod entry;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use stats::CacheStats;
pub use store::{CacheStore, CleanupReport};

// == Public Constants ==
/// Age at which a cached response stops being served as fresh (5 minutes)
pub const CACHE_DURATION_MS: u64 = 5 * 60 * 1000;

/// Number of entries retained after each cleanup pass
pub const MAX_CACHE_SIZE: usize = 100;
