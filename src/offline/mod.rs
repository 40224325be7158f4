//! Offline Store Module
//!
//! Secondary key → response tier consulted only after both the network and the
//! in-memory cache have failed. The fetch path treats it as read-only; the
//! `insert`/`save` methods on the implementations are for whatever process
//! populates it.

mod file;
mod memory;

use std::collections::BTreeMap;

use serde_json::Value;

pub use file::JsonFileOfflineStore;
pub use memory::MemoryOfflineStore;

// == Offline Store Trait ==
/// Read interface of the offline tier.
pub trait OfflineStore: Send + Sync {
    /// Exact lookup by request key.
    fn lookup(&self, key: &str) -> Option<Value>;

    /// Best-effort lookup of a stored key ending with `resource_id`
    /// (e.g. `/products/42`).
    ///
    /// Heuristic: a stored key that merely shares the suffix matches too.
    fn lookup_by_suffix(&self, resource_id: &str) -> Option<Value>;
}

/// First entry, in key order, whose key ends with `resource_id`.
///
/// An empty identifier never matches.
pub(crate) fn find_by_suffix(entries: &BTreeMap<String, Value>, resource_id: &str) -> Option<Value> {
    if resource_id.is_empty() {
        return None;
    }
    entries
        .iter()
        .find(|(key, _)| key.ends_with(resource_id))
        .map(|(_, value)| value.clone())
}
