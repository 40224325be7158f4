//! In-memory offline store.

use std::collections::BTreeMap;
use std::sync::RwLock;

use serde_json::Value;

use super::{find_by_suffix, OfflineStore};

/// Offline store held in process memory.
#[derive(Debug, Default)]
pub struct MemoryOfflineStore {
    entries: RwLock<BTreeMap<String, Value>>,
}

impl MemoryOfflineStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a stored response.
    pub fn insert(&self, key: impl Into<String>, payload: Value) {
        self.entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.into(), payload);
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl OfflineStore for MemoryOfflineStore {
    fn lookup(&self, key: &str) -> Option<Value> {
        self.entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(key)
            .cloned()
    }

    fn lookup_by_suffix(&self, resource_id: &str) -> Option<Value> {
        let entries = self
            .entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        find_by_suffix(&entries, resource_id)
    }
}
