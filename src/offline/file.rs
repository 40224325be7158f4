//! JSON file offline store
//!
//! Persists responses as a single JSON object (`{ "<key>": <payload>, ... }`)
//! so they survive process restarts.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use directories::ProjectDirs;
use serde_json::Value;
use tracing::{debug, info};

use super::{find_by_suffix, OfflineStore};
use crate::error::{CatalogError, Result};

/// Offline store backed by a JSON file on disk.
///
/// The file is read once at [`JsonFileOfflineStore::open`]; lookups are served
/// from memory.
#[derive(Debug)]
pub struct JsonFileOfflineStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, Value>>,
}

impl JsonFileOfflineStore {
    /// Opens the store at `path`. A missing file opens as an empty store.
    ///
    /// # Errors
    /// Returns `Decode` if the file exists but is not a JSON object, and
    /// `Config` if it cannot be read.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let entries = match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str::<BTreeMap<String, Value>>(&content)?,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "Offline store file not found, starting empty");
                BTreeMap::new()
            }
            Err(err) => {
                return Err(CatalogError::Config(format!(
                    "failed to read offline store {}: {}",
                    path.display(),
                    err
                )))
            }
        };

        info!(path = %path.display(), entries = entries.len(), "Offline store opened");

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    /// Default location: `<platform cache dir>/catalog_cache/offline.json`.
    ///
    /// Returns `None` if no home directory can be determined.
    pub fn default_path() -> Option<PathBuf> {
        let dirs = ProjectDirs::from("", "", "catalog_cache")?;
        Some(dirs.cache_dir().join("offline.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Adds or replaces a stored response in memory. Call [`save`](Self::save)
    /// to persist.
    pub fn insert(&self, key: impl Into<String>, payload: Value) {
        self.entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.into(), payload);
    }

    /// Writes all entries back to the file, creating parent directories.
    pub fn save(&self) -> Result<()> {
        let json = {
            let entries = self
                .entries
                .read()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            serde_json::to_string_pretty(&*entries)?
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                CatalogError::Config(format!(
                    "failed to create offline store directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        fs::write(&self.path, json).map_err(|e| {
            CatalogError::Config(format!(
                "failed to write offline store {}: {}",
                self.path.display(),
                e
            ))
        })
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

impl OfflineStore for JsonFileOfflineStore {
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
