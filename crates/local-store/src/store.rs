//! Key/value store implementation

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::StoreError;

/// String key/value store. Values are JSON text, as in browser storage.
///
/// With a backing file, every write is flushed to disk.
#[derive(Debug)]
pub struct LocalStore {
    entries: Mutex<BTreeMap<String, String>>,
    path: Option<PathBuf>,
}

impl LocalStore {
    /// Create an in-memory store
    pub fn in_memory() -> Self {
        debug!("Creating in-memory local store");
        Self {
            entries: Mutex::new(BTreeMap::new()),
            path: None,
        }
    }

    /// Open a file-backed store, loading existing entries if the file exists
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        let entries = if path.exists() {
            let text = fs::read_to_string(&path)?;
            match serde_json::from_str::<BTreeMap<String, String>>(&text) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!("Discarding unreadable store file {}: {}", path.display(), e);
                    BTreeMap::new()
                }
            }
        } else {
            BTreeMap::new()
        };

        info!("Opened local store {} ({} entries)", path.display(), entries.len());

        Ok(Self {
            entries: Mutex::new(entries),
            path: Some(path),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<String, String>>, StoreError> {
        self.entries
            .lock()
            .map_err(|e| StoreError::Lock(e.to_string()))
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_vec_pretty(entries)?)?;
        Ok(())
    }

    /// Raw value for `key`
    pub fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.lock()?.get(key).cloned())
    }

    /// Store a raw value
    pub fn set_item(&self, key: &str, value: impl Into<String>) -> Result<(), StoreError> {
        let mut entries = self.lock()?;
        entries.insert(key.to_string(), value.into());
        self.flush(&entries)
    }

    /// Remove `key`; missing keys are fine
    pub fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.lock()?;
        if entries.remove(key).is_some() {
            self.flush(&entries)?;
        }
        Ok(())
    }

    /// Remove every key starting with `prefix`, returning how many were removed
    pub fn remove_prefixed(&self, prefix: &str) -> Result<usize, StoreError> {
        let mut entries = self.lock()?;
        let before = entries.len();
        entries.retain(|k, _| !k.starts_with(prefix));
        let removed = before - entries.len();
        if removed > 0 {
            self.flush(&entries)?;
        }
        Ok(removed)
    }

    /// Keys starting with `prefix`
    pub fn keys(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        Ok(self
            .lock()?
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }

    /// Serialize `value` under `key`
    pub fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let text = serde_json::to_string(value)?;
        self.set_item(key, text)
    }

    /// Deserialize the value under `key`
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        match self.get_item(key)? {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop everything
    pub fn clear(&self) -> Result<(), StoreError> {
        let mut entries = self.lock()?;
        entries.clear();
        self.flush(&entries)
    }
}

impl Default for LocalStore {
    fn default() -> Self {
        Self::in_memory()
    }
}
