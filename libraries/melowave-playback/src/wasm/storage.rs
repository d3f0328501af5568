//! Browser `localStorage` backend

use melowave_core::{CoreError, KeyValueStore, Result};
use web_sys::Storage;

/// `localStorage` for the current origin
///
/// Private browsing modes can make storage unavailable or throw on access;
/// reads then report nothing stored and writes return a storage error.
pub struct LocalStorageStore {
    storage: Option<Storage>,
}

impl LocalStorageStore {
    pub fn new() -> Self {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        if storage.is_none() {
            tracing::warn!("localStorage unavailable, lists will not persist");
        }
        Self { storage }
    }

    pub fn is_available(&self) -> bool {
        self.storage.is_some()
    }
}

impl Default for LocalStorageStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for LocalStorageStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let Some(storage) = &self.storage else {
            return Ok(None);
        };
        storage
            .get_item(key)
            .map_err(|e| CoreError::storage(format!("read {key}: {e:?}")))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let Some(storage) = &self.storage else {
            return Err(CoreError::storage("localStorage unavailable"));
        };
        storage
            .set_item(key, value)
            .map_err(|e| CoreError::storage(format!("write {key}: {e:?}")))
    }
}
