//! Key-value backing stores
//!
//! The persisted lists only need "read a string by key" and "write a string
//! by key". Hosts pick the backend: `MemoryStore` for tests and ephemeral
//! sessions, `JsonFileStore` for a native host with a data directory, or a
//! browser `localStorage` adapter provided by the playback crate's `wasm`
//! feature.

mod file;
mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use crate::error::Result;

/// Synchronous string key-value store
///
/// Implementations must make a successful `set` visible to the next `get`
/// on the same key; callers hold no cached copies.
pub trait KeyValueStore {
    /// Read the value stored under `key`, `Ok(None)` when absent
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored under `key`
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}
