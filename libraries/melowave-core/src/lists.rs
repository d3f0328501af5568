//! Persistent recent/saved track lists
//!
//! Two independent records, each a JSON array of `{src, title, artist, cover}`
//! objects, live under stable keys in a `KeyValueStore`. Every read goes to
//! the backing store (no cached copy), and every mutation is a single
//! read-modify-write followed by a synchronous persist.
//!
//! Reads fail soft: an unavailable store or unparseable record reads as an
//! empty list, and a malformed entry inside an otherwise valid record is
//! skipped. Both are only logged.

use crate::error::Result;
use crate::storage::KeyValueStore;
use crate::types::{ListKey, TrackDescriptor};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Default key of the recent list record
pub const DEFAULT_RECENT_KEY: &str = "mw_recent_v1";

/// Default key of the saved list record
pub const DEFAULT_SAVED_KEY: &str = "mw_saved_v1";

/// Default capacity of the recent list
pub const DEFAULT_RECENT_CAPACITY: usize = 20;

/// Keys and bounds for the persisted lists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListStoreConfig {
    /// Record key for the recent list (default: `mw_recent_v1`)
    pub recent_key: String,

    /// Record key for the saved list (default: `mw_saved_v1`)
    pub saved_key: String,

    /// Maximum recent entries kept (default: 20)
    pub recent_capacity: usize,
}

impl Default for ListStoreConfig {
    fn default() -> Self {
        Self {
            recent_key: DEFAULT_RECENT_KEY.to_string(),
            saved_key: DEFAULT_SAVED_KEY.to_string(),
            recent_capacity: DEFAULT_RECENT_CAPACITY,
        }
    }
}

/// Recent/saved list CRUD over a key-value backend
///
/// Invariants held after every mutation:
/// - at most one entry per `source` in each list
/// - recent is most-recently-played first and never longer than its capacity
/// - saved is most-recently-saved first and unbounded
#[derive(Debug, Clone)]
pub struct ListStore<S> {
    backend: S,
    config: ListStoreConfig,
}

impl<S: KeyValueStore> ListStore<S> {
    /// Create a list store with the default keys and capacity
    pub fn new(backend: S) -> Self {
        Self::with_config(backend, ListStoreConfig::default())
    }

    /// Create a list store with explicit keys and capacity
    pub fn with_config(backend: S, config: ListStoreConfig) -> Self {
        Self { backend, config }
    }

    /// Keys and capacity in use
    pub fn config(&self) -> &ListStoreConfig {
        &self.config
    }

    /// Underlying key-value backend
    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Mutable access to the backend
    pub fn backend_mut(&mut self) -> &mut S {
        &mut self.backend
    }

    /// Current contents of a list
    ///
    /// Never fails: storage errors and malformed records read as empty,
    /// malformed entries are dropped from the result.
    pub fn list(&self, key: ListKey) -> Vec<TrackDescriptor> {
        let record_key = self.record_key(key);

        let raw = match self.backend.get(record_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(list = %key, error = %e, "List store unavailable, reading as empty");
                return Vec::new();
            }
        };

        let entries = match serde_json::from_str::<Vec<serde_json::Value>>(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(list = %key, error = %e, "Malformed list record, reading as empty");
                return Vec::new();
            }
        };

        // A bad entry costs only itself, the rest of the history survives
        let total = entries.len();
        let tracks: Vec<TrackDescriptor> = entries
            .into_iter()
            .filter_map(|entry| serde_json::from_value(entry).ok())
            .collect();
        if tracks.len() < total {
            tracing::warn!(
                list = %key,
                skipped = total - tracks.len(),
                "Skipping malformed list entries"
            );
        }
        tracks
    }

    /// Move (or insert) `track` to the front of the recent list
    ///
    /// Any entry with the same source is dropped first, then the list is
    /// truncated to capacity, evicting the oldest entries.
    pub fn record_played(&mut self, track: &TrackDescriptor) -> Result<()> {
        let mut recent = self.list(ListKey::Recent);
        recent.retain(|t| t.source != track.source);
        recent.insert(0, track.clone());
        recent.truncate(self.config.recent_capacity);

        tracing::debug!(source = %track.source, len = recent.len(), "Recorded played track");
        self.write(ListKey::Recent, &recent)
    }

    /// Save or un-save `track`, returning the resulting membership
    pub fn toggle_saved(&mut self, track: &TrackDescriptor) -> Result<bool> {
        let mut saved = self.list(ListKey::Saved);

        let now_saved = match saved.iter().position(|t| t.source == track.source) {
            Some(idx) => {
                saved.remove(idx);
                false
            }
            None => {
                saved.insert(0, track.clone());
                true
            }
        };

        tracing::debug!(source = %track.source, saved = now_saved, "Toggled saved track");
        self.write(ListKey::Saved, &saved)?;
        Ok(now_saved)
    }

    /// Whether a source is in the saved list
    pub fn is_saved(&self, source: &str) -> bool {
        self.list(ListKey::Saved).iter().any(|t| t.is(source))
    }

    /// Every saved source, for painting save affordances in one pass
    pub fn saved_sources(&self) -> HashSet<String> {
        self.list(ListKey::Saved)
            .into_iter()
            .map(|t| t.source)
            .collect()
    }

    /// Fill an empty recent list with `tracks`
    ///
    /// Does nothing when the recent list already has entries. Duplicate
    /// sources keep their first occurrence. Returns whether a write happened.
    pub fn seed_recent(&mut self, tracks: impl IntoIterator<Item = TrackDescriptor>) -> Result<bool> {
        if !self.list(ListKey::Recent).is_empty() {
            return Ok(false);
        }

        let mut seen = HashSet::new();
        let seed: Vec<TrackDescriptor> = tracks
            .into_iter()
            .filter(|t| seen.insert(t.source.clone()))
            .take(self.config.recent_capacity)
            .collect();

        if seed.is_empty() {
            return Ok(false);
        }

        tracing::info!(count = seed.len(), "Seeding empty recent list");
        self.write(ListKey::Recent, &seed)?;
        Ok(true)
    }

    fn record_key(&self, key: ListKey) -> &str {
        match key {
            ListKey::Recent => &self.config.recent_key,
            ListKey::Saved => &self.config.saved_key,
        }
    }

    fn write(&mut self, key: ListKey, tracks: &[TrackDescriptor]) -> Result<()> {
        let json = serde_json::to_string(tracks)?;
        let record_key = self.record_key(key).to_string();
        self.backend.set(&record_key, &json)
    }
}
