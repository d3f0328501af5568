//! Melowave Core
//!
//! Platform-agnostic building blocks shared by every Melowave host.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `TrackDescriptor`, `ListKey`
//! - **Backing Stores**: the `KeyValueStore` trait with in-memory and
//!   file-backed implementations
//! - **Persistent Lists**: `ListStore`, the recent/saved CRUD layer with
//!   size-capping and de-duplication by source
//! - **Error Handling**: unified `CoreError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use melowave_core::{ListKey, ListStore, MemoryStore, TrackDescriptor};
//!
//! let mut lists = ListStore::new(MemoryStore::new());
//! let track = TrackDescriptor::new("https://cdn.example/a.mp3").with_title("Song A");
//!
//! lists.record_played(&track).unwrap();
//! assert_eq!(lists.list(ListKey::Recent)[0], track);
//!
//! assert!(lists.toggle_saved(&track).unwrap());
//! assert!(lists.is_saved("https://cdn.example/a.mp3"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod lists;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use error::{CoreError, Result};
pub use lists::{ListStore, ListStoreConfig};
pub use storage::{JsonFileStore, KeyValueStore, MemoryStore};
pub use types::{ListKey, TrackDescriptor};
