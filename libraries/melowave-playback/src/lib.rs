//! Melowave - Playback Session Control
//!
//! Platform-agnostic controller for a single browser-style media engine.
//!
//! This crate provides:
//! - Track registry rebuilt from the rendered lists (priority order, wrap-around)
//! - Playback session state machine (Idle, Loading, Playing, Paused, Erroring)
//! - Stale-safe handling of asynchronous play requests
//! - One bounded, delayed retry after a media error
//! - Recent/saved list updates through `melowave-core`
//! - Transient notices with auto-dismiss
//!
//! # Architecture
//!
//! Everything the controller touches is a port:
//! - [`MediaEngine`] - the audio element (or a fake in tests)
//! - [`TrackView`] - the rendered item lists
//! - [`Timers`] - cancellable one-shot timers
//! - [`melowave_core::KeyValueStore`] - the persisted lists
//!
//! Inputs go in through [`PlaybackController::dispatch`]; view updates come
//! out through [`PlaybackController::drain_events`]. The browser bindings in
//! the `wasm` feature wire both ends to the DOM.
//!
//! # Example
//!
//! ```rust
//! use melowave_core::{MemoryStore, TrackDescriptor};
//! use melowave_playback::{
//!     ManualTimers, MediaEngine, PlaybackController, PlayerConfig, TrackView,
//!     types::PlayRequestId,
//! };
//!
//! #[derive(Default)]
//! struct SilentEngine {
//!     source: Option<String>,
//! }
//!
//! impl MediaEngine for SilentEngine {
//!     fn set_source(&mut self, source: &str) { self.source = Some(source.to_string()); }
//!     fn load(&mut self) {}
//!     fn play(&mut self, _request: PlayRequestId) {}
//!     fn pause(&mut self) {}
//!     fn is_paused(&self) -> bool { true }
//!     fn source(&self) -> Option<String> { self.source.clone() }
//!     fn current_time(&self) -> f64 { 0.0 }
//!     fn set_current_time(&mut self, _seconds: f64) {}
//!     fn duration(&self) -> f64 { f64::NAN }
//!     fn set_volume(&mut self, _level: f64) {}
//! }
//!
//! struct OneItem;
//!
//! impl TrackView for OneItem {
//!     type Handle = u32;
//!     fn items(&self, container: &str) -> Vec<u32> {
//!         if container == "playlist" { vec![1] } else { Vec::new() }
//!     }
//!     fn describe(&self, _handle: &u32) -> melowave_core::Result<TrackDescriptor> {
//!         Ok(TrackDescriptor::new("a.mp3").with_title("A"))
//!     }
//! }
//!
//! let mut controller = PlaybackController::new(
//!     SilentEngine::default(),
//!     OneItem,
//!     MemoryStore::new(),
//!     ManualTimers::new(),
//!     PlayerConfig::default(),
//! );
//! controller.start();
//!
//! assert_eq!(controller.current_track().map(|t| t.source.as_str()), Some("a.mp3"));
//! assert!(controller.has_pending_events());
//! ```

mod config;
mod controller;
mod engine;
mod error;
mod events;
mod format;
mod registry;
mod timers;
pub mod types;
mod view;

#[cfg(feature = "wasm")]
pub mod wasm;

// Public exports
pub use config::{PlayerConfig, SeedConfig};
pub use controller::PlaybackController;
pub use engine::MediaEngine;
pub use error::{PlayerError, Result};
pub use events::{Input, MediaEvent, SessionEvent, SessionSnapshot, UiEvent};
pub use format::format_time;
pub use registry::TrackRegistry;
pub use timers::{ManualTimers, Timers};
pub use view::TrackView;
