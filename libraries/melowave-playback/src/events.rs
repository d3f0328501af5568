//! Session events
//!
//! Two directions:
//! - [`Input`] - everything the host feeds the controller: UI input, media
//!   engine callbacks, timer expiry
//! - [`SessionEvent`] - everything the controller asks the view to show,
//!   queued and drained by the host after each dispatch

use crate::types::{Glyph, ItemAction, PlayRequestId, SessionState, TimerId};
use melowave_core::{ListKey, TrackDescriptor};
use serde::{Deserialize, Serialize};

/// Input to the controller's dispatch
#[derive(Debug, Clone, PartialEq)]
pub enum Input<H> {
    /// User interaction
    Ui(UiEvent<H>),

    /// Media engine callback
    Media(MediaEvent),

    /// A timer armed through [`crate::Timers`] expired
    TimerFired(TimerId),
}

/// User interaction with the view
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent<H> {
    /// Delegated activation of an item affordance
    Activate { handle: H, action: ItemAction },

    /// Main play/pause control
    TogglePlayPause,

    /// Skip forward
    Next,

    /// Skip back
    Previous,

    /// Seek control moved (seconds)
    Seek(f64),

    /// Volume control moved
    Volume(f64),
}

/// Media engine callbacks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MediaEvent {
    /// Track duration became known
    LoadedMetadata { duration: f64 },

    /// Periodic position progress
    TimeUpdate { elapsed: f64 },

    /// Engine started playing (from any cause)
    Playing,

    /// Engine paused (from any cause, including OS media keys)
    Paused,

    /// Track played to its end
    Ended,

    /// Load/decode failure
    Error,

    /// Engine is starved for data
    Stalled,

    /// A play request started playback
    PlayResolved(PlayRequestId),

    /// A play request was declined by the host (e.g. autoplay policy)
    PlayRejected {
        request: PlayRequestId,
        reason: String,
    },
}

/// Affordance state pushed to the view on every visible change
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot<H> {
    /// State machine position
    pub state: SessionState,

    /// Last play/pause state observed from the engine
    pub is_playing: bool,

    /// Track loaded into the engine
    pub current: Option<TrackDescriptor>,

    /// Item to mark as current
    pub highlighted: Option<H>,
}

impl<H> SessionSnapshot<H> {
    /// Glyph for the main play/pause control
    pub fn main_glyph(&self) -> Glyph {
        if self.state == SessionState::Playing {
            Glyph::Pause
        } else {
            Glyph::Play
        }
    }

    /// Whether `source` is the loaded track
    ///
    /// Compared by source, so every list showing the track agrees.
    pub fn is_current(&self, source: &str) -> bool {
        self.current.as_ref().is_some_and(|t| t.is(source))
    }

    /// Glyph for the play control of an item showing `source`
    pub fn item_glyph(&self, source: &str) -> Glyph {
        if self.is_current(source) {
            self.main_glyph()
        } else {
            Glyph::Play
        }
    }
}

/// Output of the controller, drained by the host
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent<H> {
    /// Affordances changed
    Transition(SessionSnapshot<H>),

    /// Time display refresh
    TimeUpdate {
        elapsed: f64,
        duration: f64,
        elapsed_label: String,
        duration_label: String,
    },

    /// Upper bound for the seek control, whole seconds
    SeekRange { max: u64 },

    /// Transient message; replaces any notice still showing
    Notice(String),

    /// The current notice timed out
    NoticeDismissed,

    /// A persisted list changed and should be re-rendered
    ListChanged(ListKey),

    /// Save affordance for every item showing `source`
    SavedStateChanged { source: String, saved: bool },

    /// Hand off to the download-options dialog
    DownloadRequested(TrackDescriptor),
}
