//! Core types for playback session control

use serde::{Deserialize, Serialize};

/// Session state machine
///
/// ```text
/// Idle ──load──▶ Loading ──play ok──▶ Playing ◀──▶ Paused
///                  │  ▲                  │
///            error │  │ retry fires      │ error
///                  ▼  │                  ▼
///                 Erroring ◀─────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    /// Nothing loaded yet
    #[default]
    Idle,

    /// A track is assigned to the engine, playback not confirmed
    Loading,

    /// The engine reports audio is playing
    Playing,

    /// The engine reports audio is paused
    Paused,

    /// A load/decode failure happened and a retry is pending
    Erroring,
}

impl SessionState {
    /// Convert to string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Playing => "playing",
            Self::Paused => "paused",
            Self::Erroring => "erroring",
        }
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Glyph shown on a play/pause control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Glyph {
    /// ▶
    Play,
    /// ⏸
    Pause,
}

impl Glyph {
    /// Text rendered on the control
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Play => "▶",
            Self::Pause => "⏸",
        }
    }
}

/// Affordance marker on a view item, carried by the delegated activation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemAction {
    Play,
    Save,
    Download,
}

impl ItemAction {
    /// Parse a `data-action` marker
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "play" => Some(Self::Play),
            "save" => Some(Self::Save),
            "download" => Some(Self::Download),
            _ => None,
        }
    }
}

/// Why playback was requested
///
/// Only `Selection` counts as intentional for the recent list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOrigin {
    /// Play affordance on a registry item
    Selection,
    /// Main toggle on the already loaded track
    Resume,
    /// Explicit next/previous or play-by-index
    Navigation,
    /// Natural end of the previous track
    AutoAdvance,
    /// Reload after a media error
    Retry,
}

/// Token tying an asynchronous play request to its resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayRequestId(pub u64);

/// Handle of a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerId(pub u64);
