//! Error types for playback control

use thiserror::Error;

/// Playback errors
///
/// None of these are fatal: the controller logs them at the dispatch
/// boundary and carries on with the session as it was.
#[derive(Debug, Error)]
pub enum PlayerError {
    /// Core failure (view item without a source, list store write)
    #[error(transparent)]
    Core(#[from] melowave_core::CoreError),

    /// Configuration could not be parsed
    #[error("Invalid config: {0}")]
    Config(#[from] toml::de::Error),

    /// Configuration could not be serialized
    #[error("Config serialization error: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlayerError>;
