//! Host media engine port
//!
//! Abstracts the single audio output the session is bound to (an
//! `HtmlAudioElement` in the browser, a fake in tests).

use crate::types::PlayRequestId;

/// Host media engine
///
/// Commands are fire-and-forget. Everything the engine decides on its own
/// (metadata loaded, playing, paused, ended, error, play resolution) comes
/// back later as a [`crate::MediaEvent`] dispatched by the host.
pub trait MediaEngine {
    /// Assign the media locator to play
    fn set_source(&mut self, source: &str);

    /// (Re)load the assigned source
    fn load(&mut self);

    /// Ask the engine to start playback
    ///
    /// The outcome arrives later as `PlayResolved(request)` or
    /// `PlayRejected { request, .. }`. Implementations must not report the
    /// outcome synchronously from inside this call.
    fn play(&mut self, request: PlayRequestId);

    /// Pause playback; the engine confirms with a `Paused` event
    fn pause(&mut self);

    /// Whether the engine is currently paused
    fn is_paused(&self) -> bool;

    /// Locator last passed to `set_source`
    fn source(&self) -> Option<String>;

    /// Elapsed position in seconds
    fn current_time(&self) -> f64;

    /// Jump to a position in seconds
    fn set_current_time(&mut self, seconds: f64);

    /// Track length in seconds (`NaN` while unknown)
    fn duration(&self) -> f64;

    /// Output level; the engine clamps it to its own valid range
    fn set_volume(&mut self, level: f64);
}
