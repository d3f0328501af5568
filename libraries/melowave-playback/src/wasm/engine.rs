//! `<audio>` element as the media engine

use super::Dispatcher;
use crate::{types::PlayRequestId, Input, MediaEngine, MediaEvent};
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlAudioElement;

/// Media engine backed by an `HtmlAudioElement`
///
/// `play()` promises are awaited on the microtask queue and reported back
/// through the dispatcher, so the outcome always arrives as a later input.
pub struct WebAudioEngine {
    audio: HtmlAudioElement,
    source: Option<String>,
    dispatcher: Dispatcher,
}

impl WebAudioEngine {
    pub fn new(audio: HtmlAudioElement, dispatcher: Dispatcher) -> Self {
        Self {
            audio,
            source: None,
            dispatcher,
        }
    }

    /// Underlying element, for wiring its media events
    pub fn element(&self) -> &HtmlAudioElement {
        &self.audio
    }
}

impl MediaEngine for WebAudioEngine {
    fn set_source(&mut self, source: &str) {
        self.audio.set_src(source);
        self.source = Some(source.to_string());
    }

    fn load(&mut self) {
        self.audio.load();
    }

    fn play(&mut self, request: PlayRequestId) {
        let dispatcher = self.dispatcher.clone();
        let promise = self.audio.play();

        wasm_bindgen_futures::spawn_local(async move {
            let outcome = match promise {
                Ok(promise) => JsFuture::from(promise).await.map(|_| ()),
                Err(e) => Err(e),
            };
            let event = match outcome {
                Ok(()) => MediaEvent::PlayResolved(request),
                Err(e) => MediaEvent::PlayRejected {
                    request,
                    reason: e
                        .as_string()
                        .unwrap_or_else(|| format!("{e:?}")),
                },
            };
            dispatcher.send(Input::Media(event));
        });
    }

    fn pause(&mut self) {
        if let Err(e) = self.audio.pause() {
            tracing::warn!(error = ?e, "Audio element refused to pause");
        }
    }

    fn is_paused(&self) -> bool {
        self.audio.paused()
    }

    fn source(&self) -> Option<String> {
        self.source.clone()
    }

    fn current_time(&self) -> f64 {
        self.audio.current_time()
    }

    fn set_current_time(&mut self, seconds: f64) {
        if seconds.is_finite() {
            self.audio.set_current_time(seconds.max(0.0));
        }
    }

    fn duration(&self) -> f64 {
        self.audio.duration()
    }

    fn set_volume(&mut self, level: f64) {
        let level = if level.is_finite() { level.clamp(0.0, 1.0) } else { 1.0 };
        self.audio.set_volume(level);
    }
}
