//! WASM-facing player wiring the controller to a page

use super::{Dispatcher, DomView, LocalStorageStore, WebAudioEngine, WebTimers};
use crate::{
    types::ItemAction, Input, MediaEvent, PlaybackController, PlayerConfig, SessionEvent, UiEvent,
};
use js_sys::{Array, Function};
use melowave_core::{ListKey, TrackDescriptor};
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, EventTarget, HtmlAudioElement, HtmlInputElement};

type WebController = PlaybackController<WebAudioEngine, DomView, LocalStorageStore, WebTimers>;

/// Callback a session event is delivered to
#[derive(Debug, Clone, Copy)]
enum Slot {
    Transition,
    TimeUpdate,
    SeekRange,
    Notice,
    ListChanged,
    SavedChanged,
    Download,
}

#[derive(Default)]
struct Callbacks {
    on_transition: Option<Function>,
    on_time_update: Option<Function>,
    on_seek_range: Option<Function>,
    on_notice: Option<Function>,
    on_list_changed: Option<Function>,
    on_saved_changed: Option<Function>,
    on_download: Option<Function>,
}

impl Callbacks {
    fn get(&self, slot: Slot) -> Option<Function> {
        match slot {
            Slot::Transition => self.on_transition.clone(),
            Slot::TimeUpdate => self.on_time_update.clone(),
            Slot::SeekRange => self.on_seek_range.clone(),
            Slot::Notice => self.on_notice.clone(),
            Slot::ListChanged => self.on_list_changed.clone(),
            Slot::SavedChanged => self.on_saved_changed.clone(),
            Slot::Download => self.on_download.clone(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TransitionPayload<'a> {
    state: &'a str,
    playing: bool,
    glyph: &'static str,
    track: Option<&'a TrackDescriptor>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TimePayload<'a> {
    elapsed: f64,
    duration: f64,
    elapsed_label: &'a str,
    duration_label: &'a str,
}

struct Shared {
    controller: RefCell<WebController>,
    callbacks: RefCell<Callbacks>,
}

/// Deliver one browser input and flush the resulting events
fn deliver(shared: &Rc<Shared>, input: Input<Element>) {
    let Ok(mut controller) = shared.controller.try_borrow_mut() else {
        // Fired from inside a controller call; retry once it unwinds
        let weak = Rc::downgrade(shared);
        wasm_bindgen_futures::spawn_local(async move {
            if let Some(shared) = weak.upgrade() {
                deliver(&shared, input);
            }
        });
        return;
    };

    controller.dispatch(input);
    let outgoing = render_all(&mut controller);
    drop(controller);
    flush(shared, outgoing);
}

/// Turn queued events into callback arguments while the controller is
/// still borrowed
fn render_all(controller: &mut WebController) -> Vec<(Slot, Array)> {
    let events = controller.drain_events();
    events
        .into_iter()
        .map(|event| render(controller, event))
        .collect()
}

fn render(controller: &WebController, event: SessionEvent<Element>) -> (Slot, Array) {
    match event {
        SessionEvent::Transition(snapshot) => {
            let payload = TransitionPayload {
                state: snapshot.state.as_str(),
                playing: snapshot.is_playing,
                glyph: snapshot.main_glyph().symbol(),
                track: snapshot.current.as_ref(),
            };
            let highlighted = snapshot.highlighted.map_or(JsValue::NULL, JsValue::from);
            (Slot::Transition, args([to_js(&payload), highlighted]))
        }
        SessionEvent::TimeUpdate {
            elapsed,
            duration,
            elapsed_label,
            duration_label,
        } => {
            let payload = TimePayload {
                elapsed,
                duration,
                elapsed_label: &elapsed_label,
                duration_label: &duration_label,
            };
            (Slot::TimeUpdate, args([to_js(&payload)]))
        }
        SessionEvent::SeekRange { max } => (Slot::SeekRange, args([JsValue::from_f64(max as f64)])),
        SessionEvent::Notice(message) => (Slot::Notice, args([JsValue::from_str(&message)])),
        SessionEvent::NoticeDismissed => (Slot::Notice, args([JsValue::NULL])),
        SessionEvent::ListChanged(key) => {
            let tracks = controller.lists().list(key);
            (
                Slot::ListChanged,
                args([JsValue::from_str(key.as_str()), to_js(&tracks)]),
            )
        }
        SessionEvent::SavedStateChanged { source, saved } => (
            Slot::SavedChanged,
            args([JsValue::from_str(&source), JsValue::from_bool(saved)]),
        ),
        SessionEvent::DownloadRequested(track) => (Slot::Download, args([to_js(&track)])),
    }
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> JsValue {
    serde_wasm_bindgen::to_value(value).unwrap_or(JsValue::NULL)
}

fn args<const N: usize>(values: [JsValue; N]) -> Array {
    values.into_iter().collect()
}

/// Call the registered callbacks; lists re-rendered by a callback are
/// rescanned afterwards
fn flush(shared: &Rc<Shared>, outgoing: Vec<(Slot, Array)>) {
    let mut lists_changed = false;

    for (slot, arguments) in outgoing {
        lists_changed |= matches!(slot, Slot::ListChanged);
        let callback = shared.callbacks.borrow().get(slot);
        if let Some(callback) = callback {
            if let Err(e) = callback.apply(&JsValue::NULL, &arguments) {
                tracing::warn!(?slot, error = ?e, "Player callback threw");
            }
        }
    }

    if lists_changed {
        if let Ok(mut controller) = shared.controller.try_borrow_mut() {
            controller.rebuild_registry();
        }
    }
}

/// Browser playback controller
///
/// Owns the page's `#audio` element and listens on:
/// - the audio element's media events
/// - delegated clicks on `[data-action]` inside `.track` and `.card` items
/// - `#playPauseBtn`, `#nextBtn`, `#prevBtn`, `#seek` and `#volume`
///
/// View updates are pushed to the registered `on*` callbacks.
#[wasm_bindgen]
pub struct WebPlayer {
    shared: Rc<Shared>,
}

#[wasm_bindgen]
impl WebPlayer {
    /// Create a player with the default configuration
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<WebPlayer, JsValue> {
        Self::build(PlayerConfig::default())
    }

    /// Create a player from a TOML configuration string
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(toml: &str) -> Result<WebPlayer, JsValue> {
        let config =
            PlayerConfig::from_toml_str(toml).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Self::build(config)
    }

    /// Run the start-up sequence; call once callbacks are registered
    pub fn start(&self) {
        self.run(|c| c.start());
    }

    // ===== Playback Control =====

    /// Main play/pause control
    pub fn toggle(&self) {
        self.run(|c| c.toggle_play_pause());
    }

    pub fn next(&self) {
        self.run(|c| {
            if let Err(e) = c.next() {
                tracing::warn!(error = %e, "Skip forward failed");
            }
        });
    }

    pub fn previous(&self) {
        self.run(|c| {
            if let Err(e) = c.previous() {
                tracing::warn!(error = %e, "Skip back failed");
            }
        });
    }

    /// Seek to position in seconds
    pub fn seek(&self, position_secs: f64) {
        self.run(|c| c.seek(position_secs));
    }

    /// Set volume (0.0 - 1.0)
    #[wasm_bindgen(js_name = setVolume)]
    pub fn set_volume(&self, level: f64) {
        self.run(|c| c.set_volume(level));
    }

    /// Rescan the rendered lists after the page changed them
    pub fn rebuild(&self) {
        self.run(|c| c.rebuild_registry());
    }

    // ===== State Queries =====

    /// Session state ("idle" | "loading" | "playing" | "paused" | "erroring")
    pub fn state(&self) -> String {
        self.shared
            .controller
            .try_borrow()
            .map(|c| c.state().as_str().to_string())
            .unwrap_or_default()
    }

    /// Recent list, most recent first
    pub fn recent(&self) -> JsValue {
        self.list(ListKey::Recent)
    }

    /// Saved list, most recently saved first
    pub fn saved(&self) -> JsValue {
        self.list(ListKey::Saved)
    }

    #[wasm_bindgen(js_name = isSaved)]
    pub fn is_saved(&self, source: &str) -> bool {
        self.shared
            .controller
            .try_borrow()
            .is_ok_and(|c| c.lists().is_saved(source))
    }

    /// Every saved source, for painting save affordances after a render
    #[wasm_bindgen(js_name = savedSources)]
    pub fn saved_sources(&self) -> JsValue {
        let Ok(controller) = self.shared.controller.try_borrow() else {
            return JsValue::NULL;
        };
        let mut sources: Vec<String> = controller.lists().saved_sources().into_iter().collect();
        sources.sort();
        to_js(&sources)
    }

    // ===== Event Listeners =====

    /// `(snapshot, highlightedElement | null)`
    #[wasm_bindgen(js_name = onTransition)]
    pub fn on_transition(&self, callback: Function) {
        self.shared.callbacks.borrow_mut().on_transition = Some(callback);
    }

    /// `({ elapsed, duration, elapsedLabel, durationLabel })`
    #[wasm_bindgen(js_name = onTimeUpdate)]
    pub fn on_time_update(&self, callback: Function) {
        self.shared.callbacks.borrow_mut().on_time_update = Some(callback);
    }

    /// `(maxSeconds)`
    #[wasm_bindgen(js_name = onSeekRange)]
    pub fn on_seek_range(&self, callback: Function) {
        self.shared.callbacks.borrow_mut().on_seek_range = Some(callback);
    }

    /// `(message | null)`; null dismisses
    #[wasm_bindgen(js_name = onNotice)]
    pub fn on_notice(&self, callback: Function) {
        self.shared.callbacks.borrow_mut().on_notice = Some(callback);
    }

    /// `("recent" | "saved", tracks)`
    #[wasm_bindgen(js_name = onListChanged)]
    pub fn on_list_changed(&self, callback: Function) {
        self.shared.callbacks.borrow_mut().on_list_changed = Some(callback);
    }

    /// `(src, saved)`
    #[wasm_bindgen(js_name = onSavedChanged)]
    pub fn on_saved_changed(&self, callback: Function) {
        self.shared.callbacks.borrow_mut().on_saved_changed = Some(callback);
    }

    /// `(track)`
    #[wasm_bindgen(js_name = onDownload)]
    pub fn on_download(&self, callback: Function) {
        self.shared.callbacks.borrow_mut().on_download = Some(callback);
    }
}

impl WebPlayer {
    fn build(config: PlayerConfig) -> Result<WebPlayer, JsValue> {
        // Enable panic hooks for better error messages in console
        console_error_panic_hook::set_once();

        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("No document available"))?;
        let audio: HtmlAudioElement = document
            .get_element_by_id("audio")
            .ok_or_else(|| JsValue::from_str("Missing #audio element"))?
            .dyn_into()
            .map_err(|_| JsValue::from_str("#audio is not an <audio> element"))?;

        let dispatcher = Dispatcher::new();
        let controller = PlaybackController::new(
            WebAudioEngine::new(audio.clone(), dispatcher.clone()),
            DomView::new(document.clone()),
            LocalStorageStore::new(),
            WebTimers::new(dispatcher.clone()),
            config,
        );

        let shared = Rc::new(Shared {
            controller: RefCell::new(controller),
            callbacks: RefCell::new(Callbacks::default()),
        });

        let weak = Rc::downgrade(&shared);
        dispatcher.install(Rc::new(move |input| {
            if let Some(shared) = weak.upgrade() {
                deliver(&shared, input);
            }
        }));

        wire_media(&audio, &dispatcher)?;
        wire_items(&document, &dispatcher)?;
        wire_controls(&document, &dispatcher)?;

        tracing::info!("Web player wired");
        Ok(WebPlayer { shared })
    }

    fn run(&self, f: impl FnOnce(&mut WebController)) {
        let Ok(mut controller) = self.shared.controller.try_borrow_mut() else {
            tracing::warn!("Player busy, call ignored");
            return;
        };
        f(&mut controller);
        let outgoing = render_all(&mut controller);
        drop(controller);
        flush(&self.shared, outgoing);
    }

    fn list(&self, key: ListKey) -> JsValue {
        let Ok(controller) = self.shared.controller.try_borrow() else {
            return JsValue::NULL;
        };
        to_js(&controller.lists().list(key))
    }
}

// ===== DOM wiring =====

fn listen<F>(target: &EventTarget, name: &str, handler: F) -> Result<(), JsValue>
where
    F: FnMut(Event) + 'static,
{
    let callback = Closure::<dyn FnMut(Event)>::new(handler);
    target.add_event_listener_with_callback(name, callback.as_ref().unchecked_ref())?;
    // Listeners live as long as the page
    callback.forget();
    Ok(())
}

fn wire_media(audio: &HtmlAudioElement, dispatcher: &Dispatcher) -> Result<(), JsValue> {
    let fixed = [
        ("playing", MediaEvent::Playing),
        ("pause", MediaEvent::Paused),
        ("ended", MediaEvent::Ended),
        ("error", MediaEvent::Error),
        ("stalled", MediaEvent::Stalled),
    ];
    for (name, event) in fixed {
        let d = dispatcher.clone();
        listen(audio, name, move |_| d.send(Input::Media(event.clone())))?;
    }

    let d = dispatcher.clone();
    let element = audio.clone();
    listen(audio, "loadedmetadata", move |_| {
        d.send(Input::Media(MediaEvent::LoadedMetadata {
            duration: element.duration(),
        }));
    })?;

    let d = dispatcher.clone();
    let element = audio.clone();
    listen(audio, "timeupdate", move |_| {
        d.send(Input::Media(MediaEvent::TimeUpdate {
            elapsed: element.current_time(),
        }));
    })
}

fn wire_items(document: &Document, dispatcher: &Dispatcher) -> Result<(), JsValue> {
    let d = dispatcher.clone();
    listen(document, "click", move |event| {
        let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
            return;
        };
        let Ok(Some(button)) = target.closest("[data-action]") else {
            return;
        };
        let Some(action) = button
            .get_attribute("data-action")
            .as_deref()
            .and_then(ItemAction::from_str)
        else {
            return;
        };
        let Ok(Some(item)) = button.closest(".track, .card") else {
            return;
        };
        d.send(Input::Ui(UiEvent::Activate { handle: item, action }));
    })
}

fn wire_controls(document: &Document, dispatcher: &Dispatcher) -> Result<(), JsValue> {
    let buttons = [
        ("playPauseBtn", UiEvent::TogglePlayPause),
        ("nextBtn", UiEvent::Next),
        ("prevBtn", UiEvent::Previous),
    ];
    for (id, event) in buttons {
        let Some(button) = document.get_element_by_id(id) else {
            tracing::debug!(id, "Control not on page");
            continue;
        };
        let d = dispatcher.clone();
        listen(&button, "click", move |_| d.send(Input::Ui(event.clone())))?;
    }

    let sliders: [(&str, fn(f64) -> UiEvent<Element>); 2] =
        [("seek", UiEvent::Seek), ("volume", UiEvent::Volume)];
    for (id, make) in sliders {
        let Some(slider) = document
            .get_element_by_id(id)
            .and_then(|e| e.dyn_into::<HtmlInputElement>().ok())
        else {
            tracing::debug!(id, "Control not on page");
            continue;
        };
        let d = dispatcher.clone();
        let input = slider.clone();
        listen(&slider, "input", move |_| {
            d.send(Input::Ui(make(input.value_as_number())));
        })?;
    }
    Ok(())
}
