//! Playback session controller - core orchestration
//!
//! Binds one media engine to the track registry and the persisted lists.
//! All work happens inside [`PlaybackController::dispatch`] (or the named
//! operations it routes to) on a single logical thread; asynchronous
//! outcomes come back as later inputs and are matched against the state
//! they were issued for.

use crate::{
    config::PlayerConfig,
    engine::MediaEngine,
    error::Result,
    events::{Input, MediaEvent, SessionEvent, SessionSnapshot, UiEvent},
    format::format_time,
    registry::TrackRegistry,
    timers::Timers,
    types::{ItemAction, PlayOrigin, PlayRequestId, SessionState, TimerId},
    view::TrackView,
};
use melowave_core::{KeyValueStore, ListKey, ListStore, TrackDescriptor};

const NOTICE_PLAYBACK_BLOCKED: &str = "Playback blocked. Press ▶ to play.";
const NOTICE_RESUME_FAILED: &str = "Could not start playback";
const NOTICE_RETRYING: &str = "Audio failed to load. Retrying…";
const NOTICE_LOAD_FAILED: &str = "Audio failed to load. Press ▶ to try again.";
const NOTICE_BUFFERING: &str = "Buffering…";

/// Play request awaiting its resolution
#[derive(Debug, Clone)]
struct PendingPlay {
    id: PlayRequestId,
    source: String,
    origin: PlayOrigin,
}

/// Live playback state
#[derive(Debug)]
struct Session<H> {
    state: SessionState,

    /// Navigation cursor into the registry; may be stale after a rebuild
    current_index: usize,

    /// Descriptor loaded into the engine, independent of registry membership
    current_track: Option<TrackDescriptor>,

    /// Item the current track was loaded from
    current_handle: Option<H>,

    /// Mirrors the engine's own play/pause events
    is_playing: bool,

    /// At most one armed retry timer
    pending_retry: Option<TimerId>,

    /// The single retry for the current load has run; only a new load
    /// clears it
    retry_attempted: bool,

    /// Duration of the loaded source is known, so it can be scrubbed
    metadata_ready: bool,

    /// Latest play request; older resolutions are stale
    pending_play: Option<PendingPlay>,
}

impl<H> Default for Session<H> {
    fn default() -> Self {
        Self {
            state: SessionState::Idle,
            current_index: 0,
            current_track: None,
            current_handle: None,
            is_playing: false,
            pending_retry: None,
            retry_attempted: false,
            metadata_ready: false,
            pending_play: None,
        }
    }
}

/// Central playback session control
///
/// Orchestrates:
/// - Loading tracks into the engine and requesting playback
/// - Skip, auto-advance, seek and volume
/// - Affordance sync from the engine's authoritative play/pause events
/// - The single bounded retry after a media error
/// - Recent/saved list updates on user actions
///
/// The controller never blocks and never fails outward: errors from the
/// view or the list store are logged and the session keeps its state.
pub struct PlaybackController<E, V, S, T>
where
    V: TrackView,
{
    engine: E,
    view: V,
    timers: T,
    lists: ListStore<S>,
    registry: TrackRegistry<V::Handle>,
    session: Session<V::Handle>,
    config: PlayerConfig,

    next_request: u64,
    notice_timer: Option<TimerId>,

    // Event queue for view synchronization
    pending_events: Vec<SessionEvent<V::Handle>>,
    last_snapshot: Option<SessionSnapshot<V::Handle>>,
}

impl<E, V, S, T> PlaybackController<E, V, S, T>
where
    E: MediaEngine,
    V: TrackView,
    S: KeyValueStore,
    T: Timers,
{
    /// Create a controller in `Idle`
    ///
    /// Nothing touches the engine or the view until [`Self::start`].
    pub fn new(engine: E, view: V, store: S, timers: T, config: PlayerConfig) -> Self {
        Self {
            engine,
            view,
            timers,
            lists: ListStore::with_config(store, config.lists.clone()),
            registry: TrackRegistry::new(config.containers.iter().cloned()),
            session: Session::default(),
            config,
            next_request: 0,
            notice_timer: None,
            pending_events: Vec::new(),
            last_snapshot: None,
        }
    }

    /// Start-up sequence
    ///
    /// Applies the initial volume, seeds an empty recent list, scans the
    /// registry, and loads (without playing) the first item of the initial
    /// container.
    pub fn start(&mut self) {
        self.engine.set_volume(self.config.initial_volume);

        if let Some(seed) = self.config.seed_recent.clone() {
            let tracks: Vec<TrackDescriptor> = self
                .view
                .items(&seed.container)
                .iter()
                .take(seed.count)
                .filter_map(|h| self.view.describe(h).ok())
                .collect();
            match self.lists.seed_recent(tracks) {
                Ok(true) => self.emit(SessionEvent::ListChanged(ListKey::Recent)),
                Ok(false) => {}
                Err(e) => tracing::warn!(error = %e, "Could not seed recent list"),
            }
        }

        self.rebuild_registry();

        let initial = self
            .config
            .initial_container
            .clone()
            .filter(|c| !c.is_empty());
        if let Some(container) = initial {
            if let Some(first) = self.view.items(&container).into_iter().next() {
                match self.view.describe(&first) {
                    Ok(track) => self.load_track(track, Some(first)),
                    Err(e) => tracing::warn!(error = %e, "Initial item has no playable source"),
                }
            }
        }

        self.sync_affordances();
        tracing::info!(tracks = self.registry.len(), "Playback controller started");
    }

    // ===== Dispatch =====

    /// Route one input to its handler
    pub fn dispatch(&mut self, input: Input<V::Handle>) {
        let result = match input {
            Input::Ui(event) => self.handle_ui(event),
            Input::Media(event) => {
                self.handle_media(event);
                Ok(())
            }
            Input::TimerFired(id) => {
                self.handle_timer(id);
                Ok(())
            }
        };

        if let Err(e) = result {
            tracing::warn!(error = %e, "Input handling failed");
        }
    }

    fn handle_ui(&mut self, event: UiEvent<V::Handle>) -> Result<()> {
        match event {
            UiEvent::Activate { handle, action } => self.activate(handle, action),
            UiEvent::TogglePlayPause => {
                self.toggle_play_pause();
                Ok(())
            }
            UiEvent::Next => self.next(),
            UiEvent::Previous => self.previous(),
            UiEvent::Seek(position) => {
                self.seek(position);
                Ok(())
            }
            UiEvent::Volume(level) => {
                self.set_volume(level);
                Ok(())
            }
        }
    }

    fn handle_media(&mut self, event: MediaEvent) {
        match event {
            MediaEvent::LoadedMetadata { duration } => {
                let known = duration.is_finite() && duration > 0.0;
                self.session.metadata_ready = known;
                let max = if known { duration.floor() as u64 } else { 0 };
                self.emit(SessionEvent::SeekRange { max });
                self.emit_time(self.engine.current_time(), duration);
            }
            MediaEvent::TimeUpdate { elapsed } => {
                self.emit_time(elapsed, self.engine.duration());
            }
            MediaEvent::Playing => self.on_engine_playing(),
            MediaEvent::Paused => self.on_engine_paused(),
            MediaEvent::Ended => self.on_ended(),
            MediaEvent::Error => self.on_media_error(),
            MediaEvent::Stalled => self.notice(NOTICE_BUFFERING),
            MediaEvent::PlayResolved(request) => self.on_play_resolved(request),
            MediaEvent::PlayRejected { request, reason } => self.on_play_rejected(request, &reason),
        }
    }

    fn handle_timer(&mut self, id: TimerId) {
        if self.session.pending_retry == Some(id) {
            self.on_retry_fired();
        } else if self.notice_timer == Some(id) {
            self.notice_timer = None;
            self.emit(SessionEvent::NoticeDismissed);
        } else {
            tracing::debug!(timer = id.0, "Ignoring fire of untracked timer");
        }
    }

    // ===== Playback Control =====

    /// Assign a track to the engine without starting playback
    ///
    /// Resets the time display and main glyph, marks `handle` (if any) as
    /// the current item, and supersedes any pending retry or play request.
    pub fn load_track(&mut self, track: TrackDescriptor, handle: Option<V::Handle>) {
        self.cancel_retry();
        self.session.retry_attempted = false;
        self.session.metadata_ready = false;
        self.session.pending_play = None;

        self.engine.set_source(&track.source);
        self.engine.load();
        tracing::info!(source = %track.source, title = %track.title, "Loading track");

        self.session.current_track = Some(track);
        self.session.current_handle = handle;
        self.session.state = SessionState::Loading;
        self.session.is_playing = !self.engine.is_paused();

        self.emit_time(0.0, 0.0);
        self.sync_affordances();
    }

    /// Request playback of the loaded track
    pub fn play_current(&mut self) {
        if self.session.current_track.is_none() {
            tracing::debug!("Play requested with nothing loaded");
            return;
        }
        // A manual play supersedes the automatic retry
        self.cancel_retry();
        if self.session.state == SessionState::Erroring {
            self.session.state = SessionState::Loading;
            self.sync_affordances();
        }
        self.request_play(PlayOrigin::Resume);
    }

    /// Load and play the registry item at `index` (wrapping)
    pub fn play_by_index(&mut self, index: isize) -> Result<()> {
        self.play_index(index, PlayOrigin::Navigation)
    }

    /// Skip to the next registry item
    pub fn next(&mut self) -> Result<()> {
        self.play_index(self.session.current_index as isize + 1, PlayOrigin::Navigation)
    }

    /// Skip to the previous registry item
    pub fn previous(&mut self) -> Result<()> {
        self.play_index(self.session.current_index as isize - 1, PlayOrigin::Navigation)
    }

    /// Ask the engine to pause
    ///
    /// Affordances follow once the engine confirms with `Paused`.
    pub fn pause(&mut self) {
        self.engine.pause();
    }

    /// Main control: play when the engine is paused, pause otherwise
    pub fn toggle_play_pause(&mut self) {
        if self.engine.is_paused() {
            self.play_current();
        } else {
            self.pause();
        }
    }

    /// Jump to `position` seconds
    ///
    /// Applies while playing or paused, and to a loaded track whose
    /// metadata has arrived even if it was never started.
    pub fn seek(&mut self, position: f64) {
        if !position.is_finite() {
            tracing::debug!(position, "Ignoring non-finite seek");
            return;
        }
        match self.session.state {
            SessionState::Playing | SessionState::Paused => {
                self.engine.set_current_time(position);
            }
            SessionState::Loading if self.session.metadata_ready => {
                self.engine.set_current_time(position);
            }
            state => tracing::debug!(%state, "Ignoring seek before the track is seekable"),
        }
    }

    /// Set the engine output level; the engine clamps
    pub fn set_volume(&mut self, level: f64) {
        self.engine.set_volume(level);
    }

    /// Delegated item activation
    pub fn activate(&mut self, handle: V::Handle, action: ItemAction) -> Result<()> {
        let track = self.view.describe(&handle)?;

        match action {
            ItemAction::Play => {
                // Lists may have been re-rendered since the last scan
                self.rebuild_registry();

                if self.is_playing_source(&track.source) {
                    self.pause();
                    return Ok(());
                }

                self.session.current_index = self.registry.index_of(&handle).unwrap_or(0);
                self.load_track(track, Some(handle));
                self.request_play(PlayOrigin::Selection);
            }
            ItemAction::Save => {
                let saved = self.lists.toggle_saved(&track)?;
                self.emit(SessionEvent::ListChanged(ListKey::Saved));
                self.emit(SessionEvent::SavedStateChanged {
                    source: track.source,
                    saved,
                });
            }
            ItemAction::Download => {
                self.emit(SessionEvent::DownloadRequested(track));
            }
        }
        Ok(())
    }

    /// Rescan the view into the registry
    ///
    /// Call after every structural change to the view. The cursor is left
    /// as is and re-resolved with wrap-around on its next use.
    pub fn rebuild_registry(&mut self) {
        self.registry.rebuild(&self.view);
    }

    // ===== Internal: navigation =====

    fn play_index(&mut self, index: isize, origin: PlayOrigin) -> Result<()> {
        let Some(resolved) = self.registry.wrap(index) else {
            tracing::debug!(index, "Navigation with empty registry ignored");
            return Ok(());
        };

        let handle = self.registry.handles()[resolved].clone();
        let track = self.view.describe(&handle)?;

        self.session.current_index = resolved;
        self.load_track(track, Some(handle));
        self.request_play(origin);
        Ok(())
    }

    fn request_play(&mut self, origin: PlayOrigin) {
        let Some(source) = self.session.current_track.as_ref().map(|t| t.source.clone()) else {
            return;
        };

        let id = PlayRequestId(self.next_request);
        self.next_request += 1;

        tracing::debug!(request = id.0, %source, ?origin, "Requesting playback");
        self.session.pending_play = Some(PendingPlay { id, source, origin });
        self.engine.play(id);
    }

    fn is_playing_source(&self, source: &str) -> bool {
        self.session.is_playing
            && self
                .session
                .current_track
                .as_ref()
                .is_some_and(|t| t.is(source))
    }

    // ===== Internal: engine events =====

    /// Take the pending request if `id` is still the live one and the
    /// engine still holds the track it was issued for
    fn take_live_request(&mut self, id: PlayRequestId) -> Option<PendingPlay> {
        let live = self.session.pending_play.as_ref().is_some_and(|p| p.id == id);
        if !live {
            tracing::debug!(request = id.0, "Ignoring superseded play resolution");
            return None;
        }

        let pending = self.session.pending_play.take()?;
        if self.engine.source().as_deref() != Some(pending.source.as_str()) {
            tracing::debug!(request = id.0, source = %pending.source, "Engine moved on, ignoring resolution");
            return None;
        }
        Some(pending)
    }

    fn on_play_resolved(&mut self, id: PlayRequestId) {
        let Some(pending) = self.take_live_request(id) else {
            return;
        };

        self.enter_playing();

        if pending.origin == PlayOrigin::Selection {
            if let Some(track) = self.session.current_track.clone() {
                self.record_recent(&track);
            }
        }
    }

    fn on_play_rejected(&mut self, id: PlayRequestId, reason: &str) {
        let Some(pending) = self.take_live_request(id) else {
            return;
        };

        tracing::warn!(source = %pending.source, reason, origin = ?pending.origin, "Playback request rejected");
        self.session.state = SessionState::Paused;
        self.session.is_playing = false;

        match pending.origin {
            PlayOrigin::Resume => self.notice(NOTICE_RESUME_FAILED),
            PlayOrigin::Selection | PlayOrigin::Navigation | PlayOrigin::AutoAdvance => {
                self.notice(NOTICE_PLAYBACK_BLOCKED);
            }
            // The load-failure notice stays the last thing shown
            PlayOrigin::Retry => {}
        }
        self.sync_affordances();
    }

    fn on_engine_playing(&mut self) {
        self.enter_playing();
    }

    fn on_engine_paused(&mut self) {
        self.session.is_playing = false;
        if self.session.state == SessionState::Playing {
            self.session.state = SessionState::Paused;
        }
        self.sync_affordances();
    }

    /// The engine reports playback; this is not proof the source loaded,
    /// so the retry budget of the current load is left as is
    fn enter_playing(&mut self) {
        self.cancel_retry();
        self.session.state = SessionState::Playing;
        self.session.is_playing = true;
        self.sync_affordances();
    }

    fn on_ended(&mut self) {
        self.session.is_playing = false;

        if self.registry.is_empty() {
            tracing::debug!("Track ended with nothing to advance to");
            if self.session.current_track.is_some() {
                self.session.state = SessionState::Paused;
            }
            self.sync_affordances();
            return;
        }

        let next = self.session.current_index as isize + 1;
        if let Err(e) = self.play_index(next, PlayOrigin::AutoAdvance) {
            tracing::warn!(error = %e, "Auto-advance failed");
            self.session.state = SessionState::Paused;
            self.sync_affordances();
        }
    }

    fn on_media_error(&mut self) {
        if self.session.current_track.is_none() {
            tracing::debug!("Media error with nothing loaded");
            return;
        }

        self.session.is_playing = false;
        self.session.pending_play = None;

        if self.session.retry_attempted && self.session.pending_retry.is_none() {
            tracing::warn!(index = self.session.current_index, "Retry failed, giving up");
            self.session.state = SessionState::Paused;
            self.notice(NOTICE_LOAD_FAILED);
            self.sync_affordances();
            return;
        }

        tracing::warn!(
            index = self.session.current_index,
            delay_ms = self.config.retry_delay_ms,
            "Media load error, scheduling retry"
        );
        self.session.state = SessionState::Erroring;
        self.notice(NOTICE_RETRYING);
        self.schedule_retry();
        self.sync_affordances();
    }

    fn on_retry_fired(&mut self) {
        self.session.pending_retry = None;
        self.session.retry_attempted = true;
        self.session.metadata_ready = false;

        let position = self.engine.current_time();
        let position = if position.is_finite() { position } else { 0.0 };

        tracing::info!(position, "Retrying media load");
        self.engine.load();
        self.engine.set_current_time(position);

        self.session.state = SessionState::Loading;
        self.request_play(PlayOrigin::Retry);
        self.sync_affordances();
    }

    // ===== Internal: timers, notices, lists =====

    fn schedule_retry(&mut self) {
        self.cancel_retry();
        let id = self.timers.schedule(self.config.retry_delay());
        self.session.pending_retry = Some(id);
    }

    fn cancel_retry(&mut self) {
        if let Some(id) = self.session.pending_retry.take() {
            self.timers.cancel(id);
        }
    }

    fn notice(&mut self, message: &str) {
        if let Some(id) = self.notice_timer.take() {
            self.timers.cancel(id);
        }
        self.emit(SessionEvent::Notice(message.to_string()));
        self.notice_timer = Some(self.timers.schedule(self.config.notice_duration()));
    }

    fn record_recent(&mut self, track: &TrackDescriptor) {
        match self.lists.record_played(track) {
            Ok(()) => self.emit(SessionEvent::ListChanged(ListKey::Recent)),
            Err(e) => tracing::warn!(source = %track.source, error = %e, "Could not record played track"),
        }
    }

    // ===== Events =====

    fn emit(&mut self, event: SessionEvent<V::Handle>) {
        self.pending_events.push(event);
    }

    fn emit_time(&mut self, elapsed: f64, duration: f64) {
        self.emit(SessionEvent::TimeUpdate {
            elapsed,
            duration,
            elapsed_label: format_time(elapsed),
            duration_label: format_time(duration),
        });
    }

    /// Queue a transition if the visible affordances changed
    fn sync_affordances(&mut self) {
        let snapshot = self.snapshot();
        if self.last_snapshot.as_ref() != Some(&snapshot) {
            self.last_snapshot = Some(snapshot.clone());
            self.emit(SessionEvent::Transition(snapshot));
        }
    }

    /// Drain queued events
    pub fn drain_events(&mut self) -> Vec<SessionEvent<V::Handle>> {
        std::mem::take(&mut self.pending_events)
    }

    /// Check if there are queued events
    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    // ===== State Queries =====

    /// Current affordance state
    pub fn snapshot(&self) -> SessionSnapshot<V::Handle> {
        SessionSnapshot {
            state: self.session.state,
            is_playing: self.session.is_playing,
            current: self.session.current_track.clone(),
            highlighted: self.session.current_handle.clone(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.session.state
    }

    pub fn current_index(&self) -> usize {
        self.session.current_index
    }

    pub fn current_track(&self) -> Option<&TrackDescriptor> {
        self.session.current_track.as_ref()
    }

    pub fn is_playing(&self) -> bool {
        self.session.is_playing
    }

    /// Whether a retry timer is armed
    pub fn has_pending_retry(&self) -> bool {
        self.session.pending_retry.is_some()
    }

    pub fn registry(&self) -> &TrackRegistry<V::Handle> {
        &self.registry
    }

    pub fn lists(&self) -> &ListStore<S> {
        &self.lists
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// Mutable view access for re-rendering; call
    /// [`Self::rebuild_registry`] afterwards
    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn timers(&self) -> &T {
        &self.timers
    }

    pub fn timers_mut(&mut self) -> &mut T {
        &mut self.timers
    }
}
