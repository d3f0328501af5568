//! Shared fakes for controller tests

#![allow(dead_code)]

use melowave_core::{MemoryStore, TrackDescriptor};
use melowave_playback::{
    types::{PlayRequestId, TimerId},
    Input, ManualTimers, MediaEngine, MediaEvent, PlaybackController, PlayerConfig, SessionEvent,
    TrackView,
};
use std::collections::HashMap;
use std::sync::Once;
use std::time::Duration;

static INIT: Once = Once::new();

/// Route controller logs to the test writer; filter with `RUST_LOG`
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_env_filter(filter)
            .try_init();
    });
}

// ===== Fake Engine =====

/// Engine commands, in the order the controller issued them
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    SetSource(String),
    Load,
    Play(PlayRequestId),
    Pause,
    Seek(f64),
    Volume(f64),
}

/// Engine that records commands and leaves every outcome to the test
#[derive(Debug)]
pub struct FakeEngine {
    pub calls: Vec<EngineCall>,
    pub paused: bool,
    pub source: Option<String>,
    pub position: f64,
    pub length: f64,
    pub volume: f64,
}

impl Default for FakeEngine {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            paused: true,
            source: None,
            position: 0.0,
            length: f64::NAN,
            volume: 1.0,
        }
    }
}

impl FakeEngine {
    /// Most recent play request
    pub fn last_request(&self) -> Option<PlayRequestId> {
        self.calls.iter().rev().find_map(|c| match c {
            EngineCall::Play(id) => Some(*id),
            _ => None,
        })
    }

    pub fn play_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, EngineCall::Play(_)))
            .count()
    }

    pub fn load_count(&self) -> usize {
        self.calls.iter().filter(|c| **c == EngineCall::Load).count()
    }
}

impl MediaEngine for FakeEngine {
    fn set_source(&mut self, source: &str) {
        self.source = Some(source.to_string());
        self.position = 0.0;
        self.calls.push(EngineCall::SetSource(source.to_string()));
    }

    fn load(&mut self) {
        self.paused = true;
        self.calls.push(EngineCall::Load);
    }

    fn play(&mut self, request: PlayRequestId) {
        self.calls.push(EngineCall::Play(request));
    }

    fn pause(&mut self) {
        self.calls.push(EngineCall::Pause);
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn source(&self) -> Option<String> {
        self.source.clone()
    }

    fn current_time(&self) -> f64 {
        self.position
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.position = seconds;
        self.calls.push(EngineCall::Seek(seconds));
    }

    fn duration(&self) -> f64 {
        self.length
    }

    fn set_volume(&mut self, level: f64) {
        self.volume = level.clamp(0.0, 1.0);
        self.calls.push(EngineCall::Volume(level));
    }
}

// ===== Fake View =====

/// Containers of numeric item ids; item `n` plays `track-n.mp3`
#[derive(Debug, Default)]
pub struct FakeView {
    pub containers: HashMap<String, Vec<u32>>,
    pub sources: HashMap<u32, String>,
}

impl FakeView {
    pub fn with(mut self, container: &str, items: &[u32]) -> Self {
        self.containers.insert(container.to_string(), items.to_vec());
        self
    }

    /// Make `item` show the same source as `other`
    pub fn same_source(mut self, item: u32, other: u32) -> Self {
        self.sources.insert(item, source_of(other));
        self
    }

    pub fn set(&mut self, container: &str, items: &[u32]) {
        self.containers.insert(container.to_string(), items.to_vec());
    }
}

pub fn source_of(item: u32) -> String {
    format!("track-{item}.mp3")
}

impl TrackView for FakeView {
    type Handle = u32;

    fn items(&self, container: &str) -> Vec<u32> {
        self.containers.get(container).cloned().unwrap_or_default()
    }

    fn describe(&self, handle: &u32) -> melowave_core::Result<TrackDescriptor> {
        let source = self
            .sources
            .get(handle)
            .cloned()
            .unwrap_or_else(|| source_of(*handle));
        Ok(TrackDescriptor::new(source)
            .with_title(format!("Track {handle}"))
            .with_artist("Fake Artist"))
    }
}

// ===== Harness =====

pub type TestController = PlaybackController<FakeEngine, FakeView, MemoryStore, ManualTimers>;

/// Config scanning only `list`, with no start-up load or seeding
pub fn quiet_config() -> PlayerConfig {
    PlayerConfig {
        containers: vec!["list".to_string()],
        initial_container: None,
        seed_recent: None,
        ..PlayerConfig::default()
    }
}

/// Started controller over `list = items`, events drained
pub fn controller(items: &[u32]) -> TestController {
    controller_with(FakeView::default().with("list", items), quiet_config())
}

pub fn controller_with(view: FakeView, config: PlayerConfig) -> TestController {
    init_tracing();
    let mut c = PlaybackController::new(
        FakeEngine::default(),
        view,
        MemoryStore::new(),
        ManualTimers::new(),
        config,
    );
    c.start();
    c.drain_events();
    c
}

/// Resolve the latest play request the way a permissive host would
pub fn confirm_play(c: &mut TestController) {
    let request = c.engine().last_request().expect("no play request issued");
    c.engine_mut().paused = false;
    c.dispatch(Input::Media(MediaEvent::PlayResolved(request)));
    c.dispatch(Input::Media(MediaEvent::Playing));
}

/// Advance the clock and deliver every expired timer
pub fn advance(c: &mut TestController, by: Duration) -> Vec<TimerId> {
    let fired = c.timers_mut().advance(by);
    for id in &fired {
        c.dispatch(Input::TimerFired(*id));
    }
    fired
}

pub fn current_source(c: &TestController) -> Option<String> {
    c.current_track().map(|t| t.source.clone())
}

pub fn notices(events: &[SessionEvent<u32>]) -> Vec<String> {
    events
        .iter()
        .filter_map(|e| match e {
            SessionEvent::Notice(message) => Some(message.clone()),
            _ => None,
        })
        .collect()
}
