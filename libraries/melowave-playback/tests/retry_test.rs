//! Media error recovery
//!
//! One delayed retry per load, at most one retry timer armed at a time,
//! and a paused resting state once the retry has failed too.

mod common;

use common::{advance, confirm_play, controller, notices, EngineCall};
use melowave_playback::{types::SessionState, Input, MediaEvent, SessionEvent};
use std::time::Duration;

const RETRY: Duration = Duration::from_millis(1000);

fn error(c: &mut common::TestController) {
    c.dispatch(Input::Media(MediaEvent::Error));
}

#[test]
fn error_schedules_single_retry() {
    let mut c = controller(&[1, 2]);
    c.play_by_index(0).unwrap();
    c.drain_events();

    error(&mut c);
    assert_eq!(c.state(), SessionState::Erroring);
    assert!(c.has_pending_retry());
    assert_eq!(
        notices(&c.drain_events()),
        vec!["Audio failed to load. Retrying…"]
    );

    // Second error inside the window replaces the timer
    error(&mut c);
    assert!(c.has_pending_retry());
    // retry + notice
    assert_eq!(c.timers().pending_count(), 2);
}

#[test]
fn retry_reloads_at_saved_position_and_replays() {
    let mut c = controller(&[1]);
    c.play_by_index(0).unwrap();
    confirm_play(&mut c);
    c.engine_mut().position = 42.0;

    error(&mut c);
    let plays = c.engine().play_count();
    let loads = c.engine().load_count();

    advance(&mut c, RETRY);
    assert!(!c.has_pending_retry());
    assert_eq!(c.state(), SessionState::Loading);
    assert_eq!(c.engine().load_count(), loads + 1);
    assert_eq!(c.engine().play_count(), plays + 1);
    assert!(c.engine().calls.contains(&EngineCall::Seek(42.0)));

    confirm_play(&mut c);
    assert_eq!(c.state(), SessionState::Playing);
}

#[test]
fn failed_retry_settles_paused() {
    let mut c = controller(&[1]);
    c.play_by_index(0).unwrap();

    error(&mut c);
    error(&mut c);
    let fired = advance(&mut c, RETRY);
    assert_eq!(fired.len(), 1);
    c.drain_events();

    error(&mut c);
    assert_eq!(c.state(), SessionState::Paused);
    assert!(!c.has_pending_retry());
    assert_eq!(
        notices(&c.drain_events()),
        vec!["Audio failed to load. Press ▶ to try again."]
    );

    // Nothing left to retry; only the notice dismissal fires
    let plays = c.engine().play_count();
    advance(&mut c, Duration::from_secs(10));
    assert_eq!(c.engine().play_count(), plays);
    assert_eq!(c.drain_events(), vec![SessionEvent::NoticeDismissed]);
}

#[test]
fn rejected_retry_adds_no_notice() {
    let mut c = controller(&[1]);
    c.play_by_index(0).unwrap();
    error(&mut c);
    advance(&mut c, RETRY);
    c.drain_events();

    let request = c.engine().last_request().unwrap();
    c.dispatch(Input::Media(MediaEvent::PlayRejected {
        request,
        reason: "NotAllowedError".to_string(),
    }));

    assert_eq!(c.state(), SessionState::Paused);
    assert!(notices(&c.drain_events()).is_empty());
}

#[test]
fn playing_cancels_pending_retry() {
    let mut c = controller(&[1]);
    c.play_by_index(0).unwrap();
    error(&mut c);

    c.dispatch(Input::Media(MediaEvent::Playing));
    assert!(!c.has_pending_retry());
    assert_eq!(c.state(), SessionState::Playing);

    let plays = c.engine().play_count();
    advance(&mut c, RETRY);
    assert_eq!(c.engine().play_count(), plays);
}

#[test]
fn loading_another_track_cancels_retry() {
    let mut c = controller(&[1, 2]);
    c.play_by_index(0).unwrap();
    error(&mut c);

    c.next().unwrap();
    assert!(!c.has_pending_retry());
    assert_eq!(c.state(), SessionState::Loading);

    // A fresh load gets its own retry
    error(&mut c);
    assert!(c.has_pending_retry());
    assert_eq!(c.state(), SessionState::Erroring);
}

#[test]
fn manual_play_supersedes_retry() {
    let mut c = controller(&[1]);
    c.play_by_index(0).unwrap();
    error(&mut c);

    c.toggle_play_pause();
    assert!(!c.has_pending_retry());

    let plays = c.engine().play_count();
    advance(&mut c, RETRY);
    assert_eq!(c.engine().play_count(), plays);
}

#[test]
fn error_with_nothing_loaded_is_ignored() {
    let mut c = controller(&[1]);
    error(&mut c);

    assert_eq!(c.state(), SessionState::Idle);
    assert!(!c.has_pending_retry());
    assert!(c.drain_events().is_empty());
}

#[test]
fn late_fire_of_cancelled_retry_is_ignored() {
    let mut c = controller(&[1]);
    c.play_by_index(0).unwrap();
    error(&mut c);
    let pending: Vec<_> = (0..4)
        .map(melowave_playback::types::TimerId)
        .filter(|id| c.timers().is_pending(*id))
        .collect();

    c.dispatch(Input::Media(MediaEvent::Playing));
    let plays = c.engine().play_count();
    for id in pending {
        c.dispatch(Input::TimerFired(id));
    }
    assert_eq!(c.engine().play_count(), plays);
    assert_eq!(c.state(), SessionState::Playing);
}

#[test]
fn play_events_do_not_renew_the_retry() {
    let mut c = controller(&[1]);
    c.play_by_index(0).unwrap();

    // Browsers report playback starting before the source fails
    c.dispatch(Input::Media(MediaEvent::Playing));
    error(&mut c);

    let mut retries = 0;
    for _ in 0..5 {
        let plays = c.engine().play_count();
        advance(&mut c, RETRY);
        if c.engine().play_count() > plays {
            retries += 1;
        }
        c.dispatch(Input::Media(MediaEvent::Playing));
        error(&mut c);
    }

    assert_eq!(retries, 1);
    assert_eq!(c.state(), SessionState::Paused);
    assert!(!c.has_pending_retry());
}

#[test]
fn new_load_restores_retry_budget() {
    let mut c = controller(&[1, 2]);
    c.play_by_index(0).unwrap();
    error(&mut c);
    advance(&mut c, RETRY);
    error(&mut c);
    assert_eq!(c.state(), SessionState::Paused);

    c.next().unwrap();
    error(&mut c);
    assert_eq!(c.state(), SessionState::Erroring);
    assert!(c.has_pending_retry());
}
