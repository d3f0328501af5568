//! Timer scheduling port
//!
//! The session's only scheduled work is the media-error retry and the
//! notice auto-dismissal. Hosts report expiry by dispatching
//! [`crate::Input::TimerFired`]; the controller ignores ids it no longer
//! tracks, so a late fire of a cancelled timer is harmless.

use crate::types::TimerId;
use std::time::Duration;

/// Schedules one-shot timers on the host's event loop
pub trait Timers {
    /// Arm a one-shot timer firing after `delay`
    fn schedule(&mut self, delay: Duration) -> TimerId;

    /// Disarm a timer; no-op if it already fired or was cancelled
    fn cancel(&mut self, id: TimerId);
}

/// Deterministic timers driven by an explicit clock
///
/// Used by tests and by native hosts that tick their own loop: call
/// [`ManualTimers::advance`] and dispatch every returned id.
#[derive(Debug, Clone, Default)]
pub struct ManualTimers {
    now: Duration,
    next_id: u64,
    pending: Vec<(TimerId, Duration)>,
}

impl ManualTimers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current clock value
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of armed timers
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Whether a timer is still armed
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.iter().any(|(pending, _)| *pending == id)
    }

    /// Move the clock forward, returning the timers that expired in
    /// deadline order (ties in scheduling order)
    pub fn advance(&mut self, by: Duration) -> Vec<TimerId> {
        self.now += by;
        let now = self.now;

        let mut fired: Vec<(TimerId, Duration)> = Vec::new();
        self.pending.retain(|&(id, deadline)| {
            if deadline <= now {
                fired.push((id, deadline));
                false
            } else {
                true
            }
        });

        fired.sort_by_key(|&(id, deadline)| (deadline, id));
        fired.into_iter().map(|(id, _)| id).collect()
    }
}

impl Timers for ManualTimers {
    fn schedule(&mut self, delay: Duration) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.push((id, self.now + delay));
        id
    }

    fn cancel(&mut self, id: TimerId) {
        self.pending.retain(|&(pending, _)| pending != id);
    }
}
