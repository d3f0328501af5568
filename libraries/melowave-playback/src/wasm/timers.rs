//! `setTimeout`-backed timers

use super::Dispatcher;
use crate::{types::TimerId, Input, Timers};
use gloo_timers::callback::Timeout;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

/// One-shot browser timers reporting expiry through the dispatcher
///
/// Dropping a [`Timeout`] clears it, so cancellation is removal from the
/// active map. Expired entries are pruned on the next schedule or cancel.
pub struct WebTimers {
    next_id: u64,
    active: HashMap<TimerId, Timeout>,
    expired: Rc<RefCell<Vec<TimerId>>>,
    dispatcher: Dispatcher,
}

impl WebTimers {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            next_id: 0,
            active: HashMap::new(),
            expired: Rc::new(RefCell::new(Vec::new())),
            dispatcher,
        }
    }

    fn prune(&mut self) {
        for id in self.expired.borrow_mut().drain(..) {
            self.active.remove(&id);
        }
    }
}

impl Timers for WebTimers {
    fn schedule(&mut self, delay: Duration) -> TimerId {
        self.prune();

        let id = TimerId(self.next_id);
        self.next_id += 1;

        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        let expired = Rc::clone(&self.expired);
        let dispatcher = self.dispatcher.clone();
        let timeout = Timeout::new(millis, move || {
            expired.borrow_mut().push(id);
            dispatcher.send(Input::TimerFired(id));
        });

        self.active.insert(id, timeout);
        id
    }

    fn cancel(&mut self, id: TimerId) {
        self.prune();
        self.active.remove(&id);
    }
}
