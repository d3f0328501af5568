//! Browser bindings for melowave-playback
//!
//! Binds the controller's ports to a real page: an `<audio>` element, the
//! rendered track lists, `localStorage`, and `setTimeout`.

mod engine;
mod player;
mod storage;
mod timers;
mod view;

pub use engine::WebAudioEngine;
pub use player::WebPlayer;
pub use storage::LocalStorageStore;
pub use timers::WebTimers;
pub use view::DomView;

use crate::Input;
use std::cell::RefCell;
use std::rc::Rc;
use web_sys::Element;

type Handler = Rc<dyn Fn(Input<Element>)>;

/// Late-bound route from browser callbacks back into the controller
///
/// Ports are built before the controller that owns them exists, so they
/// hold a `Dispatcher` and the player installs the handler afterwards.
#[derive(Clone, Default)]
pub struct Dispatcher {
    handler: Rc<RefCell<Option<Handler>>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn install(&self, handler: Handler) {
        *self.handler.borrow_mut() = Some(handler);
    }

    /// Deliver an input; dropped when no handler is installed yet
    pub fn send(&self, input: Input<Element>) {
        // Clone out so the handler may reinstall or send again
        let handler = self.handler.borrow().clone();
        match handler {
            Some(handler) => handler(input),
            None => tracing::debug!("Input dropped before player was wired"),
        }
    }
}
