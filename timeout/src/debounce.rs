use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

use log::trace;

use crate::timer::{TimerFacility, TimerHandle};

/// The action a [`DebounceTimer`] runs when it fires.
pub type Callback = Rc<dyn Fn()>;

struct Pending<H> {
    generation: u64,
    handle: H,
}

struct State<H> {
    pending: Option<Pending<H>>,
    /// Handle of the last timer that fired. Some facilities tear the running
    /// callback down on drop, so it is only replaced by the next fire.
    spent: Option<H>,
    generation: u64,
}

struct Shared<H> {
    state: RefCell<State<H>>,
    callback: Callback,
}

/// Runs a callback once activity has been quiet for `delay`.
///
/// The timer is either idle or armed with exactly one scheduled task. Each
/// [`notify_activity`](Self::notify_activity) replaces the scheduled task,
/// [`notify_immediate`](Self::notify_immediate) runs the callback right away and
/// [`cancel`](Self::cancel) drops the schedule. Dropping the timer cancels it.
pub struct DebounceTimer<F: TimerFacility> {
    facility: F,
    delay: Duration,
    shared: Rc<Shared<F::Handle>>,
}

impl<F: TimerFacility> DebounceTimer<F> {
    pub fn new(facility: F, delay: Duration, callback: impl Fn() + 'static) -> Self {
        Self::with_callback(facility, delay, Rc::new(callback))
    }

    pub fn with_callback(facility: F, delay: Duration, callback: Callback) -> Self {
        Self {
            facility,
            delay,
            shared: Rc::new(Shared {
                state: RefCell::new(State {
                    pending: None,
                    spent: None,
                    generation: 0,
                }),
                callback,
            }),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn is_armed(&self) -> bool {
        self.shared.state.borrow().pending.is_some()
    }

    /// Restarts the countdown. The callback runs `delay` after the last call.
    pub fn notify_activity(&self) {
        let generation = self.disarm();

        let weak = Rc::downgrade(&self.shared);
        let handle = self
            .facility
            .schedule(self.delay, Box::new(move || fire(weak, generation)));

        self.shared.state.borrow_mut().pending = Some(Pending { generation, handle });
        trace!("debounce armed for {:?}", self.delay);
    }

    /// Drops the schedule and runs the callback now, armed or not.
    pub fn notify_immediate(&self) {
        self.disarm();
        trace!("debounce triggered immediately");
        (self.shared.callback)();
    }

    /// Drops the schedule without running the callback.
    pub fn cancel(&self) {
        if self.is_armed() {
            trace!("debounce cancelled");
        }
        self.disarm();
    }

    /// Cancels whatever is pending and starts a new generation, so a task of
    /// an older generation that is delivered anyway is ignored.
    fn disarm(&self) -> u64 {
        let (pending, generation) = {
            let mut state = self.shared.state.borrow_mut();
            state.generation = state.generation.wrapping_add(1);
            (state.pending.take(), state.generation)
        };
        if let Some(pending) = pending {
            pending.handle.cancel();
        }
        generation
    }
}

fn fire<H>(shared: Weak<Shared<H>>, generation: u64) {
    let Some(shared) = shared.upgrade() else {
        return;
    };
    {
        let mut state = shared.state.borrow_mut();
        match &state.pending {
            Some(pending) if pending.generation == generation => {}
            _ => {
                trace!("ignoring stale debounce timer (generation {generation})");
                return;
            }
        }
        let fired = state.pending.take().map(|pending| pending.handle);
        let previous = std::mem::replace(&mut state.spent, fired);
        drop(state);
        drop(previous);
    }
    trace!("debounce fired");
    (shared.callback)();
}

impl<F: TimerFacility> Drop for DebounceTimer<F> {
    fn drop(&mut self) {
        self.disarm();
    }
}

impl<F: TimerFacility> fmt::Debug for DebounceTimer<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DebounceTimer")
            .field("delay", &self.delay)
            .field("armed", &self.is_armed())
            .finish()
    }
}
