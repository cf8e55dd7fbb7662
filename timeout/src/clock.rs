use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};
use std::time::Duration;

use log::trace;

use crate::timer::{Task, TimerFacility, TimerHandle};

/// Deadline first, then schedule order for tasks due at the same instant.
type Slot = (Duration, u64);

#[derive(Default)]
struct ClockState {
    now: Duration,
    next_id: u64,
    tasks: BTreeMap<Slot, Task>,
}

/// A timer facility running on virtual time.
///
/// Nothing happens until the owner moves the clock forward with
/// [`ManualClock::advance`] or [`ManualClock::advance_to`]. The native demo
/// advances it from the egui frame time; tests advance it by hand.
#[derive(Clone, Default)]
pub struct ManualClock {
    state: Rc<RefCell<ClockState>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time, measured from the clock's creation.
    pub fn now(&self) -> Duration {
        self.state.borrow().now
    }

    /// Deadline of the earliest task still scheduled.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.state
            .borrow()
            .tasks
            .keys()
            .next()
            .map(|(deadline, _)| *deadline)
    }

    /// Number of tasks waiting to run.
    pub fn pending(&self) -> usize {
        self.state.borrow().tasks.len()
    }

    pub fn advance(&self, by: Duration) -> usize {
        let target = self.now().saturating_add(by);
        self.advance_to(target)
    }

    /// Runs every task due at or before `target` and returns how many ran.
    ///
    /// Each task observes `now()` equal to its own deadline, so tasks that
    /// schedule follow-ups get deadlines relative to when they fired. Moving
    /// the clock backwards is ignored.
    pub fn advance_to(&self, target: Duration) -> usize {
        let mut fired = 0;
        loop {
            // The borrow must end before the task runs: tasks schedule and
            // cancel on this same clock.
            let task = {
                let mut state = self.state.borrow_mut();
                let due = match state.tasks.keys().next() {
                    Some(slot) if slot.0 <= target => *slot,
                    _ => break,
                };
                state.now = state.now.max(due.0);
                state.tasks.remove(&due)
            };
            if let Some(task) = task {
                task();
                fired += 1;
            }
        }

        let mut state = self.state.borrow_mut();
        state.now = state.now.max(target);
        if fired > 0 {
            trace!("clock at {:?}: ran {} task(s)", state.now, fired);
        }
        fired
    }
}

impl TimerFacility for ManualClock {
    type Handle = ManualHandle;

    fn schedule(&self, delay: Duration, task: Task) -> ManualHandle {
        let mut state = self.state.borrow_mut();
        let slot = (state.now.saturating_add(delay), state.next_id);
        state.next_id += 1;
        state.tasks.insert(slot, task);
        ManualHandle {
            clock: Rc::downgrade(&self.state),
            slot,
        }
    }
}

/// Handle to a task scheduled on a [`ManualClock`].
pub struct ManualHandle {
    clock: Weak<RefCell<ClockState>>,
    slot: Slot,
}

impl ManualHandle {
    pub fn deadline(&self) -> Duration {
        self.slot.0
    }
}

impl TimerHandle for ManualHandle {
    fn cancel(self) {
        if let Some(state) = self.clock.upgrade() {
            // Dropped outside of the borrow, the task may own other handles.
            let task = state.borrow_mut().tasks.remove(&self.slot);
            drop(task);
        }
    }
}
