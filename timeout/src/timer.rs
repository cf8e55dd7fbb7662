use std::time::Duration;

/// A deferred task handed to a [`TimerFacility`].
pub type Task = Box<dyn FnOnce() + 'static>;

/// The host's timer service: a browser `setTimeout`, a frame-driven clock, ...
///
/// Facilities are single-threaded. `schedule` must return immediately and run
/// `task` later, on the same thread, once `delay` has elapsed.
pub trait TimerFacility {
    type Handle: TimerHandle + 'static;

    fn schedule(&self, delay: Duration, task: Task) -> Self::Handle;
}

/// A scheduled task that can still be withdrawn.
pub trait TimerHandle {
    /// Withdraws the task. Cancelling a task that already ran is a no-op.
    fn cancel(self);
}
