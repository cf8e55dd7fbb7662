use std::time::Duration;

use gloo_timers::callback::Timeout;

use crate::timer::{Task, TimerFacility, TimerHandle};

/// Browser `setTimeout`, through `gloo-timers`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlooTimers;

impl TimerFacility for GlooTimers {
    type Handle = GlooHandle;

    fn schedule(&self, delay: Duration, task: Task) -> GlooHandle {
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        GlooHandle(Timeout::new(millis, task))
    }
}

/// Dropping the handle clears the timeout, so a handle whose timeout is
/// currently running must not be dropped from inside that callback.
pub struct GlooHandle(Timeout);

impl TimerHandle for GlooHandle {
    fn cancel(self) {
        // The returned closure is never invoked.
        let _ = self.0.cancel();
    }
}
