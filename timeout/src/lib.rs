//! Debounced "the user stopped typing" timeouts for text fields.
//!
//! A [`DebounceTimer`] runs a callback once activity has been quiet for a
//! fixed delay. A [`Timeout`] binds one to a text field, translating edits,
//! the Enter key and focus loss into timer calls according to
//! [`TimeoutSettings`]. Timers run on a [`TimerFacility`]: the browser's
//! `setTimeout` on wasm, or a [`ManualClock`] advanced by the host.
#![warn(clippy::all, rust_2018_idioms)]
mod binding;
mod clock;
mod debounce;
mod error;
mod event;
#[cfg(target_arch = "wasm32")]
mod gloo;
mod settings;
mod timer;

pub use binding::{FieldObservation, InputSignal, Timeout, TimeoutBuilder};
pub use clock::{ManualClock, ManualHandle};
pub use debounce::{Callback, DebounceTimer};
pub use error::TimeoutError;
pub use event::{EventQueue, TimeoutEvent};
#[cfg(target_arch = "wasm32")]
pub use gloo::{GlooHandle, GlooTimers};
pub use settings::{EarlyTrigger, TimeoutSettings, MAX_DELAY_MS};
pub use timer::{Task, TimerFacility, TimerHandle};
