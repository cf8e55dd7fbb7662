use std::rc::Rc;

use log::{debug, trace};

use crate::debounce::{Callback, DebounceTimer};
use crate::error::TimeoutError;
use crate::event::EventQueue;
use crate::settings::{EarlyTrigger, TimeoutSettings};
use crate::timer::TimerFacility;

/// Something that happened in the bound text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSignal {
    /// The text was changed (typed, pasted, dropped or cut).
    Edited,
    /// Any key went down while the field had focus.
    KeyPressed,
    /// The confirm key (Enter) was pressed.
    ConfirmKey,
    /// The field lost focus.
    FocusLost,
}

/// What a widget saw of its text field during one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldObservation {
    pub key_pressed: bool,
    pub edited: bool,
    pub focus_lost: bool,
    /// Enter was pressed in the field this frame.
    pub confirm_key: bool,
}

/// A text field bound to a [`DebounceTimer`].
///
/// Turns field signals into timer calls according to its [`TimeoutSettings`].
/// Dropping the binding cancels a pending timeout.
pub struct Timeout<F: TimerFacility> {
    settings: TimeoutSettings,
    timer: DebounceTimer<F>,
    on_start: Option<Callback>,
}

impl<F: TimerFacility> Timeout<F> {
    pub fn settings(&self) -> &TimeoutSettings {
        &self.settings
    }

    pub fn is_armed(&self) -> bool {
        self.timer.is_armed()
    }

    pub fn handle(&self, signal: InputSignal, text: &str) {
        trace!("timeout binding got {signal:?}");
        match signal {
            InputSignal::Edited => self.activity(text),
            InputSignal::KeyPressed => {
                if self.settings.key_press_is_activity {
                    self.activity(text);
                }
            }
            InputSignal::ConfirmKey => self.early_trigger(self.settings.enter, text),
            InputSignal::FocusLost => self.early_trigger(self.settings.blur, text),
        }
    }

    /// Handles one frame of observations, in the order a browser would
    /// deliver them: key down, then input, then focus events.
    ///
    /// A field that loses focus because Enter was pressed reports only the
    /// confirm key, unless the confirm key is switched off.
    pub fn observe(&self, observation: FieldObservation, text: &str) {
        if observation.key_pressed {
            self.handle(InputSignal::KeyPressed, text);
        }
        if observation.edited {
            self.handle(InputSignal::Edited, text);
        }
        let confirm = observation.confirm_key && self.settings.enter != EarlyTrigger::Off;
        if confirm {
            self.handle(InputSignal::ConfirmKey, text);
        } else if observation.focus_lost {
            self.handle(InputSignal::FocusLost, text);
        }
    }

    /// Fires the timeout now, whatever the settings say.
    pub fn trigger_now(&self) {
        self.timer.notify_immediate();
    }

    pub fn cancel(&self) {
        self.timer.cancel();
    }

    fn activity(&self, text: &str) {
        if let Some(on_start) = &self.on_start {
            on_start();
        }
        self.rearm(text);
    }

    /// An empty field leaves a running countdown alone.
    fn rearm(&self, text: &str) {
        if !text.is_empty() || self.settings.arm_on_empty {
            self.timer.notify_activity();
        }
    }

    fn early_trigger(&self, mode: EarlyTrigger, text: &str) {
        match mode {
            EarlyTrigger::Off => {}
            EarlyTrigger::Fire => self.timer.notify_immediate(),
            EarlyTrigger::Rearm => self.rearm(text),
        }
    }
}

/// Collects the hooks of a [`Timeout`] before binding it to a facility.
pub struct TimeoutBuilder {
    settings: TimeoutSettings,
    on_start: Option<Callback>,
    on_timeout: Option<Callback>,
    emit: Option<(EventQueue, String)>,
}

impl TimeoutBuilder {
    pub fn new(settings: TimeoutSettings) -> Self {
        Self {
            settings,
            on_start: None,
            on_timeout: None,
            emit: None,
        }
    }

    /// Runs on every activity signal, before the countdown restarts.
    pub fn on_start(mut self, f: impl Fn() + 'static) -> Self {
        self.on_start = Some(Rc::new(f));
        self
    }

    pub fn on_timeout(mut self, f: impl Fn() + 'static) -> Self {
        self.on_timeout = Some(Rc::new(f));
        self
    }

    /// Pushes a [`TimeoutEvent`](crate::TimeoutEvent) called `name` onto
    /// `queue` on every timeout, after the `on_timeout` callback if any.
    pub fn emit_to(mut self, queue: EventQueue, name: impl Into<String>) -> Self {
        self.emit = Some((queue, name.into()));
        self
    }

    pub fn build<F: TimerFacility>(self, facility: F) -> Result<Timeout<F>, TimeoutError> {
        self.settings.validate()?;

        let callback: Callback = match (self.on_timeout, self.emit) {
            (None, None) => return Err(TimeoutError::MissingCallback),
            (Some(on_timeout), None) => on_timeout,
            (None, Some((queue, name))) => Rc::new(move || queue.push(name.as_str())),
            (Some(on_timeout), Some((queue, name))) => Rc::new(move || {
                on_timeout();
                queue.push(name.as_str());
            }),
        };

        debug!("binding timeout with {:?}", self.settings);
        Ok(Timeout {
            timer: DebounceTimer::with_callback(facility, self.settings.delay(), callback),
            settings: self.settings,
            on_start: self.on_start,
        })
    }
}
