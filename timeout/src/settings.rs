use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::TimeoutError;

/// Largest delay the browser `setTimeout` accepts.
pub const MAX_DELAY_MS: u64 = i32::MAX as u64;

/// What an early-trigger signal (focus lost, confirm key) does.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "EarlyTriggerRepr")]
pub enum EarlyTrigger {
    /// The signal is ignored.
    #[default]
    Off,
    /// Fire now, skipping the rest of the delay.
    Fire,
    /// Restart the countdown as if the text had changed.
    Rearm,
}

/// Accepts both `true`/`false` and the mode names.
#[derive(Deserialize)]
#[serde(untagged)]
enum EarlyTriggerRepr {
    Flag(bool),
    Mode(EarlyTriggerMode),
}

#[derive(Deserialize)]
#[serde(rename_all = "lowercase")]
enum EarlyTriggerMode {
    Off,
    Fire,
    Rearm,
}

impl From<EarlyTriggerRepr> for EarlyTrigger {
    fn from(repr: EarlyTriggerRepr) -> Self {
        match repr {
            EarlyTriggerRepr::Flag(true) => EarlyTrigger::Fire,
            EarlyTriggerRepr::Flag(false) => EarlyTrigger::Off,
            EarlyTriggerRepr::Mode(EarlyTriggerMode::Off) => EarlyTrigger::Off,
            EarlyTriggerRepr::Mode(EarlyTriggerMode::Fire) => EarlyTrigger::Fire,
            EarlyTriggerRepr::Mode(EarlyTriggerMode::Rearm) => EarlyTrigger::Rearm,
        }
    }
}

/// Options of a [`Timeout`](crate::Timeout) binding.
///
/// Missing fields take their defaults, so a partial JSON object such as
/// `{"delay_ms": 300, "blur": true}` is a complete configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutSettings {
    /// Quiet period between the last edit and the timeout.
    pub delay_ms: u64,
    /// Behaviour when the field loses focus.
    pub blur: EarlyTrigger,
    /// Behaviour when the confirm key (Enter) is pressed.
    pub enter: EarlyTrigger,
    /// Count every key press in the field as activity, not only edits.
    /// On by default, like a `keydown` listener next to the input ones.
    pub key_press_is_activity: bool,
    /// Restart the countdown even when the field is empty.
    pub arm_on_empty: bool,
}

impl Default for TimeoutSettings {
    fn default() -> Self {
        Self {
            delay_ms: 500,
            blur: EarlyTrigger::Off,
            enter: EarlyTrigger::Off,
            key_press_is_activity: true,
            arm_on_empty: false,
        }
    }
}

impl TimeoutSettings {
    pub fn from_json(json: &str) -> Result<Self, TimeoutError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn validate(&self) -> Result<(), TimeoutError> {
        if self.delay_ms > MAX_DELAY_MS {
            return Err(TimeoutError::DelayOutOfRange {
                delay_ms: self.delay_ms,
            });
        }
        Ok(())
    }
}
