use thiserror::Error;

/// Errors raised while setting up a [`Timeout`](crate::Timeout) binding.
#[derive(Debug, Error)]
pub enum TimeoutError {
    #[error("a timeout binding needs a callback or an event queue")]
    MissingCallback,
    #[error("delay of {delay_ms} ms exceeds the timer limit of {max} ms", max = i32::MAX)]
    DelayOutOfRange { delay_ms: u64 },
    #[error("invalid timeout settings: {0}")]
    Settings(#[from] serde_json::Error),
}
