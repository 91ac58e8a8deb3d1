//! Error types for rolling counters.

use thiserror::Error;

/// Errors raised by [`crate::RollingCount`].
///
/// All of them indicate a caller bug; none are worth retrying.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HistogramError {
    /// Construction parameters are unusable.
    #[error("invalid rolling count parameters: {0}")]
    InvalidParameters(String),

    /// A timestamp older than the last observed one was supplied.
    #[error("time moved backwards: requested {requested}, but counter is already at {now}")]
    TimeMovedBackwards { now: i64, requested: i64 },

    /// Counters only go up.
    #[error("negative increment {0} is not allowed")]
    NegativeIncrement(i64),
}

impl HistogramError {
    /// Returns true if the error was caused by a non-monotonic clock.
    pub fn is_time_error(&self) -> bool {
        matches!(self, HistogramError::TimeMovedBackwards { .. })
    }
}
