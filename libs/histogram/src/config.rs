//! Serializable counter settings.

use serde::{Deserialize, Serialize};

use crate::{HistogramError, HistogramResult, RollingCount};

/// Bucket layout for a [`RollingCount`], as it appears in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollingCountConfig {
    /// Width of one bucket, in the caller's clock units.
    pub step_duration: i64,

    /// Number of buckets in the window.
    pub step_count: usize,
}

impl Default for RollingCountConfig {
    /// One minute of millisecond timestamps in six buckets.
    fn default() -> Self {
        Self {
            step_duration: 10_000,
            step_count: 6,
        }
    }
}

impl RollingCountConfig {
    /// Split `window` into `step_count` buckets.
    ///
    /// The window must be an exact multiple of `step_count` so that the
    /// configured horizon is the one actually counted.
    pub fn from_window(window: i64, step_count: usize) -> HistogramResult<Self> {
        let steps = i64::try_from(step_count).unwrap_or(0);
        if steps == 0 || window <= 0 || window % steps != 0 {
            return Err(HistogramError::InvalidParameters(format!(
                "window {window} cannot be split into {step_count} equal steps"
            )));
        }
        Ok(Self {
            step_duration: window / steps,
            step_count,
        })
    }

    /// Build a counter whose first window starts at `start_time`.
    pub fn build(&self, start_time: i64) -> HistogramResult<RollingCount> {
        RollingCount::new(self.step_duration, self.step_count, start_time)
    }
}
