//! # gantry-histogram
//!
//! Counters over a trailing time window.
//!
//! A [`RollingCount`] splits its window into `step_count` buckets of
//! `step_duration` each. Time is an opaque, caller-supplied `i64` clock
//! (milliseconds, ticks, sequence numbers) that must never move backwards.
//!
//! ```
//! use gantry_histogram::RollingCount;
//!
//! // 10 buckets of 1000 units: a 10_000 unit window.
//! let mut failures = RollingCount::new(1_000, 10, 0)?;
//! failures.add_one(500)?;
//! assert_eq!(failures.get(5_000)?, 1);
//! assert_eq!(failures.get(10_500)?, 0);
//! # Ok::<(), gantry_histogram::HistogramError>(())
//! ```
//!
//! ## Invariants
//!
//! - Reads are O(1), writes and slides are O(step_count)
//! - No allocation after construction
//! - Timestamps are monotonic; going back in time is an error, never a retry

mod config;
mod error;
mod rolling;
mod shared;

pub use config::RollingCountConfig;
pub use error::HistogramError;
pub use rolling::RollingCount;
pub use shared::SharedRollingCount;

/// Result type for histogram operations.
pub type HistogramResult<T> = Result<T, HistogramError>;
