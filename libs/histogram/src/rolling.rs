//! Rolling window counter.
//!
//! Buckets are cumulative: logical bucket `i` holds every increment recorded
//! in logical buckets `0..=i` of the current window. The last logical bucket
//! is therefore the window total, and a read is a single index lookup. A
//! write touches every bucket from the insertion point to the tail.

use tracing::trace;

use crate::{HistogramError, HistogramResult};

/// Counts items in a trailing time window with fixed bucket resolution.
///
/// The window is `[start_time, end_time)`; once a timestamp reaches
/// `end_time` the window slides forward by whole steps, dropping the oldest
/// buckets.
///
/// Not synchronised. Wrap it in a [`crate::SharedRollingCount`] when more
/// than one thread needs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollingCount {
    step_duration: i64,
    window: i64,
    buckets: Box<[i64]>,
    /// Physical index of the oldest logical bucket.
    head: usize,
    start_time: i64,
    /// Highest timestamp observed so far.
    now: i64,
}

impl RollingCount {
    /// Create a counter with `step_count` buckets of `step_duration` each,
    /// whose first window starts at `start_time`.
    pub fn new(step_duration: i64, step_count: usize, start_time: i64) -> HistogramResult<Self> {
        if step_duration <= 0 {
            return Err(HistogramError::InvalidParameters(format!(
                "step_duration must be positive, got {step_duration}"
            )));
        }
        if step_count == 0 {
            return Err(HistogramError::InvalidParameters(
                "step_count must be positive, got 0".to_string(),
            ));
        }

        let window = i64::try_from(step_count)
            .ok()
            .and_then(|steps| steps.checked_mul(step_duration))
            .ok_or_else(|| {
                HistogramError::InvalidParameters(format!(
                    "window of {step_count} steps x {step_duration} overflows"
                ))
            })?;
        Ok(Self {
            step_duration,
            window,
            buckets: vec![0; step_count].into_boxed_slice(),
            head: 0,
            start_time,
            now: start_time,
        })
    }

    pub fn step_duration(&self) -> i64 {
        self.step_duration
    }

    pub fn step_count(&self) -> usize {
        self.buckets.len()
    }

    /// Length of the trailing window (`step_duration * step_count`).
    pub fn window(&self) -> i64 {
        self.window
    }

    /// Inclusive start of the current window.
    pub fn start_time(&self) -> i64 {
        self.start_time
    }

    /// Exclusive end of the current window, saturating at `i64::MAX` when
    /// the window reaches past the end of the clock.
    pub fn end_time(&self) -> i64 {
        i64::try_from(self.window_end()).unwrap_or(i64::MAX)
    }

    /// The most recent timestamp passed to `get` or `add`.
    pub fn now(&self) -> i64 {
        self.now
    }

    /// Count of items in the window as of `now`.
    ///
    /// Slides the window exactly as [`RollingCount::add`] would, so calling
    /// it twice with the same timestamp is a no-op the second time.
    pub fn get(&mut self, now: i64) -> HistogramResult<i64> {
        self.ensure_monotonic(now)?;
        self.advance(now);
        Ok(self.buckets[self.position(now)])
    }

    pub fn add_one(&mut self, now: i64) -> HistogramResult<i64> {
        self.add(1, now)
    }

    /// Record `delta` items at `now` and return the new window count.
    pub fn add(&mut self, delta: i64, now: i64) -> HistogramResult<i64> {
        self.ensure_monotonic(now)?;
        if delta < 0 {
            return Err(HistogramError::NegativeIncrement(delta));
        }
        self.advance(now);

        let steps = self.buckets.len();
        for i in self.step_index(now)..steps {
            self.buckets[(self.head + i) % steps] += delta;
        }

        Ok(self.buckets[self.position(now)])
    }

    fn ensure_monotonic(&self, now: i64) -> HistogramResult<()> {
        if now < self.now {
            return Err(HistogramError::TimeMovedBackwards {
                now: self.now,
                requested: now,
            });
        }
        Ok(())
    }

    fn advance(&mut self, now: i64) {
        if i128::from(now) >= self.window_end() {
            self.slide(now);
        }
        self.now = now;
    }

    /// Move the window forward so that `now` falls into its last bucket.
    fn slide(&mut self, now: i64) {
        let steps = self.buckets.len();
        let shift = (i128::from(now) - self.window_end()) / i128::from(self.step_duration) + 1;

        match usize::try_from(shift).ok().filter(|s| *s < steps) {
            Some(shift) => {
                let correction = self.buckets[(self.head + shift - 1) % steps];
                for i in shift..steps {
                    self.buckets[(self.head + i) % steps] -= correction;
                }

                // The vacated slots become the new tail and start out holding
                // the surviving total.
                let total = self.buckets[(self.head + steps - 1) % steps];
                for i in 0..shift {
                    self.buckets[(self.head + i) % steps] = total;
                }

                self.head = (self.head + shift) % steps;
            }
            None => {
                trace!(shift = %shift, now, "rolling window reset");
                self.buckets.fill(0);
                self.head = 0;
            }
        }

        // `now` lands in the last bucket, so the new start never passes it.
        let start = i128::from(self.start_time) + shift * i128::from(self.step_duration);
        self.start_time = i64::try_from(start).unwrap_or(now);
    }

    /// Exact window end; may lie beyond `i64::MAX` near the end of the clock.
    fn window_end(&self) -> i128 {
        i128::from(self.start_time) + i128::from(self.window)
    }

    fn step_index(&self, now: i64) -> usize {
        let index = (now - self.start_time) / self.step_duration;
        (index as usize).min(self.buckets.len() - 1)
    }

    fn position(&self, now: i64) -> usize {
        (self.head + self.step_index(now)) % self.buckets.len()
    }
}
