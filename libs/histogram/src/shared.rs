//! Thread-safe wrapper around [`RollingCount`].

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::{HistogramResult, RollingCount};

/// A [`RollingCount`] behind a mutex, for counters shared across threads.
///
/// Every call holds the lock for one `get`/`add`, so concurrent writers see
/// the same results as if their calls had been serialised. Callers still
/// have to supply non-decreasing timestamps across all threads.
#[derive(Debug)]
pub struct SharedRollingCount {
    inner: Mutex<RollingCount>,
}

impl SharedRollingCount {
    pub fn new(count: RollingCount) -> Self {
        Self {
            inner: Mutex::new(count),
        }
    }

    pub fn get(&self, now: i64) -> HistogramResult<i64> {
        self.lock().get(now)
    }

    pub fn add(&self, delta: i64, now: i64) -> HistogramResult<i64> {
        self.lock().add(delta, now)
    }

    pub fn add_one(&self, now: i64) -> HistogramResult<i64> {
        self.lock().add_one(now)
    }

    /// Copy of the current counter state.
    pub fn snapshot(&self) -> RollingCount {
        self.lock().clone()
    }

    pub fn into_inner(self) -> RollingCount {
        self.inner.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock(&self) -> MutexGuard<'_, RollingCount> {
        // Mutations never panic midway, so a poisoned counter is still consistent.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl From<RollingCount> for SharedRollingCount {
    fn from(count: RollingCount) -> Self {
        Self::new(count)
    }
}
