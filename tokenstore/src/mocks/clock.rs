//! Mock clock for testing.

use crate::providers::Clock;
use chrono::{DateTime, Duration, Utc};
use std::sync::{Arc, Mutex, PoisonError};

/// Manually driven clock for deterministic expiry tests.
///
/// Clones share the same time, so a test can keep a handle and advance the
/// clock the store was built with.
///
/// # Example
///
/// ```
/// use passwordless_tokenstore::mocks::MockClock;
/// use passwordless_tokenstore::providers::Clock;
/// use chrono::Duration;
///
/// let clock = MockClock::default();
/// let start = clock.now();
/// clock.advance(Duration::milliseconds(5));
/// assert_eq!(clock.now() - start, Duration::milliseconds(5));
/// ```
#[derive(Debug, Clone)]
pub struct MockClock {
    time: Arc<Mutex<DateTime<Utc>>>,
}

impl MockClock {
    /// Create a clock frozen at `time`.
    #[must_use]
    pub fn new(time: DateTime<Utc>) -> Self {
        Self {
            time: Arc::new(Mutex::new(time)),
        }
    }

    /// Jump to an absolute time.
    pub fn set(&self, time: DateTime<Utc>) {
        *self.time.lock().unwrap_or_else(PoisonError::into_inner) = time;
    }

    /// Move the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        let mut time = self.time.lock().unwrap_or_else(PoisonError::into_inner);
        *time += by;
    }
}

impl Default for MockClock {
    /// Clock frozen at 2025-01-01 00:00:00 UTC.
    fn default() -> Self {
        Self::new(DateTime::<Utc>::from_timestamp(1_735_689_600, 0).unwrap_or_default())
    }
}

impl Clock for MockClock {
    fn now(&self) -> DateTime<Utc> {
        *self.time.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
