//! Clock trait - abstracts time operations for testability.

use chrono::{DateTime, Utc};

/// Source of the current time used for expiry calculations.
///
/// # Examples
///
/// ```
/// use passwordless_tokenstore::providers::{Clock, SystemClock};
///
/// let before = chrono::Utc::now();
/// assert!(SystemClock.now() >= before);
/// ```
pub trait Clock: Send + Sync {
    /// Get the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
