//! # Time Sources
//!
//! Wall-clock access goes through [`TimeSource`] so epochs and request ids
//! are deterministic under test.

use crate::region::Epoch;
use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;

/// Source of the current time.
pub trait TimeSource: Send + Sync {
    /// Current UTC time.
    fn now(&self) -> DateTime<Utc>;

    /// Epoch containing [`TimeSource::now`].
    fn current_epoch(&self) -> Epoch {
        Epoch::of(self.now())
    }
}

/// Default time source using system time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock.
#[derive(Debug)]
pub struct FixedTimeSource {
    now: RwLock<DateTime<Utc>>,
}

impl FixedTimeSource {
    /// Clock frozen at `at`.
    pub fn new(at: DateTime<Utc>) -> Self {
        Self {
            now: RwLock::new(at),
        }
    }

    /// Jump to `at`.
    pub fn set(&self, at: DateTime<Utc>) {
        *self.now.write() = at;
    }

    /// Move forward by `by`.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.write();
        *now += by;
    }
}

impl TimeSource for FixedTimeSource {
    fn now(&self) -> DateTime<Utc> {
        *self.now.read()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_fixed_clock_advances() {
        let start = Utc.with_ymd_and_hms(2026, 12, 31, 23, 59, 0).unwrap();
        let clock = FixedTimeSource::new(start);
        assert_eq!(clock.current_epoch(), Epoch(2026));

        clock.advance(Duration::minutes(2));
        assert_eq!(clock.current_epoch(), Epoch(2027));
        assert_eq!(clock.now(), start + Duration::minutes(2));
    }

    #[test]
    fn test_system_clock_is_recent() {
        assert!(SystemTimeSource.current_epoch().value() >= 2024);
    }
}
