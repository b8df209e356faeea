//! Clock capability.
//!
//! Every "now" read by the cache and the read path goes through a [`Clock`]
//! so tests can pin time and assert exact bucket membership.

use std::sync::{Mutex, MutexGuard, PoisonError};

use time::{Duration, OffsetDateTime};


pub trait Clock: Send + Sync {
    fn now(&self) -> OffsetDateTime;
}

/// Wall clock in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<OffsetDateTime>,
}

impl ManualClock {
    pub fn new(now: OffsetDateTime) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: OffsetDateTime) {
        *self.guard() = now;
    }

    pub fn advance(&self, by: Duration) {
        *self.guard() += by;
    }

    fn guard(&self) -> MutexGuard<'_, OffsetDateTime> {
        self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> OffsetDateTime {
        *self.guard()
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    #[test]
    fn manual_clock_moves_only_on_request() {
        let clock = ManualClock::new(datetime!(2023-01-01 10:00:00 UTC));
        assert_eq!(clock.now(), datetime!(2023-01-01 10:00:00 UTC));
        assert_eq!(clock.now(), datetime!(2023-01-01 10:00:00 UTC));

        clock.advance(Duration::seconds(90));
        assert_eq!(clock.now(), datetime!(2023-01-01 10:01:30 UTC));

        clock.set(datetime!(2024-06-01 00:00:00 UTC));
        assert_eq!(clock.now(), datetime!(2024-06-01 00:00:00 UTC));
    }

    #[test]
    fn system_clock_reports_utc() {
        assert!(SystemClock.now().offset().is_utc());
    }
}
