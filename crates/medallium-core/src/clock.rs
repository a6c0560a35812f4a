//! Wall-clock abstraction.
//!
//! Every timestamp the engine writes (unlock, completion, claim) comes from
//! a [`Clock`], so tests can pin time with a [`FixedClock`] and move it
//! forward explicitly.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Duration, FixedOffset, Utc};

use medallium_types::CalendarDay;

/// Source of the current instant.
pub trait Clock: fmt::Debug + Send + Sync {
    /// The current instant in UTC.
    fn now(&self) -> DateTime<Utc>;

    /// The current calendar day at `offset`.
    fn today(&self, offset: FixedOffset) -> CalendarDay {
        CalendarDay::from_timestamp(self.now(), offset)
    }
}

/// The system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A settable clock for tests and replays.
///
/// Clones share the same instant, so a test can keep one handle while the
/// engine owns another.
#[derive(Clone)]
pub struct FixedClock {
    millis: Arc<AtomicI64>,
}

impl FixedClock {
    /// A clock frozen at `at`.
    pub fn new(at: DateTime<Utc>) -> Self {
        Self {
            millis: Arc::new(AtomicI64::new(at.timestamp_millis())),
        }
    }

    /// Move the clock to `at`.
    pub fn set(&self, at: DateTime<Utc>) {
        self.millis.store(at.timestamp_millis(), Ordering::SeqCst);
    }

    /// Move the clock forward by `by` (saturating).
    pub fn advance(&self, by: Duration) {
        let delta = by.num_milliseconds();
        // The closure always returns Some, so the update cannot fail.
        let _previous = self
            .millis
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |millis| {
                Some(millis.saturating_add(delta))
            });
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.millis.load(Ordering::SeqCst)).unwrap_or_default()
    }
}

impl fmt::Debug for FixedClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FixedClock").field("now", &self.now()).finish()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 23, 30, 0)
            .single()
            .unwrap_or_default()
    }

    #[test]
    fn fixed_clock_is_frozen_until_moved() {
        let clock = FixedClock::new(start());
        assert_eq!(clock.now(), start());
        assert_eq!(clock.now(), start());

        clock.advance(Duration::hours(2));
        assert_eq!(clock.now(), start() + Duration::hours(2));

        clock.set(start());
        assert_eq!(clock.now(), start());
    }

    #[test]
    fn clones_share_the_instant() {
        let clock = FixedClock::new(start());
        let handle = clock.clone();
        handle.advance(Duration::days(1));
        assert_eq!(clock.now(), start() + Duration::days(1));
    }

    #[test]
    fn today_respects_offset() {
        let clock = FixedClock::new(start());
        let utc = FixedOffset::east_opt(0);
        let tokyo = FixedOffset::east_opt(32_400);
        assert!(utc.is_some() && tokyo.is_some());
        if let (Some(utc), Some(tokyo)) = (utc, tokyo) {
            assert_eq!(Some(clock.today(utc)), CalendarDay::from_ymd(2024, 1, 1));
            assert_eq!(Some(clock.today(tokyo)), CalendarDay::from_ymd(2024, 1, 2));
        }
    }

    #[test]
    fn system_clock_moves_forward() {
        let clock = SystemClock;
        let first = clock.now();
        assert!(clock.now() >= first);
    }
}
