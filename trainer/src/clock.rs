//! Wall-clock access for the scheduler.

use chrono::{DateTime, Local, NaiveDate};
use std::sync::atomic::{AtomicI64, Ordering};

/// Source of "now" for scheduling decisions.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;

    /// Today's calendar date in local time.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// The real local clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// A clock frozen at a given instant, movable by whole days.
#[derive(Debug)]
pub struct FixedClock {
    millis: AtomicI64,
}

impl FixedClock {
    pub fn new(at: DateTime<Local>) -> Self {
        Self {
            millis: AtomicI64::new(at.timestamp_millis()),
        }
    }

    /// Noon local time on `date`, far away from any DST switch.
    pub fn at_noon(date: NaiveDate) -> Self {
        let noon = date.and_hms_opt(12, 0, 0).unwrap_or_default();
        let at = noon
            .and_local_timezone(Local)
            .earliest()
            .unwrap_or_else(|| noon.and_utc().with_timezone(&Local));
        Self::new(at)
    }

    pub fn set(&self, at: DateTime<Local>) {
        self.millis.store(at.timestamp_millis(), Ordering::SeqCst);
    }

    pub fn advance_days(&self, days: i64) {
        self.millis
            .fetch_add(days * 24 * 60 * 60 * 1000, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        let millis = self.millis.load(Ordering::SeqCst);
        DateTime::from_timestamp_millis(millis)
            .unwrap_or(DateTime::UNIX_EPOCH)
            .with_timezone(&Local)
    }
}
