use std::cell::Cell;

use chrono::{Local, NaiveDate, NaiveDateTime};

use crate::model::task::{DATE_FORMAT, TIMESTAMP_FORMAT};

/// Source of "now" for creation and modification stamps
pub trait Clock {
    fn now(&self) -> NaiveDateTime;

    /// `now()` formatted as a task timestamp
    fn timestamp(&self) -> String {
        self.now().format(TIMESTAMP_FORMAT).to_string()
    }

    /// Today's date formatted as a task date
    fn today(&self) -> String {
        self.now().date().format(DATE_FORMAT).to_string()
    }
}

/// Wall-clock local time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock that only moves when told to
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Cell<NaiveDateTime>,
}

impl FixedClock {
    pub fn new(now: NaiveDateTime) -> Self {
        FixedClock {
            now: Cell::new(now),
        }
    }

    /// Build from a `YYYY-MM-DD HH:MM:SS` string, e.g. in tests
    pub fn at(timestamp: &str) -> Option<Self> {
        NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT)
            .ok()
            .map(FixedClock::new)
    }

    pub fn set(&self, now: NaiveDateTime) {
        self.now.set(now);
    }

    pub fn advance(&self, by: chrono::Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for std::rc::Rc<C> {
    fn now(&self) -> NaiveDateTime {
        (**self).now()
    }
}

/// True if `s` is a real calendar date in `YYYY-MM-DD` form
pub fn is_valid_date(s: &str) -> bool {
    // chrono accepts unpadded months and days
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .is_ok_and(|d| d.format(DATE_FORMAT).to_string() == s)
}
