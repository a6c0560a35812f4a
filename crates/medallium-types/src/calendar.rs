//! Calendar-day value type used for streak and activity analytics.
//!
//! A [`CalendarDay`] is a date with no time-of-day component. Timestamps
//! are bucketed into days by shifting them into a fixed UTC offset first,
//! so daylight-saving transitions never split or merge a day.

use core::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A calendar date without a time component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CalendarDay(pub NaiveDate);

impl CalendarDay {
    /// Wrap an existing [`NaiveDate`].
    pub const fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Build a day from year, month and day-of-month.
    ///
    /// Returns `None` for an invalid date.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// The local calendar day of `timestamp` at the given UTC offset.
    pub fn from_timestamp(timestamp: DateTime<Utc>, offset: FixedOffset) -> Self {
        Self(timestamp.with_timezone(&offset).date_naive())
    }

    /// Return the inner [`NaiveDate`].
    pub const fn date(self) -> NaiveDate {
        self.0
    }

    /// The following day, or `None` at the end of the representable range.
    pub fn next(self) -> Option<Self> {
        self.0.succ_opt().map(Self)
    }

    /// The preceding day, or `None` at the start of the representable range.
    pub fn previous(self) -> Option<Self> {
        self.0.pred_opt().map(Self)
    }

    /// Whether `other` is exactly one calendar day after `self`.
    pub fn is_followed_by(self, other: Self) -> bool {
        self.next() == Some(other)
    }
}

impl core::fmt::Display for CalendarDay {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for CalendarDay {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").map(Self)
    }
}
