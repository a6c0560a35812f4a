//! Consecutive-day collection streaks.
//!
//! Unlock timestamps are bucketed into [`CalendarDay`]s at a fixed UTC
//! offset; several unlocks on one day count as a single active day.
//!
//! - **Current streak**: the run of consecutive active days ending at the
//!   most recent active day, provided that day is today or yesterday.
//!   Otherwise the streak is broken and reported as 0.
//! - **Best streak**: the longest run of consecutive active days anywhere
//!   in the history.

use std::collections::BTreeSet;

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use medallium_types::CalendarDay;

/// Streak figures derived from one ledger snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakSummary {
    /// Consecutive active days ending today or yesterday.
    pub current: u32,
    /// Longest run of consecutive active days.
    pub best: u32,
    /// Number of distinct active days.
    pub active_days: u32,
    /// Most recent active day.
    pub last_active_day: Option<CalendarDay>,
}

/// Sorted, de-duplicated active days.
pub fn active_days(
    timestamps: impl IntoIterator<Item = DateTime<Utc>>,
    offset: FixedOffset,
) -> Vec<CalendarDay> {
    timestamps
        .into_iter()
        .map(|ts| CalendarDay::from_timestamp(ts, offset))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Current streak over sorted unique `days`, as seen on `today`.
pub fn current_streak(days: &[CalendarDay], today: CalendarDay) -> u32 {
    let Some(&last) = days.last() else {
        return 0;
    };
    if last != today && today.previous() != Some(last) {
        return 0;
    }

    let mut streak = 1_u32;
    let mut earliest = last;
    for &day in days.iter().rev().skip(1) {
        if !day.is_followed_by(earliest) {
            break;
        }
        streak = streak.saturating_add(1);
        earliest = day;
    }
    streak
}

/// Longest run of consecutive days in sorted unique `days`.
pub fn best_streak(days: &[CalendarDay]) -> u32 {
    let mut best = 0_u32;
    let mut run = 0_u32;
    let mut previous: Option<CalendarDay> = None;
    for &day in days {
        run = match previous {
            Some(prev) if prev.is_followed_by(day) => run.saturating_add(1),
            _ => 1,
        };
        best = best.max(run);
        previous = Some(day);
    }
    best
}

/// Compute every streak figure for a set of unlock timestamps.
pub fn summarize(
    timestamps: impl IntoIterator<Item = DateTime<Utc>>,
    offset: FixedOffset,
    today: CalendarDay,
) -> StreakSummary {
    let days = active_days(timestamps, offset);
    StreakSummary {
        current: current_streak(&days, today),
        best: best_streak(&days),
        active_days: u32::try_from(days.len()).unwrap_or(u32::MAX),
        last_active_day: days.last().copied(),
    }
}
