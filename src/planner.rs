//! Chunk Planner
//!
//! Splits a multi-month horizon into half-month windows. The generation service
//! has a hard output ceiling, so a window must stay small enough that its days,
//! events and messages fit in a single completion.

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Last day of the first half of every month.
const FIRST_HALF_END: u32 = 15;

/// Inclusive range of calendar days covered by one chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl TimeWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        debug_assert!(start <= end, "window start must not follow its end");
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of calendar days in the window.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Human-readable period used in chunk instructions, e.g. "August 1 to 15, 2025".
    pub fn label(&self) -> String {
        format!(
            "{} {} to {}, {}",
            self.start.format("%B"),
            self.start.day(),
            self.end.day(),
            self.start.year()
        )
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Plan the ordered windows covering `[start, start + months)`.
///
/// Each calendar month is split into days 1-15 and 16-end; the second half absorbs
/// the 31st. Windows are clipped to the horizon, so a start date in the middle of a
/// month yields a shorter first window and a matching shorter last one.
pub fn plan_windows(start: NaiveDate, months: u32) -> Vec<TimeWindow> {
    if months == 0 {
        return Vec::new();
    }

    let horizon_last = start
        .checked_add_months(Months::new(months))
        .and_then(|end| end.pred_opt())
        .unwrap_or(NaiveDate::MAX);

    let mut windows = Vec::new();
    let mut cursor = start;
    while cursor <= horizon_last {
        let half_end = half_month_end(cursor);
        let end = half_end.min(horizon_last);
        windows.push(TimeWindow::new(cursor, end));
        match end.succ_opt() {
            Some(next) => cursor = next,
            None => break,
        }
    }
    windows
}

fn half_month_end(date: NaiveDate) -> NaiveDate {
    if date.day() <= FIRST_HALF_END {
        date.with_day(FIRST_HALF_END).unwrap_or(date)
    } else {
        last_day_of_month(date)
    }
}

fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1)
        .and_then(|first| first.checked_add_months(Months::new(1)))
        .and_then(|next_first| next_first.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}
