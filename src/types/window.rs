//! Splitting a date range into request-sized windows.

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The CDO API rejects requests spanning more than one year.
pub const DEFAULT_MAX_WINDOW_DAYS: u32 = 366;

/// An inclusive date range fetched with one logical request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FetchWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl FetchWindow {
    /// Returns `None` when `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    /// Number of days covered, both ends included.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Splits `[start, end]` into consecutive windows.
    ///
    /// Windows are ordered, do not overlap, leave no gaps, span at most `max_days`
    /// days and never cross a calendar-year boundary. A `max_days` of zero is
    /// treated as one. When `start` is after `end` no windows are produced.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use noaa_history::FetchWindow;
    ///
    /// let start = NaiveDate::from_ymd_opt(2019, 7, 1).unwrap();
    /// let end = NaiveDate::from_ymd_opt(2021, 2, 10).unwrap();
    /// let windows = FetchWindow::partition(start, end, 366);
    ///
    /// assert_eq!(windows.len(), 3);
    /// assert_eq!(windows[0].end, NaiveDate::from_ymd_opt(2019, 12, 31).unwrap());
    /// assert_eq!(windows[2].start, NaiveDate::from_ymd_opt(2021, 1, 1).unwrap());
    /// ```
    pub fn partition(start: NaiveDate, end: NaiveDate, max_days: u32) -> Vec<FetchWindow> {
        let span = u64::from(max_days.max(1)) - 1;
        let mut windows = Vec::new();
        let mut current = start;

        while current <= end {
            let year_end = NaiveDate::from_ymd_opt(current.year(), 12, 31).unwrap_or(end);
            let span_end = current.checked_add_days(Days::new(span)).unwrap_or(end);
            let window_end = year_end.min(span_end).min(end);

            windows.push(FetchWindow {
                start: current,
                end: window_end,
            });

            match window_end.succ_opt() {
                Some(next) => current = next,
                None => break,
            }
        }

        windows
    }
}

impl fmt::Display for FetchWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to {}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}
