//! Period boundary calculation for the mid-month reporting cycle.
//!
//! Reporting periods always run from the 15th of one month to the 15th of
//! the next, as half-open intervals `[start, end)`. Everything here is pure
//! date math; nothing touches storage or the wall clock.

use chrono::{Datelike, NaiveDate};

use crate::models::NextPeriodPreview;

/// Canonical boundaries of one reporting period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodBounds {
    pub start: NaiveDate,
    /// Exclusive upper bound.
    pub end: NaiveDate,
}

impl PeriodBounds {
    /// Display name, taken from the end boundary: the period is named for
    /// the month it runs forward into.
    pub fn name(&self) -> String {
        self.end.format("%B %Y").to_string()
    }

    pub fn preview(&self) -> NextPeriodPreview {
        NextPeriodPreview {
            start_date: self.start,
            end_date: self.end,
            name: self.name(),
        }
    }
}

/// The period containing `date`.
///
/// Day 15 exactly counts as on/after the boundary, so it falls into the
/// period starting that day.
pub fn period_containing(date: NaiveDate) -> PeriodBounds {
    if date.day() >= 15 {
        let start = fifteenth_of(date.year(), date.month());
        PeriodBounds {
            start,
            end: fifteenth_of_following_month(start),
        }
    } else {
        let end = fifteenth_of(date.year(), date.month());
        PeriodBounds {
            start: fifteenth_of_preceding_month(end),
            end,
        }
    }
}

/// The period immediately after one ending at `end`.
///
/// Computed purely from the predecessor's end date so the cadence follows
/// administrative rollovers, not the wall clock.
pub fn period_after(end: NaiveDate) -> PeriodBounds {
    PeriodBounds {
        start: end,
        end: fifteenth_of_following_month(end),
    }
}

fn fifteenth_of(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 15).expect("day 15 exists in every month")
}

fn fifteenth_of_following_month(date: NaiveDate) -> NaiveDate {
    // December wraps into January of the next year.
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    fifteenth_of(year, month)
}

fn fifteenth_of_preceding_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 1 {
        (date.year() - 1, 12)
    } else {
        (date.year(), date.month() - 1)
    };
    fifteenth_of(year, month)
}
