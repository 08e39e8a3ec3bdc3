//! Rolling window of class-year labels offered at signup and used as the
//! Board list's default filter.
//!
//! The window advances once a year at the rollover boundary, measured in the
//! configured time zone, so graduated cohorts age out without config edits.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::config::ClassYearConfig;

/// Number of cohorts in the window.
pub const WINDOW_LEN: i32 = 4;

/// Month/day at which the window advances by one year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rollover {
    pub month: u32,
    pub day: u32,
}

impl Default for Rollover {
    fn default() -> Self {
        Self { month: 7, day: 1 }
    }
}

/// Returns the four class-year labels active on `today`.
pub fn class_year_window(today: NaiveDate, rollover: Rollover) -> Vec<String> {
    let start = if (today.month(), today.day()) >= (rollover.month, rollover.day) {
        today.year() + 1
    } else {
        today.year()
    };
    (start..start + WINDOW_LEN).map(|y| y.to_string()).collect()
}

/// Converts `now` into `tz` before applying the window, so the rollover
/// happens at local midnight rather than UTC midnight.
pub fn class_years_at(now: DateTime<Utc>, tz: Tz, rollover: Rollover) -> Vec<String> {
    class_year_window(now.with_timezone(&tz).date_naive(), rollover)
}

pub fn current_class_years(now: DateTime<Utc>, config: &ClassYearConfig) -> Vec<String> {
    class_years_at(now, config.time_zone, config.rollover)
}
