//! Upcoming-birthday window arithmetic.
//!
//! Birthdays recur yearly, so comparisons ignore the year and work on a
//! `month * 100 + day` encoding ("md"). March 5th is `305`, December 31st is `1231`.

use chrono::{Datelike, Days, NaiveDate};

/// Inclusive range of calendar days, compared by month and day only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BirthdayWindow {
    /// md of the first day in the window.
    pub start: i32,
    /// md of the last day in the window.
    pub end: i32,
}

impl BirthdayWindow {
    /// Window covering `today` through `today + days`.
    pub fn starting(today: NaiveDate, days: u32) -> Self {
        let last = today
            .checked_add_days(Days::new(u64::from(days)))
            .unwrap_or(NaiveDate::MAX);

        Self {
            start: month_day(today),
            end: month_day(last),
        }
    }

    /// True when the window crosses New Year (e.g. Dec 28 .. Jan 3).
    pub fn wraps_year(&self) -> bool {
        self.end < self.start
    }

    /// Returns true if a birthday on `date` falls into the window.
    pub fn contains(&self, date: NaiveDate) -> bool {
        let md = month_day(date);
        if self.wraps_year() {
            md >= self.start || md <= self.end
        } else {
            (self.start..=self.end).contains(&md)
        }
    }
}

/// Encodes a date as `month * 100 + day`.
pub fn month_day(date: NaiveDate) -> i32 {
    (date.month() * 100 + date.day()) as i32
}
