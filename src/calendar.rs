//! Gregorian calendar helpers shared by range resolution and drill-down.
//!
//! Every helper validates its inputs through `chrono` and reports
//! out-of-range fields as [`Error::OutOfRange`] instead of panicking.

use chrono::{Datelike, Months, NaiveDate};

use crate::error::{Error, Result};

/// January 1 of `year`.
pub fn year_start(year: i32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(|| Error::out_of_range("year", year))
}

/// The first day of `month` in `year`.
pub fn month_start(year: i32, month: u32) -> Result<NaiveDate> {
    if !(1..=12).contains(&month) {
        return Err(Error::out_of_range("month", month));
    }
    NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| Error::out_of_range("year", year))
}

/// A full calendar date, validating each field in turn.
pub fn ymd(year: i32, month: u32, day: u32) -> Result<NaiveDate> {
    let first = month_start(year, month)?;
    if day == 0 || day > days_in_month(first)? {
        return Err(Error::out_of_range("day", day));
    }
    first
        .with_day(day)
        .ok_or_else(|| Error::out_of_range("day", day))
}

/// The first day of the month following the one `date` falls in.
///
/// Rolls December over into January of the next year.
pub fn next_month_start(date: NaiveDate) -> Result<NaiveDate> {
    first_of_month(date)
        .checked_add_months(Months::new(1))
        .ok_or_else(|| Error::Overflow(format!("no month after {}", date.format("%Y-%m"))))
}

/// Truncate `date` to day 1 of its month.
#[must_use]
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    // Day 1 exists in every month of every representable year.
    date - chrono::Duration::days(i64::from(date.day0()))
}

/// Truncate `date` to January 1 of its year.
#[must_use]
pub fn first_of_year(date: NaiveDate) -> NaiveDate {
    date - chrono::Duration::days(i64::from(date.ordinal0()))
}

/// Number of days in the month `date` falls in (28 to 31).
pub fn days_in_month(date: NaiveDate) -> Result<u32> {
    let next = next_month_start(date)?;
    let days = next.signed_duration_since(first_of_month(date)).num_days();
    u32::try_from(days).map_err(|_| Error::other(format!("bad month length {days}")))
}
