//! Drill-down choices for the next level of a date hierarchy.
//!
//! Given the currently selected year and month, a policy yields the dates
//! to offer one level down: years, months of a year, or days of a month.
//! The reference moment is always passed in, never read from a clock.
//!
//! Two policies are provided:
//!
//! - [`DefaultPolicy`] - the full calendar, three years either side of today
//!   at the top level
//! - [`PastOnlyPolicy`] - only dates not after the reference moment, with a
//!   window of past years at the top level
//!
//! Callers may plug in their own by implementing [`DrilldownPolicy`].

use std::iter::FusedIterator;

use chrono::{DateTime, Datelike, FixedOffset, Months, NaiveDate, TimeZone};
use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::calendar;
use crate::error::{Error, Result};
use crate::selection::DrilldownLevel;

/// Years offered either side of today by the default policy.
pub const DEFAULT_YEAR_SPAN: i32 = 3;

/// Past years offered by the past-only policy unless configured otherwise.
pub const DEFAULT_PAST_YEARS: u32 = 3;

/// An ascending, finite sequence of drill-down dates.
///
/// Each item is the first day of the year, month or day it stands for.
/// The sequence is computed lazily and can be cloned to iterate again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Drilldown {
    level: DrilldownLevel,
    next: Option<NaiveDate>,
    last: NaiveDate,
}

impl Drilldown {
    fn new(level: DrilldownLevel, first: NaiveDate, last: NaiveDate) -> Self {
        Self {
            level,
            next: (first <= last).then_some(first),
            last,
        }
    }

    /// Stop the sequence at `cutoff` (inclusive).
    #[must_use]
    pub fn until(mut self, cutoff: NaiveDate) -> Self {
        if cutoff < self.last {
            self.last = cutoff;
        }
        if self.next.is_some_and(|next| next > self.last) {
            self.next = None;
        }
        self
    }

    /// The level these dates stand for.
    #[must_use]
    pub const fn level(&self) -> DrilldownLevel {
        self.level
    }

    fn step(&self, date: NaiveDate) -> Option<NaiveDate> {
        match self.level {
            DrilldownLevel::Years => date.checked_add_months(Months::new(12)),
            DrilldownLevel::Months => date.checked_add_months(Months::new(1)),
            DrilldownLevel::Days => date.succ_opt(),
        }
    }
}

impl Iterator for Drilldown {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.step(current).filter(|date| *date <= self.last);
        Some(current)
    }
}

impl FusedIterator for Drilldown {}

/// The whole level below `(year, month)`, before any policy filtering.
///
/// `years` computes the top-level window and is only called at that level.
fn full_level(
    year: Option<i32>,
    month: Option<u32>,
    years: impl FnOnce() -> Result<(i32, i32)>,
) -> Result<Drilldown> {
    match DrilldownLevel::for_lookup(year, month)? {
        DrilldownLevel::Years => {
            let (first, last) = years()?;
            Ok(Drilldown::new(
                DrilldownLevel::Years,
                calendar::year_start(first)?,
                calendar::year_start(last)?,
            ))
        }
        DrilldownLevel::Months => {
            let year = year.ok_or_else(|| Error::invalid_selection("months need a year"))?;
            Ok(Drilldown::new(
                DrilldownLevel::Months,
                calendar::month_start(year, 1)?,
                calendar::month_start(year, 12)?,
            ))
        }
        DrilldownLevel::Days => {
            let (Some(year), Some(month)) = (year, month) else {
                return Err(Error::invalid_selection("days need a year and a month"));
            };
            let first = calendar::month_start(year, month)?;
            let last = calendar::next_month_start(first)?
                .pred_opt()
                .ok_or_else(|| Error::Overflow(format!("no last day for {year}-{month:02}")))?;
            Ok(Drilldown::new(DrilldownLevel::Days, first, last))
        }
    }
}

fn year_window(center: i32, before: i32, after: i32) -> Result<(i32, i32)> {
    let first = center
        .checked_sub(before)
        .ok_or_else(|| Error::out_of_range("year", center))?;
    let last = center
        .checked_add(after)
        .ok_or_else(|| Error::out_of_range("year", center))?;
    Ok((first, last))
}

/// Full-calendar drill-down.
///
/// - nothing selected: Jan 1 of each year from three years before `today`
///   to three years after, seven dates in all
/// - a year: day 1 of each of its twelve months
/// - a year and month: every day of that month
pub fn default_drilldown(
    year: Option<i32>,
    month: Option<u32>,
    today: NaiveDate,
) -> Result<Drilldown> {
    full_level(year, month, || {
        year_window(today.year(), DEFAULT_YEAR_SPAN, DEFAULT_YEAR_SPAN)
    })
}

/// Drill-down restricted to dates not after `as_of`.
///
/// - nothing selected: Jan 1 of the `past_years` years ending with the
///   year of `as_of`
/// - a year: the months of that year up to and including the month of
///   `as_of`
/// - a year and month: the days of that month up to and including the
///   date of `as_of`
///
/// Dates are compared in the local time of `as_of`. A year or month that
/// lies wholly after `as_of` yields an empty sequence.
pub fn past_only_drilldown<Tz: TimeZone>(
    year: Option<i32>,
    month: Option<u32>,
    as_of: &DateTime<Tz>,
    past_years: u32,
) -> Result<Drilldown> {
    let today = as_of.date_naive();

    if past_years == 0 {
        // Nothing to offer at the top level; still validate the lookup shape.
        let level = DrilldownLevel::for_lookup(year, month)?;
        if level == DrilldownLevel::Years {
            return Ok(Drilldown {
                level,
                next: None,
                last: today,
            });
        }
    }

    let level = full_level(year, month, || {
        let back = i32::try_from(past_years.saturating_sub(1))
            .map_err(|_| Error::out_of_range("past_years", past_years))?;
        year_window(today.year(), back, 0)
    })?;

    let cutoff = match level.level() {
        DrilldownLevel::Years | DrilldownLevel::Days => today,
        DrilldownLevel::Months => calendar::first_of_month(today),
    };
    Ok(level.until(cutoff))
}

/// A strategy for choosing the dates one level below a selection.
///
/// `as_of` is the reference moment, captured once by the caller.
pub trait DrilldownPolicy {
    /// Dates to offer below the `(year, month)` lookup.
    fn drilldown(
        &self,
        year: Option<i32>,
        month: Option<u32>,
        as_of: &DateTime<FixedOffset>,
    ) -> Result<Drilldown>;
}

/// The full calendar regardless of the reference moment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultPolicy;

impl DrilldownPolicy for DefaultPolicy {
    fn drilldown(
        &self,
        year: Option<i32>,
        month: Option<u32>,
        as_of: &DateTime<FixedOffset>,
    ) -> Result<Drilldown> {
        default_drilldown(year, month, as_of.date_naive())
    }
}

/// Only dates up to the reference moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PastOnlyPolicy {
    /// Number of years offered at the top level, ending with the current one
    pub past_years: u32,
}

impl Default for PastOnlyPolicy {
    fn default() -> Self {
        Self {
            past_years: DEFAULT_PAST_YEARS,
        }
    }
}

impl DrilldownPolicy for PastOnlyPolicy {
    fn drilldown(
        &self,
        year: Option<i32>,
        month: Option<u32>,
        as_of: &DateTime<FixedOffset>,
    ) -> Result<Drilldown> {
        past_only_drilldown(year, month, as_of, self.past_years)
    }
}

/// Name of a built-in policy, as used in configuration and on the CLI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyKind {
    #[default]
    #[display("default")]
    Default,
    #[display("past-only")]
    PastOnly,
}

/// A built-in policy selected by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    Default(DefaultPolicy),
    PastOnly(PastOnlyPolicy),
}

impl Policy {
    /// Build the policy named by `kind`.
    #[must_use]
    pub const fn new(kind: PolicyKind, past_years: u32) -> Self {
        match kind {
            PolicyKind::Default => Self::Default(DefaultPolicy),
            PolicyKind::PastOnly => Self::PastOnly(PastOnlyPolicy { past_years }),
        }
    }

    /// The name of this policy.
    #[must_use]
    pub const fn kind(&self) -> PolicyKind {
        match self {
            Self::Default(_) => PolicyKind::Default,
            Self::PastOnly(_) => PolicyKind::PastOnly,
        }
    }
}

impl Default for Policy {
    fn default() -> Self {
        Self::Default(DefaultPolicy)
    }
}

impl DrilldownPolicy for Policy {
    fn drilldown(
        &self,
        year: Option<i32>,
        month: Option<u32>,
        as_of: &DateTime<FixedOffset>,
    ) -> Result<Drilldown> {
        match self {
            Self::Default(policy) => policy.drilldown(year, month, as_of),
            Self::PastOnly(policy) => policy.drilldown(year, month, as_of),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn as_of() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2017, 3, 5, 15, 43, 22).unwrap()
    }

    mod default_policy {
        use super::*;

        #[test]
        fn test_years_around_today() {
            let dates: Vec<_> = default_drilldown(None, None, date(2017, 1, 1))
                .unwrap()
                .collect();
            assert_eq!(
                dates,
                (2014..=2020).map(|y| date(y, 1, 1)).collect::<Vec<_>>()
            );
        }

        #[test]
        fn test_months_of_year() {
            let dates: Vec<_> = default_drilldown(Some(2017), None, date(2000, 6, 1))
                .unwrap()
                .collect();
            assert_eq!(dates.len(), 12);
            assert_eq!(dates, (1..=12).map(|m| date(2017, m, 1)).collect::<Vec<_>>());
        }

        #[test]
        fn test_days_of_month() {
            let feb: Vec<_> = default_drilldown(Some(2017), Some(2), date(2017, 1, 1))
                .unwrap()
                .collect();
            assert_eq!(feb.len(), 28);
            assert_eq!(feb.first(), Some(&date(2017, 2, 1)));
            assert_eq!(feb.last(), Some(&date(2017, 2, 28)));

            let leap = default_drilldown(Some(2016), Some(2), date(2017, 1, 1)).unwrap();
            assert_eq!(leap.count(), 29);

            let dec: Vec<_> = default_drilldown(Some(2017), Some(12), date(2017, 1, 1))
                .unwrap()
                .collect();
            assert_eq!(dec.len(), 31);
            assert_eq!(dec.last(), Some(&date(2017, 12, 31)));
        }

        #[test]
        fn test_future_dates_are_offered() {
            let dates: Vec<_> = default_drilldown(Some(2030), Some(4), date(2017, 1, 1))
                .unwrap()
                .collect();
            assert_eq!(dates.len(), 30);
        }

        #[test]
        fn test_month_without_year() {
            let err = default_drilldown(None, Some(3), date(2017, 1, 1)).unwrap_err();
            assert!(matches!(err, Error::InvalidSelection(_)));
        }

        #[test]
        fn test_bad_month() {
            let err = default_drilldown(Some(2017), Some(13), date(2017, 1, 1)).unwrap_err();
            assert!(matches!(err, Error::OutOfRange { field: "month", .. }));
        }

        #[test]
        fn test_year_window_only_at_top_level() {
            let months = default_drilldown(Some(2017), None, NaiveDate::MAX).unwrap();
            assert_eq!(months.count(), 12);
            let days = default_drilldown(Some(2017), Some(2), NaiveDate::MAX).unwrap();
            assert_eq!(days.count(), 28);

            let err = default_drilldown(None, None, NaiveDate::MAX).unwrap_err();
            assert!(matches!(err, Error::OutOfRange { field: "year", .. }));
        }

        #[test]
        fn test_sequence_is_restartable() {
            let seq = default_drilldown(Some(2017), None, date(2017, 1, 1)).unwrap();
            let first: Vec<_> = seq.clone().collect();
            let second: Vec<_> = seq.collect();
            assert_eq!(first, second);
            assert_eq!(
                default_drilldown(Some(2017), None, date(2017, 1, 1)).unwrap().level(),
                DrilldownLevel::Months
            );
        }
    }

    mod past_only_policy {
        use super::*;

        #[test]
        fn test_past_years() {
            let dates: Vec<_> = past_only_drilldown(None, None, &as_of(), 2).unwrap().collect();
            assert_eq!(dates, vec![date(2016, 1, 1), date(2017, 1, 1)]);

            let dates: Vec<_> = past_only_drilldown(None, None, &as_of(), 3).unwrap().collect();
            assert_eq!(
                dates,
                vec![date(2015, 1, 1), date(2016, 1, 1), date(2017, 1, 1)]
            );
        }

        #[test]
        fn test_zero_past_years() {
            let mut dates = past_only_drilldown(None, None, &as_of(), 0).unwrap();
            assert_eq!(dates.next(), None);
        }

        #[test]
        fn test_past_months_of_current_year() {
            let dates: Vec<_> = past_only_drilldown(Some(2017), None, &as_of(), 3)
                .unwrap()
                .collect();
            assert_eq!(
                dates,
                vec![date(2017, 1, 1), date(2017, 2, 1), date(2017, 3, 1)]
            );
        }

        #[test]
        fn test_past_months_of_past_year() {
            let dates: Vec<_> = past_only_drilldown(Some(2016), None, &as_of(), 3)
                .unwrap()
                .collect();
            assert_eq!(dates, (1..=12).map(|m| date(2016, m, 1)).collect::<Vec<_>>());
        }

        #[test]
        fn test_future_year_is_empty() {
            let mut dates = past_only_drilldown(Some(2018), None, &as_of(), 3).unwrap();
            assert_eq!(dates.next(), None);
        }

        #[test]
        fn test_past_days_of_current_month() {
            let dates: Vec<_> = past_only_drilldown(Some(2017), Some(3), &as_of(), 3)
                .unwrap()
                .collect();
            assert_eq!(dates, (1..=5).map(|d| date(2017, 3, d)).collect::<Vec<_>>());
        }

        #[test]
        fn test_past_days_of_past_month() {
            let dates: Vec<_> = past_only_drilldown(Some(2017), Some(2), &as_of(), 3)
                .unwrap()
                .collect();
            assert_eq!(dates, (1..=28).map(|d| date(2017, 2, d)).collect::<Vec<_>>());
        }

        #[test]
        fn test_future_month_is_empty() {
            let mut dates = past_only_drilldown(Some(2017), Some(4), &as_of(), 3).unwrap();
            assert_eq!(dates.next(), None);
            assert_eq!(dates.level(), DrilldownLevel::Days);
        }

        #[test]
        fn test_compares_in_local_time_of_reference() {
            // 2017-03-05 23:30 at UTC-05:00 is already March 6 in UTC.
            let west = FixedOffset::west_opt(5 * 3600).unwrap();
            let late = west.with_ymd_and_hms(2017, 3, 5, 23, 30, 0).unwrap();
            let dates: Vec<_> = past_only_drilldown(Some(2017), Some(3), &late, 3)
                .unwrap()
                .collect();
            assert_eq!(dates.last(), Some(&date(2017, 3, 5)));
        }

        #[test]
        fn test_past_years_only_checked_at_top_level() {
            let months: Vec<_> = past_only_drilldown(Some(2017), None, &as_of(), u32::MAX)
                .unwrap()
                .collect();
            assert_eq!(
                months,
                vec![date(2017, 1, 1), date(2017, 2, 1), date(2017, 3, 1)]
            );
            let days = past_only_drilldown(Some(2017), Some(3), &as_of(), u32::MAX).unwrap();
            assert_eq!(days.count(), 5);

            let err = past_only_drilldown(None, None, &as_of(), u32::MAX).unwrap_err();
            assert!(matches!(err, Error::OutOfRange { field: "past_years", .. }));
        }

        #[test]
        fn test_month_without_year() {
            for past_years in [0, 3] {
                let err = past_only_drilldown(None, Some(3), &as_of(), past_years).unwrap_err();
                assert!(matches!(err, Error::InvalidSelection(_)));
            }
        }
    }

    mod policies {
        use super::*;

        #[test]
        fn test_policy_dispatch() {
            let as_of = as_of().fixed_offset();

            let default = Policy::new(PolicyKind::Default, 3);
            assert_eq!(default.kind(), PolicyKind::Default);
            assert_eq!(default.drilldown(Some(2017), None, &as_of).unwrap().count(), 12);

            let past = Policy::new(PolicyKind::PastOnly, 3);
            assert_eq!(past.kind(), PolicyKind::PastOnly);
            assert_eq!(past.drilldown(Some(2017), None, &as_of).unwrap().count(), 3);
        }

        #[test]
        fn test_custom_policy() {
            struct OnlyFirst;

            impl DrilldownPolicy for OnlyFirst {
                fn drilldown(
                    &self,
                    year: Option<i32>,
                    month: Option<u32>,
                    as_of: &DateTime<FixedOffset>,
                ) -> Result<Drilldown> {
                    let level = default_drilldown(year, month, as_of.date_naive())?;
                    let first = level.clone().next().unwrap_or(as_of.date_naive());
                    Ok(level.until(first))
                }
            }

            let policy: &dyn DrilldownPolicy = &OnlyFirst;
            let dates: Vec<_> = policy
                .drilldown(Some(2017), Some(6), &as_of().fixed_offset())
                .unwrap()
                .collect();
            assert_eq!(dates, vec![date(2017, 6, 1)]);
        }

        #[test]
        fn test_policy_kind_names() {
            assert_eq!(PolicyKind::PastOnly.to_string(), "past-only");
            let kind: PolicyKind = serde_json::from_str("\"past-only\"").unwrap();
            assert_eq!(kind, PolicyKind::PastOnly);
        }
    }
}
