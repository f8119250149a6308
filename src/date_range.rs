//! Half-open date ranges for filtering by a hierarchy selection.
//!
//! A selection of a year, month or day is turned into the `[from, to)`
//! interval it covers. The interval is either naive on both ends or carries
//! the same time zone on both ends; the zone is attached to the wall-clock
//! midnight, never converted into it. In a named zone the two ends may carry
//! different offsets when daylight saving changes inside the range.

use std::fmt;

use chrono::{
    DateTime, Datelike, Days, FixedOffset, NaiveDateTime, NaiveTime, SecondsFormat, TimeZone,
};
use serde::Serialize;

use crate::calendar;
use crate::error::{Error, Result};
use crate::selection::{Granularity, HierarchySelection};
use crate::zone::Zone;

/// A half-open interval: `from` inclusive, `to` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange<T> {
    /// Start instant (inclusive)
    pub from: T,
    /// End instant (exclusive)
    pub to: T,
}

impl<T: PartialOrd> DateRange<T> {
    /// Check whether `instant` falls inside the range.
    pub fn contains(&self, instant: &T) -> bool {
        *instant >= self.from && *instant < self.to
    }
}

impl DateRange<NaiveDateTime> {
    /// Attach `tz` to both ends without shifting the wall-clock values.
    pub fn attach<Tz: TimeZone>(&self, tz: &Tz) -> Result<DateRange<DateTime<Tz>>> {
        Ok(DateRange {
            from: attach(&self.from, tz)?,
            to: attach(&self.to, tz)?,
        })
    }

    /// Number of whole days between `from` and `to`.
    #[must_use]
    pub fn span_days(&self) -> i64 {
        self.to.signed_duration_since(self.from).num_days()
    }
}

// A repeated wall-clock time maps to its earlier instant.
fn attach<Tz: TimeZone>(naive: &NaiveDateTime, tz: &Tz) -> Result<DateTime<Tz>> {
    tz.from_local_datetime(naive).earliest().ok_or_else(|| {
        Error::LocalTime(format!(
            "{} is skipped by a clock change in the requested time zone",
            naive.format("%Y-%m-%d %H:%M:%S")
        ))
    })
}

/// Compute the naive range covered by `selection`.
///
/// - a day spans until the next midnight
/// - a month spans until day 1 of the following month
/// - a year spans until the same date one year later
pub fn resolve(selection: &HierarchySelection) -> Result<DateRange<NaiveDateTime>> {
    let from = selection.first_day().and_time(NaiveTime::MIN);

    let to = match selection.granularity() {
        Granularity::Day => from
            .checked_add_days(Days::new(1))
            .ok_or_else(|| Error::Overflow(format!("no day after {selection}")))?,
        Granularity::Month => calendar::next_month_start(from.date())?.and_time(NaiveTime::MIN),
        Granularity::Year => from
            .year()
            .checked_add(1)
            .and_then(|next| from.with_year(next))
            .ok_or_else(|| Error::Overflow(format!("no year after {selection}")))?,
    };

    Ok(DateRange { from, to })
}

/// Compute the range covered by `selection` with `tz` attached to both ends.
///
/// Fails with [`Error::LocalTime`] when a bound's midnight does not exist
/// in `tz`.
pub fn resolve_in<Tz: TimeZone>(
    selection: &HierarchySelection,
    tz: &Tz,
) -> Result<DateRange<DateTime<Tz>>> {
    resolve(selection)?.attach(tz)
}

/// A resolved range that is either naive or aware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ResolvedRange {
    /// No time zone on either end
    Naive(DateRange<NaiveDateTime>),
    /// One zone on both ends, each bound carrying its own offset
    Aware(DateRange<DateTime<FixedOffset>>),
}

/// Compute the range for `selection`, aware when a zone is given.
pub fn resolve_with(selection: &HierarchySelection, zone: Option<Zone>) -> Result<ResolvedRange> {
    match zone {
        None => resolve(selection).map(ResolvedRange::Naive),
        Some(Zone::Fixed(offset)) => resolve_in(selection, &offset).map(ResolvedRange::Aware),
        Some(Zone::Named(tz)) => {
            let range = resolve_in(selection, &tz)?;
            Ok(ResolvedRange::Aware(DateRange {
                from: range.from.fixed_offset(),
                to: range.to.fixed_offset(),
            }))
        }
    }
}

impl ResolvedRange {
    /// The wall-clock bounds, dropping any time zone.
    #[must_use]
    pub fn naive(&self) -> DateRange<NaiveDateTime> {
        match self {
            Self::Naive(range) => *range,
            Self::Aware(range) => DateRange {
                from: range.from.naive_local(),
                to: range.to.naive_local(),
            },
        }
    }

    /// The offset attached to the start bound, if any.
    #[must_use]
    pub fn offset(&self) -> Option<FixedOffset> {
        match self {
            Self::Naive(_) => None,
            Self::Aware(range) => Some(*range.from.offset()),
        }
    }

    /// Format the bounds as query parameters `(from, to)`.
    ///
    /// Naive bounds use `YYYY-MM-DD HH:MM:SS`, aware bounds RFC 3339.
    #[must_use]
    pub fn to_sql_tuple(&self) -> (String, String) {
        match self {
            Self::Naive(range) => (
                range.from.format("%Y-%m-%d %H:%M:%S").to_string(),
                range.to.format("%Y-%m-%d %H:%M:%S").to_string(),
            ),
            Self::Aware(range) => (
                range.from.to_rfc3339_opts(SecondsFormat::Secs, true),
                range.to.to_rfc3339_opts(SecondsFormat::Secs, true),
            ),
        }
    }
}

impl fmt::Display for ResolvedRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (from, to) = self.to_sql_tuple();
        write!(f, "[{from}, {to})")
    }
}
