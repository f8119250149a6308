//! Partial date selections and drill-down levels.
//!
//! A [`HierarchySelection`] is the active year, month or day a listing is
//! narrowed to. It can only be built through validating constructors, so
//! it always holds a real calendar date and the shape invariant (a day
//! needs a month, a month needs a year) never has to be re-checked.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::calendar;
use crate::error::{Error, Result};

/// The granularity of choices offered at one step of the drill-down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrilldownLevel {
    /// Choose a year
    #[display("years")]
    Years,
    /// Choose a month of the selected year
    #[display("months")]
    Months,
    /// Choose a day of the selected month
    #[display("days")]
    Days,
}

impl DrilldownLevel {
    /// Level of the choices to offer given the current year/month lookups.
    ///
    /// A month without a year has no meaning and is rejected.
    pub fn for_lookup(year: Option<i32>, month: Option<u32>) -> Result<Self> {
        match (year, month) {
            (None, None) => Ok(Self::Years),
            (Some(_), None) => Ok(Self::Months),
            (Some(_), Some(_)) => Ok(Self::Days),
            (None, Some(month)) => Err(Error::invalid_selection(format!(
                "month {month} given without a year"
            ))),
        }
    }

    /// The granularity of a single choice at this level.
    #[must_use]
    pub const fn granularity(self) -> Granularity {
        match self {
            Self::Years => Granularity::Year,
            Self::Months => Granularity::Month,
            Self::Days => Granularity::Day,
        }
    }
}

/// How much of a date a selection pins down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
pub enum Granularity {
    /// January 1 to the next January 1
    #[display("year")]
    Year,
    /// Day 1 to day 1 of the next month
    #[display("month")]
    Month,
    /// One midnight to the next
    #[display("day")]
    Day,
}

/// A validated year, month or day selection.
///
/// Stores the first day it covers together with its granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "SelectionParts", into = "SelectionParts")]
pub struct HierarchySelection {
    start: NaiveDate,
    granularity: Granularity,
}

/// The loose field form of a selection, as it arrives from a caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionParts {
    /// Selected year
    pub year: Option<i32>,
    /// Selected month (1-12), only with a year
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    /// Selected day of month, only with a month
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<u32>,
}

impl HierarchySelection {
    /// Select a whole year.
    pub fn year(year: i32) -> Result<Self> {
        Ok(Self {
            start: calendar::year_start(year)?,
            granularity: Granularity::Year,
        })
    }

    /// Select a whole month.
    pub fn month(year: i32, month: u32) -> Result<Self> {
        Ok(Self {
            start: calendar::month_start(year, month)?,
            granularity: Granularity::Month,
        })
    }

    /// Select a single day.
    pub fn day(year: i32, month: u32, day: u32) -> Result<Self> {
        Ok(Self {
            start: calendar::ymd(year, month, day)?,
            granularity: Granularity::Day,
        })
    }

    /// The year, month or day containing `date`.
    #[must_use]
    pub fn containing(date: NaiveDate, granularity: Granularity) -> Self {
        let start = match granularity {
            Granularity::Year => calendar::first_of_year(date),
            Granularity::Month => calendar::first_of_month(date),
            Granularity::Day => date,
        };
        Self { start, granularity }
    }

    /// Build a selection from optional fields.
    ///
    /// Returns `Ok(None)` when nothing is selected. A day without a month,
    /// or a month without a year, is a shape error.
    pub fn from_parts(year: Option<i32>, month: Option<u32>, day: Option<u32>) -> Result<Option<Self>> {
        match (year, month, day) {
            (None, None, None) => Ok(None),
            (Some(y), None, None) => Self::year(y).map(Some),
            (Some(y), Some(m), None) => Self::month(y, m).map(Some),
            (Some(y), Some(m), Some(d)) => Self::day(y, m, d).map(Some),
            (_, None, Some(d)) => Err(Error::invalid_selection(format!(
                "day {d} given without a month"
            ))),
            (None, Some(m), _) => Err(Error::invalid_selection(format!(
                "month {m} given without a year"
            ))),
        }
    }

    /// How much of the date is selected.
    #[must_use]
    pub const fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// The selected year.
    #[must_use]
    pub fn year_value(&self) -> i32 {
        self.start.year()
    }

    /// The selected month, if any.
    #[must_use]
    pub fn month_value(&self) -> Option<u32> {
        (self.granularity >= Granularity::Month).then(|| self.start.month())
    }

    /// The selected day of month, if any.
    #[must_use]
    pub fn day_value(&self) -> Option<u32> {
        (self.granularity == Granularity::Day).then(|| self.start.day())
    }

    /// The first calendar day covered by the selection.
    #[must_use]
    pub const fn first_day(&self) -> NaiveDate {
        self.start
    }

    /// The level of choices offered below this selection.
    ///
    /// `None` for a day, which is the terminal level.
    #[must_use]
    pub const fn child_level(&self) -> Option<DrilldownLevel> {
        match self.granularity {
            Granularity::Year => Some(DrilldownLevel::Months),
            Granularity::Month => Some(DrilldownLevel::Days),
            Granularity::Day => None,
        }
    }

    /// The next coarser selection; `None` above a year ("all dates").
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        match self.granularity {
            Granularity::Year => None,
            Granularity::Month => Some(Self::containing(self.start, Granularity::Year)),
            Granularity::Day => Some(Self::containing(self.start, Granularity::Month)),
        }
    }

    /// The loose field form.
    #[must_use]
    pub fn parts(&self) -> SelectionParts {
        SelectionParts {
            year: Some(self.year_value()),
            month: self.month_value(),
            day: self.day_value(),
        }
    }
}

impl TryFrom<SelectionParts> for HierarchySelection {
    type Error = Error;

    fn try_from(parts: SelectionParts) -> Result<Self> {
        Self::from_parts(parts.year, parts.month, parts.day)?
            .ok_or_else(|| Error::invalid_selection("a selection needs at least a year"))
    }
}

impl From<HierarchySelection> for SelectionParts {
    fn from(selection: HierarchySelection) -> Self {
        selection.parts()
    }
}

impl fmt::Display for HierarchySelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.granularity {
            Granularity::Year => write!(f, "{}", self.start.year()),
            Granularity::Month => write!(f, "{}", self.start.format("%Y-%m")),
            Granularity::Day => write!(f, "{}", self.start.format("%Y-%m-%d")),
        }
    }
}

/// Pick the starting lookup from the earliest and latest dates in a data set.
///
/// When all data falls in one year that year is preselected, and when it
/// also falls in one month that month is preselected too. Returns the
/// `(year, month)` lookups to start the drill-down from.
#[must_use]
pub fn narrowest_lookup(first: NaiveDate, last: NaiveDate) -> (Option<i32>, Option<u32>) {
    if first.year() != last.year() {
        return (None, None);
    }
    if first.month() == last.month() {
        (Some(first.year()), Some(first.month()))
    } else {
        (Some(first.year()), None)
    }
}
