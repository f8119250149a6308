//! Navigation model for a date hierarchy facet.
//!
//! Combines a selection with a drill-down policy into what a listing shows:
//! a crumb back to the parent level and the titled choices one level down.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate};
use serde::Serialize;

use crate::drilldown::DrilldownPolicy;
use crate::error::Result;
use crate::selection::{DrilldownLevel, Granularity, HierarchySelection};

/// Title of the crumb above the year level.
pub const ALL_DATES: &str = "All dates";

/// A way back to a coarser level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Crumb {
    /// Label of the coarser level, or "All dates"
    pub title: String,
    /// `None` clears the selection entirely
    pub selection: Option<HierarchySelection>,
}

/// One entry at the next level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choice {
    /// Label such as `2017`, `March 2017` or `March 5`
    pub title: String,
    /// The selection this entry narrows to
    pub selection: HierarchySelection,
    /// False for the terminal day, which has nothing further to select
    pub link: bool,
}

/// Everything needed to render one step of the drill-down.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Navigation {
    /// Level of `choices`; `None` once a day is selected
    pub level: Option<DrilldownLevel>,
    /// Crumb to the parent level; `None` at the top
    pub back: Option<Crumb>,
    /// Entries in ascending date order, possibly empty
    pub choices: Vec<Choice>,
}

impl Navigation {
    /// Build the navigation below `selection` using `policy`.
    pub fn build<P>(
        selection: Option<&HierarchySelection>,
        policy: &P,
        as_of: &DateTime<FixedOffset>,
    ) -> Result<Self>
    where
        P: DrilldownPolicy + ?Sized,
    {
        let Some(selection) = selection else {
            return Self::below(None, None, policy, as_of, None);
        };

        let year = selection.year_value();
        match selection.granularity() {
            Granularity::Day => Ok(Self {
                level: None,
                back: selection.parent().map(crumb),
                choices: vec![Choice {
                    title: title(DrilldownLevel::Days, selection.first_day()),
                    selection: *selection,
                    link: false,
                }],
            }),
            Granularity::Month => Self::below(
                Some(year),
                selection.month_value(),
                policy,
                as_of,
                selection.parent().map(crumb),
            ),
            Granularity::Year => Self::below(
                Some(year),
                None,
                policy,
                as_of,
                Some(Crumb {
                    title: ALL_DATES.to_string(),
                    selection: None,
                }),
            ),
        }
    }

    fn below<P>(
        year: Option<i32>,
        month: Option<u32>,
        policy: &P,
        as_of: &DateTime<FixedOffset>,
        back: Option<Crumb>,
    ) -> Result<Self>
    where
        P: DrilldownPolicy + ?Sized,
    {
        let dates = policy.drilldown(year, month, as_of)?;
        let level = dates.level();
        let choices = dates
            .map(|date| Choice {
                title: title(level, date),
                selection: HierarchySelection::containing(date, level.granularity()),
                link: true,
            })
            .collect();

        Ok(Self {
            level: Some(level),
            back,
            choices,
        })
    }
}

fn crumb(selection: HierarchySelection) -> Crumb {
    let level = match selection.granularity() {
        Granularity::Year => DrilldownLevel::Years,
        Granularity::Month => DrilldownLevel::Months,
        Granularity::Day => DrilldownLevel::Days,
    };
    Crumb {
        title: title(level, selection.first_day()),
        selection: Some(selection),
    }
}

/// Label for a date at the given level: `2017`, `March 2017` or `March 5`.
#[must_use]
pub fn title(level: DrilldownLevel, date: NaiveDate) -> String {
    match level {
        DrilldownLevel::Years => date.year().to_string(),
        DrilldownLevel::Months => date.format("%B %Y").to_string(),
        DrilldownLevel::Days => date.format("%B %-d").to_string(),
    }
}
