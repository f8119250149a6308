//! # Date Hierarchy
//!
//! Calendar drill-down (year, month, day) for date-based list facets.
//!
//! This crate provides:
//! - Half-open `[from, to)` ranges for a year, month or day selection,
//!   naive or with a fixed offset or IANA time zone attached
//! - The dates to offer one level down, over the full calendar or only the
//!   past relative to a supplied reference moment
//! - A navigation model (back crumb plus titled choices) and a query filter
//!   clause built from a resolved range
//!
//! Nothing here reads the system clock; "now" is always an argument.
//!
//! ```
//! use date_hierarchy::{default_drilldown, resolve, HierarchySelection};
//! use chrono::NaiveDate;
//!
//! let range = resolve(&HierarchySelection::month(2016, 2)?)?;
//! assert_eq!(range.span_days(), 29);
//!
//! let today = NaiveDate::from_ymd_opt(2017, 1, 1).unwrap();
//! assert_eq!(default_drilldown(Some(2017), None, today)?.count(), 12);
//! # Ok::<(), date_hierarchy::Error>(())
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub(crate) mod calendar;
pub mod config;
pub mod date_range;
pub mod display;
pub mod drilldown;
pub mod error;
pub mod filter;
pub mod navigation;
pub mod selection;
pub mod zone;

pub use config::Config;
pub use date_range::{resolve, resolve_in, resolve_with, DateRange, ResolvedRange};
pub use drilldown::{
    default_drilldown, past_only_drilldown, DefaultPolicy, Drilldown, DrilldownPolicy,
    PastOnlyPolicy, Policy, PolicyKind,
};
pub use error::{Error, Result};
pub use filter::RangeFilter;
pub use navigation::Navigation;
pub use selection::{narrowest_lookup, DrilldownLevel, Granularity, HierarchySelection};
pub use zone::Zone;

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "date-hierarchy";
