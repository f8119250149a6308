//! Time zones that can be attached to resolved ranges.

use std::fmt;
use std::str::FromStr;

use chrono::{FixedOffset, Offset, Utc};
use chrono_tz::Tz;

use crate::error::{Error, Result};

/// A fixed UTC offset or a named IANA zone.
///
/// A named zone applies daylight saving per date, so the two ends of one
/// range may carry different offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    /// The same offset on every date
    Fixed(FixedOffset),
    /// An IANA zone such as `Europe/Berlin`
    Named(Tz),
}

impl Zone {
    /// UTC as a fixed offset.
    #[must_use]
    pub fn utc() -> Self {
        Self::Fixed(Utc.fix())
    }
}

impl FromStr for Zone {
    type Err = Error;

    /// Parse `Z`, `UTC`, an offset such as `+02:00` or `-0530`, or an IANA name.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("z") || s.eq_ignore_ascii_case("utc") {
            return Ok(Self::utc());
        }
        if let Ok(offset) = s.parse::<FixedOffset>() {
            return Ok(Self::Fixed(offset));
        }
        s.parse::<Tz>()
            .map(Self::Named)
            .map_err(|e| Error::config(format!("invalid time zone '{s}': {e}")))
    }
}

impl From<FixedOffset> for Zone {
    fn from(offset: FixedOffset) -> Self {
        Self::Fixed(offset)
    }
}

impl From<Tz> for Zone {
    fn from(tz: Tz) -> Self {
        Self::Named(tz)
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(offset) => write!(f, "{offset}"),
            Self::Named(tz) => write!(f, "{}", tz.name()),
        }
    }
}
