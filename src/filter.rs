//! Query filter utilities for restricting rows to a resolved date range.

use crate::date_range::ResolvedRange;
use crate::error::{Error, Result};

/// Half-open range filter on one date/datetime column.
#[derive(Debug, Clone)]
pub struct RangeFilter<'a> {
    pub column: &'a str,
    pub range: ResolvedRange,
}

impl<'a> RangeFilter<'a> {
    /// Create a new range filter.
    ///
    /// The column name is spliced into the query text, so only plain
    /// identifiers (letters, digits, `_` and `.`) are accepted.
    pub fn new(column: &'a str, range: ResolvedRange) -> Result<Self> {
        let valid = !column.is_empty()
            && !column.starts_with(|c: char| c.is_ascii_digit())
            && column
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
        if !valid {
            return Err(Error::config(format!("invalid filter column '{column}'")));
        }
        Ok(Self { column, range })
    }

    /// Append `column >= ? AND column < ?` to a query string.
    pub fn apply(&self, query: &mut String, params: &mut Vec<String>) {
        let (from, to) = self.range.to_sql_tuple();
        query.push_str(&format!(" AND {} >= ? AND {} < ?", self.column, self.column));
        params.push(from);
        params.push(to);
    }

    /// The filter as a standalone `WHERE` fragment with its parameters.
    #[must_use]
    pub fn clause(&self) -> (String, Vec<String>) {
        let mut query = "1=1".to_string();
        let mut params = Vec::new();
        self.apply(&mut query, &mut params);
        (query, params)
    }
}
