//! Display utilities for formatting ranges and drill-down navigation.
//!
//! This module provides the terminal formatting used by the CLI.
//!
//! # Functions
//!
//! - [`truncate`] - Truncate strings to a maximum length with ellipsis
//! - [`print_section`] / [`print_section_simple`] - Print section headers
//! - [`display_range`] / [`display_navigation`] - Display formatted results

use crate::date_range::ResolvedRange;
use crate::filter::RangeFilter;
use crate::navigation::Navigation;
use crate::selection::HierarchySelection;

/// Truncate a string to a maximum length, adding "..." if truncated.
///
/// Counts characters rather than bytes. For `max_len < 3`, truncates
/// without ellipsis since there's no room for "...".
///
/// # Examples
///
/// ```
/// use date_hierarchy::display::truncate;
///
/// assert_eq!(truncate("March", 10), "March");
/// assert_eq!(truncate("September 2017", 8), "Septe...");
/// assert_eq!(truncate("March", 2), "Ma");
/// ```
#[must_use]
pub fn truncate(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_len {
        s.to_string()
    } else if max_len < 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{truncated}...")
    }
}

/// Print a section header with equals signs.
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(50));
    println!("  {title}");
    println!("{}", "=".repeat(50));
}

/// Print a simple section header with dashes.
pub fn print_section_simple(title: &str) {
    println!("\n{title}");
    println!("{}", "-".repeat(30));
}

/// Display a resolved range and the filter clause built from it.
pub fn display_range(selection: &HierarchySelection, range: &ResolvedRange, filter: &RangeFilter<'_>) {
    let (from, to) = range.to_sql_tuple();
    let naive = range.naive();

    print_section(&format!("RANGE FOR {selection}"));
    println!("  From (inclusive): {from:>25}");
    println!("  To (exclusive):   {to:>25}");
    println!("  Span:             {:>20} days", naive.span_days());
    match range.offset() {
        Some(offset) => println!("  Offset:           {offset:>25}"),
        None => println!("  Offset:           {:>25}", "naive"),
    }

    print_section_simple("FILTER");
    let (clause, params) = filter.clause();
    println!("  WHERE {clause}");
    for (i, param) in params.iter().enumerate() {
        println!("  ?{} = {param}", i + 1);
    }
}

/// Display one step of the drill-down.
pub fn display_navigation(nav: &Navigation) {
    let heading = nav
        .level
        .map_or_else(|| "SELECTED DAY".to_string(), |level| level.to_string().to_uppercase());
    print_section(&heading);

    if let Some(back) = &nav.back {
        let target = back
            .selection
            .map_or_else(|| "-".to_string(), |selection| selection.to_string());
        println!("  < {:<20} ({target})", truncate(&back.title, 20));
    }

    if nav.choices.is_empty() {
        println!("  No dates to show for this period.");
        return;
    }

    for (i, choice) in nav.choices.iter().enumerate() {
        let marker = if choice.link { ">" } else { " " };
        println!(
            "  {:2}. {:<20} {marker} {}",
            i + 1,
            truncate(&choice.title, 20),
            choice.selection
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_string() {
        assert_eq!(truncate("2017", 10), "2017");
    }

    #[test]
    fn test_truncate_exact_length() {
        assert_eq!(truncate("March", 5), "March");
    }

    #[test]
    fn test_truncate_long_string() {
        assert_eq!(truncate("February 2017", 8), "Febru...");
    }

    #[test]
    fn test_truncate_unicode() {
        assert_eq!(truncate("März 2017", 6), "Mär...");
    }

    #[test]
    fn test_truncate_tiny_max() {
        assert_eq!(truncate("March", 2), "Ma");
        assert_eq!(truncate("March", 0), "");
    }
}
