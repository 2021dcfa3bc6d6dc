//! Header row detection.
//!
//! Templates are edited by hand, so the header row is recovered from cell
//! text instead of a fixed offset.

use std::sync::OnceLock;

use regex::Regex;

use crate::cell_ref::Bounds;
use crate::types::Worksheet;

pub const JOB_HEADER: &str = "Job Search Status";
pub const INTERNSHIP_HEADER: &str = "Internship Search Status";

fn loose_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"(?i)search\s+status").ok())
        .as_ref()
}

/// Header text expected in the label column of `table` on `sheet_title`.
pub fn expected_header(sheet_title: &str, table: &str) -> &'static str {
    let title = sheet_title.to_lowercase();
    let name = table.to_lowercase();
    if title.contains("internship")
        || name.contains("_int")
        || name.ends_with("int1")
        || name.ends_with("int2")
        || name.starts_with("int_total")
    {
        INTERNSHIP_HEADER
    } else {
        JOB_HEADER
    }
}

/// How the header row was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderMatch {
    /// Label equals the expected text (trimmed, case-insensitive).
    Exact(u32),
    /// Label contains "search status".
    Loose(u32),
    /// Nothing matched; the top row of the table is assumed.
    Fallback(u32),
}

impl HeaderMatch {
    pub fn row(self) -> u32 {
        match self {
            Self::Exact(r) | Self::Loose(r) | Self::Fallback(r) => r,
        }
    }
}

/// Scan rows `min_row..=max_row` through `label_at` for the header.
pub fn resolve_header_row<'a, F>(label_at: F, min_row: u32, max_row: u32, expected: &str) -> HeaderMatch
where
    F: Fn(u32) -> Option<&'a str>,
{
    let expected = expected.trim().to_lowercase();
    if let Some(row) =
        (min_row..=max_row).find(|&r| label_at(r).is_some_and(|s| s.trim().to_lowercase() == expected))
    {
        return HeaderMatch::Exact(row);
    }
    let pattern = loose_pattern();
    if let Some(row) = (min_row..=max_row).find(|&r| {
        label_at(r).is_some_and(|s| pattern.is_some_and(|p| p.is_match(s)))
    }) {
        return HeaderMatch::Loose(row);
    }
    HeaderMatch::Fallback(min_row)
}

/// Header row of a table whose label column is `bounds.min_col`.
pub fn resolve_header(sheet: &Worksheet, table: &str, bounds: &Bounds, expected: &str) -> u32 {
    let found = resolve_header_row(
        |row| sheet.text(row, bounds.min_col),
        bounds.min_row,
        bounds.max_row,
        expected,
    );
    match found {
        HeaderMatch::Exact(row) => row,
        HeaderMatch::Loose(row) => {
            tracing::debug!(table, row, expected, "header matched loosely");
            row
        }
        HeaderMatch::Fallback(row) => {
            tracing::warn!(
                sheet = %sheet.name,
                table,
                row,
                expected,
                "no header row found, using first row of table"
            );
            row
        }
    }
}
