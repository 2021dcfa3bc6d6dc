//! Writing query counts into a table column, row by row.

use std::collections::HashMap;

use crate::types::{CellValue, FormatPatch, Worksheet};

use super::config::ReportConfig;
use super::input::StatusCount;

/// What a fill pass did, for logging and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FillSummary {
    /// Rows that received a count.
    pub written: usize,
    /// Sheet labels with no result this run; they got the placeholder.
    pub unmatched: Vec<String>,
    /// Result labels that no row of the table carries.
    pub unused: Vec<String>,
}

/// Write each row's count into `target_column` for rows below `header_row`
/// through `max_row`.
///
/// Blank labels and reserved labels are left alone. A label without a result
/// gets the placeholder, right aligned, so "not in this run" stays distinct
/// from a real zero.
pub fn fill(
    sheet: &mut Worksheet,
    header_row: u32,
    max_row: u32,
    label_column: u32,
    target_column: u32,
    rows: &[StatusCount],
    config: &ReportConfig,
) -> FillSummary {
    let counts: HashMap<&str, i64> = rows.iter().map(|r| (r.label.trim(), r.count)).collect();
    let mut summary = FillSummary::default();
    let mut seen: Vec<&str> = Vec::new();

    for row in header_row + 1..=max_row {
        let Some(label) = sheet.value(row, label_column).label() else {
            continue;
        };
        if config.is_reserved(&label) {
            continue;
        }
        if let Some((&key, &count)) = counts.get_key_value(label.as_str()) {
            tracing::debug!(row, label = %label, count, "fill");
            sheet.set_value(row, target_column, CellValue::from(count));
            seen.push(key);
            summary.written += 1;
        } else {
            tracing::debug!(row, label = %label, "no result for label, writing placeholder");
            sheet.set_text(row, target_column, &config.placeholder);
            sheet.patch_format(row, target_column, FormatPatch::ALIGN_RIGHT);
            summary.unmatched.push(label);
        }
    }

    summary.unused = rows
        .iter()
        .map(|r| r.label.trim())
        .filter(|l| !seen.contains(l))
        .map(str::to_string)
        .collect();
    summary
}
