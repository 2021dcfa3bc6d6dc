//! The per-program summary table of the leadership workbook.

use std::collections::HashMap;

use crate::error::{ReportError, Result};
use crate::types::Worksheet;

use super::aggregate::{placement_percent, share_percent, write_percent};
use super::input::SummaryRow;
use super::locate::locate;

pub const SUMMARY_SHEET: &str = "Summary - Full Time";
pub const SUMMARY_TABLE: &str = "summary";

/// Headers the summary table must carry, compared trimmed and lowercased.
pub const SUMMARY_HEADERS: [&str; 10] = [
    "program",
    "% placed",
    "offers accepted",
    "still seeking",
    "int'l",
    "no info*",
    "not seeking",
    "total",
    "% ns**",
    "% null",
];

/// Write one row per program, in `programs` order, below the header row.
///
/// Columns are found by header text so the table may order them freely.
/// Programs without a result row are written as zeros. Returns the number
/// of rows written.
pub fn update_summary_sheet(
    sheet: &mut Worksheet,
    table: &str,
    rows: &[SummaryRow],
    programs: &[String],
) -> Result<usize> {
    let bounds = locate(sheet, table)?;
    let header_row = bounds.min_row;

    let available = bounds.max_row - header_row;
    if usize::try_from(available).map_or(true, |n| n < programs.len()) {
        return Err(ReportError::malformed(
            table,
            format!(
                "summary table has {available} data rows; needs {} for all programs",
                programs.len()
            ),
        ));
    }

    let mut headers: HashMap<String, u32> = HashMap::new();
    for col in bounds.min_col..=bounds.max_col {
        if let Some(text) = sheet.text(header_row, col) {
            headers.insert(text.trim().to_lowercase(), col);
        }
    }
    let missing: Vec<String> = SUMMARY_HEADERS
        .iter()
        .filter(|h| !headers.contains_key(**h))
        .map(|h| (*h).to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ReportError::MissingHeader(missing));
    }
    let col = |name: &str| headers.get(name).copied().unwrap_or(bounds.min_col);

    let by_program: HashMap<&str, &SummaryRow> = rows.iter().map(|r| (r.program.trim(), r)).collect();
    let zero = SummaryRow::default();

    for (row, program) in (header_row + 1..).zip(programs) {
        let data = by_program.get(program.as_str()).copied().unwrap_or_else(|| {
            tracing::debug!(program = %program, "no summary row, writing zeros");
            &zero
        });
        let total = data.total as f64;

        sheet.set_text(row, col("program"), program);
        write_percent(
            sheet,
            row,
            col("% placed"),
            placement_percent(
                data.offer_accepted as f64,
                data.still_seeking as f64,
                data.no_info as f64,
            ),
        );
        sheet.set_value(row, col("offers accepted"), data.offer_accepted);
        sheet.set_value(row, col("still seeking"), data.still_seeking);
        sheet.set_value(row, col("int'l"), data.intl_all);
        sheet.set_value(row, col("no info*"), data.no_info);
        sheet.set_value(row, col("not seeking"), data.not_seeking);
        sheet.set_value(row, col("total"), data.total);
        write_percent(sheet, row, col("% ns**"), share_percent(data.not_seeking as f64, total));
        write_percent(sheet, row, col("% null"), share_percent(data.no_info as f64, total));
    }

    tracing::info!(sheet = %sheet.name, table, rows = programs.len(), "summary table updated");
    Ok(programs.len())
}
