//! Total and percent-placed rows.

use std::collections::HashMap;

use crate::cell_ref::Bounds;
use crate::types::{FormatPatch, Worksheet};

use super::config::ReportConfig;

/// `accepted / (accepted + seeking + not_reported)` as a percentage,
/// rounded to two decimals; 0 when there is nobody to place.
pub fn placement_percent(accepted: f64, seeking: f64, not_reported: f64) -> f64 {
    let denom = accepted + seeking + not_reported;
    if denom <= 0.0 {
        return 0.0;
    }
    round2(accepted * 100.0 / denom)
}

/// `part / total` as a percentage rounded to two decimals, 0 for an empty total.
pub fn share_percent(part: f64, total: f64) -> f64 {
    if total <= 0.0 {
        return 0.0;
    }
    round2(part * 100.0 / total)
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Store a percentage as a fraction with the `0.00%` format.
pub fn write_percent(sheet: &mut Worksheet, row: u32, col: u32, pct: f64) {
    sheet.set_number(row, col, pct / 100.0);
    sheet.patch_format(row, col, FormatPatch::PERCENT);
}

/// Rows holding the computed aggregates of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregateRows {
    pub total_row: u32,
    pub percent_row: u32,
}

/// Find the total row, relabelling "Total" to the configured total label.
///
/// Falls back to the second-to-last row of the table.
pub fn find_total_row(sheet: &mut Worksheet, table: &str, bounds: &Bounds, config: &ReportConfig) -> u32 {
    let col = bounds.min_col;
    let label_is = |sheet: &Worksheet, row: u32, want: &str| {
        sheet
            .text(row, col)
            .is_some_and(|s| s.trim().eq_ignore_ascii_case(want))
    };

    if let Some(row) = (bounds.min_row..=bounds.max_row).find(|&r| label_is(sheet, r, "total")) {
        if !config.total_row_label.eq_ignore_ascii_case("total") {
            sheet.set_text(row, col, &config.total_row_label);
        }
        return row;
    }
    let class_size = config.total_row_label.trim();
    if let Some(row) = (bounds.min_row..=bounds.max_row)
        .find(|&r| label_is(sheet, r, class_size) || label_is(sheet, r, "class size"))
    {
        return row;
    }

    let row = bounds.max_row.saturating_sub(1).max(bounds.min_row);
    tracing::warn!(
        sheet = %sheet.name,
        table,
        row,
        "no total row label found, using second-to-last row"
    );
    row
}

/// Find the percent-placed row, falling back to the last row of the table.
pub fn find_percent_row(sheet: &Worksheet, table: &str, bounds: &Bounds, config: &ReportConfig) -> u32 {
    let want = config.percent_row_label.trim();
    let found = (bounds.min_row..=bounds.max_row).find(|&r| {
        sheet
            .text(r, bounds.min_col)
            .is_some_and(|s| s.trim().eq_ignore_ascii_case(want) || s.trim().eq_ignore_ascii_case("placement %"))
    });
    found.unwrap_or_else(|| {
        tracing::warn!(
            sheet = %sheet.name,
            table,
            row = bounds.max_row,
            "no percent row label found, using last row"
        );
        bounds.max_row
    })
}

/// Recompute the total and percent rows for every column in `columns`.
///
/// Totals sum every ordinary status row below `header_row`; blanks, dashes
/// and text count as zero.
pub fn aggregate(
    sheet: &mut Worksheet,
    table: &str,
    bounds: &Bounds,
    header_row: u32,
    columns: &[u32],
    config: &ReportConfig,
) -> AggregateRows {
    let total_row = find_total_row(sheet, table, bounds, config);
    let percent_row = find_percent_row(sheet, table, bounds, config);

    let mut status_rows: HashMap<String, u32> = HashMap::new();
    for row in header_row + 1..=bounds.max_row {
        if row == total_row || row == percent_row {
            continue;
        }
        let Some(label) = sheet.value(row, bounds.min_col).label() else {
            continue;
        };
        if !config.is_reserved(&label) {
            status_rows.insert(label, row);
        }
    }

    let statuses = &config.statuses;
    for &col in columns {
        let count_at = |label: &str| {
            status_rows
                .get(label)
                .map_or(0.0, |&row| sheet.value(row, col).count_value())
        };
        let total: f64 = status_rows
            .values()
            .map(|&row| sheet.value(row, col).count_value())
            .sum();
        let pct = placement_percent(
            count_at(&statuses.accepted),
            count_at(&statuses.seeking),
            count_at(&statuses.not_reported),
        );

        tracing::debug!(table, col, total, pct, "aggregate");
        sheet.set_number(total_row, col, total);
        write_percent(sheet, percent_row, col, pct);
    }

    AggregateRows {
        total_row,
        percent_row,
    }
}
