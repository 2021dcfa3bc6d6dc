//! Per-table update sequences and the all-or-nothing sheet update.

use serde::Serialize;

use crate::cell_ref::Bounds;
use crate::error::Result;
use crate::types::{FormatPatch, Worksheet};

use super::aggregate::aggregate;
use super::columns::{classify, write_header, TableKind};
use super::config::{AggregateScope, ReportConfig};
use super::fill::fill;
use super::header::{expected_header, resolve_header};
use super::input::StatusCount;
use super::layout::TablePair;
use super::locate::locate;
use super::metadata::{rename_column, resync};

/// Outcome of one table update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableUpdate {
    pub table: String,
    pub kind: TableKind,
    pub header_row: u32,
    /// Column that received this run's counts.
    pub column: u32,
    /// Table range after the update.
    pub bounds: Bounds,
    pub total_row: u32,
    pub percent_row: u32,
    /// Sheet labels that got the placeholder.
    pub unmatched: Vec<String>,
}

/// Overwrite the single data column of a snapshot table with this run.
///
/// On error the sheet may hold part of the update; [`update_sheet`] discards it.
pub fn update_snapshot_table(
    sheet: &mut Worksheet,
    table: &str,
    rows: &[StatusCount],
    config: &ReportConfig,
) -> Result<TableUpdate> {
    let bounds = locate(sheet, table)?;
    let header_row = resolve_header(sheet, table, &bounds, expected_header(&sheet.name, table));
    let layout = classify(&bounds);
    let col = layout.snapshot_column(table)?;

    write_header(sheet, table, header_row, &layout, &config.run_date_label(), TableKind::Snapshot)?;
    rename_column(sheet, table, header_row, col)?;
    let filled = fill(sheet, header_row, bounds.max_row, layout.label_column, col, rows, config);
    let aggregates = aggregate(sheet, table, &bounds, header_row, &[col], config);

    tracing::info!(
        sheet = %sheet.name,
        table,
        column = col,
        written = filled.written,
        unmatched = filled.unmatched.len(),
        "snapshot table updated"
    );
    Ok(TableUpdate {
        table: table.to_string(),
        kind: TableKind::Snapshot,
        header_row,
        column: col,
        bounds,
        total_row: aggregates.total_row,
        percent_row: aggregates.percent_row,
        unmatched: filled.unmatched,
    })
}

/// Append this run as a new rightmost column of a history table.
///
/// On error the sheet may hold part of the update; [`update_sheet`] discards it.
pub fn update_history_table(
    sheet: &mut Worksheet,
    table: &str,
    rows: &[StatusCount],
    config: &ReportConfig,
) -> Result<TableUpdate> {
    let bounds = locate(sheet, table)?;
    let header_row = resolve_header(sheet, table, &bounds, expected_header(&sheet.name, table));
    let layout = classify(&bounds);

    let layout = write_header(sheet, table, header_row, &layout, &config.run_date_label(), TableKind::History)?;
    let col = layout.last_column();
    let new_bounds = bounds.with_max_col(col);
    resync(sheet, table, new_bounds, header_row)?;

    let filled = fill(sheet, header_row, new_bounds.max_row, layout.label_column, col, rows, config);
    let columns = match config.effective_aggregate_scope() {
        AggregateScope::Written => vec![col],
        AggregateScope::AllDataColumns => layout.data_columns.clone(),
    };
    let aggregates = aggregate(sheet, table, &new_bounds, header_row, &columns, config);

    // Separator line under the last status row of the new column
    let above_total = aggregates.total_row.saturating_sub(1);
    if above_total > header_row {
        sheet.patch_format(above_total, col, FormatPatch::BOTTOM_BORDER);
    }

    tracing::info!(
        sheet = %sheet.name,
        table,
        column = col,
        range = %new_bounds,
        written = filled.written,
        unmatched = filled.unmatched.len(),
        "history table extended"
    );
    Ok(TableUpdate {
        table: table.to_string(),
        kind: TableKind::History,
        header_row,
        column: col,
        bounds: new_bounds,
        total_row: aggregates.total_row,
        percent_row: aggregates.percent_row,
        unmatched: filled.unmatched,
    })
}

/// One metric of a sheet: its snapshot/history tables and the rows for both.
#[derive(Debug, Clone, Copy)]
pub struct MetricUpdate<'a> {
    pub tables: &'a TablePair,
    pub rows: &'a [StatusCount],
}

/// Update every metric of a sheet in order, snapshot before history.
///
/// The sheet is only changed if every table update succeeds.
pub fn update_sheet(
    sheet: &mut Worksheet,
    metrics: &[MetricUpdate<'_>],
    config: &ReportConfig,
) -> Result<Vec<TableUpdate>> {
    let mut working = sheet.clone();
    let mut updates = Vec::with_capacity(metrics.len() * 2);
    for metric in metrics {
        updates.push(update_snapshot_table(&mut working, &metric.tables.snapshot, metric.rows, config)?);
        updates.push(update_history_table(&mut working, &metric.tables.history, metric.rows, config)?);
    }
    *sheet = working;
    Ok(updates)
}
