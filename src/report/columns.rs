//! Splitting a table into its label column and data columns, and writing
//! the run-date header.

use serde::Serialize;

use crate::cell_ref::Bounds;
use crate::error::{ReportError, Result};
use crate::types::Worksheet;

/// Snapshot tables are overwritten in place; history tables grow one column per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TableKind {
    Snapshot,
    History,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnLayout {
    pub label_column: u32,
    pub data_columns: Vec<u32>,
}

impl ColumnLayout {
    /// The single data column of a snapshot table.
    pub fn snapshot_column(&self, table: &str) -> Result<u32> {
        match self.data_columns.as_slice() {
            [col] => Ok(*col),
            cols => Err(ReportError::malformed(
                table,
                format!("snapshot table should have exactly 1 data column; found {}", cols.len()),
            )),
        }
    }

    /// Rightmost data column, or the label column for a table without data.
    pub fn last_column(&self) -> u32 {
        self.data_columns.last().copied().unwrap_or(self.label_column)
    }
}

/// Label column is the leftmost column; every other column holds data.
pub fn classify(bounds: &Bounds) -> ColumnLayout {
    ColumnLayout {
        label_column: bounds.min_col,
        data_columns: (bounds.min_col + 1..=bounds.max_col).collect(),
    }
}

/// Write `label` into the header row and return the updated data columns.
///
/// Snapshot mode overwrites the only data column's header. History mode
/// writes into the column right of the current rightmost data column and
/// appends it to the layout.
pub fn write_header(
    sheet: &mut Worksheet,
    table: &str,
    header_row: u32,
    layout: &ColumnLayout,
    label: &str,
    kind: TableKind,
) -> Result<ColumnLayout> {
    match kind {
        TableKind::Snapshot => {
            let col = layout.snapshot_column(table)?;
            sheet.set_text(header_row, col, label);
            Ok(layout.clone())
        }
        TableKind::History => {
            let col = layout.last_column() + 1;
            sheet.set_text(header_row, col, label);
            let mut updated = layout.clone();
            updated.data_columns.push(col);
            Ok(updated)
        }
    }
}
