//! Keeping a table's declared range and column list in step with its
//! physical width.
//!
//! A table part describes its extent three times: the `ref`, the auto-filter
//! `ref` and the `tableColumns` list. Excel refuses (or "repairs") a file
//! where they disagree.

use std::collections::HashSet;

use crate::cell_ref::Bounds;
use crate::error::{ReportError, Result};
use crate::types::{TableColumn, TableDef, Worksheet};

use super::locate::{table_def, table_def_mut};

fn check_width(table: &TableDef) -> Result<()> {
    let width = table.bounds.width();
    if u32::try_from(table.columns.len()).ok() == Some(width) {
        return Ok(());
    }
    Err(ReportError::MetadataDrift {
        table: table.display_name.clone(),
        columns: table.columns.len(),
        width,
        range: table.bounds.to_range(),
    })
}

/// Move `table` to `new_bounds` and bring its column list to the new width.
///
/// Existing entries keep their ids, names and attributes. New entries are
/// named after the text in `header_row` (or `ColumnN` when blank), made
/// unique within the table, and numbered from the current maximum id.
pub fn resync(sheet: &mut Worksheet, table: &str, new_bounds: Bounds, header_row: u32) -> Result<()> {
    let def = table_def(sheet, table)?;
    if let Some(other) = sheet
        .tables
        .iter()
        .find(|t| !std::ptr::eq(*t, def) && t.bounds.intersects(&new_bounds))
    {
        return Err(ReportError::malformed(
            table,
            format!("range {new_bounds} would overlap table '{}'", other.display_name),
        ));
    }

    let width = usize::try_from(new_bounds.width())
        .map_err(|_| ReportError::malformed(table, "table too wide"))?;
    let kept = def.columns.len().min(width);
    let mut used: HashSet<String> = def
        .columns
        .iter()
        .take(kept)
        .map(|c| c.name.to_lowercase())
        .collect();
    let mut next_id = def.max_column_id() + 1;

    let mut added = Vec::new();
    for offset in kept..width {
        let col = new_bounds.min_col
            + u32::try_from(offset).map_err(|_| ReportError::malformed(table, "table too wide"))?;
        let base = sheet
            .value(header_row, col)
            .label()
            .unwrap_or_else(|| format!("Column{}", offset + 1));
        let mut name = base.clone();
        let mut k = 1;
        while used.contains(&name.to_lowercase()) {
            k += 1;
            name = format!("{base}_{k}");
        }
        used.insert(name.to_lowercase());
        added.push(TableColumn::new(next_id, name));
        next_id += 1;
    }

    let def = table_def_mut(sheet, table)?;
    if def.columns.len() > width {
        tracing::warn!(
            table,
            columns = def.columns.len(),
            width,
            "table has more column entries than columns, trimming"
        );
        def.columns.truncate(width);
    }
    def.columns.extend(added);
    def.set_bounds(new_bounds);
    tracing::debug!(table, range = %new_bounds, columns = def.columns.len(), "table resynced");

    check_width(def)
}

/// Rename the `tableColumn` entry of `col` to the header text written above it.
pub fn rename_column(sheet: &mut Worksheet, table: &str, header_row: u32, col: u32) -> Result<()> {
    let def = table_def(sheet, table)?;
    check_width(def)?;
    let offset = col.saturating_sub(def.bounds.min_col);
    let name = sheet
        .value(header_row, col)
        .label()
        .unwrap_or_else(|| format!("Column{}", offset + 1));

    let def = table_def_mut(sheet, table)?;
    let idx = usize::try_from(offset).map_err(|_| ReportError::malformed(table, "column out of range"))?;
    let taken = def
        .columns
        .iter()
        .enumerate()
        .any(|(i, c)| i != idx && c.name.eq_ignore_ascii_case(&name));
    if taken {
        tracing::warn!(table, name = %name, "column name already used, keeping old metadata name");
        return Ok(());
    }
    let column = def
        .columns
        .get_mut(idx)
        .ok_or_else(|| ReportError::malformed(table, format!("no column entry for column {col}")))?;
    if column.name != name {
        column.name = name;
        def.mark_dirty();
    }
    Ok(())
}
