//! Finding a named table on a worksheet.

use crate::cell_ref::Bounds;
use crate::error::{ReportError, Result};
use crate::types::{TableDef, Worksheet};

/// Declared bounds of `table` on `sheet`.
pub fn locate(sheet: &Worksheet, table: &str) -> Result<Bounds> {
    table_def(sheet, table).map(|t| t.bounds)
}

pub(crate) fn table_def<'a>(sheet: &'a Worksheet, table: &str) -> Result<&'a TableDef> {
    sheet.table(table).ok_or_else(|| ReportError::TableNotFound {
        table: table.to_string(),
        sheet: sheet.name.clone(),
    })
}

pub(crate) fn table_def_mut<'a>(sheet: &'a mut Worksheet, table: &str) -> Result<&'a mut TableDef> {
    let sheet_name = sheet.name.clone();
    sheet.table_mut(table).ok_or_else(move || ReportError::TableNotFound {
        table: table.to_string(),
        sheet: sheet_name,
    })
}
