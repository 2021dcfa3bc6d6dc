//! Cell editing mutations.
//!
//! Applies edits to the in-memory worksheet model. An edited cell drops its
//! original XML and is regenerated on save; its style index is kept.

use crate::types::{Cell, CellValue, FormatPatch, Worksheet};

impl Worksheet {
    fn cell_entry(&mut self, row: u32, col: u32) -> &mut Cell {
        self.dirty = true;
        let cell = self.cells.entry((row, col)).or_default();
        cell.raw = None;
        cell
    }

    /// Store a value, keeping the cell's style.
    pub fn set_value(&mut self, row: u32, col: u32, value: impl Into<CellValue>) {
        self.cell_entry(row, col).value = value.into();
    }

    pub fn set_number(&mut self, row: u32, col: u32, value: f64) {
        self.set_value(row, col, CellValue::Number(value));
    }

    pub fn set_text(&mut self, row: u32, col: u32, value: &str) {
        self.set_value(row, col, CellValue::Text(value.to_string()));
    }

    /// Request extra formatting on a cell; patches accumulate until save.
    pub fn patch_format(&mut self, row: u32, col: u32, patch: FormatPatch) {
        let cell = self.cell_entry(row, col);
        cell.format = cell.format.merge(patch);
    }
}
