use serde::Serialize;
use std::collections::BTreeMap;

use crate::xml_helpers::Attrs;

use super::{Cell, CellValue, StyleSheet, TableDef};

static EMPTY: CellValue = CellValue::Empty;

/// A worksheet: sparse cells keyed by 1-based `(row, col)` plus its tables.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Worksheet {
    pub name: String,
    /// ZIP path of the worksheet part.
    #[serde(skip)]
    pub(crate) path: String,
    #[serde(skip)]
    pub(crate) cells: BTreeMap<(u32, u32), Cell>,
    /// `<row>` attributes, keyed by row number.
    #[serde(skip)]
    pub(crate) rows: BTreeMap<u32, Attrs>,
    pub tables: Vec<TableDef>,
    #[serde(skip)]
    pub(crate) dirty: bool,
}

impl Worksheet {
    /// An empty worksheet that is not backed by a package part.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn cell(&self, row: u32, col: u32) -> Option<&Cell> {
        self.cells.get(&(row, col))
    }

    /// The cell's value, `Empty` when the cell does not exist.
    pub fn value(&self, row: u32, col: u32) -> &CellValue {
        self.cells.get(&(row, col)).map_or(&EMPTY, |c| &c.value)
    }

    /// The cell's text if it holds a string.
    pub fn text(&self, row: u32, col: u32) -> Option<&str> {
        self.value(row, col).as_text()
    }

    pub fn table(&self, name: &str) -> Option<&TableDef> {
        self.tables.iter().find(|t| t.matches(name))
    }

    pub fn table_mut(&mut self, name: &str) -> Option<&mut TableDef> {
        self.tables.iter_mut().find(|t| t.matches(name))
    }

    /// Declare a table on this sheet (used when building sheets in memory).
    pub fn add_table(&mut self, table: TableDef) {
        self.tables.push(table);
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// True if any formula cell has been overwritten with a value.
    pub fn lost_formulas(&self) -> bool {
        self.dirty && self.cells.values().any(Cell::lost_formula)
    }
}

/// The parsed workbook: worksheets in tab order plus the stylesheet.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Workbook {
    pub sheets: Vec<Worksheet>,
    #[serde(skip)]
    pub(crate) styles: StyleSheet,
    /// ZIP path of the calculation chain part, if the package has one.
    #[serde(skip)]
    pub(crate) calc_chain: Option<String>,
}

impl Workbook {
    pub fn sheet(&self, name: &str) -> Option<&Worksheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn sheet_mut(&mut self, name: &str) -> Option<&mut Worksheet> {
        self.sheets.iter_mut().find(|s| s.name == name)
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn styles(&self) -> &StyleSheet {
        &self.styles
    }
}
