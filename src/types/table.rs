use serde::Serialize;

use crate::cell_ref::Bounds;
use crate::xml_helpers::Attrs;

/// One `<tableColumn>` entry of a table part.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableColumn {
    pub id: u32,
    pub name: String,
    /// Attributes other than `id`/`name` (`dataDxfId`, `xr3:uid`, ...).
    #[serde(skip)]
    pub(crate) extra_attrs: Attrs,
    /// Child elements (`calculatedColumnFormula`, `totalsRowFormula`, ...), verbatim.
    #[serde(skip)]
    pub(crate) inner_xml: String,
}

impl TableColumn {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            extra_attrs: Vec::new(),
            inner_xml: String::new(),
        }
    }
}

/// A table (`xl/tables/tableN.xml`) declared on a worksheet.
///
/// Whatever shape the part had on disk, it is normalized into this one value
/// when the workbook is opened. The range, the auto-filter range and the
/// column list are the three redundant descriptions of the table's extent
/// that must agree for the file to open cleanly.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableDef {
    pub name: String,
    pub display_name: String,
    pub bounds: Bounds,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_filter: Option<Bounds>,
    pub columns: Vec<TableColumn>,
    /// ZIP path of the table part.
    #[serde(skip)]
    pub(crate) path: String,
    #[serde(skip)]
    pub(crate) dirty: bool,
}

impl TableDef {
    /// Build a table with an auto-filter over its whole range.
    pub fn new(name: impl Into<String>, bounds: Bounds, columns: Vec<TableColumn>) -> Self {
        let name = name.into();
        Self {
            display_name: name.clone(),
            name,
            bounds,
            auto_filter: Some(bounds),
            columns,
            path: String::new(),
            dirty: false,
        }
    }

    /// Tables are addressed by display name; the internal name is accepted too.
    pub fn matches(&self, name: &str) -> bool {
        self.display_name == name || self.name == name
    }

    /// Move the table's range, mirroring it onto the auto-filter when present.
    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.bounds = bounds;
        if self.auto_filter.is_some() {
            self.auto_filter = Some(bounds);
        }
        self.dirty = true;
    }

    /// Largest column id in use, 0 for an empty list.
    pub fn max_column_id(&self) -> u32 {
        self.columns.iter().map(|c| c.id).max().unwrap_or(0)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}
