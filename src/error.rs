//! Structured error types for placement-report.
//!
//! Every failure in the table-mutation engine is fatal for the current
//! reporting subject: nothing is retried, everything propagates.

/// All errors that can occur while reading, mutating or saving a report workbook.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// A declared table name is absent from the worksheet (template drift).
    #[error("Expected table '{table}' not found on sheet '{sheet}'")]
    TableNotFound { table: String, sheet: String },

    /// A worksheet the layout expects is absent from the workbook.
    #[error("Expected sheet '{0}' not found")]
    SheetNotFound(String),

    /// The table's shape violates the snapshot/history contract.
    #[error("Malformed table '{table}': {reason}")]
    MalformedTable { table: String, reason: String },

    /// Column metadata no longer matches the table's physical width.
    #[error("Table '{table}' metadata columns={columns} but width={width} for ref {range}")]
    MetadataDrift {
        table: String,
        columns: usize,
        width: u32,
        range: String,
    },

    /// The summary table lacks one or more required column headers.
    #[error("Summary headers missing or mismatched: {}", .0.join(", "))]
    MissingHeader(Vec<String>),

    /// XML parsing error from quick-xml.
    #[error("XML parsing: {0}")]
    Xml(#[from] quick_xml::Error),

    /// ZIP archive error.
    #[error("ZIP archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Invalid cell reference or range.
    #[error("Invalid cell reference: {0}")]
    CellRef(String),

    /// Structural problem in a package part.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid configuration or query input.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON (de)serialization error.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ReportError>;

impl ReportError {
    pub(crate) fn malformed(table: &str, reason: impl Into<String>) -> Self {
        Self::MalformedTable {
            table: table.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<quick_xml::events::attributes::AttrError> for ReportError {
    fn from(e: quick_xml::events::attributes::AttrError) -> Self {
        Self::Xml(quick_xml::Error::InvalidAttr(e))
    }
}
