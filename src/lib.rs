//! placement-report - weekly placement workbook updater
//!
//! Opens an `.xlsx` report, writes the latest job and internship search
//! status counts into its Excel tables and saves it back:
//! - Snapshot tables are overwritten with the current run
//! - History tables grow one dated column per run, with table metadata kept in step
//! - Total and percent-placed rows are recomputed
//! - Untouched parts of the package are copied through byte for byte
//!
//! # Usage
//!
//! ```no_run
//! use placement_report::report::{apply_plan, report_plan, QueryResults, ReportConfig, WorkbookLayout};
//! use placement_report::ReportWorkbook;
//!
//! # fn main() -> placement_report::Result<()> {
//! let config = ReportConfig::default();
//! let results = QueryResults::load("results.json")?;
//! let mut book = ReportWorkbook::open("weekly_placement_report.xlsx")?;
//! let plan = report_plan(WorkbookLayout::Leadership, &results, &[], &config)?;
//! apply_plan(&mut book, &plan, &config)?;
//! book.save()?;
//! # Ok(())
//! # }
//! ```

// Package modules
pub mod cell_ref;
pub mod editor;
pub mod error;
pub mod export;
pub mod parser;
pub mod styles;
pub mod types;
pub mod xml_helpers;

// Report logic
pub mod report;

pub use editor::ReportWorkbook;
pub use error::{ReportError, Result};
pub use types::*;
