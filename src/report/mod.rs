//! Placement report updates: locating status tables, writing this run's
//! counts and keeping totals, percentages and table metadata consistent.
//!
//! Two kinds of table are updated. A snapshot table holds only the latest
//! run and is overwritten in place; a history table gains one column per
//! run. Both have the status label in their leftmost column and end with a
//! total row and a percent-placed row.

pub mod aggregate;
pub mod cadence;
pub mod columns;
pub mod config;
pub mod fill;
pub mod header;
pub mod input;
pub mod layout;
pub mod locate;
pub mod metadata;
pub mod sheet;
pub mod summary;

pub use aggregate::{aggregate, placement_percent, AggregateRows};
pub use cadence::{run_kind, RunKind};
pub use columns::{classify, write_header, ColumnLayout, TableKind};
pub use config::{parse_run_date, AggregateScope, ReportConfig, StatusVocabulary};
pub use fill::{fill, FillSummary};
pub use header::{expected_header, resolve_header};
pub use input::{QueryResults, StatusCount, SubjectResults, SummaryRow};
pub use layout::{
    apply_plan, report_plan, resolve_output_path, run_report, SheetOutcome, SheetPlan, TablePair,
    WorkbookLayout,
};
pub use locate::locate;
pub use metadata::{rename_column, resync};
pub use sheet::{update_history_table, update_sheet, update_snapshot_table, MetricUpdate, TableUpdate};
pub use summary::update_summary_sheet;
