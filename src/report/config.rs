//! Run configuration threaded through every table update.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{ReportError, Result};

/// Format of the run-date column header, e.g. `10/03/2026`.
pub const RUN_DATE_FORMAT: &str = "%m/%d/%Y";

/// The three status labels the placement formula reads.
///
/// They must equal the labels produced by the query step; a label that does
/// not match contributes zero to the formula.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StatusVocabulary {
    pub accepted: String,
    pub seeking: String,
    pub not_reported: String,
}

impl Default for StatusVocabulary {
    fn default() -> Self {
        Self {
            accepted: "Accepted an offer".to_string(),
            seeking: "Actively seeking".to_string(),
            not_reported: "Not Reported".to_string(),
        }
    }
}

/// Which columns of a history table get their aggregate rows recomputed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AggregateScope {
    /// Only the column written this run.
    #[default]
    Written,
    /// Every data column of the table.
    AllDataColumns,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReportConfig {
    /// Date written into snapshot headers and new history columns.
    pub run_date: NaiveDate,
    pub statuses: StatusVocabulary,
    /// Labels (compared trimmed and lowercased) whose rows are computed, never filled.
    pub reserved_labels: Vec<String>,
    /// Label the total row carries after an update.
    pub total_row_label: String,
    /// Label of the percent-placed row.
    pub percent_row_label: String,
    /// Written for sheet labels missing from the current results.
    pub placeholder: String,
    /// Unset means the layout's default: the written column for program
    /// workbooks, every data column for the leadership workbook.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregate_scope: Option<AggregateScope>,
    /// Sheet holding the class-wide tables in a program workbook.
    pub class_sheet: String,
    /// Programs in report order.
    pub programs: Vec<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            run_date: chrono::Local::now().date_naive(),
            statuses: StatusVocabulary::default(),
            reserved_labels: ["total", "class size", "% placed", "placement %"]
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            total_row_label: "Class Size".to_string(),
            percent_row_label: "% Placed".to_string(),
            placeholder: "-".to_string(),
            aggregate_scope: None,
            class_sheet: "2026 MSB Overall".to_string(),
            programs: [
                "BSAcc", "BSEDM", "BSEnt", "BSFin", "BSGSCM", "BSHRM", "BSIS", "BSMgt", "BSMktg",
                "BSStrat", "MAcc", "MBA", "MISM", "MPA",
            ]
            .iter()
            .map(|s| (*s).to_string())
            .collect(),
        }
    }
}

impl ReportConfig {
    /// Load a JSON configuration file; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
            .map_err(|e| ReportError::Config(format!("{}: {e}", path.display())))
    }

    #[must_use]
    pub fn with_run_date(mut self, run_date: NaiveDate) -> Self {
        self.run_date = run_date;
        self
    }

    #[must_use]
    pub fn with_aggregate_scope(mut self, scope: AggregateScope) -> Self {
        self.aggregate_scope = Some(scope);
        self
    }

    /// Use `scope` unless one was configured explicitly.
    #[must_use]
    pub fn with_default_aggregate_scope(mut self, scope: AggregateScope) -> Self {
        self.aggregate_scope.get_or_insert(scope);
        self
    }

    /// The scope in effect, the written column when nothing was set.
    pub fn effective_aggregate_scope(&self) -> AggregateScope {
        self.aggregate_scope.unwrap_or_default()
    }

    /// Header text for this run's column.
    pub fn run_date_label(&self) -> String {
        self.run_date.format(RUN_DATE_FORMAT).to_string()
    }

    /// True for total / class-size / percent rows.
    pub fn is_reserved(&self, label: &str) -> bool {
        let key = label.trim().to_lowercase();
        self.reserved_labels.iter().any(|r| r.trim().to_lowercase() == key)
    }
}

/// Parse a `MM/DD/YYYY` or ISO `YYYY-MM-DD` date.
pub fn parse_run_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, RUN_DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .map_err(|_| ReportError::Config(format!("invalid run date '{s}'")))
}
