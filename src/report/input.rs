//! Query results handed over by the data step, as a JSON document.
//!
//! ```json
//! {
//!   "class": { "fullTime": [["Accepted an offer", 12]], "internship": [] },
//!   "programs": { "BSFin": { "fullTime": [], "internship": [], "cohorts": [[], []] } },
//!   "summary": [{ "program": "BSAcc", "offerAccepted": 40, "total": 52 }]
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One `(label, count)` row of a status query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StatusCountRepr")]
pub struct StatusCount {
    pub label: String,
    pub count: i64,
}

impl StatusCount {
    pub fn new(label: impl Into<String>, count: i64) -> Self {
        Self {
            label: label.into(),
            count,
        }
    }
}

/// Rows may be written as `["label", 3]` or `{"label": "...", "count": 3}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum StatusCountRepr {
    Pair(String, i64),
    Record { label: String, count: i64 },
}

impl From<StatusCountRepr> for StatusCount {
    fn from(repr: StatusCountRepr) -> Self {
        match repr {
            StatusCountRepr::Pair(label, count) | StatusCountRepr::Record { label, count } => {
                Self { label, count }
            }
        }
    }
}

/// Results for one reporting subject.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SubjectResults {
    pub full_time: Vec<StatusCount>,
    pub internship: Vec<StatusCount>,
    /// Extra internship cohorts, for subjects whose sheet tracks them separately.
    pub cohorts: Vec<Vec<StatusCount>>,
}

/// One program's row of the summary query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SummaryRow {
    pub program: String,
    pub offer_accepted: i64,
    pub still_seeking: i64,
    pub no_info: i64,
    pub not_seeking: i64,
    pub intl_all: i64,
    pub total: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QueryResults {
    /// Class-wide totals.
    pub class: Option<SubjectResults>,
    pub programs: BTreeMap<String, SubjectResults>,
    pub summary: Vec<SummaryRow>,
}

impl QueryResults {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}
