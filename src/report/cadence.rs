//! When a report run is due: every Friday and on the last day of each month.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RunKind {
    /// Neither a Friday nor a month end.
    Skip,
    Weekly,
    MonthEnd,
    WeeklyAndMonthEnd,
}

impl RunKind {
    pub fn is_due(self) -> bool {
        self != Self::Skip
    }
}

pub fn is_month_end(date: NaiveDate) -> bool {
    date.succ_opt().map_or(true, |next| next.month() != date.month())
}

pub fn run_kind(date: NaiveDate) -> RunKind {
    let friday = date.weekday() == Weekday::Fri;
    match (friday, is_month_end(date)) {
        (true, true) => RunKind::WeeklyAndMonthEnd,
        (true, false) => RunKind::Weekly,
        (false, true) => RunKind::MonthEnd,
        (false, false) => RunKind::Skip,
    }
}
