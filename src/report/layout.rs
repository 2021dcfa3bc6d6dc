//! Which tables live on which sheet for the two report workbooks, and the
//! plan that feeds query results into them.

use serde::Serialize;

use crate::editor::ReportWorkbook;
use crate::error::{ReportError, Result};

use super::config::{AggregateScope, ReportConfig};
use super::input::{QueryResults, StatusCount, SubjectResults, SummaryRow};
use super::sheet::{update_sheet, MetricUpdate, TableUpdate};
use super::summary::{update_summary_sheet, SUMMARY_SHEET, SUMMARY_TABLE};

pub const TOTAL_FULL_TIME_SHEET: &str = "Total - Full Time";
pub const TOTAL_INTERNSHIP_SHEET: &str = "Total - Internships";
pub const PROGRAM_FULL_TIME_SHEET: &str = "By Program - Full Time";
pub const PROGRAM_INTERNSHIP_SHEET: &str = "By Program - Internships";

/// Default output path of a program workbook.
pub const DEFAULT_OUTPUT_TEMPLATE: &str = "WeeklyPlacement-{file_label}.xlsx";

/// A metric's snapshot table and the history table that sits next to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TablePair {
    pub snapshot: String,
    pub history: String,
}

impl TablePair {
    pub fn new(snapshot: impl Into<String>, history: impl Into<String>) -> Self {
        Self {
            snapshot: snapshot.into(),
            history: history.into(),
        }
    }

    fn numbered(stem: &str, sep: &str, first: u32) -> Self {
        Self::new(format!("{stem}{sep}{first}"), format!("{stem}{sep}{}", first + 1))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportingSubject {
    Class,
    Program(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum WorkbookLayout {
    /// One workbook per program set: a class sheet plus one sheet per program.
    Program,
    /// The leadership workbook covering every program.
    Leadership,
}

impl WorkbookLayout {
    /// History columns whose totals a run recomputes when the config leaves
    /// it open. The leadership workbook refreshes every week's totals.
    pub fn default_aggregate_scope(self) -> AggregateScope {
        match self {
            Self::Program => AggregateScope::Written,
            Self::Leadership => AggregateScope::AllDataColumns,
        }
    }
}

/// MBA and MPA table names carry an underscore before the number.
fn separator(program: &str) -> &'static str {
    if matches!(program, "MBA" | "MPA") {
        "_"
    } else {
        ""
    }
}

/// Tables of a program-workbook sheet in update order: full time, then
/// internships. BSFin tracks two internship cohorts instead of one.
pub fn program_tables(subject: &ReportingSubject) -> Vec<TablePair> {
    let (stem, sep, pairs) = match subject {
        ReportingSubject::Class => ("Class", "", 2),
        ReportingSubject::Program(p) if p == "BSFin" => (p.as_str(), "", 3),
        ReportingSubject::Program(p) => (p.as_str(), separator(p), 2),
    };
    (0..pairs).map(|i| TablePair::numbered(stem, sep, 2 * i + 1)).collect()
}

/// Full-time tables of a program on the leadership by-program sheet.
pub fn leadership_full_time_tables(program: &str) -> TablePair {
    TablePair::numbered(program, separator(program), 1)
}

/// Internship tables of a program on the leadership by-program sheet.
pub fn leadership_internship_tables(program: &str) -> TablePair {
    TablePair::numbered(&format!("{program}_int"), "", 1)
}

/// `FT_total_mrf`/`FT_total_wh` or `INT_total_mrf`/`INT_total_wh`.
pub fn leadership_total_tables(internship: bool) -> TablePair {
    let stem = if internship { "INT_total" } else { "FT_total" };
    TablePair::new(format!("{stem}_mrf"), format!("{stem}_wh"))
}

/// The single program name, or the names joined with `-`.
pub fn file_label(programs: &[String]) -> Result<String> {
    match programs {
        [] => Err(ReportError::Config("no programs provided".into())),
        [single] => Ok(single.clone()),
        many => Ok(many.join("-")),
    }
}

/// Substitute `{file_label}` in an output path template.
pub fn resolve_output_path(template: &str, programs: &[String]) -> Result<String> {
    Ok(template.replace("{file_label}", &file_label(programs)?))
}

/// A table pair together with the rows destined for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedMetric {
    pub tables: TablePair,
    pub rows: Vec<StatusCount>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetWork {
    Tables(Vec<PlannedMetric>),
    Summary { table: String, rows: Vec<SummaryRow> },
}

/// Everything one sheet receives in a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetPlan {
    pub sheet: String,
    pub work: SheetWork,
}

impl SheetPlan {
    fn tables(sheet: impl Into<String>, metrics: Vec<PlannedMetric>) -> Self {
        Self {
            sheet: sheet.into(),
            work: SheetWork::Tables(metrics),
        }
    }
}

fn planned(tables: TablePair, rows: &[StatusCount]) -> PlannedMetric {
    PlannedMetric {
        tables,
        rows: rows.to_vec(),
    }
}

fn class_results(results: &QueryResults) -> Result<&SubjectResults> {
    results
        .class
        .as_ref()
        .ok_or_else(|| ReportError::Config("query results have no class totals".into()))
}

fn program_results<'a>(results: &'a QueryResults, program: &str) -> Result<&'a SubjectResults> {
    results
        .programs
        .get(program)
        .ok_or_else(|| ReportError::Config(format!("query results have no rows for program '{program}'")))
}

/// Pair a sheet's tables with full-time, then internship or cohort rows.
fn subject_metrics(tables: Vec<TablePair>, results: &SubjectResults) -> Vec<PlannedMetric> {
    let mut sources: Vec<&[StatusCount]> = vec![&results.full_time];
    if tables.len() > 2 {
        sources.extend(results.cohorts.iter().map(Vec::as_slice));
    } else {
        sources.push(&results.internship);
    }
    tables
        .into_iter()
        .enumerate()
        .map(|(i, pair)| planned(pair, sources.get(i).copied().unwrap_or_default()))
        .collect()
}

/// Plan for a program workbook covering `programs`.
pub fn program_report_plan(
    results: &QueryResults,
    programs: &[String],
    config: &ReportConfig,
) -> Result<Vec<SheetPlan>> {
    let mut plans = vec![SheetPlan::tables(
        config.class_sheet.clone(),
        subject_metrics(program_tables(&ReportingSubject::Class), class_results(results)?),
    )];
    for program in programs {
        let subject = ReportingSubject::Program(program.clone());
        let results = program_results(results, program)?;
        if program_tables(&subject).len() > 2 && results.cohorts.len() < 2 {
            tracing::warn!(program = %program, cohorts = results.cohorts.len(), "missing cohort rows, tables get placeholders");
        }
        plans.push(SheetPlan::tables(program.clone(), subject_metrics(program_tables(&subject), results)));
    }
    Ok(plans)
}

/// Plan for the leadership workbook, over every configured program.
pub fn leadership_report_plan(results: &QueryResults, config: &ReportConfig) -> Result<Vec<SheetPlan>> {
    let class = class_results(results)?;
    let mut full_time = Vec::with_capacity(config.programs.len());
    let mut internship = Vec::with_capacity(config.programs.len());
    for program in &config.programs {
        let results = program_results(results, program)?;
        full_time.push(planned(leadership_full_time_tables(program), &results.full_time));
        internship.push(planned(leadership_internship_tables(program), &results.internship));
    }

    Ok(vec![
        SheetPlan {
            sheet: SUMMARY_SHEET.to_string(),
            work: SheetWork::Summary {
                table: SUMMARY_TABLE.to_string(),
                rows: results.summary.clone(),
            },
        },
        SheetPlan::tables(
            TOTAL_FULL_TIME_SHEET,
            vec![planned(leadership_total_tables(false), &class.full_time)],
        ),
        SheetPlan::tables(PROGRAM_FULL_TIME_SHEET, full_time),
        SheetPlan::tables(
            TOTAL_INTERNSHIP_SHEET,
            vec![planned(leadership_total_tables(true), &class.internship)],
        ),
        SheetPlan::tables(PROGRAM_INTERNSHIP_SHEET, internship),
    ])
}

/// Build the plan for `layout`.
pub fn report_plan(
    layout: WorkbookLayout,
    results: &QueryResults,
    programs: &[String],
    config: &ReportConfig,
) -> Result<Vec<SheetPlan>> {
    match layout {
        WorkbookLayout::Program => program_report_plan(results, programs, config),
        WorkbookLayout::Leadership => leadership_report_plan(results, config),
    }
}

/// What a run did to one sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetOutcome {
    pub sheet: String,
    pub tables: Vec<TableUpdate>,
    pub summary_rows: usize,
}

/// Apply every sheet plan in order. Each sheet is updated all-or-nothing;
/// the first failure stops the run and nothing is saved by this function.
pub fn apply_plan(
    book: &mut ReportWorkbook,
    plans: &[SheetPlan],
    config: &ReportConfig,
) -> Result<Vec<SheetOutcome>> {
    let mut outcomes = Vec::with_capacity(plans.len());
    for plan in plans {
        let sheet = book.sheet_mut(&plan.sheet)?;
        let outcome = match &plan.work {
            SheetWork::Tables(metrics) => {
                let updates: Vec<MetricUpdate<'_>> = metrics
                    .iter()
                    .map(|m| MetricUpdate {
                        tables: &m.tables,
                        rows: &m.rows,
                    })
                    .collect();
                SheetOutcome {
                    sheet: plan.sheet.clone(),
                    tables: update_sheet(sheet, &updates, config)?,
                    summary_rows: 0,
                }
            }
            SheetWork::Summary { table, rows } => {
                let mut working = sheet.clone();
                let written = update_summary_sheet(&mut working, table, rows, &config.programs)?;
                *sheet = working;
                SheetOutcome {
                    sheet: plan.sheet.clone(),
                    tables: Vec::new(),
                    summary_rows: written,
                }
            }
        };
        tracing::info!(sheet = %plan.sheet, tables = outcome.tables.len(), "sheet updated");
        outcomes.push(outcome);
    }
    Ok(outcomes)
}

/// Plan and apply a full run over `book` with the layout's defaults.
pub fn run_report(
    book: &mut ReportWorkbook,
    layout: WorkbookLayout,
    results: &QueryResults,
    programs: &[String],
    config: &ReportConfig,
) -> Result<Vec<SheetOutcome>> {
    let config = config
        .clone()
        .with_default_aggregate_scope(layout.default_aggregate_scope());
    let plan = report_plan(layout, results, programs, &config)?;
    apply_plan(book, &plan, &config)
}
