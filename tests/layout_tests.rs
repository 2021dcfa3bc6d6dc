//! Full runs over the program and leadership workbook layouts.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic,
    clippy::cast_possible_truncation
)]

mod common;
mod fixtures;

use chrono::NaiveDate;
use pretty_assertions::assert_eq;

use common::{pair_sheet, reopen, SheetBuilder, XlsxBuilder};
use placement_report::report::layout::{leadership_report_plan, program_report_plan};
use placement_report::report::summary::{SUMMARY_SHEET, SUMMARY_TABLE};
use placement_report::report::{
    apply_plan, report_plan, run_report, AggregateScope, QueryResults, ReportConfig, WorkbookLayout,
};
use placement_report::{ReportError, ReportWorkbook};

const SUMMARY_HEADERS: [&str; 10] = [
    "Program",
    "% Placed",
    "Offers Accepted",
    "Still Seeking",
    "Int'l",
    "No Info*",
    "Not Seeking",
    "Total",
    "% NS**",
    "% Null",
];

fn config(programs: &[&str]) -> ReportConfig {
    ReportConfig {
        programs: programs.iter().map(|p| (*p).to_string()).collect(),
        ..ReportConfig::default()
    }
    .with_run_date(NaiveDate::from_ymd_opt(2026, 10, 30).unwrap())
}

fn summary_sheet(headers: &[&str], data_rows: u32) -> SheetBuilder {
    let mut sheet = SheetBuilder::new(SUMMARY_SHEET);
    for (i, header) in headers.iter().enumerate() {
        sheet = sheet.cell(&format!("{}1", common::col_letter(i as u32 + 1)), *header);
    }
    let range = format!("A1:{}{}", common::col_letter(headers.len() as u32), 1 + data_rows);
    sheet.table(SUMMARY_TABLE, &range, headers)
}

fn leadership_workbook(summary: SheetBuilder) -> ReportWorkbook {
    let job = "Job Search Status";
    let int = "Internship Search Status";
    let xlsx = XlsxBuilder::new()
        .sheet(summary)
        .sheet(pair_sheet("Total - Full Time", job, &[("FT_total_mrf", "FT_total_wh")]))
        .sheet(pair_sheet("By Program - Full Time", job, &[("BSAcc1", "BSAcc2"), ("MBA_1", "MBA_2")]))
        .sheet(pair_sheet("Total - Internships", int, &[("INT_total_mrf", "INT_total_wh")]))
        .sheet(pair_sheet(
            "By Program - Internships",
            int,
            &[("BSAcc_int1", "BSAcc_int2"), ("MBA_int1", "MBA_int2")],
        ))
        .build();
    ReportWorkbook::from_bytes(xlsx).unwrap()
}

fn leadership_results() -> QueryResults {
    QueryResults::from_json(
        r#"{
            "class": {
                "fullTime": [["Accepted an offer", 50], ["Actively seeking", 30], ["Not Reported", 20], ["Not seeking", 5]],
                "internship": [["Accepted an offer", 10], ["Actively seeking", 10]]
            },
            "programs": {
                "BSAcc": { "fullTime": [["Accepted an offer", 8], ["Actively seeking", 2]], "internship": [] },
                "MBA": { "fullTime": [{ "label": "Accepted an offer", "count": 3 }], "internship": [["Not Reported", 4]] }
            },
            "summary": [
                { "program": "MBA", "offerAccepted": 30, "stillSeeking": 15, "noInfo": 5, "notSeeking": 10, "intlAll": 4, "total": 60 }
            ]
        }"#,
    )
    .unwrap()
}

#[test]
fn test_leadership_run_updates_every_sheet() {
    let config = config(&["BSAcc", "MBA"]);
    let mut book = leadership_workbook(summary_sheet(&SUMMARY_HEADERS, 2));
    let plan = leadership_report_plan(&leadership_results(), &config).unwrap();
    let outcomes = apply_plan(&mut book, &plan, &config).unwrap();

    let tables: Vec<usize> = outcomes.iter().map(|o| o.tables.len()).collect();
    assert_eq!(tables, vec![0, 2, 4, 2, 4]);
    assert_eq!(outcomes[0].summary_rows, 2);

    let book = reopen(&book);
    let summary = book.sheet(SUMMARY_SHEET).unwrap();
    assert_eq!(summary.text(2, 1), Some("BSAcc"));
    assert_eq!(summary.value(2, 8).as_number(), Some(0.0));
    assert_eq!(summary.text(3, 1), Some("MBA"));
    assert_eq!(summary.value(3, 2).as_number(), Some(0.6));

    let total = book.sheet("Total - Full Time").unwrap();
    assert_eq!(total.value(4, 3).as_number(), Some(50.0));
    // 50 / (50 + 30 + 20)
    assert_eq!(total.value(9, 3).as_number(), Some(0.5));
    assert_eq!(total.value(8, 8).as_number(), Some(105.0));
    assert_eq!(total.table("FT_total_wh").unwrap().bounds.to_range(), "F3:H9");

    let by_program = book.sheet("By Program - Full Time").unwrap();
    // MBA tables sit in the second band
    assert_eq!(by_program.value(14, 3).as_number(), Some(3.0));
    assert_eq!(by_program.text(15, 3), Some("-"));
    assert_eq!(by_program.text(13, 8), Some("10/30/2026"));

    let internships = book.sheet("By Program - Internships").unwrap();
    assert_eq!(internships.value(16, 8).as_number(), Some(4.0));
    assert_eq!(internships.text(3, 3), Some("10/30/2026"));
}

#[test]
fn test_leadership_run_refreshes_every_history_total() {
    let config = config(&["BSAcc", "MBA"]);
    let mut book = leadership_workbook(summary_sheet(&SUMMARY_HEADERS, 2));
    run_report(&mut book, WorkbookLayout::Leadership, &leadership_results(), &[], &config).unwrap();

    let total = book.sheet("Total - Full Time").unwrap();
    // Last week's column: four statuses of 1, one accepted out of three placeable
    assert_eq!(total.value(8, 7).as_number(), Some(4.0));
    let placed = total.value(9, 7).as_number().unwrap();
    assert!((placed - 0.3333).abs() < 1e-9, "{placed}");
    assert_eq!(total.value(8, 8).as_number(), Some(105.0));
}

#[test]
fn test_explicit_scope_overrides_layout_default() {
    let config = config(&["BSAcc", "MBA"]).with_aggregate_scope(AggregateScope::Written);
    let mut book = leadership_workbook(summary_sheet(&SUMMARY_HEADERS, 2));
    run_report(&mut book, WorkbookLayout::Leadership, &leadership_results(), &[], &config).unwrap();

    let total = book.sheet("Total - Full Time").unwrap();
    assert_eq!(total.value(8, 7).as_number(), None);
    assert_eq!(total.value(8, 8).as_number(), Some(105.0));
}

#[test]
fn test_summary_missing_headers_stop_the_run() {
    let config = config(&["BSAcc", "MBA"]);
    let mut book = leadership_workbook(summary_sheet(&SUMMARY_HEADERS[..9], 2));
    let plan = leadership_report_plan(&leadership_results(), &config).unwrap();
    let err = apply_plan(&mut book, &plan, &config).unwrap_err();
    match err {
        ReportError::MissingHeader(missing) => assert_eq!(missing, vec!["% null".to_string()]),
        other => panic!("unexpected error {other:?}"),
    }
    assert!(!book.is_dirty());
}

#[test]
fn test_summary_without_room_for_every_program() {
    let config = config(&["BSAcc", "MBA"]);
    let mut book = leadership_workbook(summary_sheet(&SUMMARY_HEADERS, 1));
    let plan = leadership_report_plan(&leadership_results(), &config).unwrap();
    let err = apply_plan(&mut book, &plan, &config).unwrap_err();
    assert!(matches!(err, ReportError::MalformedTable { ref table, .. } if table == SUMMARY_TABLE));
}

#[test]
fn test_program_workbook_with_cohorts() {
    let job = "Job Search Status";
    let xlsx = XlsxBuilder::new()
        .sheet(pair_sheet("2026 MSB Overall", job, &[("Class1", "Class2"), ("Class3", "Class4")]))
        .sheet(pair_sheet(
            "BSFin",
            job,
            &[("BSFin1", "BSFin2"), ("BSFin3", "BSFin4"), ("BSFin5", "BSFin6")],
        ))
        .build();
    let mut book = ReportWorkbook::from_bytes(xlsx).unwrap();
    let results = QueryResults::from_json(
        r#"{
            "class": { "fullTime": [["Accepted an offer", 100]], "internship": [["Accepted an offer", 40]] },
            "programs": {
                "BSFin": {
                    "fullTime": [["Accepted an offer", 9]],
                    "cohorts": [[["Accepted an offer", 3]], [["Accepted an offer", 1]]]
                }
            }
        }"#,
    )
    .unwrap();
    let config = config(&["BSFin"]);
    let programs = vec!["BSFin".to_string()];

    let plan = report_plan(WorkbookLayout::Program, &results, &programs, &config).unwrap();
    let outcomes = apply_plan(&mut book, &plan, &config).unwrap();
    assert_eq!(outcomes.iter().map(|o| o.tables.len()).sum::<usize>(), 10);

    let book = reopen(&book);
    let class = book.sheet("2026 MSB Overall").unwrap();
    assert_eq!(class.value(4, 3).as_number(), Some(100.0));
    assert_eq!(class.value(14, 3).as_number(), Some(40.0));

    let fin = book.sheet("BSFin").unwrap();
    let accepted: Vec<Option<f64>> = [4, 14, 24].iter().map(|r| fin.value(*r, 8).as_number()).collect();
    assert_eq!(accepted, vec![Some(9.0), Some(3.0), Some(1.0)]);
}

#[test]
fn test_program_plan_needs_results_for_every_program() {
    let results = QueryResults::from_json(r#"{ "class": { "fullTime": [] } }"#).unwrap();
    let err = program_report_plan(&results, &["MISM".to_string()], &config(&["MISM"])).unwrap_err();
    assert!(matches!(err, ReportError::Config(_)));
}
