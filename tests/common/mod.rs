//! Common test utilities: status-table templates and package inspection.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic,
    clippy::cast_possible_truncation
)]

use std::io::{Cursor, Read};

use placement_report::report::StatusCount;
use placement_report::ReportWorkbook;

// Re-export fixtures for convenience
pub use super::fixtures::*;

/// Status rows of the fixture tables, in sheet order.
pub const STATUSES: [&str; 4] = [
    "Accepted an offer",
    "Actively seeking",
    "Not Reported",
    "Not seeking",
];

/// Where a status table sits and what it is called.
#[derive(Debug, Clone, Copy)]
pub struct TableSpot<'a> {
    pub name: &'a str,
    pub header: &'a str,
    /// Header row.
    pub row: u32,
    /// Label column.
    pub col: u32,
}

impl TableSpot<'_> {
    /// Last row of the table: header, statuses, total, percent.
    pub fn last_row(&self) -> u32 {
        self.row + STATUSES.len() as u32 + 2
    }

    pub fn total_row(&self) -> u32 {
        self.last_row() - 1
    }

    pub fn status_row(&self, label: &str) -> u32 {
        let idx = STATUSES.iter().position(|s| *s == label).unwrap();
        self.row + 1 + idx as u32
    }
}

/// Add a status table with one data column per entry of `columns`.
///
/// Each column is `(header date, counts per status)`. The total row reads
/// "Total" and the percent row "% Placed"; both start empty.
pub fn status_table(mut sheet: SheetBuilder, spot: TableSpot<'_>, columns: &[(&str, [i32; 4])]) -> SheetBuilder {
    let label_col = col_letter(spot.col);
    sheet = sheet.styled_cell(&format!("{label_col}{}", spot.row), spot.header, XF_HEADER);
    for (i, status) in STATUSES.iter().enumerate() {
        sheet = sheet.cell(&format!("{label_col}{}", spot.row + 1 + i as u32), *status);
    }
    sheet = sheet
        .cell(&format!("{label_col}{}", spot.total_row()), "Total")
        .cell(&format!("{label_col}{}", spot.last_row()), "% Placed");

    let mut names = vec![spot.header];
    for (k, (date, counts)) in columns.iter().enumerate() {
        let col = col_letter(spot.col + 1 + k as u32);
        sheet = sheet.styled_cell(&format!("{col}{}", spot.row), *date, XF_HEADER);
        for (i, count) in counts.iter().enumerate() {
            sheet = sheet.styled_cell(&format!("{col}{}", spot.row + 1 + i as u32), *count, XF_INTEGER);
        }
        names.push(date);
    }

    let last_col = col_letter(spot.col + columns.len() as u32);
    let range = format!("{label_col}{}:{last_col}{}", spot.row, spot.last_row());
    sheet.table(spot.name, &range, &names)
}

/// A sheet with snapshot/history pairs side by side, one pair per band of rows.
pub fn pair_sheet(name: &str, header: &str, pairs: &[(&str, &str)]) -> SheetBuilder {
    let mut sheet = SheetBuilder::new(name);
    for (i, &(snapshot, history)) in pairs.iter().enumerate() {
        let row = 3 + 10 * i as u32;
        sheet = status_table(
            sheet,
            TableSpot { name: snapshot, header, row, col: 2 },
            &[("10/23/2026", [1, 1, 1, 1])],
        );
        sheet = status_table(
            sheet,
            TableSpot { name: history, header, row, col: 6 },
            &[("10/23/2026", [1, 1, 1, 1])],
        );
    }
    sheet
}

/// Build `(label, count)` result rows.
pub fn rows(pairs: &[(&str, i64)]) -> Vec<StatusCount> {
    pairs.iter().map(|(l, c)| StatusCount::new(*l, *c)).collect()
}

/// Serialize and parse again, as a later run would see the file.
pub fn reopen(book: &ReportWorkbook) -> ReportWorkbook {
    ReportWorkbook::from_bytes(book.to_bytes().unwrap()).unwrap()
}

/// Read one part of a package as text.
pub fn read_part(xlsx: &[u8], path: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(xlsx)).unwrap();
    let mut file = archive.by_name(path).unwrap();
    let mut out = String::new();
    file.read_to_string(&mut out).unwrap();
    out
}

/// Names of every entry in a package, sorted.
pub fn part_names(xlsx: &[u8]) -> Vec<String> {
    let archive = zip::ZipArchive::new(Cursor::new(xlsx)).unwrap();
    let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
    names.sort();
    names
}
