//! Test fixtures for generating report workbooks in memory.
//!
//! The builder writes the parts a report template carries: workbook,
//! relationships, styles, shared strings, worksheets and one table part per
//! declared table, wired to its sheet through the sheet's `_rels`.
//!
//! # Example
//!
//! ```rust,ignore
//! use fixtures::{SheetBuilder, XlsxBuilder};
//!
//! let xlsx = XlsxBuilder::new()
//!     .sheet(
//!         SheetBuilder::new("Total - Full Time")
//!             .cell("B3", "Job Search Status")
//!             .cell("C3", "09/26/2026")
//!             .table("FT_total_mrf", "B3:C9", &["Job Search Status", "09/26/2026"]),
//!     )
//!     .build();
//! ```
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic,
    clippy::cast_possible_truncation
)]

use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::ZipWriter;

const MAIN_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const PKG_REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

/// Style index of the fixture's integer format (`#,##0`).
pub const XF_INTEGER: u32 = 1;
/// Style index of the fixture's bold header format.
pub const XF_HEADER: u32 = 2;

// ============================================================================
// Cells and tables
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    String(String),
    Number(f64),
    /// Formula text (no leading `=`) with its cached result.
    Formula(String, f64),
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        CellValue::Number(f64::from(n))
    }
}

#[derive(Debug, Clone)]
pub struct CellEntry {
    pub cell_ref: String,
    pub value: CellValue,
    pub style: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct TableEntry {
    pub name: String,
    pub range: String,
    pub columns: Vec<String>,
}

/// Builder for a single worksheet.
#[derive(Debug, Clone, Default)]
pub struct SheetBuilder {
    pub name: String,
    pub cells: Vec<CellEntry>,
    pub tables: Vec<TableEntry>,
}

impl SheetBuilder {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Add an unstyled cell.
    #[must_use]
    pub fn cell<V: Into<CellValue>>(mut self, cell_ref: &str, value: V) -> Self {
        self.cells.push(CellEntry {
            cell_ref: cell_ref.to_string(),
            value: value.into(),
            style: None,
        });
        self
    }

    /// Add a cell with a `cellXfs` index.
    #[must_use]
    pub fn styled_cell<V: Into<CellValue>>(mut self, cell_ref: &str, value: V, xf: u32) -> Self {
        self.cells.push(CellEntry {
            cell_ref: cell_ref.to_string(),
            value: value.into(),
            style: Some(xf),
        });
        self
    }

    /// Add a formula cell; it is also listed in `xl/calcChain.xml`.
    #[must_use]
    pub fn formula(mut self, cell_ref: &str, formula: &str, cached: f64, xf: u32) -> Self {
        self.cells.push(CellEntry {
            cell_ref: cell_ref.to_string(),
            value: CellValue::Formula(formula.to_string(), cached),
            style: Some(xf),
        });
        self
    }

    /// Declare a table; `columns` become its `tableColumn` names.
    #[must_use]
    pub fn table(mut self, name: &str, range: &str, columns: &[&str]) -> Self {
        self.tables.push(TableEntry {
            name: name.to_string(),
            range: range.to_string(),
            columns: columns.iter().map(|c| (*c).to_string()).collect(),
        });
        self
    }
}

// ============================================================================
// XLSX Builder
// ============================================================================

/// Builder for creating complete XLSX files.
#[derive(Debug, Default)]
pub struct XlsxBuilder {
    sheets: Vec<SheetBuilder>,
}

impl XlsxBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn sheet(mut self, sheet: SheetBuilder) -> Self {
        self.sheets.push(sheet);
        self
    }

    /// Build the XLSX file as bytes.
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        let cursor = Cursor::new(Vec::new());
        let mut zip = ZipWriter::new(cursor);
        let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        let mut shared_strings: Vec<String> = Vec::new();
        for cell in self.sheets.iter().flat_map(|s| &s.cells) {
            if let CellValue::String(ref s) = cell.value {
                if !shared_strings.contains(s) {
                    shared_strings.push(s.clone());
                }
            }
        }

        let table_count: usize = self.sheets.iter().map(|s| s.tables.len()).sum();
        let calc_chain = generate_calc_chain(&self.sheets);
        let mut put = |path: &str, body: String| {
            zip.start_file(path, options).unwrap();
            zip.write_all(body.as_bytes()).unwrap();
        };

        let has_chain = calc_chain.is_some();
        put(
            "[Content_Types].xml",
            generate_content_types(self.sheets.len(), table_count, has_chain),
        );
        put("_rels/.rels", generate_rels());
        put("xl/workbook.xml", generate_workbook(&self.sheets));
        put(
            "xl/_rels/workbook.xml.rels",
            generate_workbook_rels(self.sheets.len(), has_chain),
        );
        if let Some(chain) = calc_chain {
            put("xl/calcChain.xml", chain);
        }
        put("xl/styles.xml", generate_styles());
        put("xl/sharedStrings.xml", generate_shared_strings(&shared_strings));

        let mut table_id = 0usize;
        for (i, sheet) in self.sheets.iter().enumerate() {
            let n = i + 1;
            put(
                &format!("xl/worksheets/sheet{n}.xml"),
                generate_sheet_xml(sheet, &shared_strings),
            );
            if sheet.tables.is_empty() {
                continue;
            }
            let mut rels = format!(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="{PKG_REL_NS}">"#);
            for (k, table) in sheet.tables.iter().enumerate() {
                table_id += 1;
                rels.push_str(&format!(
                    r#"<Relationship Id="rId{}" Type="{REL_NS}/table" Target="../tables/table{table_id}.xml"/>"#,
                    k + 1
                ));
                put(&format!("xl/tables/table{table_id}.xml"), generate_table(table, table_id));
            }
            rels.push_str("</Relationships>");
            put(&format!("xl/worksheets/_rels/sheet{n}.xml.rels"), rels);
        }

        zip.finish().expect("Failed to finish ZIP").into_inner()
    }
}

// ============================================================================
// Part generators
// ============================================================================

fn generate_content_types(sheets: usize, tables: usize, calc_chain: bool) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/><Override PartName="/xl/sharedStrings.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml"/>"#,
    );
    for i in 1..=sheets {
        xml.push_str(&format!(
            r#"<Override PartName="/xl/worksheets/sheet{i}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#
        ));
    }
    for i in 1..=tables {
        xml.push_str(&format!(
            r#"<Override PartName="/xl/tables/table{i}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.table+xml"/>"#
        ));
    }
    if calc_chain {
        xml.push_str(r#"<Override PartName="/xl/calcChain.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.calcChain+xml"/>"#);
    }
    xml.push_str("</Types>");
    xml
}

fn generate_rels() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="{PKG_REL_NS}"><Relationship Id="rId1" Type="{REL_NS}/officeDocument" Target="xl/workbook.xml"/></Relationships>"#
    )
}

fn generate_workbook(sheets: &[SheetBuilder]) -> String {
    let mut xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><workbook xmlns="{MAIN_NS}" xmlns:r="{REL_NS}"><sheets>"#
    );
    for (i, sheet) in sheets.iter().enumerate() {
        xml.push_str(&format!(
            r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
            escape(&sheet.name),
            i + 1,
            i + 1
        ));
    }
    xml.push_str("</sheets></workbook>");
    xml
}

fn generate_workbook_rels(sheets: usize, calc_chain: bool) -> String {
    let mut xml = format!(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="{PKG_REL_NS}">"#);
    for i in 1..=sheets {
        xml.push_str(&format!(
            r#"<Relationship Id="rId{i}" Type="{REL_NS}/worksheet" Target="worksheets/sheet{i}.xml"/>"#
        ));
    }
    xml.push_str(&format!(
        r#"<Relationship Id="rId{}" Type="{REL_NS}/styles" Target="styles.xml"/><Relationship Id="rId{}" Type="{REL_NS}/sharedStrings" Target="sharedStrings.xml"/>"#,
        sheets + 1,
        sheets + 2
    ));
    if calc_chain {
        xml.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="{REL_NS}/calcChain" Target="calcChain.xml"/>"#,
            sheets + 3
        ));
    }
    xml.push_str("</Relationships>");
    xml
}

/// One `<c>` entry per formula cell, `None` when no sheet has formulas.
fn generate_calc_chain(sheets: &[SheetBuilder]) -> Option<String> {
    let mut entries = String::new();
    for (i, sheet) in sheets.iter().enumerate() {
        let mut first = true;
        for cell in &sheet.cells {
            if let CellValue::Formula(..) = cell.value {
                if first {
                    entries.push_str(&format!(r#"<c r="{}" i="{}"/>"#, cell.cell_ref, i + 1));
                    first = false;
                } else {
                    entries.push_str(&format!(r#"<c r="{}"/>"#, cell.cell_ref));
                }
            }
        }
    }
    if entries.is_empty() {
        return None;
    }
    Some(format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><calcChain xmlns="{MAIN_NS}">{entries}</calcChain>"#
    ))
}

/// Default, integer and bold header formats over one font pair and one empty border.
fn generate_styles() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><styleSheet xmlns="{MAIN_NS}"><fonts count="2"><font><sz val="11"/><name val="Calibri"/></font><font><b/><sz val="11"/><name val="Calibri"/></font></fonts><fills count="2"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill></fills><borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders><cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs><cellXfs count="3"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/><xf numFmtId="3" fontId="0" fillId="0" borderId="0" xfId="0" applyNumberFormat="1"/><xf numFmtId="0" fontId="1" fillId="0" borderId="0" xfId="0" applyFont="1"/></cellXfs><cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles></styleSheet>"#
    )
}

fn generate_shared_strings(strings: &[String]) -> String {
    let mut xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><sst xmlns="{MAIN_NS}" count="{}" uniqueCount="{}">"#,
        strings.len(),
        strings.len()
    );
    for s in strings {
        xml.push_str(&format!("<si><t>{}</t></si>", escape(s)));
    }
    xml.push_str("</sst>");
    xml
}

fn generate_sheet_xml(sheet: &SheetBuilder, shared_strings: &[String]) -> String {
    let mut cells: Vec<(u32, u32, &CellEntry)> = sheet
        .cells
        .iter()
        .map(|c| {
            let (col, row) = split_ref(&c.cell_ref);
            (row, col, c)
        })
        .collect();
    cells.sort_by_key(|(row, col, _)| (*row, *col));

    let mut xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><worksheet xmlns="{MAIN_NS}" xmlns:r="{REL_NS}">"#
    );
    if let (Some(first), Some(last)) = (cells.first(), cells.last()) {
        let max_col = cells.iter().map(|(_, c, _)| *c).max().unwrap_or(1);
        let min_col = cells.iter().map(|(_, c, _)| *c).min().unwrap_or(1);
        xml.push_str(&format!(
            r#"<dimension ref="{}{}:{}{}"/>"#,
            col_letter(min_col),
            first.0,
            col_letter(max_col),
            last.0
        ));
    }
    xml.push_str(r#"<sheetViews><sheetView workbookViewId="0"/></sheetViews><sheetFormatPr defaultRowHeight="15"/><sheetData>"#);

    let mut current_row = 0;
    for (row, _, cell) in &cells {
        if *row != current_row {
            if current_row != 0 {
                xml.push_str("</row>");
            }
            xml.push_str(&format!(r#"<row r="{row}">"#));
            current_row = *row;
        }
        let style = cell.style.map(|s| format!(r#" s="{s}""#)).unwrap_or_default();
        match &cell.value {
            CellValue::Empty => xml.push_str(&format!(r#"<c r="{}"{style}/>"#, cell.cell_ref)),
            CellValue::Number(n) => {
                xml.push_str(&format!(r#"<c r="{}"{style}><v>{n}</v></c>"#, cell.cell_ref));
            }
            CellValue::String(s) => {
                let idx = shared_strings.iter().position(|x| x == s).unwrap();
                xml.push_str(&format!(r#"<c r="{}"{style} t="s"><v>{idx}</v></c>"#, cell.cell_ref));
            }
            CellValue::Formula(f, cached) => {
                xml.push_str(&format!(
                    r#"<c r="{}"{style}><f>{}</f><v>{cached}</v></c>"#,
                    cell.cell_ref,
                    escape(f)
                ));
            }
        }
    }
    if current_row != 0 {
        xml.push_str("</row>");
    }
    xml.push_str("</sheetData>");
    xml.push_str(r#"<pageMargins left="0.7" right="0.7" top="0.75" bottom="0.75" header="0.3" footer="0.3"/>"#);

    if !sheet.tables.is_empty() {
        xml.push_str(&format!(r#"<tableParts count="{}">"#, sheet.tables.len()));
        for k in 1..=sheet.tables.len() {
            xml.push_str(&format!(r#"<tablePart r:id="rId{k}"/>"#));
        }
        xml.push_str("</tableParts>");
    }
    xml.push_str("</worksheet>");
    xml
}

fn generate_table(table: &TableEntry, id: usize) -> String {
    let mut xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><table xmlns="{MAIN_NS}" id="{id}" name="{}" displayName="{}" ref="{}" totalsRowShown="0"><autoFilter ref="{}"/><tableColumns count="{}">"#,
        table.name,
        table.name,
        table.range,
        table.range,
        table.columns.len()
    );
    for (i, column) in table.columns.iter().enumerate() {
        xml.push_str(&format!(r#"<tableColumn id="{}" name="{}"/>"#, i + 1, escape(column)));
    }
    xml.push_str(r#"</tableColumns><tableStyleInfo name="TableStyleMedium2" showFirstColumn="0" showLastColumn="0" showRowStripes="1" showColumnStripes="0"/></table>"#);
    xml
}

// ============================================================================
// Helpers
// ============================================================================

/// Convert a 1-based column number to letters.
#[must_use]
pub fn col_letter(mut col: u32) -> String {
    let mut out = Vec::new();
    while col > 0 {
        let rem = (col - 1) % 26;
        out.push(b'A' + rem as u8);
        col = (col - 1) / 26;
    }
    out.reverse();
    String::from_utf8(out).unwrap()
}

/// `"C12"` -> `(3, 12)`.
fn split_ref(cell_ref: &str) -> (u32, u32) {
    let split = cell_ref.find(|c: char| c.is_ascii_digit()).unwrap();
    let (letters, digits) = cell_ref.split_at(split);
    let col = letters
        .bytes()
        .fold(0u32, |acc, b| acc * 26 + u32::from(b - b'A' + 1));
    (col, digits.parse().unwrap())
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
