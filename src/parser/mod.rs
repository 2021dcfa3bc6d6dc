//! Main XLSX parser
//!
//! Orchestrates the parsing of all components from the ZIP archive: sheet
//! list, shared strings, styles, worksheets and the tables each sheet owns.

mod relationships;
mod tables;
mod worksheet;

use std::io::{Cursor, Read, Seek};
use zip::result::ZipError;
use zip::ZipArchive;

use crate::error::{ReportError, Result};
use crate::styles::parse_stylesheet;
use crate::types::{StyleSheet, Workbook};

use relationships::{
    get_sheet_info, parse_relationships, parse_shared_strings, parse_workbook_relationships,
    rels_path_for,
};
use tables::parse_table;
use worksheet::parse_sheet;

const WORKBOOK_PATH: &str = "xl/workbook.xml";
pub(crate) const WORKBOOK_RELS_PATH: &str = "xl/_rels/workbook.xml.rels";

/// Read a ZIP entry as UTF-8 text, `None` when the entry does not exist.
pub(crate) fn read_part<R: Read + Seek>(archive: &mut ZipArchive<R>, path: &str) -> Result<Option<String>> {
    let mut file = match archive.by_name(path) {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let mut content = String::new();
    file.read_to_string(&mut content)?;
    Ok(Some(content))
}

/// Parse an XLSX file from bytes.
pub fn parse(data: &[u8]) -> Result<Workbook> {
    let cursor = Cursor::new(data);
    let mut archive = ZipArchive::new(cursor)?;

    // Parse workbook relationships first to get actual file paths
    let rels_xml = read_part(&mut archive, WORKBOOK_RELS_PATH)?;
    let relationships = parse_workbook_relationships(rels_xml.as_deref());

    let shared_strings_path = relationships
        .shared_strings
        .clone()
        .unwrap_or_else(|| "xl/sharedStrings.xml".to_string());
    let sst_xml = read_part(&mut archive, &shared_strings_path)?;
    let shared_strings = parse_shared_strings(sst_xml.as_deref());

    let styles_path = relationships
        .styles
        .clone()
        .unwrap_or_else(|| "xl/styles.xml".to_string());
    let styles = match read_part(&mut archive, &styles_path)? {
        Some(xml) => parse_stylesheet(&xml, Some(styles_path))?,
        None => StyleSheet::default(),
    };

    let workbook_xml = read_part(&mut archive, WORKBOOK_PATH)?
        .ok_or_else(|| ReportError::Parse(format!("{WORKBOOK_PATH} missing")))?;
    let sheet_info = get_sheet_info(&workbook_xml, &relationships.worksheets)?;

    let mut sheets = Vec::with_capacity(sheet_info.len());
    for info in sheet_info {
        let Some(sheet_xml) = read_part(&mut archive, &info.path)? else {
            tracing::warn!(sheet = %info.name, path = %info.path, "worksheet part missing");
            continue;
        };
        let (mut sheet, table_rids) = parse_sheet(&sheet_xml, &info, &shared_strings)?;

        if !table_rids.is_empty() {
            let rels_xml = read_part(&mut archive, &rels_path_for(&info.path))?.unwrap_or_default();
            let sheet_rels = parse_relationships(&rels_xml, &info.path);
            for rid in &table_rids {
                let Some(rel) = sheet_rels.get(rid) else {
                    tracing::warn!(sheet = %info.name, rid = %rid, "tablePart without relationship");
                    continue;
                };
                let Some(table_xml) = read_part(&mut archive, &rel.target)? else {
                    tracing::warn!(sheet = %info.name, path = %rel.target, "table part missing");
                    continue;
                };
                sheet.tables.push(parse_table(&table_xml, &rel.target)?);
            }
        }

        tracing::debug!(
            sheet = %sheet.name,
            cells = sheet.cells.len(),
            tables = sheet.tables.len(),
            "parsed worksheet"
        );
        sheets.push(sheet);
    }

    Ok(Workbook {
        sheets,
        styles,
        calc_chain: relationships.calc_chain,
    })
}
