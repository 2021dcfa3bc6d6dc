//! XLSX export pipeline.
//!
//! Produces a modified XLSX by patching the original ZIP archive.
//! Only dirty worksheets, dirty tables and (when new formats were
//! derived) the styles part are re-serialized; everything else is
//! passed through byte-identical. Overwriting a formula cell also drops
//! the calculation chain.

pub(crate) mod calc_chain;
pub(crate) mod sheet_writer;
pub(crate) mod style_writer;
pub(crate) mod table_writer;
pub(crate) mod zip_patcher;

use std::collections::{HashMap, HashSet};
use std::io::Cursor;
use zip::ZipArchive;

use crate::error::{ReportError, Result};
use crate::parser::{read_part, WORKBOOK_RELS_PATH};
use crate::types::Workbook;

const CONTENT_TYPES_PATH: &str = "[Content_Types].xml";

/// Save a workbook to XLSX bytes.
///
/// `original_bytes` is the package the workbook was parsed from.
/// Returns the original bytes unchanged when nothing was edited.
pub(crate) fn save_xlsx(original_bytes: &[u8], workbook: &Workbook) -> Result<Vec<u8>> {
    let mut archive = ZipArchive::new(Cursor::new(original_bytes))?;
    let mut styles = workbook.styles.clone();
    let mut patches: HashMap<String, String> = HashMap::new();

    for sheet in &workbook.sheets {
        if sheet.is_dirty() {
            let original = read_part(&mut archive, &sheet.path)?
                .ok_or_else(|| ReportError::Parse(format!("{} missing from package", sheet.path)))?;
            let xml = sheet_writer::write_sheet_xml(&original, sheet, &mut styles)?;
            patches.insert(sheet.path.clone(), xml);
        }
        for table in sheet.tables.iter().filter(|t| t.is_dirty()) {
            let original = read_part(&mut archive, &table.path)?
                .ok_or_else(|| ReportError::Parse(format!("{} missing from package", table.path)))?;
            let xml = table_writer::write_table_xml(&original, table)?;
            patches.insert(table.path.clone(), xml);
        }
    }

    if styles.is_dirty() {
        let path = styles
            .path
            .clone()
            .ok_or_else(|| ReportError::Parse("workbook has no styles part".into()))?;
        let original = read_part(&mut archive, &path)?
            .ok_or_else(|| ReportError::Parse(format!("{path} missing from package")))?;
        patches.insert(path, style_writer::write_styles_xml(&original, &styles)?);
    }

    let mut removed: HashSet<String> = HashSet::new();
    if let Some(path) = &workbook.calc_chain {
        if workbook.sheets.iter().any(|s| s.lost_formulas()) && archive.file_names().any(|n| n == path) {
            drop_calc_chain(&mut archive, path, &mut patches)?;
            removed.insert(path.clone());
            tracing::info!(part = %path, "formula cells overwritten, dropping calculation chain");
        }
    }

    if patches.is_empty() && removed.is_empty() {
        // Nothing changed, return original bytes
        return Ok(original_bytes.to_vec());
    }

    tracing::debug!(parts = patches.len(), removed = removed.len(), "patching package");
    zip_patcher::patch_zip(original_bytes, &patches, &removed)
}

/// Queue the content-type and relationship edits that unregister the chain.
fn drop_calc_chain<R: std::io::Read + std::io::Seek>(
    archive: &mut ZipArchive<R>,
    path: &str,
    patches: &mut HashMap<String, String>,
) -> Result<()> {
    if let Some(types) = read_part(archive, CONTENT_TYPES_PATH)? {
        patches.insert(CONTENT_TYPES_PATH.to_string(), calc_chain::drop_content_type(&types, path)?);
    }
    if let Some(rels) = read_part(archive, WORKBOOK_RELS_PATH)? {
        patches.insert(WORKBOOK_RELS_PATH.to_string(), calc_chain::drop_relationship(&rels)?);
    }
    Ok(())
}
