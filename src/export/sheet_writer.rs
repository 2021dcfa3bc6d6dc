//! Regenerates `<sheetData>` and `<dimension>` of a worksheet part.
//!
//! Everything else in the part is copied from the original. Untouched cells
//! are written back from their original XML; edited cells use inline strings
//! (`t="inlineStr"`) so the shared string table never needs rebuilding.

use std::collections::{BTreeMap, BTreeSet};

use crate::cell_ref::{format_cell_ref, Bounds};
use crate::error::{ReportError, Result};
use crate::types::{Cell, CellValue, StyleSheet, Worksheet};
use crate::xml_helpers::{find_container, push_start_tag, remove_attr, set_attr, splice, xml_escape, Span};

/// Rewrite a worksheet part from the sheet model.
///
/// `styles` receives any derived formats the edited cells need.
pub(crate) fn write_sheet_xml(original: &str, sheet: &Worksheet, styles: &mut StyleSheet) -> Result<String> {
    let sheet_data = find_container(original, b"sheetData")?
        .ok_or_else(|| ReportError::Parse(format!("{}: no sheetData element", sheet.path)))?;
    let prefix = sheet_data
        .name
        .rsplit_once(':')
        .map_or(String::new(), |(p, _)| format!("{p}:"));

    let mut data = String::with_capacity(original.len());
    push_start_tag(&mut data, &sheet_data.name, &sheet_data.attrs, false);
    write_sheet_data(&mut data, &prefix, sheet, styles)?;
    data.push_str("</");
    data.push_str(&sheet_data.name);
    data.push('>');

    let mut edits: Vec<(Span, String)> = vec![(sheet_data.span, data)];

    if let (Some(dimension), Some(extent)) = (find_container(original, b"dimension")?, used_range(sheet)) {
        let mut attrs = dimension.attrs.clone();
        set_attr(&mut attrs, "ref", extent.to_range());
        let mut tag = String::new();
        push_start_tag(&mut tag, &dimension.name, &attrs, true);
        edits.push((dimension.span, tag));
    }

    Ok(splice(original, edits))
}

/// Smallest range covering every cell of the sheet.
fn used_range(sheet: &Worksheet) -> Option<Bounds> {
    let mut keys = sheet.cells.keys();
    let &(first_row, first_col) = keys.next()?;
    let mut bounds = Bounds {
        min_row: first_row,
        max_row: first_row,
        min_col: first_col,
        max_col: first_col,
    };
    for &(row, col) in keys {
        bounds.min_row = bounds.min_row.min(row);
        bounds.max_row = bounds.max_row.max(row);
        bounds.min_col = bounds.min_col.min(col);
        bounds.max_col = bounds.max_col.max(col);
    }
    Some(bounds)
}

/// Write all rows into `<sheetData>`, in row order.
fn write_sheet_data(out: &mut String, prefix: &str, sheet: &Worksheet, styles: &mut StyleSheet) -> Result<()> {
    // Group cells by row
    let mut rows: BTreeMap<u32, Vec<(u32, &Cell)>> = BTreeMap::new();
    for (&(row, col), cell) in &sheet.cells {
        rows.entry(row).or_default().push((col, cell));
    }
    let row_numbers: BTreeSet<u32> = rows.keys().chain(sheet.rows.keys()).copied().collect();

    let row_tag = format!("{prefix}row");
    for row in row_numbers {
        let cells = rows.get(&row).map_or(&[][..], Vec::as_slice);
        let mut attrs = sheet.rows.get(&row).cloned().unwrap_or_default();
        set_attr(&mut attrs, "r", row.to_string());
        if cells.iter().any(|(_, c)| c.is_modified()) {
            // spans is an optional hint and may no longer cover the row
            remove_attr(&mut attrs, "spans");
        }

        if cells.is_empty() {
            push_start_tag(out, &row_tag, &attrs, true);
            continue;
        }
        push_start_tag(out, &row_tag, &attrs, false);
        for &(col, cell) in cells {
            match &cell.raw {
                Some(raw) => out.push_str(raw),
                None => write_cell(out, prefix, row, col, cell, styles)?,
            }
        }
        out.push_str("</");
        out.push_str(&row_tag);
        out.push('>');
    }
    Ok(())
}

/// Write a single edited `<c>` element.
fn write_cell(
    out: &mut String,
    prefix: &str,
    row: u32,
    col: u32,
    cell: &Cell,
    styles: &mut StyleSheet,
) -> Result<()> {
    let tag = format!("{prefix}c");
    out.push('<');
    out.push_str(&tag);
    out.push_str(&format!(" r=\"{}\"", format_cell_ref(col, row)));

    let style_idx = if cell.format.is_empty() {
        cell.style_idx
    } else {
        Some(styles.derive(cell.style_idx, cell.format)?)
    };
    if let Some(si) = style_idx {
        out.push_str(&format!(" s=\"{si}\""));
    }

    match &cell.value {
        CellValue::Empty => {
            out.push_str("/>");
            return Ok(());
        }
        CellValue::Number(n) => {
            out.push_str(&format!("><{prefix}v>{n}</{prefix}v>"));
        }
        CellValue::Text(s) => {
            // Use inline string to avoid shared string table rebuild
            out.push_str(" t=\"inlineStr\">");
            let space = if s.trim() == s { "" } else { " xml:space=\"preserve\"" };
            out.push_str(&format!(
                "<{prefix}is><{prefix}t{space}>{}</{prefix}t></{prefix}is>",
                xml_escape(s)
            ));
        }
        CellValue::Bool(b) => {
            let val = if *b { "1" } else { "0" };
            out.push_str(&format!(" t=\"b\"><{prefix}v>{val}</{prefix}v>"));
        }
        CellValue::Error(e) => {
            out.push_str(&format!(" t=\"e\"><{prefix}v>{}</{prefix}v>", xml_escape(e)));
        }
    }

    out.push_str("</");
    out.push_str(&tag);
    out.push('>');
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::types::FormatPatch;

    const SHEET: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><dimension ref="B2:C3"/><sheetViews><sheetView workbookViewId="0"/></sheetViews><sheetData><row r="2" spans="2:3"><c r="B2" t="s"><v>0</v></c><c r="C2" s="1"><v>5</v></c></row><row r="3" ht="20" customHeight="1"><c r="B3" t="s"><v>1</v></c></row></sheetData><tableParts count="1"><tablePart r:id="rId1"/></tableParts></worksheet>"#;

    fn sheet_with_raw() -> Worksheet {
        let mut sheet = Worksheet::new("S");
        sheet.path = "xl/worksheets/sheet1.xml".into();
        let raw = |s: &str| Cell {
            raw: Some(s.to_string()),
            ..Cell::default()
        };
        sheet.cells.insert((2, 2), raw(r#"<c r="B2" t="s"><v>0</v></c>"#));
        sheet.cells.insert((2, 3), raw(r#"<c r="C2" s="1"><v>5</v></c>"#));
        sheet.cells.insert((3, 2), raw(r#"<c r="B3" t="s"><v>1</v></c>"#));
        sheet.rows.insert(
            2,
            vec![("r".into(), "2".into()), ("spans".into(), "2:3".into())],
        );
        sheet.rows.insert(
            3,
            vec![
                ("r".into(), "3".into()),
                ("ht".into(), "20".into()),
                ("customHeight".into(), "1".into()),
            ],
        );
        sheet
    }

    #[test]
    fn test_untouched_sheet_is_identical() {
        let sheet = sheet_with_raw();
        let mut styles = StyleSheet::default();
        let out = write_sheet_xml(SHEET, &sheet, &mut styles).unwrap();
        assert_eq!(out, SHEET);
    }

    #[test]
    fn test_edited_cells_and_dimension() {
        let mut sheet = sheet_with_raw();
        sheet.set_number(3, 4, 0.25);
        sheet.set_text(2, 4, "10/04/2026");
        sheet.patch_format(3, 4, FormatPatch::PERCENT);
        let mut styles = StyleSheet::from_parts(
            Some("xl/styles.xml".into()),
            vec![r#"<xf numFmtId="0"/>"#.into(), r#"<xf numFmtId="3"/>"#.into()],
            Vec::new(),
        );
        let out = write_sheet_xml(SHEET, &sheet, &mut styles).unwrap();

        assert!(out.contains(r#"<dimension ref="B2:D3"/>"#));
        assert!(out.contains(r#"<row r="2"><c r="B2" t="s"><v>0</v></c><c r="C2" s="1"><v>5</v></c><c r="D2" t="inlineStr"><is><t>10/04/2026</t></is></c></row>"#));
        assert!(out.contains(r#"<c r="D3" s="2"><v>0.25</v></c>"#));
        assert!(out.contains(r#"<row r="3" ht="20" customHeight="1">"#));
        assert!(out.contains(r#"<tableParts count="1">"#));
        assert_eq!(styles.xf_count(), 3);
    }
}
