//! Worksheet parsing - reads cell values and table references from sheet XML.
//!
//! Each `<c>` element is kept verbatim alongside its decoded value so that
//! untouched cells can be written back byte for byte.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::cell_ref::parse_cell_ref_bytes;
use crate::error::Result;
use crate::types::{Cell, CellValue, Worksheet};
use crate::xml_helpers::{attr_string_local, collect_attrs};

use super::relationships::SheetInfo;

/// Cell type tag from the `t` attribute of a `<c>` element.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(super) enum CellTypeTag {
    Shared,
    Inline,
    Str,
    Bool,
    Error,
    Default,
}

pub(super) fn parse_cell_type_tag(value: &[u8]) -> CellTypeTag {
    match value {
        b"s" => CellTypeTag::Shared,
        b"b" => CellTypeTag::Bool,
        b"e" => CellTypeTag::Error,
        b"str" => CellTypeTag::Str,
        b"inlineStr" => CellTypeTag::Inline,
        _ => CellTypeTag::Default,
    }
}

pub(super) fn parse_u32_bytes(value: &[u8]) -> Option<u32> {
    let mut num: u32 = 0;
    let mut seen = false;
    for &b in value {
        if !b.is_ascii_digit() {
            return None;
        }
        seen = true;
        num = num.saturating_mul(10).saturating_add(u32::from(b - b'0'));
    }
    if seen {
        Some(num)
    } else {
        None
    }
}

/// Turn the collected `<v>` / `<is>` text into a value according to the type tag.
fn resolve_cell_value(
    tag: CellTypeTag,
    v_text: Option<&str>,
    inline_text: Option<&str>,
    shared_strings: &[String],
) -> CellValue {
    match tag {
        CellTypeTag::Shared => v_text
            .and_then(|v| v.trim().parse::<usize>().ok())
            .and_then(|idx| shared_strings.get(idx))
            .map_or(CellValue::Empty, |s| CellValue::Text(s.clone())),
        CellTypeTag::Inline => inline_text
            .or(v_text)
            .map_or(CellValue::Empty, |s| CellValue::Text(s.to_string())),
        CellTypeTag::Str => v_text.map_or(CellValue::Empty, |s| CellValue::Text(s.to_string())),
        CellTypeTag::Bool => v_text.map_or(CellValue::Empty, |s| CellValue::Bool(s.trim() == "1")),
        CellTypeTag::Error => v_text.map_or(CellValue::Empty, |s| CellValue::Error(s.to_string())),
        CellTypeTag::Default => match v_text {
            None => CellValue::Empty,
            Some(s) => s
                .trim()
                .parse::<f64>()
                .map_or_else(|_| CellValue::Text(s.to_string()), CellValue::Number),
        },
    }
}

/// State for the `<c>` element currently being read.
struct PendingCell {
    row: u32,
    col: u32,
    start: usize,
    tag: CellTypeTag,
    style_idx: Option<u32>,
    v_text: Option<String>,
    inline_text: Option<String>,
    formula: bool,
}

/// Parse a single worksheet part.
///
/// Returns the sheet and the relationship ids of its `<tablePart>` entries.
pub(super) fn parse_sheet(
    xml_src: &str,
    info: &SheetInfo,
    shared_strings: &[String],
) -> Result<(Worksheet, Vec<String>)> {
    let mut xml = Reader::from_str(xml_src);
    xml.trim_text(false);

    let mut sheet = Worksheet::new(info.name.clone());
    sheet.path = info.path.clone();
    let mut table_rids = Vec::new();

    let mut current_row: u32 = 0;
    let mut next_col: u32 = 1;
    let mut pending: Option<PendingCell> = None;
    let mut in_v = false;
    let mut in_inline_t = false;
    let mut in_rph = false;

    loop {
        let before = xml.buffer_position();
        let event = xml.read_event()?;
        let after = xml.buffer_position();

        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                let is_start_event = matches!(event, Event::Start(_));
                match e.local_name().as_ref() {
                    b"row" => {
                        let attrs = collect_attrs(e);
                        current_row = attrs
                            .iter()
                            .find(|(k, _)| k == "r")
                            .and_then(|(_, v)| parse_u32_bytes(v.as_bytes()))
                            .unwrap_or(current_row + 1);
                        next_col = 1;
                        sheet.rows.insert(current_row, attrs);
                    }
                    b"c" => {
                        let mut cell = PendingCell {
                            row: current_row.max(1),
                            col: next_col,
                            start: before,
                            tag: CellTypeTag::Default,
                            style_idx: None,
                            v_text: None,
                            inline_text: None,
                            formula: false,
                        };
                        for attr in e.attributes().flatten() {
                            match attr.key.as_ref() {
                                b"r" => {
                                    if let Some((col, row)) = parse_cell_ref_bytes(&attr.value) {
                                        cell.col = col;
                                        cell.row = row;
                                    }
                                }
                                b"s" => cell.style_idx = parse_u32_bytes(&attr.value),
                                b"t" => cell.tag = parse_cell_type_tag(&attr.value),
                                _ => {}
                            }
                        }
                        next_col = cell.col + 1;
                        if is_start_event {
                            pending = Some(cell);
                        } else {
                            insert_cell(&mut sheet, xml_src, cell, after, shared_strings);
                        }
                    }
                    b"v" if pending.is_some() && is_start_event => in_v = true,
                    b"f" => {
                        if let Some(cell) = pending.as_mut() {
                            cell.formula = true;
                        }
                    }
                    b"rPh" if is_start_event => in_rph = true,
                    b"t" if pending.is_some() && is_start_event && !in_rph => in_inline_t = true,
                    b"tablePart" => {
                        if let Some(rid) = attr_string_local(e, b"id") {
                            table_rids.push(rid);
                        }
                    }
                    _ => {}
                }
            }
            Event::Text(ref e) if in_v || in_inline_t => {
                let text = e.unescape()?;
                if let Some(cell) = pending.as_mut() {
                    let slot = if in_v {
                        &mut cell.v_text
                    } else {
                        &mut cell.inline_text
                    };
                    slot.get_or_insert_with(String::new).push_str(&text);
                }
            }
            Event::End(ref e) => match e.local_name().as_ref() {
                b"v" => in_v = false,
                b"t" => in_inline_t = false,
                b"rPh" => in_rph = false,
                b"c" => {
                    if let Some(cell) = pending.take() {
                        insert_cell(&mut sheet, xml_src, cell, after, shared_strings);
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok((sheet, table_rids))
}

fn insert_cell(
    sheet: &mut Worksheet,
    source: &str,
    cell: PendingCell,
    end: usize,
    shared_strings: &[String],
) {
    let value = resolve_cell_value(
        cell.tag,
        cell.v_text.as_deref(),
        cell.inline_text.as_deref(),
        shared_strings,
    );
    sheet.cells.insert(
        (cell.row, cell.col),
        Cell {
            value,
            style_idx: cell.style_idx,
            format: Default::default(),
            raw: Some(source.get(cell.start..end).unwrap_or("").to_string()),
            formula: cell.formula,
        },
    );
}
