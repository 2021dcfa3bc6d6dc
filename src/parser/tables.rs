//! Table part parsing (`xl/tables/tableN.xml`).

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::cell_ref::Bounds;
use crate::error::{ReportError, Result};
use crate::types::{TableColumn, TableDef};
use crate::xml_helpers::{attr_string, collect_attrs, get_attr};

/// Parse a table part into its range, auto-filter and column list.
pub(super) fn parse_table(xml_src: &str, path: &str) -> Result<TableDef> {
    let mut xml = Reader::from_str(xml_src);
    xml.trim_text(false);

    let mut name: Option<String> = None;
    let mut display_name: Option<String> = None;
    let mut bounds: Option<Bounds> = None;
    let mut auto_filter: Option<Bounds> = None;
    let mut columns: Vec<TableColumn> = Vec::new();

    let mut depth = 0usize;
    // Column whose children are being captured, with the offset where they start
    let mut open_column: Option<(TableColumn, usize)> = None;

    loop {
        let before = xml.buffer_position();
        let event = xml.read_event()?;
        let after = xml.buffer_position();

        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                let is_start_event = matches!(event, Event::Start(_));
                match e.local_name().as_ref() {
                    b"table" if depth == 0 => {
                        name = attr_string(e, b"name");
                        display_name = attr_string(e, b"displayName");
                        if let Some(r) = attr_string(e, b"ref") {
                            bounds = Some(Bounds::parse(&r)?);
                        }
                    }
                    b"autoFilter" if depth == 1 => {
                        auto_filter = attr_string(e, b"ref")
                            .map(|r| Bounds::parse(&r))
                            .transpose()?;
                    }
                    b"tableColumn" if depth == 2 && open_column.is_none() => {
                        let mut attrs = collect_attrs(e);
                        let id = get_attr(&attrs, "id")
                            .and_then(|v| v.trim().parse::<u32>().ok())
                            .unwrap_or(0);
                        let col_name = get_attr(&attrs, "name").unwrap_or("").to_string();
                        attrs.retain(|(k, _)| k != "id" && k != "name");
                        let mut column = TableColumn::new(id, col_name);
                        column.extra_attrs = attrs;
                        if is_start_event {
                            open_column = Some((column, after));
                        } else {
                            columns.push(column);
                        }
                    }
                    _ => {}
                }
                if is_start_event {
                    depth += 1;
                }
            }
            Event::End(ref e) => {
                depth = depth.saturating_sub(1);
                if depth == 2 && e.local_name().as_ref() == b"tableColumn" {
                    if let Some((mut column, inner_start)) = open_column.take() {
                        column.inner_xml = xml_src.get(inner_start..before).unwrap_or("").to_string();
                        columns.push(column);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    let label = display_name
        .clone()
        .or_else(|| name.clone())
        .unwrap_or_else(|| path.to_string());
    let bounds = bounds.ok_or_else(|| ReportError::malformed(&label, "table part has no ref"))?;

    let name = name.unwrap_or_else(|| label.clone());
    Ok(TableDef {
        display_name: display_name.unwrap_or_else(|| name.clone()),
        name,
        bounds,
        auto_filter,
        columns,
        path: path.to_string(),
        dirty: false,
    })
}
