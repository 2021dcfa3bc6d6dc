//! Rewrites a table part after its range or columns changed.
//!
//! Only the `ref` of `<table>` and `<autoFilter>` and the `<tableColumns>`
//! list are regenerated; style info, sort state and extensions are kept.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::{ReportError, Result};
use crate::types::TableDef;
use crate::xml_helpers::{collect_attrs, find_container, push_start_tag, set_attr, splice, Span};

pub(crate) fn write_table_xml(original: &str, table: &TableDef) -> Result<String> {
    let mut edits: Vec<(Span, String)> = Vec::new();

    let mut xml = Reader::from_str(original);
    let mut depth = 0usize;
    loop {
        let before = xml.buffer_position();
        let event = xml.read_event()?;
        let after = xml.buffer_position();
        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                let self_closing = matches!(event, Event::Empty(_));
                let local = e.local_name();
                let new_ref = match (depth, local.as_ref()) {
                    (0, b"table") => Some(table.bounds.to_range()),
                    (1, b"autoFilter") => table.auto_filter.map(|b| b.to_range()),
                    _ => None,
                };
                if let Some(new_ref) = new_ref {
                    let name = std::str::from_utf8(e.name().as_ref())
                        .map_err(|err| ReportError::Parse(err.to_string()))?
                        .to_string();
                    let mut attrs = collect_attrs(e);
                    set_attr(&mut attrs, "ref", new_ref);
                    let mut tag = String::new();
                    push_start_tag(&mut tag, &name, &attrs, self_closing);
                    edits.push((Span { start: before, end: after }, tag));
                }
                if !self_closing {
                    depth += 1;
                }
                // Nothing past the direct children of <table> needs a new ref
                if depth > 2 {
                    break;
                }
            }
            Event::End(_) => depth = depth.saturating_sub(1),
            Event::Eof => break,
            _ => {}
        }
    }

    let columns = find_container(original, b"tableColumns")?
        .ok_or_else(|| ReportError::malformed(&table.display_name, "table part has no tableColumns"))?;
    let prefix = columns
        .name
        .rsplit_once(':')
        .map_or(String::new(), |(p, _)| format!("{p}:"));
    let children: Vec<String> = table
        .columns
        .iter()
        .map(|column| {
            let mut attrs = vec![
                ("id".to_string(), column.id.to_string()),
                ("name".to_string(), column.name.clone()),
            ];
            attrs.extend(column.extra_attrs.iter().cloned());
            let tag = format!("{prefix}tableColumn");
            let mut out = String::new();
            if column.inner_xml.is_empty() {
                push_start_tag(&mut out, &tag, &attrs, true);
            } else {
                push_start_tag(&mut out, &tag, &attrs, false);
                out.push_str(&column.inner_xml);
                out.push_str(&format!("</{tag}>"));
            }
            out
        })
        .collect();
    edits.push((columns.span, columns.render(&children)));

    Ok(splice(original, edits))
}
