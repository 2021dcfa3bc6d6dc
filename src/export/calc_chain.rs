//! Drops the calculation chain once a formula cell has been overwritten.
//!
//! `xl/calcChain.xml` lists every formula cell. An entry pointing at a cell
//! that no longer holds a formula makes Excel offer to repair the file, so
//! the part goes away together with its content-type override and its
//! workbook relationship. Excel rebuilds the chain on the next recalculation.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::Result;
use crate::xml_helpers::{attr_string, splice, Span};

const CALC_CHAIN_REL_SUFFIX: &str = "/calcChain";

/// Remove the `<Override>` registering `part_path` from `[Content_Types].xml`.
pub(crate) fn drop_content_type(content_types: &str, part_path: &str) -> Result<String> {
    let part_name = format!("/{}", part_path.trim_start_matches('/'));
    remove_elements(content_types, b"Override", |e| {
        attr_string(e, b"PartName").is_some_and(|p| p.eq_ignore_ascii_case(&part_name))
    })
}

/// Remove the calcChain `<Relationship>` from the workbook's `.rels` part.
pub(crate) fn drop_relationship(rels: &str) -> Result<String> {
    remove_elements(rels, b"Relationship", |e| {
        attr_string(e, b"Type").is_some_and(|t| t.ends_with(CALC_CHAIN_REL_SUFFIX))
    })
}

/// Cut every element named `local` for which `matches` holds, children included.
fn remove_elements(xml: &str, local: &[u8], matches: impl Fn(&BytesStart) -> bool) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    let mut edits: Vec<(Span, String)> = Vec::new();
    // Start offset and depth of an element being cut
    let mut open: Option<(usize, usize)> = None;
    let mut depth = 0usize;

    loop {
        let before = reader.buffer_position();
        let event = reader.read_event()?;
        let after = reader.buffer_position();
        match event {
            Event::Empty(ref e) => {
                if open.is_none() && e.local_name().as_ref() == local && matches(e) {
                    edits.push((Span { start: before, end: after }, String::new()));
                }
            }
            Event::Start(ref e) => {
                if open.is_none() && e.local_name().as_ref() == local && matches(e) {
                    open = Some((before, depth));
                }
                depth += 1;
            }
            Event::End(_) => {
                depth = depth.saturating_sub(1);
                if let Some((start, at)) = open {
                    if at == depth {
                        edits.push((Span { start, end: after }, String::new()));
                        open = None;
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(splice(xml, edits))
}
