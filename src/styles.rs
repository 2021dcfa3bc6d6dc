//! Reading and extending xl/styles.xml
//!
//! Only `cellXfs` and `borders` are modelled; every other part of the
//! stylesheet passes through untouched.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::Result;
use crate::types::StyleSheet;
use crate::xml_helpers::{collect_attrs, find_container, push_start_tag, set_attr, Attrs};

/// Built-in number format `0.00%`.
pub const PERCENT_NUM_FMT_ID: u32 = 10;

/// `<xf>` used when the stylesheet has no records at all.
pub(crate) const DEFAULT_XF: &str =
    r#"<xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/>"#;

/// Thin black line under the cell; the other sides are cleared.
///
/// `prefix` is the namespace prefix of the styles part (`""` or `"x:"`).
pub(crate) fn thin_bottom_border(prefix: &str) -> String {
    format!(
        r#"<{p}border><{p}left/><{p}right/><{p}top/><{p}bottom style="thin"><{p}color rgb="FF000000"/></{p}bottom><{p}diagonal/></{p}border>"#,
        p = prefix
    )
}

/// `"x:cellXfs"` -> `"x:"`, `"cellXfs"` -> `""`.
pub(crate) fn element_prefix(name: &str) -> String {
    name.rsplit_once(':').map_or(String::new(), |(p, _)| format!("{p}:"))
}

/// Parse the `cellXfs` and `borders` collections of a styles part.
pub fn parse_stylesheet(xml: &str, path: Option<String>) -> Result<StyleSheet> {
    let (prefix, cell_xfs) = find_container(xml, b"cellXfs")?
        .map(|c| (element_prefix(&c.name), c.children))
        .unwrap_or_default();
    let borders = find_container(xml, b"borders")?
        .map(|c| c.children)
        .unwrap_or_default();
    let mut styles = StyleSheet::from_parts(path, cell_xfs, borders);
    styles.prefix = prefix;
    Ok(styles)
}

/// One `<xf>` record split into its attributes, its alignment and the
/// remaining children (kept verbatim).
#[derive(Debug, Clone, Default)]
pub(crate) struct XfRecord {
    attrs: Attrs,
    alignment: Option<Attrs>,
    other_children: Vec<String>,
}

impl XfRecord {
    pub(crate) fn parse(raw: &str) -> Result<Self> {
        let mut xml = Reader::from_str(raw);
        let mut record = Self::default();
        let mut depth = 0usize;
        let mut child_start = 0usize;

        loop {
            let before = xml.buffer_position();
            let event = xml.read_event()?;
            let after = xml.buffer_position();
            match event {
                Event::Start(ref e) | Event::Empty(ref e) => {
                    let is_start = matches!(event, Event::Start(_));
                    if depth == 0 {
                        record.attrs = collect_attrs(e);
                    } else if depth == 1 && e.local_name().as_ref() == b"alignment" {
                        record.alignment = Some(collect_attrs(e));
                    } else if depth == 1 && !is_start {
                        record
                            .other_children
                            .push(raw.get(before..after).unwrap_or("").to_string());
                    } else if depth == 1 {
                        child_start = before;
                    }
                    if is_start {
                        depth += 1;
                    }
                }
                Event::End(ref e) => {
                    depth = depth.saturating_sub(1);
                    if depth == 1 && e.local_name().as_ref() != b"alignment" {
                        record
                            .other_children
                            .push(raw.get(child_start..after).unwrap_or("").to_string());
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(record)
    }

    pub(crate) fn set(&mut self, key: &str, value: impl Into<String>) {
        set_attr(&mut self.attrs, key, value);
    }

    pub(crate) fn set_alignment(&mut self, key: &str, value: &str) {
        let alignment = self.alignment.get_or_insert_with(Vec::new);
        set_attr(alignment, key, value);
    }

    /// Render the record, tags qualified with `prefix`.
    pub(crate) fn to_xml(&self, prefix: &str) -> String {
        let tag = format!("{prefix}xf");
        let mut out = String::new();
        if self.alignment.is_none() && self.other_children.is_empty() {
            push_start_tag(&mut out, &tag, &self.attrs, true);
            return out;
        }
        push_start_tag(&mut out, &tag, &self.attrs, false);
        // Schema order: alignment, protection, extLst
        if let Some(alignment) = &self.alignment {
            push_start_tag(&mut out, &format!("{prefix}alignment"), alignment, true);
        }
        for child in &self.other_children {
            out.push_str(child);
        }
        out.push_str(&format!("</{tag}>"));
        out
    }
}
