//! Shared XML helpers for reading and splicing package parts.
//!
//! Attribute values are stored unescaped and escaped again on output, so a
//! value read here and written back by [`push_start_tag`] is unchanged.

use quick_xml::events::BytesStart;

/// An element's attributes in document order, values unescaped.
pub type Attrs = Vec<(String, String)>;

/// Extract a string attribute value by key.
///
/// Returns `None` if the attribute is missing or cannot be unescaped.
pub fn attr_string(e: &BytesStart, key: &[u8]) -> Option<String> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == key {
            return attr.unescape_value().ok().map(|s| s.into_owned());
        }
    }
    None
}

/// Extract a string attribute by local name (ignoring namespace prefix).
pub fn attr_string_local(e: &BytesStart, key: &[u8]) -> Option<String> {
    for attr in e.attributes().flatten() {
        if attr.key.local_name().as_ref() == key {
            return attr.unescape_value().ok().map(|s| s.into_owned());
        }
    }
    None
}

/// Collect every attribute of an element, keys kept with their prefix.
pub fn collect_attrs(e: &BytesStart) -> Attrs {
    e.attributes()
        .flatten()
        .filter_map(|attr| {
            let key = std::str::from_utf8(attr.key.as_ref()).ok()?.to_string();
            let value = attr.unescape_value().ok()?.into_owned();
            Some((key, value))
        })
        .collect()
}

/// Look up an attribute in a collected list.
pub fn get_attr<'a>(attrs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    attrs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

/// Set an attribute, replacing it in place or appending it.
pub fn set_attr(attrs: &mut Attrs, key: &str, value: impl Into<String>) {
    let value = value.into();
    if let Some(slot) = attrs.iter_mut().find(|(k, _)| k == key) {
        slot.1 = value;
    } else {
        attrs.push((key.to_string(), value));
    }
}

/// Remove an attribute if present.
pub fn remove_attr(attrs: &mut Attrs, key: &str) {
    attrs.retain(|(k, _)| k != key);
}

/// Minimal XML escaping for attribute/text content.
pub fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Append `<name a="b" ...>` (or `.../>` when `self_closing`) to `out`.
pub fn push_start_tag(out: &mut String, name: &str, attrs: &[(String, String)], self_closing: bool) {
    out.push('<');
    out.push_str(name);
    for (key, value) in attrs {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        out.push_str(&xml_escape(value));
        out.push('"');
    }
    out.push_str(if self_closing { "/>" } else { ">" });
}

/// Byte range of one element inside a source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

/// Rebuild `source` with each span replaced by its text.
///
/// Spans must be non-overlapping; they are applied in start order.
pub fn splice(source: &str, mut edits: Vec<(Span, String)>) -> String {
    edits.sort_by_key(|(span, _)| span.start);
    let mut out = String::with_capacity(source.len() + 1024);
    let mut cursor = 0;
    for (span, text) in edits {
        if span.start < cursor {
            continue;
        }
        out.push_str(source.get(cursor..span.start).unwrap_or(""));
        out.push_str(&text);
        cursor = span.end;
    }
    out.push_str(source.get(cursor..).unwrap_or(""));
    out
}

/// A container element located in a document, with its direct children verbatim.
#[derive(Debug, Clone)]
pub struct Container {
    /// Qualified element name as written (`cellXfs`, `x:cellXfs`, ...).
    pub name: String,
    pub attrs: Attrs,
    pub span: Span,
    pub children: Vec<String>,
}

impl Container {
    /// Re-serialize with `children`, updating a `count` attribute if present.
    pub fn render(&self, children: &[String]) -> String {
        let mut attrs = self.attrs.clone();
        if get_attr(&attrs, "count").is_some() {
            set_attr(&mut attrs, "count", children.len().to_string());
        }
        let mut out = String::new();
        if children.is_empty() {
            push_start_tag(&mut out, &self.name, &attrs, true);
            return out;
        }
        push_start_tag(&mut out, &self.name, &attrs, false);
        for child in children {
            out.push_str(child);
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
        out
    }
}

/// Locate the first element whose local name is `local`, capturing its
/// direct child elements as raw XML. Text between children is dropped.
pub fn find_container(source: &str, local: &[u8]) -> crate::error::Result<Option<Container>> {
    use quick_xml::events::Event;
    use quick_xml::Reader;

    let mut xml = Reader::from_str(source);
    let mut found: Option<Container> = None;
    let mut depth = 0usize;
    let mut child_start = 0usize;

    loop {
        let before = xml.buffer_position();
        let event = xml.read_event()?;
        let after = xml.buffer_position();
        match event {
            Event::Start(ref e) => {
                if found.is_some() {
                    depth += 1;
                    if depth == 1 {
                        child_start = before;
                    }
                } else if e.local_name().as_ref() == local {
                    found = Some(Container {
                        name: std::str::from_utf8(e.name().as_ref())
                            .unwrap_or("")
                            .to_string(),
                        attrs: collect_attrs(e),
                        span: Span { start: before, end: after },
                        children: Vec::new(),
                    });
                }
            }
            Event::Empty(ref e) => {
                if let Some(container) = found.as_mut() {
                    if depth == 0 {
                        container
                            .children
                            .push(source.get(before..after).unwrap_or("").to_string());
                    }
                } else if e.local_name().as_ref() == local {
                    return Ok(Some(Container {
                        name: std::str::from_utf8(e.name().as_ref())
                            .unwrap_or("")
                            .to_string(),
                        attrs: collect_attrs(e),
                        span: Span { start: before, end: after },
                        children: Vec::new(),
                    }));
                }
            }
            Event::End(_) => {
                if let Some(mut container) = found.take() {
                    if depth == 0 {
                        container.span.end = after;
                        return Ok(Some(container));
                    }
                    depth -= 1;
                    if depth == 0 {
                        container
                            .children
                            .push(source.get(child_start..after).unwrap_or("").to_string());
                    }
                    found = Some(container);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(None)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;

    #[test]
    fn test_find_container_captures_children() {
        let src = r#"<styleSheet><borders count="2"><border><left/></border><border/></borders><cellXfs/></styleSheet>"#;
        let c = find_container(src, b"borders").unwrap().unwrap();
        assert_eq!(c.children, vec!["<border><left/></border>", "<border/>"]);
        assert_eq!(&src[c.span.start..c.span.end], r#"<borders count="2"><border><left/></border><border/></borders>"#);
        let rendered = c.render(&["<border/>".to_string()]);
        assert_eq!(rendered, r#"<borders count="1"><border/></borders>"#);

        let empty = find_container(src, b"cellXfs").unwrap().unwrap();
        assert!(empty.children.is_empty());
        assert!(find_container(src, b"fonts").unwrap().is_none());
    }

    fn make_start(xml: &str) -> BytesStart<'_> {
        // Strip < and > / /> to get just the tag content
        let content = xml
            .trim_start_matches('<')
            .trim_end_matches('>')
            .trim_end_matches('/')
            .trim_end();
        BytesStart::from_content(content, content.find(' ').unwrap_or(content.len()))
    }

    #[test]
    fn test_attr_string_unescapes() {
        let e = make_start(r#"<tableColumn id="3" name="Int&apos;l" />"#);
        assert_eq!(attr_string(&e, b"name"), Some("Int'l".to_string()));
        assert_eq!(attr_string(&e, b"missing"), None);
    }

    #[test]
    fn test_attr_string_local_ignores_prefix() {
        let e = make_start(r#"<tablePart r:id="rId4" />"#);
        assert_eq!(attr_string_local(&e, b"id"), Some("rId4".to_string()));
    }

    #[test]
    fn test_collect_and_push_roundtrip() {
        let e = make_start(r#"<c r="B2" s="4" t="inlineStr" />"#);
        let mut attrs = collect_attrs(&e);
        set_attr(&mut attrs, "s", "9");
        remove_attr(&mut attrs, "t");
        let mut out = String::new();
        push_start_tag(&mut out, "c", &attrs, true);
        assert_eq!(out, r#"<c r="B2" s="9"/>"#);
        assert_eq!(get_attr(&attrs, "r"), Some("B2"));
    }

    #[test]
    fn test_splice_replaces_in_order() {
        let src = "<a><b/><c/></a>";
        let out = splice(
            src,
            vec![
                (Span { start: 7, end: 11 }, "<C/>".into()),
                (Span { start: 3, end: 7 }, "<B/>".into()),
            ],
        );
        assert_eq!(out, "<a><B/><C/></a>");
    }

    #[test]
    fn test_escape() {
        assert_eq!(xml_escape(r#"a<b & "c""#), "a&lt;b &amp; &quot;c&quot;");
    }
}
