//! Relationship parsing - workbook relationships, part relationships, sheet list, shared strings.

use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashMap;

use crate::error::Result;
use crate::xml_helpers::{attr_string, attr_string_local};

/// Workbook relationships parsed from xl/_rels/workbook.xml.rels
///
/// Paths are resolved relative to the xl/ directory and stored as full paths.
#[derive(Default, Debug)]
pub(super) struct WorkbookRelationships {
    /// Map of rId -> full path for worksheet relationships
    /// e.g., "rId1" -> "xl/worksheets/sheet1.xml"
    pub worksheets: HashMap<String, String>,
    /// Path to shared strings file (e.g., "xl/sharedStrings.xml")
    pub shared_strings: Option<String>,
    /// Path to styles file (e.g., "xl/styles.xml")
    pub styles: Option<String>,
    /// Path to the calculation chain (e.g., "xl/calcChain.xml")
    pub calc_chain: Option<String>,
}

/// Sheet metadata from workbook.xml
#[derive(Debug, Clone)]
pub(super) struct SheetInfo {
    pub name: String,
    pub path: String,
}

/// One `<Relationship>` of a part, target already resolved to a ZIP path.
#[derive(Debug, Clone)]
pub(super) struct Relationship {
    pub rel_type: String,
    pub target: String,
}

/// Directory of a ZIP path ("xl/worksheets/sheet1.xml" -> "xl/worksheets").
fn parent_dir(path: &str) -> &str {
    path.rsplit_once('/').map_or("", |(dir, _)| dir)
}

/// Resolve a relationship target against the directory of its source part.
///
/// Absolute targets ("/xl/tables/table1.xml") are rooted at the package;
/// relative ones may climb with "..".
pub(super) fn resolve_target(base_dir: &str, target: &str) -> String {
    let mut parts: Vec<&str> = if target.starts_with('/') {
        Vec::new()
    } else {
        base_dir.split('/').filter(|p| !p.is_empty()).collect()
    };
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            other => parts.push(other),
        }
    }
    parts.join("/")
}

/// The `_rels` path that holds relationships of `part_path`.
pub(super) fn rels_path_for(part_path: &str) -> String {
    let dir = parent_dir(part_path);
    let file = part_path.rsplit('/').next().unwrap_or(part_path);
    if dir.is_empty() {
        format!("_rels/{file}.rels")
    } else {
        format!("{dir}/_rels/{file}.rels")
    }
}

/// Parse a `.rels` document into rId -> relationship.
///
/// `source_part` is the part the relationships belong to; targets are
/// resolved against its directory. External targets are skipped.
pub(super) fn parse_relationships(xml: &str, source_part: &str) -> HashMap<String, Relationship> {
    let base_dir = parent_dir(source_part);
    let mut rels = HashMap::new();
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e) | Event::Start(ref e)) => {
                if e.local_name().as_ref() != b"Relationship" {
                    continue;
                }
                if attr_string(e, b"TargetMode").as_deref() == Some("External") {
                    continue;
                }
                let (Some(id), Some(target)) = (attr_string(e, b"Id"), attr_string(e, b"Target"))
                else {
                    continue;
                };
                let rel_type = attr_string(e, b"Type").unwrap_or_default();
                rels.insert(
                    id,
                    Relationship {
                        rel_type,
                        target: resolve_target(base_dir, &target),
                    },
                );
            }
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
    }

    rels
}

/// Categorize xl/_rels/workbook.xml.rels by relationship type.
pub(super) fn parse_workbook_relationships(xml: Option<&str>) -> WorkbookRelationships {
    let mut rels = WorkbookRelationships::default();
    let Some(xml) = xml else {
        return rels; // Relationships file is optional
    };

    for (id, rel) in parse_relationships(xml, "xl/workbook.xml") {
        if rel.rel_type.ends_with("/worksheet") {
            rels.worksheets.insert(id, rel.target);
        } else if rel.rel_type.ends_with("/sharedStrings") {
            rels.shared_strings = Some(rel.target);
        } else if rel.rel_type.ends_with("/styles") {
            rels.styles = Some(rel.target);
        } else if rel.rel_type.ends_with("/calcChain") {
            rels.calc_chain = Some(rel.target);
        }
    }

    rels
}

/// Get sheet names and paths from xl/workbook.xml, in tab order.
pub(super) fn get_sheet_info(
    xml: &str,
    relationships: &HashMap<String, String>,
) -> Result<Vec<SheetInfo>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut sheets = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Empty(ref e) | Event::Start(ref e) if e.local_name().as_ref() == b"sheet" => {
                let Some(name) = attr_string(e, b"name") else {
                    continue;
                };
                // r:id attribute (namespace prefixed)
                let r_id = attr_string_local(e, b"id").unwrap_or_default();
                // Try to get path from relationships, fallback to default
                let path = relationships.get(&r_id).cloned().unwrap_or_else(|| {
                    let idx = sheets.len() + 1;
                    format!("xl/worksheets/sheet{idx}.xml")
                });
                sheets.push(SheetInfo { name, path });
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(sheets)
}

/// Parse shared strings; rich-text runs are concatenated, phonetic runs skipped.
pub(super) fn parse_shared_strings(xml: Option<&str>) -> Vec<String> {
    let Some(xml) = xml else {
        return Vec::new(); // SharedStrings is optional
    };

    let mut reader = Reader::from_str(xml);
    reader.trim_text(false);

    let mut strings = Vec::new();
    let mut current_string = String::new();
    let mut in_si = false;
    let mut in_t = false;
    let mut in_rph = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"si" => {
                    in_si = true;
                    current_string.clear();
                }
                b"rPh" => in_rph = true,
                b"t" if in_si && !in_rph => in_t = true,
                _ => {}
            },
            Ok(Event::Empty(ref e)) if e.local_name().as_ref() == b"si" => {
                strings.push(String::new());
            }
            Ok(Event::Text(ref e)) if in_t => {
                if let Ok(text) = e.unescape() {
                    current_string.push_str(&text);
                }
            }
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"si" => {
                    strings.push(std::mem::take(&mut current_string));
                    in_si = false;
                }
                b"rPh" => in_rph = false,
                b"t" => in_t = false,
                _ => {}
            },
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
    }

    strings
}
