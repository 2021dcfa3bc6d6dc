//! Writes derived formats back into xl/styles.xml.

use crate::error::{ReportError, Result};
use crate::types::StyleSheet;
use crate::xml_helpers::{find_container, splice, Span};

/// Replace the `cellXfs` and `borders` collections with the current records.
pub(crate) fn write_styles_xml(original: &str, styles: &StyleSheet) -> Result<String> {
    let mut edits: Vec<(Span, String)> = Vec::new();

    let cell_xfs = find_container(original, b"cellXfs")?
        .ok_or_else(|| ReportError::Parse("styles part has no cellXfs".into()))?;
    edits.push((cell_xfs.span, cell_xfs.render(&styles.cell_xfs)));

    if styles.borders.len() > styles.original_border_count {
        let borders = find_container(original, b"borders")?
            .ok_or_else(|| ReportError::Parse("styles part has no borders".into()))?;
        edits.push((borders.span, borders.render(&styles.borders)));
    }

    Ok(splice(original, edits))
}
