use std::collections::HashMap;

use crate::error::{ReportError, Result};
use crate::styles::{thin_bottom_border, XfRecord, PERCENT_NUM_FMT_ID};

use super::FormatPatch;

/// The parts of `xl/styles.xml` the engine reads and extends.
///
/// Original `<xf>` and `<border>` records are kept verbatim; derived records
/// are appended after them so existing style indices never move. A record
/// that already exists is reused, so repeated runs over the same file do
/// not grow the stylesheet.
#[derive(Debug, Clone, Default)]
pub struct StyleSheet {
    /// ZIP path of the styles part, `None` for in-memory workbooks.
    pub(crate) path: Option<String>,
    pub(crate) cell_xfs: Vec<String>,
    pub(crate) original_xf_count: usize,
    pub(crate) borders: Vec<String>,
    pub(crate) original_border_count: usize,
    /// Namespace prefix of the styles part, `""` when unprefixed.
    pub(crate) prefix: String,
    thin_border_id: Option<u32>,
    derived: HashMap<(Option<u32>, FormatPatch), u32>,
}

impl StyleSheet {
    pub(crate) fn from_parts(path: Option<String>, cell_xfs: Vec<String>, borders: Vec<String>) -> Self {
        Self {
            path,
            original_xf_count: cell_xfs.len(),
            original_border_count: borders.len(),
            cell_xfs,
            borders,
            prefix: String::new(),
            thin_border_id: None,
            derived: HashMap::new(),
        }
    }

    /// Number of `cellXfs` records, derived ones included.
    pub fn xf_count(&self) -> usize {
        self.cell_xfs.len()
    }

    /// Raw XML of one `<xf>` record.
    pub fn xf(&self, idx: u32) -> Option<&str> {
        self.cell_xfs.get(usize::try_from(idx).ok()?).map(String::as_str)
    }

    pub fn is_dirty(&self) -> bool {
        self.cell_xfs.len() > self.original_xf_count || self.borders.len() > self.original_border_count
    }

    /// Index of a `cellXfs` record equal to `base` with `patch` layered on.
    ///
    /// Returns `base` itself when it already carries the patch, and an
    /// existing identical record when there is one. Derivations are
    /// memoized, so every cell that needs the same patch on the same base
    /// style shares one record.
    pub fn derive(&mut self, base: Option<u32>, patch: FormatPatch) -> Result<u32> {
        if let Some(&idx) = self.derived.get(&(base, patch)) {
            return Ok(idx);
        }

        let base_known = base.filter(|&i| self.xf(i).is_some());
        let base_raw = base_known
            .and_then(|i| self.xf(i))
            .or_else(|| self.cell_xfs.first().map(String::as_str))
            .unwrap_or(crate::styles::DEFAULT_XF);
        let original = XfRecord::parse(base_raw)?.to_xml(&self.prefix);
        let mut xf = XfRecord::parse(base_raw)?;

        if patch.percent {
            xf.set("numFmtId", PERCENT_NUM_FMT_ID.to_string());
            xf.set("applyNumberFormat", "1");
        }
        if patch.align_right {
            xf.set_alignment("horizontal", "right");
            xf.set("applyAlignment", "1");
        }
        if patch.bottom_border {
            let border_id = self.thin_border_id()?;
            xf.set("borderId", border_id.to_string());
            xf.set("applyBorder", "1");
        }

        let rendered = xf.to_xml(&self.prefix);
        let idx = match base_known {
            Some(i) if rendered == original => i,
            _ => match self.cell_xfs.iter().position(|x| *x == rendered) {
                Some(pos) => u32::try_from(pos).map_err(|_| ReportError::Parse("too many cell formats".into()))?,
                None => {
                    let idx = u32::try_from(self.cell_xfs.len())
                        .map_err(|_| ReportError::Parse("too many cell formats".into()))?;
                    self.cell_xfs.push(rendered);
                    idx
                }
            },
        };
        self.derived.insert((base, patch), idx);
        Ok(idx)
    }

    fn thin_border_id(&mut self) -> Result<u32> {
        if let Some(id) = self.thin_border_id {
            return Ok(id);
        }
        let border = thin_bottom_border(&self.prefix);
        let pos = match self.borders.iter().position(|b| *b == border) {
            Some(pos) => pos,
            None => {
                self.borders.push(border);
                self.borders.len() - 1
            }
        };
        let id = u32::try_from(pos).map_err(|_| ReportError::Parse("too many borders".into()))?;
        self.thin_border_id = Some(id);
        Ok(id)
    }
}
