use serde::Serialize;

/// A cell's value after shared/inline strings have been resolved.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    Error(String),
}

impl CellValue {
    /// The raw text of a text cell.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Trimmed textual form used to identify a row by its label cell.
    ///
    /// Numbers are rendered the way they display in General format, so a row
    /// labelled `2027` still matches the query label `"2027"`.
    pub fn label(&self) -> Option<String> {
        let s = match self {
            Self::Empty => return None,
            Self::Text(s) => s.trim().to_string(),
            Self::Number(n) => n.to_string(),
            Self::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
            Self::Error(e) => e.clone(),
        };
        if s.is_empty() {
            None
        } else {
            Some(s)
        }
    }

    /// Lenient numeric reading: blanks, dashes and unparseable text count as zero.
    pub fn count_value(&self) -> f64 {
        match self {
            Self::Number(n) => *n,
            Self::Text(s) => s
                .trim()
                .replace(',', "")
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .unwrap_or(0.0),
            _ => 0.0,
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for CellValue {
    #[allow(clippy::cast_precision_loss)]
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

/// Formatting requested on a cell, resolved into a `cellXfs` record at save time.
///
/// Each flag layers onto whatever style the cell already carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatPatch {
    /// `<alignment horizontal="right"/>`
    pub align_right: bool,
    /// Thin black bottom border (replaces the cell's existing border).
    pub bottom_border: bool,
    /// Built-in number format 10 (`0.00%`).
    pub percent: bool,
}

impl FormatPatch {
    pub const ALIGN_RIGHT: Self = Self {
        align_right: true,
        bottom_border: false,
        percent: false,
    };
    pub const BOTTOM_BORDER: Self = Self {
        align_right: false,
        bottom_border: true,
        percent: false,
    };
    pub const PERCENT: Self = Self {
        align_right: false,
        bottom_border: false,
        percent: true,
    };

    pub fn is_empty(&self) -> bool {
        !(self.align_right || self.bottom_border || self.percent)
    }

    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            align_right: self.align_right || other.align_right,
            bottom_border: self.bottom_border || other.bottom_border,
            percent: self.percent || other.percent,
        }
    }
}

/// A single cell: value, style index, pending format patch.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    pub value: CellValue,
    /// Index into `cellXfs`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style_idx: Option<u32>,
    #[serde(skip_serializing_if = "FormatPatch::is_empty")]
    pub format: FormatPatch,
    /// Original `<c>` element; written back verbatim while the cell is untouched.
    #[serde(skip)]
    pub(crate) raw: Option<String>,
    /// The cell was read with an `<f>` child.
    #[serde(skip)]
    pub(crate) formula: bool,
}

impl Cell {
    pub fn new(value: CellValue) -> Self {
        Self {
            value,
            ..Self::default()
        }
    }

    /// True once the cell has been edited since it was read.
    pub fn is_modified(&self) -> bool {
        self.raw.is_none()
    }

    /// True when an edit replaced a formula with a plain value.
    pub fn lost_formula(&self) -> bool {
        self.formula && self.is_modified()
    }
}
