//! Utilities for parsing and formatting Excel-style cell references and ranges.
//!
//! Coordinates are 1-based, matching A1 notation: `A1` is `(col 1, row 1)`.

use serde::Serialize;

use crate::error::{ReportError, Result};

/// Parse a cell reference like "B7" (or "$B$7") into 1-based `(col, row)`.
pub fn parse_cell_ref(cell_ref: &str) -> Option<(u32, u32)> {
    parse_cell_ref_bytes(cell_ref.trim().as_bytes())
}

/// Parse a cell reference from raw bytes (ASCII) into 1-based `(col, row)`.
///
/// This is the bytes equivalent of [`parse_cell_ref`] for use when working with
/// raw XML attribute values (e.g., `attr.value` from quick-xml).
pub fn parse_cell_ref_bytes(ref_bytes: &[u8]) -> Option<(u32, u32)> {
    let mut col: u32 = 0;
    let mut row: u32 = 0;
    let mut saw_col = false;
    let mut saw_row = false;

    for &b in ref_bytes {
        if b == b'$' {
            continue;
        }
        if b.is_ascii_alphabetic() {
            // Letters after digits ("1A") are not a cell reference
            if saw_row {
                return None;
            }
            let upper = b.to_ascii_uppercase();
            col = col
                .checked_mul(26)?
                .checked_add(u32::from(upper - b'A') + 1)?;
            saw_col = true;
        } else if b.is_ascii_digit() {
            row = row.checked_mul(10)?.checked_add(u32::from(b - b'0'))?;
            saw_row = true;
        } else {
            return None;
        }
    }

    if !saw_col || !saw_row || row == 0 {
        return None;
    }

    Some((col, row))
}

/// Convert a 1-based column index to its letter form (1 -> "A", 28 -> "AB").
pub fn col_to_letter(col: u32) -> String {
    let mut n = col;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(char::from(b'A' + u8::try_from(rem).unwrap_or(0)));
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// Format a 1-based `(col, row)` pair as an A1 reference.
pub fn format_cell_ref(col: u32, row: u32) -> String {
    format!("{}{}", col_to_letter(col), row)
}

/// The rectangular extent of a table, 1-based and inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Bounds {
    pub min_row: u32,
    pub max_row: u32,
    pub min_col: u32,
    pub max_col: u32,
}

impl Bounds {
    /// Parse a range like "B3:D12". A single cell ("B3") yields a 1x1 range.
    pub fn parse(range: &str) -> Result<Self> {
        let (start, end) = range.split_once(':').unwrap_or((range, range));
        let (c1, r1) =
            parse_cell_ref(start).ok_or_else(|| ReportError::CellRef(range.to_string()))?;
        let (c2, r2) =
            parse_cell_ref(end).ok_or_else(|| ReportError::CellRef(range.to_string()))?;
        Ok(Self {
            min_row: r1.min(r2),
            max_row: r1.max(r2),
            min_col: c1.min(c2),
            max_col: c1.max(c2),
        })
    }

    /// Number of columns, label column included.
    pub fn width(&self) -> u32 {
        self.max_col - self.min_col + 1
    }

    /// Render back to "B3:D12" form.
    pub fn to_range(&self) -> String {
        format!(
            "{}:{}",
            format_cell_ref(self.min_col, self.min_row),
            format_cell_ref(self.max_col, self.max_row)
        )
    }

    /// Same rows, right edge moved to `max_col`.
    #[must_use]
    pub fn with_max_col(&self, max_col: u32) -> Self {
        Self { max_col, ..*self }
    }

    pub fn contains(&self, row: u32, col: u32) -> bool {
        (self.min_row..=self.max_row).contains(&row) && (self.min_col..=self.max_col).contains(&col)
    }

    pub fn intersects(&self, other: &Bounds) -> bool {
        self.min_row <= other.max_row
            && other.min_row <= self.max_row
            && self.min_col <= other.max_col
            && other.min_col <= self.max_col
    }
}

impl std::fmt::Display for Bounds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_range())
    }
}
