//! Editable workbook handle.
//!
//! `ReportWorkbook` keeps the original package bytes next to the parsed
//! model so that saving can patch the archive instead of rebuilding it:
//! parts nobody touched are copied through unchanged.

pub(crate) mod mutation;

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::{ReportError, Result};
use crate::types::{Workbook, Worksheet};

/// An opened report workbook.
#[derive(Debug, Clone)]
pub struct ReportWorkbook {
    original_bytes: Vec<u8>,
    workbook: Workbook,
    path: Option<PathBuf>,
}

impl ReportWorkbook {
    /// Read and parse a workbook from disk.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        let mut book = Self::from_bytes(data)?;
        book.path = Some(path.to_path_buf());
        Ok(book)
    }

    /// Parse a workbook held in memory.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let workbook = crate::parser::parse(&data)?;
        tracing::debug!(sheets = workbook.sheets.len(), "workbook loaded");
        Ok(Self {
            original_bytes: data,
            workbook,
            path: None,
        })
    }

    pub fn workbook(&self) -> &Workbook {
        &self.workbook
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.workbook.sheet_names()
    }

    pub fn sheet(&self, name: &str) -> Result<&Worksheet> {
        self.workbook
            .sheet(name)
            .ok_or_else(|| ReportError::SheetNotFound(name.to_string()))
    }

    pub fn sheet_mut(&mut self, name: &str) -> Result<&mut Worksheet> {
        self.workbook
            .sheet_mut(name)
            .ok_or_else(|| ReportError::SheetNotFound(name.to_string()))
    }

    /// Check if any edits have been made.
    pub fn is_dirty(&self) -> bool {
        self.workbook.sheets.iter().any(|s| {
            s.is_dirty() || s.tables.iter().any(crate::types::TableDef::is_dirty)
        })
    }

    /// Serialize to XLSX bytes. Returns the original bytes if nothing changed.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        crate::export::save_xlsx(&self.original_bytes, &self.workbook)
    }

    /// Write back to the file the workbook was opened from.
    pub fn save(&self) -> Result<()> {
        let path = self
            .path
            .as_deref()
            .ok_or_else(|| ReportError::Config("workbook was not opened from a file".into()))?;
        self.save_as(path)
    }

    /// Write to `path` atomically: a temp file in the same directory is
    /// filled first, then renamed over the target.
    pub fn save_as(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.to_bytes()?;
        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(&bytes)?;
        tmp.flush()?;
        tmp.persist(path).map_err(|e| ReportError::Io(e.error))?;
        tracing::info!(path = %path.display(), bytes = bytes.len(), "workbook saved");
        Ok(())
    }
}
