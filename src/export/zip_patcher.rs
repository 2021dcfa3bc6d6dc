//! Patch an XLSX ZIP archive with regenerated parts.
//!
//! Unmodified entries are copied via `raw_copy_file` (zero recompression cost).
//! Only patched parts are recompressed.

use std::collections::{HashMap, HashSet};
use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::{ZipArchive, ZipWriter};

use crate::error::Result;

/// Rebuild the archive, replacing every entry named in `patches` and
/// leaving out every entry named in `removed`.
///
/// Entry order is preserved, so `[Content_Types].xml` stays first.
pub(crate) fn patch_zip(
    original_data: &[u8],
    patches: &HashMap<String, String>,
    removed: &HashSet<String>,
) -> Result<Vec<u8>> {
    let cursor = Cursor::new(original_data);
    let mut archive = ZipArchive::new(cursor)?;

    let buf: Vec<u8> = Vec::with_capacity(original_data.len());
    let mut writer = ZipWriter::new(Cursor::new(buf));

    for i in 0..archive.len() {
        let entry = archive.by_index_raw(i)?;
        let name = entry.name().to_string();
        if removed.contains(&name) {
            continue;
        }

        if let Some(content) = patches.get(&name) {
            let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);
            writer.start_file(&name, options)?;
            writer.write_all(content.as_bytes())?;
            continue;
        }

        // Pass through unmodified entry (raw copy, no re-compression)
        writer.raw_copy_file(entry)?;
    }

    let cursor = writer.finish()?;
    Ok(cursor.into_inner())
}
