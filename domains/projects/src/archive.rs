//! ZIP export and import of a project's files

use std::io::{Cursor, Read, Write};

use shipwright_common::{Error, Result};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::domain::entities::{normalize_path, ProjectFile, MAX_CONTENT_BYTES};

/// Pack files into a deflated ZIP archive, one entry per file
pub fn export_zip(files: &[ProjectFile]) -> Result<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for file in files {
        writer
            .start_file(file.path.as_str(), options)
            .map_err(|e| Error::Internal(format!("Failed to add {} to archive: {}", file.path, e)))?;
        writer
            .write_all(file.content.as_bytes())
            .map_err(|e| Error::Internal(format!("Failed to write {}: {}", file.path, e)))?;
    }

    let cursor = writer
        .finish()
        .map_err(|e| Error::Internal(format!("Failed to finish archive: {}", e)))?;
    Ok(cursor.into_inner())
}

/// Unpack text files from a ZIP archive.
///
/// Directory entries and macOS resource forks are skipped, as are entries
/// that are not valid UTF-8. Paths are normalised. Entries are inflated no
/// further than the content limit, whatever size their header declares.
pub fn import_zip(bytes: &[u8]) -> Result<Vec<(String, String)>> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| Error::Validation(format!("Invalid ZIP archive: {}", e)))?;

    let mut files = Vec::with_capacity(archive.len());
    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|e| Error::Validation(format!("Invalid ZIP entry: {}", e)))?;

        let name = entry.name().to_string();
        if entry.is_dir() || name.starts_with("__MACOSX/") {
            continue;
        }

        let mut raw = Vec::new();
        entry
            .by_ref()
            .take(MAX_CONTENT_BYTES as u64 + 1)
            .read_to_end(&mut raw)
            .map_err(|e| Error::Validation(format!("Failed to read {}: {}", name, e)))?;
        if raw.len() > MAX_CONTENT_BYTES {
            return Err(Error::Validation(format!(
                "{} exceeds the maximum file size of {} bytes",
                name, MAX_CONTENT_BYTES
            )));
        }

        let Ok(content) = String::from_utf8(raw) else {
            tracing::warn!(entry = %name, "Skipping non-text archive entry");
            continue;
        };

        files.push((normalize_path(&name)?, content));
    }

    Ok(files)
}
