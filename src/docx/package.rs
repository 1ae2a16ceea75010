//! Package I/O and validation
//!
//! A .docx file is a zip container of parts. This module validates the
//! container, loads every part into memory and writes them back out.

use std::fs::File;
use std::io::{Cursor, Read, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::{Error, Result};

/// Name of the main document part
pub const MAIN_PART: &str = "word/document.xml";

const ACCEPTED_EXTENSIONS: [&str; 2] = ["docx", "docm"];

#[derive(Debug, Clone)]
pub(crate) struct Part {
    pub(crate) name: String,
    pub(crate) data: Vec<u8>,
}

/// Every part of a package, in container order
#[derive(Debug, Clone, Default)]
pub(crate) struct Package {
    parts: Vec<Part>,
}

impl Package {
    pub(crate) fn part(&self, name: &str) -> Option<&[u8]> {
        self.parts
            .iter()
            .find(|part| part.name == name)
            .map(|part| part.data.as_slice())
    }

    pub(crate) fn replace(&mut self, name: &str, data: Vec<u8>) {
        match self.parts.iter_mut().find(|part| part.name == name) {
            Some(part) => part.data = data,
            None => self.parts.push(Part {
                name: name.to_string(),
                data,
            }),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.parts.len()
    }

    /// Read the main document part as text.
    pub(crate) fn main_xml(&self) -> Result<String> {
        let data = self
            .part(MAIN_PART)
            .ok_or_else(|| Error::MissingPart(MAIN_PART.to_string()))?;
        String::from_utf8(data.to_vec())
            .map_err(|e| Error::MalformedDocument(format!("{MAIN_PART} is not UTF-8: {e}")))
    }

    fn from_archive<R: Read + std::io::Seek>(mut archive: ZipArchive<R>) -> Result<Self> {
        let mut parts = Vec::with_capacity(archive.len());
        for index in 0..archive.len() {
            let mut entry = archive.by_index(index)?;
            if entry.is_dir() {
                continue;
            }
            let mut data = Vec::with_capacity(entry.size() as usize);
            entry.read_to_end(&mut data)?;
            parts.push(Part {
                name: entry.name().to_string(),
                data,
            });
        }

        let package = Package { parts };
        if package.part(MAIN_PART).is_none() {
            return Err(Error::MissingPart(MAIN_PART.to_string()));
        }
        Ok(package)
    }

    /// Load a package from disk. The file must already have passed
    /// [`validate_docx_file`].
    pub(crate) fn read(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_archive(ZipArchive::new(file)?)
    }

    /// Build the package of a new blank document.
    pub(crate) fn blank() -> Result<Self> {
        let mut buffer = Cursor::new(Vec::new());
        docx_rs::Docx::new()
            .build()
            .pack(&mut buffer)
            .map_err(|e| Error::backend(format!("failed to build blank document: {e}")))?;
        buffer.set_position(0);
        Self::from_archive(ZipArchive::new(buffer)?)
    }

    /// Write every part into a new container at `path`.
    ///
    /// The container is built in a temporary file next to `path` and renamed
    /// over it only once complete, so a failed save leaves `path` untouched.
    pub(crate) fn write(&self, path: &Path) -> Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut staged = NamedTempFile::new_in(dir)?;
        if let Ok(existing) = std::fs::metadata(path) {
            staged.as_file().set_permissions(existing.permissions())?;
        }

        let mut writer = ZipWriter::new(&mut staged);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        for part in &self.parts {
            writer.start_file(part.name.as_str(), options)?;
            writer.write_all(&part.data)?;
        }
        writer.finish()?;

        staged.persist(path).map_err(|e| Error::Io(e.error))?;
        Ok(())
    }
}

/// Validates that the file is a Word document we can edit
pub(crate) fn validate_docx_file(file_path: &Path) -> Result<()> {
    let extension = file_path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    if !ACCEPTED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(Error::invalid_format(
            file_path,
            format!("expected a .docx file, got .{extension} (legacy .doc files are not supported)"),
        ));
    }

    // Check ZIP structure contains word/document.xml
    let file = File::open(file_path)?;
    let mut archive = ZipArchive::new(file).map_err(|e| {
        Error::invalid_format(file_path, format!("not a zip container ({e})"))
    })?;

    if archive.by_name(MAIN_PART).is_err() {
        // Check if it might be an Excel file
        if archive.by_name("xl/workbook.xml").is_ok() {
            return Err(Error::invalid_format(
                file_path,
                "this appears to be an Excel workbook, not a Word document",
            ));
        }

        return Err(Error::invalid_format(
            file_path,
            format!("missing {MAIN_PART}; the file may be corrupted"),
        ));
    }

    Ok(())
}
