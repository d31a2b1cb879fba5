//! Building and reading zip archives in memory.

use crate::error::Result;
use std::io::{Cursor, Read, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveEntry {
    pub name: String,
    pub contents: Vec<u8>,
}

impl ArchiveEntry {
    pub fn new(name: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            contents: contents.into(),
        }
    }
}

/// Writes the entries into a zip archive and returns its bytes.
pub fn build_zip(entries: &[ArchiveEntry]) -> Result<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for entry in entries {
        writer.start_file(entry.name.as_str(), options)?;
        writer.write_all(&entry.contents)?;
    }
    Ok(writer.finish()?.into_inner())
}

/// Reads every entry of a zip archive, in archive order.
pub fn read_zip(bytes: Vec<u8>) -> Result<Vec<ArchiveEntry>> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut entries = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        let mut contents = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut contents)?;
        entries.push(ArchiveEntry {
            name: file.name().to_owned(),
            contents,
        });
    }
    Ok(entries)
}

/// Reads a zip archive from disk.
pub fn open_zip(path: impl AsRef<Path>) -> Result<Vec<ArchiveEntry>> {
    let bytes = std::fs::read(path)?;
    read_zip(bytes)
}
