// SPDX-License-Identifier: GPL-3.0-or-later
// src/export/archive.rs
//
// Archive boundary: named blobs in, one combined blob out.

use std::io::{Cursor, Write};

use anyhow::Context;
use zip::CompressionMethod;
use zip::write::{SimpleFileOptions, ZipWriter};

/// One named file inside an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub name: String,
    pub bytes: Vec<u8>,
}

pub trait Archiver: Send + Sync {
    fn package(&self, entries: &[ArchiveEntry]) -> anyhow::Result<Vec<u8>>;
}

/// ZIP archiver. PNG data is already compressed, so entries are stored.
#[derive(Debug, Clone, Copy)]
pub struct ZipArchiver {
    method: CompressionMethod,
}

impl Default for ZipArchiver {
    fn default() -> Self {
        Self {
            method: CompressionMethod::Stored,
        }
    }
}

impl ZipArchiver {
    pub fn deflated() -> Self {
        Self {
            method: CompressionMethod::Deflated,
        }
    }
}

impl Archiver for ZipArchiver {
    fn package(&self, entries: &[ArchiveEntry]) -> anyhow::Result<Vec<u8>> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(self.method);

        for entry in entries {
            zip.start_file(entry.name.as_str(), options)
                .with_context(|| format!("Failed to add {} to archive", entry.name))?;
            zip.write_all(&entry.bytes)
                .with_context(|| format!("Failed to write {} to archive", entry.name))?;
        }

        let cursor = zip.finish().context("Failed to finalize archive")?;
        Ok(cursor.into_inner())
    }
}
