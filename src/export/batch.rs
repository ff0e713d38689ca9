// SPDX-License-Identifier: GPL-3.0-or-later
// src/export/batch.rs
//
// Batch export: render every loaded item and package the results.

use std::collections::HashSet;

use anyhow::Context;

use super::archive::{ArchiveEntry, Archiver};
use super::render::{ExportJob, export_one};
use crate::constant::EXPORT_EXT;
use crate::domain::item::base_name;

/// Exported file name for a source file: `<prefix><base>.png`.
///
/// Only the last path component of `source_name` is used.
pub fn export_file_name(prefix: &str, source_name: &str) -> String {
    let file = source_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(source_name);
    format!("{prefix}{}.{EXPORT_EXT}", base_name(file))
}

/// Make `name` unique among `taken` by appending `_2`, `_3`, ... to the stem.
fn unique_name(name: String, taken: &mut HashSet<String>) -> String {
    if taken.insert(name.clone()) {
        return name;
    }
    let stem = base_name(&name).to_string();
    let mut n = 2;
    loop {
        let candidate = format!("{stem}_{n}.{EXPORT_EXT}");
        if taken.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}

/// Result of a batch export.
#[derive(Debug, Clone)]
pub struct ExportedArchive {
    pub bytes: Vec<u8>,
    /// Names of the packaged entries, in iteration order.
    pub entries: Vec<String>,
    /// Items that failed to render and were left out.
    pub skipped: usize,
}

/// Render `jobs` in order and package them into one archive.
///
/// Individual render failures are skipped. Archive failure is returned.
pub async fn export_all(
    jobs: Vec<ExportJob>,
    prefix: &str,
    archiver: &dyn Archiver,
) -> anyhow::Result<ExportedArchive> {
    let mut taken = HashSet::new();
    let mut entries = Vec::with_capacity(jobs.len());
    let mut skipped = 0;

    for job in jobs {
        let id = job.id;
        let name = export_file_name(prefix, &job.name);
        match export_one(job).await {
            Some(bytes) => entries.push(ArchiveEntry {
                name: unique_name(name, &mut taken),
                bytes,
            }),
            None => {
                log::warn!("Skipping {id} ({name}) in batch export");
                skipped += 1;
            }
        }
    }

    let bytes = archiver
        .package(&entries)
        .context("Failed to generate archive")?;
    log::info!(
        "Packaged {} crops ({} skipped, {} bytes)",
        entries.len(),
        skipped,
        bytes.len()
    );

    Ok(ExportedArchive {
        bytes,
        entries: entries.into_iter().map(|entry| entry.name).collect(),
        skipped,
    })
}
