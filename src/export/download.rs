// SPDX-License-Identifier: GPL-3.0-or-later
// src/export/download.rs
//
// Download boundary: hands finished files over to the user.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use anyhow::Context;

use crate::media::RenderHandle;

pub trait DownloadSink: Send + Sync {
    /// Deliver the payload behind `handle` under `file_name`.
    fn deliver(&self, file_name: &str, handle: &RenderHandle) -> anyhow::Result<()>;
}

/// Writes deliveries into a directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl DownloadSink for DirectorySink {
    fn deliver(&self, file_name: &str, handle: &RenderHandle) -> anyhow::Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;
        let name = Path::new(file_name)
            .file_name()
            .with_context(|| format!("Invalid file name {file_name:?}"))?;
        let path = self.dir.join(name);
        fs::write(&path, handle.bytes().as_ref())
            .with_context(|| format!("Failed to write {}", path.display()))?;
        log::info!("Saved {}", path.display());
        Ok(())
    }
}

/// Keeps deliveries in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    delivered: Mutex<Vec<(String, Vec<u8>)>>,
}

impl MemorySink {
    pub fn delivered(&self) -> Vec<(String, Vec<u8>)> {
        self.delivered
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl DownloadSink for MemorySink {
    fn deliver(&self, file_name: &str, handle: &RenderHandle) -> anyhow::Result<()> {
        self.delivered
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((file_name.to_string(), handle.bytes().to_vec()));
        Ok(())
    }
}
