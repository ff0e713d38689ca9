// SPDX-License-Identifier: GPL-3.0-or-later
// src/export/mod.rs
//
// Export pipeline: crop rendering, archive packaging and delivery.

pub mod archive;
pub mod batch;
pub mod download;
pub mod render;

pub use archive::{ArchiveEntry, Archiver, ZipArchiver};
pub use batch::{ExportedArchive, export_all, export_file_name};
pub use download::{DirectorySink, DownloadSink, MemorySink};
pub use render::{ExportJob, export_one, render_png};
