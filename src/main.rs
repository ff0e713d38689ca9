// SPDX-License-Identifier: GPL-3.0-or-later
// src/main.rs
//
// Headless entry point: crop a set of images and export them as one archive.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;

use tikcrop::app::{AppMessage, Runtime, Services};
use tikcrop::config::{AppConfig, JsonFileStore, MemoryStore, SettingsStore};
use tikcrop::constant::TRIM_TOLERANCE;
use tikcrop::domain::{CropRect, InputFile, ItemStatus};
use tikcrop::export::DirectorySink;
use tikcrop::media::content_type_for_path;
use tikcrop::predict::BorderTrimPredictor;

/// Command line arguments.
#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub struct Args {
    /// Images to crop.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Directory the archive is written to.
    #[arg(short, long, default_value = ".")]
    pub out: PathBuf,

    /// Crop every image to its detected subject.
    #[arg(short, long)]
    pub auto_crop: bool,

    /// Color distance from the background that still counts as border.
    #[arg(long, default_value_t = TRIM_TOLERANCE)]
    pub tolerance: u32,

    /// Manual crop applied to every image before auto-crop, as X,Y,W,H.
    #[arg(long, value_parser = parse_crop)]
    pub crop: Option<CropRect>,
}

fn parse_crop(value: &str) -> Result<CropRect, String> {
    let parts: Vec<u32> = value
        .split(',')
        .map(|part| part.trim().parse::<u32>())
        .collect::<Result<_, _>>()
        .map_err(|e| format!("invalid crop {value:?}: {e}"))?;
    match parts.as_slice() {
        &[x, y, w, h] if w > 0 && h > 0 => Ok(CropRect::new(x, y, w, h)),
        &[_, _, _, _] => Err("crop width and height must be positive".to_string()),
        _ => Err(format!("expected X,Y,W,H, got {value:?}")),
    }
}

fn read_inputs(paths: &[PathBuf]) -> Vec<InputFile> {
    paths
        .iter()
        .filter_map(|path| match fs::read(path) {
            Ok(bytes) => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                Some(InputFile::new(name, content_type_for_path(path), bytes))
            }
            Err(e) => {
                log::error!("Failed to read {}: {}", path.display(), e);
                None
            }
        })
        .collect()
}

fn settings_store() -> Arc<dyn SettingsStore> {
    match JsonFileStore::in_config_dir() {
        Ok(store) => Arc::new(store),
        Err(e) => {
            log::warn!("Settings will not persist: {e}");
            Arc::new(MemoryStore::default())
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let config = AppConfig {
        download_release_delay: Duration::ZERO,
        ..AppConfig::default()
    };
    let services = Services::new(
        Arc::new(BorderTrimPredictor::with_tolerance(args.tolerance)),
        Arc::new(DirectorySink::new(&args.out)),
    )
    .with_config(config)
    .with_settings(settings_store());

    let mut runtime = Runtime::new(services);

    runtime.dispatch(AppMessage::FilesDropped(read_inputs(&args.files)));
    runtime.run_until_idle().await;

    let model = runtime.model();
    let failed = model
        .registry
        .iter()
        .filter(|item| item.status() == ItemStatus::Error)
        .count();
    if model.registry.loaded_count() == 0 {
        anyhow::bail!("No images could be loaded ({failed} failed)");
    }

    if let Some(crop) = args.crop {
        let targets: Vec<_> = model
            .registry
            .loaded()
            .filter_map(|item| Some((item.id, crop.clamp_to(item.dimensions()?)?)))
            .collect();
        for (id, crop) in targets {
            runtime.dispatch(AppMessage::CropCommit { id, crop });
        }
    }

    if args.auto_crop {
        runtime.dispatch(AppMessage::AutoCropAll);
        runtime.run_until_idle().await;
    }

    for item in runtime.model().registry.loaded() {
        if let Some(crop) = item.crop() {
            log::info!("{}: crop {}", item.source.name, crop);
        }
    }

    runtime.dispatch(AppMessage::ExportAll);
    runtime.run_until_idle().await;

    if let Some(notice) = &runtime.model().notice {
        anyhow::bail!("{notice}");
    }

    let archive = args.out.join(&runtime.services().config.archive_name);
    log::info!("Wrote {}", archive.display());
    fs::metadata(&archive).with_context(|| format!("Missing {}", archive.display()))?;
    Ok(())
}
