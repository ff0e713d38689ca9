// SPDX-License-Identifier: GPL-3.0-or-later
// src/export/render.rs
//
// Render a crop region of a decoded image into PNG bytes.

use std::io::Cursor;
use std::sync::Arc;

use image::{DynamicImage, GenericImageView, ImageFormat};

use crate::domain::crop::{CropRect, Dimensions};
use crate::domain::item::{ImageItem, ItemId};

/// Everything needed to render one item, detached from the registry.
#[derive(Debug, Clone)]
pub struct ExportJob {
    pub id: ItemId,
    pub name: String,
    pub pixels: Arc<DynamicImage>,
    pub crop: Option<CropRect>,
}

impl ExportJob {
    /// Build a job for a loaded item. `None` for any other state.
    pub fn from_item(item: &ImageItem) -> Option<Self> {
        let loaded = item.loaded()?;
        Some(Self {
            id: item.id,
            name: item.source.name.clone(),
            pixels: Arc::clone(&loaded.pixels),
            crop: Some(loaded.crop()),
        })
    }
}

/// Render `crop` (or the whole image) as PNG.
///
/// Returns `None` if the region does not fit the image or encoding fails.
pub fn render_png(pixels: &DynamicImage, crop: Option<CropRect>) -> Option<Vec<u8>> {
    let bounds = Dimensions::from(pixels.dimensions());
    let crop = crop.unwrap_or_else(|| bounds.full_rect());
    if let Err(e) = crop.validate(bounds) {
        log::warn!("Cannot render crop: {e}");
        return None;
    }

    let region = pixels.crop_imm(crop.x, crop.y, crop.width, crop.height);
    let mut out = Cursor::new(Vec::new());
    match region.write_to(&mut out, ImageFormat::Png) {
        Ok(()) => Some(out.into_inner()),
        Err(e) => {
            log::warn!("Failed to encode {}x{} crop: {e}", crop.width, crop.height);
            None
        }
    }
}

/// Render a job on the blocking pool.
pub async fn export_one(job: ExportJob) -> Option<Vec<u8>> {
    let id = job.id;
    match tokio::task::spawn_blocking(move || render_png(&job.pixels, job.crop)).await {
        Ok(png) => png,
        Err(e) => {
            log::error!("Render task for {id} panicked: {e}");
            None
        }
    }
}
