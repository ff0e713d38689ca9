// SPDX-License-Identifier: GPL-3.0-or-later
// src/media/decode.rs
//
// Image payload recognition and decoding.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use image::{DynamicImage, GenericImageView, ImageFormat};

use crate::domain::crop::Dimensions;

/// A decoded image with its natural dimensions.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub pixels: Arc<DynamicImage>,
    pub dimensions: Dimensions,
}

impl DecodedImage {
    pub fn new(image: DynamicImage) -> Self {
        let dimensions = Dimensions::from(image.dimensions());
        Self {
            pixels: Arc::new(image),
            dimensions,
        }
    }
}

/// Whether a declared content type names an image.
pub fn is_image_content_type(content_type: &str) -> bool {
    content_type
        .trim()
        .to_ascii_lowercase()
        .starts_with("image/")
}

/// Guess a content type from a file extension.
///
/// Falls back to `application/octet-stream` for unknown extensions.
pub fn content_type_for_path(path: &Path) -> &'static str {
    ImageFormat::from_path(path)
        .map(|format| format.to_mime_type())
        .unwrap_or("application/octet-stream")
}

/// Decode a payload synchronously.
pub fn decode_bytes(bytes: &[u8]) -> anyhow::Result<DecodedImage> {
    let image = image::load_from_memory(bytes).context("Failed to decode image")?;
    let decoded = DecodedImage::new(image);
    if decoded.dimensions.width == 0 || decoded.dimensions.height == 0 {
        anyhow::bail!("Image has zero size ({})", decoded.dimensions);
    }
    Ok(decoded)
}

/// Decode a payload on the blocking pool.
pub async fn decode(bytes: Arc<[u8]>) -> anyhow::Result<DecodedImage> {
    tokio::task::spawn_blocking(move || decode_bytes(&bytes))
        .await
        .context("Decode task panicked")?
}
