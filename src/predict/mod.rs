// SPDX-License-Identifier: GPL-3.0-or-later
// src/predict/mod.rs
//
// Prediction boundary: maps an image to a suggested crop rectangle.

mod trim;

use std::sync::Arc;

use futures_util::future::BoxFuture;
use image::{DynamicImage, GenericImageView};

use crate::domain::crop::{CropRect, Dimensions};
use crate::media::RenderHandle;

pub use trim::BorderTrimPredictor;

/// Image handed to a predictor: a freshly derived handle plus its pixels.
///
/// The handle is released when the predictor drops the value.
#[derive(Debug)]
pub struct RenderableImage {
    pub handle: RenderHandle,
    pub pixels: Arc<DynamicImage>,
}

impl RenderableImage {
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::from(self.pixels.dimensions())
    }
}

/// Capability that suggests a crop for an image.
pub trait CropPredictor: Send + Sync {
    /// Whether the model is loaded and auto-crop controls may be enabled.
    fn is_ready(&self) -> bool;

    /// Suggest a crop in the image's native pixel space.
    fn predict(&self, image: RenderableImage) -> BoxFuture<'static, anyhow::Result<CropRect>>;
}
