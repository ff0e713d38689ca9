// SPDX-License-Identifier: GPL-3.0-or-later
// src/predict/trim.rs
//
// Built-in predictor that crops away a uniform background border.

use anyhow::Context;
use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use image::{DynamicImage, GenericImageView, Rgba};

use super::{CropPredictor, RenderableImage};
use crate::constant::TRIM_TOLERANCE;
use crate::domain::crop::{CropRect, Dimensions};

/// Suggests the bounding box of everything that differs from the
/// background color, estimated from the four corners.
#[derive(Debug, Clone, Copy)]
pub struct BorderTrimPredictor {
    tolerance: u32,
}

impl Default for BorderTrimPredictor {
    fn default() -> Self {
        Self {
            tolerance: TRIM_TOLERANCE,
        }
    }
}

impl BorderTrimPredictor {
    pub fn with_tolerance(tolerance: u32) -> Self {
        Self { tolerance }
    }
}

impl CropPredictor for BorderTrimPredictor {
    fn is_ready(&self) -> bool {
        true
    }

    fn predict(&self, image: RenderableImage) -> BoxFuture<'static, anyhow::Result<CropRect>> {
        let tolerance = self.tolerance;
        async move {
            let pixels = image.pixels;
            tokio::task::spawn_blocking(move || subject_bounds(&pixels, tolerance))
                .await
                .context("Trim task panicked")
        }
        .boxed()
    }
}

fn background(img: &DynamicImage) -> [u32; 4] {
    let (w, h) = img.dimensions();
    let corners = [(0, 0), (w - 1, 0), (0, h - 1), (w - 1, h - 1)];
    let mut sum = [0u32; 4];
    for (x, y) in corners {
        let Rgba(px) = img.get_pixel(x, y);
        for (acc, channel) in sum.iter_mut().zip(px) {
            *acc += u32::from(channel);
        }
    }
    sum.map(|c| c / 4)
}

fn distance(px: Rgba<u8>, bg: &[u32; 4]) -> u32 {
    px.0.iter()
        .zip(bg)
        .map(|(&c, &b)| u32::from(c).abs_diff(b))
        .sum()
}

/// Bounding box of non-background pixels; full bounds when none stand out.
pub(crate) fn subject_bounds(img: &DynamicImage, tolerance: u32) -> CropRect {
    let dims = Dimensions::from(img.dimensions());
    if dims.width == 0 || dims.height == 0 {
        return dims.full_rect();
    }

    let bg = background(img);
    let mut min_x = u32::MAX;
    let mut min_y = u32::MAX;
    let mut max_x = 0;
    let mut max_y = 0;

    for (x, y, px) in img.pixels() {
        if distance(px, &bg) > tolerance {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
    }

    if min_x == u32::MAX {
        return dims.full_rect();
    }
    CropRect::new(min_x, min_y, max_x - min_x + 1, max_y - min_y + 1)
}
