// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/crop/region.rs
//
// Crop rectangle and image dimensions in native pixel space.

use std::fmt;

use thiserror::Error;

/// Natural pixel size of a decoded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Rectangle covering the whole image.
    pub fn full_rect(&self) -> CropRect {
        CropRect::new(0, 0, self.width, self.height)
    }
}

impl From<(u32, u32)> for Dimensions {
    fn from((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CropError {
    #[error("crop {0} has zero extent")]
    Empty(CropRect),
    #[error("crop {rect} exceeds image bounds {bounds}")]
    OutOfBounds { rect: CropRect, bounds: Dimensions },
}

/// Crop region in pixel coordinates.
///
/// Origin is the top-left corner; the region spans `[x, x + width)` and
/// `[y, y + height)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    pub fn as_tuple(&self) -> (u32, u32, u32, u32) {
        (self.x, self.y, self.width, self.height)
    }

    pub fn right(&self) -> u64 {
        u64::from(self.x) + u64::from(self.width)
    }

    pub fn bottom(&self) -> u64 {
        u64::from(self.y) + u64::from(self.height)
    }

    /// Check that the rectangle is non-empty and lies within `bounds`.
    pub fn validate(&self, bounds: Dimensions) -> Result<(), CropError> {
        if self.width == 0 || self.height == 0 {
            return Err(CropError::Empty(*self));
        }
        if self.right() > u64::from(bounds.width) || self.bottom() > u64::from(bounds.height) {
            return Err(CropError::OutOfBounds {
                rect: *self,
                bounds,
            });
        }
        Ok(())
    }

    pub fn is_valid_for(&self, bounds: Dimensions) -> bool {
        self.validate(bounds).is_ok()
    }

    /// Clamp into `bounds`, keeping at least one pixel of extent.
    ///
    /// Returns `None` when the origin lies entirely outside the image.
    pub fn clamp_to(&self, bounds: Dimensions) -> Option<Self> {
        if self.x >= bounds.width || self.y >= bounds.height {
            return None;
        }
        let width = self.width.max(1).min(bounds.width - self.x);
        let height = self.height.max(1).min(bounds.height - self.y);
        Some(Self::new(self.x, self.y, width, height))
    }
}

impl fmt::Display for CropRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{},{},{},{}}}", self.x, self.y, self.width, self.height)
    }
}
