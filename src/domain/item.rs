// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/item.rs
//
// Image items: one user-supplied image and its editing state.

use std::fmt;
use std::sync::Arc;

use image::DynamicImage;

use super::crop::{CropHistory, CropRect, Dimensions};
use crate::media::RenderHandle;

/// Opaque identifier assigned at ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub(crate) u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item-{}", self.0)
    }
}

/// A candidate input as handed over by the ingestion boundary.
#[derive(Debug, Clone)]
pub struct InputFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl InputFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }
}

/// The binary payload of an item and the handle derived from it.
#[derive(Debug)]
pub struct ImageSource {
    pub name: String,
    pub content_type: String,
    pub handle: RenderHandle,
}

impl ImageSource {
    pub fn bytes(&self) -> &Arc<[u8]> {
        self.handle.bytes()
    }
}

/// Strip the last `.ext` from a file name, if any.
pub fn base_name(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() && !ext.contains('/') => stem,
        _ => name,
    }
}

/// Editing state of a decoded image.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub pixels: Arc<DynamicImage>,
    pub dimensions: Dimensions,
    pub history: CropHistory,
}

impl LoadedImage {
    /// Start with a crop covering the whole image.
    pub fn new(pixels: Arc<DynamicImage>, dimensions: Dimensions) -> Self {
        Self {
            pixels,
            dimensions,
            history: CropHistory::new(dimensions.full_rect()),
        }
    }

    pub fn crop(&self) -> CropRect {
        self.history.current()
    }
}

/// Lifecycle of an item. `Loaded` and `Error` are terminal.
#[derive(Debug, Clone)]
pub enum ItemState {
    Loading,
    Loaded(LoadedImage),
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemStatus {
    Loading,
    Loaded,
    Error,
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loading => write!(f, "loading"),
            Self::Loaded => write!(f, "loaded"),
            Self::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug)]
pub struct ImageItem {
    pub id: ItemId,
    pub source: ImageSource,
    pub state: ItemState,
}

impl ImageItem {
    pub fn status(&self) -> ItemStatus {
        match self.state {
            ItemState::Loading => ItemStatus::Loading,
            ItemState::Loaded(_) => ItemStatus::Loaded,
            ItemState::Error(_) => ItemStatus::Error,
        }
    }

    pub fn loaded(&self) -> Option<&LoadedImage> {
        match &self.state {
            ItemState::Loaded(loaded) => Some(loaded),
            _ => None,
        }
    }

    pub fn loaded_mut(&mut self) -> Option<&mut LoadedImage> {
        match &mut self.state {
            ItemState::Loaded(loaded) => Some(loaded),
            _ => None,
        }
    }

    pub fn crop(&self) -> Option<CropRect> {
        self.loaded().map(LoadedImage::crop)
    }

    pub fn dimensions(&self) -> Option<Dimensions> {
        self.loaded().map(|loaded| loaded.dimensions)
    }

    pub fn can_undo(&self) -> bool {
        self.loaded().is_some_and(|l| l.history.can_undo())
    }

    pub fn can_redo(&self) -> bool {
        self.loaded().is_some_and(|l| l.history.can_redo())
    }
}
