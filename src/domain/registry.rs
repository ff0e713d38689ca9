// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/registry.rs
//
// Item registry: owns every image item and is the only place they mutate.

use std::sync::Arc;

use thiserror::Error;

use super::crop::{CropError, CropRect, Dimensions};
use super::item::{ImageItem, ImageSource, InputFile, ItemId, ItemState, ItemStatus, LoadedImage};
use crate::media::{DecodedImage, HandleLedger, is_image_content_type};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("{0} is not in the registry")]
    NotFound(ItemId),
    #[error("{id} is {status}, expected loaded")]
    NotLoaded { id: ItemId, status: ItemStatus },
    #[error("rejected crop for {id}: {source}")]
    InvalidCrop {
        id: ItemId,
        #[source]
        source: CropError,
    },
}

pub type RegistryResult<T> = Result<T, RegistryError>;

/// A freshly ingested item whose payload still has to be decoded.
#[derive(Debug, Clone)]
pub struct PendingDecode {
    pub id: ItemId,
    pub name: String,
    pub bytes: Arc<[u8]>,
}

/// Copy of a loaded item's editing state, taken before a batch operation.
#[derive(Debug, Clone)]
pub struct LoadedSnapshot {
    pub id: ItemId,
    pub name: String,
    pub image: LoadedImage,
}

/// Ordered collection of image items keyed by identity.
#[derive(Debug)]
pub struct ItemRegistry {
    items: Vec<ImageItem>,
    next_id: u64,
    handles: Arc<HandleLedger>,
}

impl ItemRegistry {
    pub fn new(handles: Arc<HandleLedger>) -> Self {
        Self {
            items: Vec::new(),
            next_id: 0,
            handles,
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: ItemId) -> Option<&ImageItem> {
        self.items.iter().find(|item| item.id == id)
    }

    fn get_mut(&mut self, id: ItemId) -> Option<&mut ImageItem> {
        self.items.iter_mut().find(|item| item.id == id)
    }

    /// Items in ingestion order.
    pub fn iter(&self) -> impl Iterator<Item = &ImageItem> {
        self.items.iter()
    }

    pub fn ids(&self) -> Vec<ItemId> {
        self.items.iter().map(|item| item.id).collect()
    }

    pub fn loaded(&self) -> impl Iterator<Item = &ImageItem> {
        self.items
            .iter()
            .filter(|item| item.status() == ItemStatus::Loaded)
    }

    pub fn loaded_count(&self) -> usize {
        self.loaded().count()
    }

    /// Copy the editing state of every loaded item.
    pub fn snapshot_loaded(&self) -> Vec<LoadedSnapshot> {
        self.items
            .iter()
            .filter_map(|item| {
                item.loaded().map(|image| LoadedSnapshot {
                    id: item.id,
                    name: item.source.name.clone(),
                    image: image.clone(),
                })
            })
            .collect()
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Insert every image payload as `Loading`. Non-images are dropped.
    ///
    /// Returns the payloads the caller must decode.
    pub fn ingest(&mut self, files: impl IntoIterator<Item = InputFile>) -> Vec<PendingDecode> {
        let mut pending = Vec::new();

        for file in files {
            if !is_image_content_type(&file.content_type) {
                log::debug!(
                    "Skipping {} with content type {:?}",
                    file.name,
                    file.content_type
                );
                continue;
            }

            self.next_id += 1;
            let id = ItemId(self.next_id);
            let bytes: Arc<[u8]> = Arc::from(file.bytes);
            let handle = self.handles.create(Arc::clone(&bytes));

            pending.push(PendingDecode {
                id,
                name: file.name.clone(),
                bytes,
            });
            self.items.push(ImageItem {
                id,
                source: ImageSource {
                    name: file.name,
                    content_type: file.content_type,
                    handle,
                },
                state: ItemState::Loading,
            });
        }

        pending
    }

    /// Apply the outcome of decoding an item.
    ///
    /// Ignored when the item is gone or has already left `Loading`.
    pub fn finish_decode(&mut self, id: ItemId, result: Result<DecodedImage, String>) -> bool {
        let Some(item) = self.get_mut(id) else {
            log::debug!("Dropping decode result for removed {id}");
            return false;
        };
        if !matches!(item.state, ItemState::Loading) {
            log::debug!("Dropping decode result for {id} in state {}", item.status());
            return false;
        }

        item.state = match result {
            Ok(decoded) => ItemState::Loaded(LoadedImage::new(decoded.pixels, decoded.dimensions)),
            Err(e) => {
                log::error!("Failed to load image {}: {e}", item.source.name);
                ItemState::Error(e)
            }
        };
        true
    }

    /// Remove an item, releasing its handle. No-op when absent.
    pub fn remove(&mut self, id: ItemId) -> bool {
        let Some(pos) = self.items.iter().position(|item| item.id == id) else {
            return false;
        };
        let item = self.items.remove(pos);
        log::debug!("Removed {} ({})", id, item.source.name);
        true
    }

    // =========================================================================
    // Crop editing
    // =========================================================================

    fn loaded_mut(&mut self, id: ItemId) -> RegistryResult<&mut LoadedImage> {
        let item = self.get_mut(id).ok_or(RegistryError::NotFound(id))?;
        let status = item.status();
        item.loaded_mut()
            .ok_or(RegistryError::NotLoaded { id, status })
    }

    /// Commit `crop` to the item's history, optionally refreshing dimensions.
    pub fn apply_crop_update(
        &mut self,
        id: ItemId,
        crop: CropRect,
        dimensions: Option<Dimensions>,
    ) -> RegistryResult<()> {
        let image = self.loaded_mut(id)?;
        let bounds = dimensions.unwrap_or(image.dimensions);
        crop.validate(bounds)
            .map_err(|source| RegistryError::InvalidCrop { id, source })?;

        image.dimensions = bounds;
        image.history.commit(crop);
        Ok(())
    }

    /// Update only the live crop, without recording history.
    pub fn apply_crop_preview(&mut self, id: ItemId, crop: CropRect) -> RegistryResult<()> {
        let image = self.loaded_mut(id)?;
        crop.validate(image.dimensions)
            .map_err(|source| RegistryError::InvalidCrop { id, source })?;
        image.history.preview(crop);
        Ok(())
    }

    /// Commit the item's current live crop (end of a drag).
    pub fn commit_live_crop(&mut self, id: ItemId) -> RegistryResult<CropRect> {
        let image = self.loaded_mut(id)?;
        image.history.commit_live();
        Ok(image.history.current())
    }

    /// Step the history cursor back. `Ok(false)` at the first entry.
    pub fn undo(&mut self, id: ItemId) -> RegistryResult<bool> {
        Ok(self.loaded_mut(id)?.history.undo())
    }

    /// Step the history cursor forward. `Ok(false)` at the last entry.
    pub fn redo(&mut self, id: ItemId) -> RegistryResult<bool> {
        Ok(self.loaded_mut(id)?.history.redo())
    }

    /// Replace the editing state of several items in one step.
    ///
    /// Entries for items that were removed or are no longer loaded are
    /// skipped. Returns the number of items replaced.
    pub fn replace_loaded(&mut self, results: Vec<(ItemId, LoadedImage)>) -> usize {
        let mut replaced = 0;
        for (id, image) in results {
            match self.get_mut(id) {
                Some(item) if item.status() == ItemStatus::Loaded => {
                    item.state = ItemState::Loaded(image);
                    replaced += 1;
                }
                Some(item) => {
                    log::debug!("Skipping batch result for {id} in state {}", item.status());
                }
                None => log::debug!("Skipping batch result for removed {id}"),
            }
        }
        replaced
    }
}
