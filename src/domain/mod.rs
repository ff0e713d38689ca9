// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/mod.rs
//
// Pure editing state: crop geometry, crop history, items and their registry.

pub mod crop;
pub mod item;
pub mod registry;

pub use crop::{CropError, CropHistory, CropRect, Dimensions};
pub use item::{ImageItem, ImageSource, InputFile, ItemId, ItemState, ItemStatus, LoadedImage};
pub use registry::{ItemRegistry, LoadedSnapshot, PendingDecode, RegistryError, RegistryResult};
