// SPDX-License-Identifier: GPL-3.0-or-later
// src/lib.rs
//
// TikCrop: batch image cropping with per-image undo history and automatic
// subject cropping.

pub mod app;
pub mod config;
pub mod constant;
pub mod domain;
pub mod export;
pub mod media;
pub mod predict;

pub use app::{AppMessage, AppModel, Runtime, Services};
pub use config::{AppConfig, Theme};
pub use domain::{CropRect, Dimensions, InputFile, ItemId, ItemStatus};
