// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/crop/mod.rs
//
// Crop geometry and per-item edit history.

mod history;
mod region;

pub use history::CropHistory;
pub use region::{CropError, CropRect, Dimensions};
