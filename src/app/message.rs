// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/message.rs
//
// Application messages: user actions and the results of async work.

use crate::app::autocrop::{BatchOutcome, Prediction};
use crate::domain::crop::CropRect;
use crate::domain::item::{InputFile, ItemId};
use crate::export::ExportedArchive;
use crate::media::{DecodedImage, HandleId};

#[derive(Debug)]
pub enum AppMessage {
    // Ingestion.
    FilesDropped(Vec<InputFile>),
    Decoded {
        id: ItemId,
        result: Result<DecodedImage, String>,
    },
    Remove(ItemId),

    // Crop editing.
    CropPreview {
        id: ItemId,
        crop: CropRect,
    },
    CropCommitEnd(ItemId),
    CropCommit {
        id: ItemId,
        crop: CropRect,
    },
    Undo(ItemId),
    Redo(ItemId),

    // Auto-crop.
    ModelReady(bool),
    AutoCropOne(ItemId),
    AutoCropOneFinished {
        id: ItemId,
        owns_busy: bool,
        result: Result<Prediction, String>,
    },
    AutoCropAll,
    AutoCropAllFinished(Vec<BatchOutcome>),

    // Export.
    ExportOne(ItemId),
    ExportOneFinished {
        id: ItemId,
        file_name: String,
        png: Option<Vec<u8>>,
    },
    ExportAll,
    ExportAllFinished(Result<ExportedArchive, String>),
    DownloadReleased(HandleId),

    // Interaction.
    Focus(Option<ItemId>),
    ToggleTheme,
    DismissNotice,
}
