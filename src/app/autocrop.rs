// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/autocrop.rs
//
// Auto-crop orchestration: single-item and batch predictions.
//
// Batch results are computed from the pre-batch snapshot and applied in a
// single step once every prediction has settled. A manual edit made during
// the batch to an item that is part of it is overwritten when the batch
// lands.
//
// Unfocused single predictions share the busy flag: it stays busy until the
// last of them settles. A single prediction started during a batch, or from
// the focused view, never touches it.

use std::sync::Arc;

use futures_util::future::join_all;

use super::message::AppMessage;
use super::model::AppModel;
use super::services::Services;
use super::task::Task;
use crate::domain::crop::{CropRect, Dimensions};
use crate::domain::item::{ItemId, LoadedImage};
use crate::predict::{CropPredictor, RenderableImage};

/// A validated prediction and the dimensions observed while predicting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prediction {
    pub crop: CropRect,
    pub dimensions: Dimensions,
}

/// Outcome for one item of a batch.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub id: ItemId,
    /// Snapshot state with the prediction committed, or `None` if it failed.
    pub updated: Option<LoadedImage>,
}

/// Run the predictor and clamp its answer into the observed bounds.
async fn predict(
    predictor: Arc<dyn CropPredictor>,
    image: RenderableImage,
) -> Result<Prediction, String> {
    let dimensions = image.dimensions();
    let raw = predictor
        .predict(image)
        .await
        .map_err(|e| format!("{e:#}"))?;
    let crop = raw
        .clamp_to(dimensions)
        .ok_or_else(|| format!("Predicted crop {raw} lies outside {dimensions}"))?;
    Ok(Prediction { crop, dimensions })
}

// =============================================================================
// Single item
// =============================================================================

pub fn auto_crop_one(model: &mut AppModel, services: &Services, id: ItemId) -> Task {
    if !model.model_ready {
        log::debug!("Auto-crop requested for {id} before the model is ready");
        return Task::none();
    }
    let Some(item) = model.registry.get(id) else {
        return Task::none();
    };
    let Some(loaded) = item.loaded() else {
        log::debug!("Auto-crop ignored for {id} in state {}", item.status());
        return Task::none();
    };

    let image = RenderableImage {
        handle: item.source.handle.derive(),
        pixels: Arc::clone(&loaded.pixels),
    };

    // A focused detail view never drives the gallery-wide flag, and neither
    // does anything started while a batch owns it.
    let owns_busy = model.focused.is_none() && !model.busy.is_batch_running();
    if owns_busy {
        model.busy.begin();
    }

    let predictor = Arc::clone(&services.predictor);
    Task::perform(predict(predictor, image), move |result| {
        AppMessage::AutoCropOneFinished {
            id,
            owns_busy,
            result,
        }
    })
}

pub fn finish_one(
    model: &mut AppModel,
    id: ItemId,
    owns_busy: bool,
    result: Result<Prediction, String>,
) {
    match result {
        Ok(prediction) => {
            if let Err(e) =
                model
                    .registry
                    .apply_crop_update(id, prediction.crop, Some(prediction.dimensions))
            {
                log::debug!("Discarding auto-crop result: {e}");
            }
        }
        Err(e) => {
            log::error!("Error during auto-crop of {id}: {e}");
            if model.registry.contains(id) {
                model.set_notice("Failed to auto-crop image.");
            }
        }
    }

    if owns_busy {
        model.busy.settle();
    }
}

// =============================================================================
// Batch
// =============================================================================

pub fn auto_crop_all(model: &mut AppModel, services: &Services) -> Task {
    if !model.can_auto_crop_all() {
        log::debug!(
            "Batch auto-crop unavailable (ready: {}, busy: {}, loaded: {})",
            model.model_ready,
            model.busy.is_busy(),
            model.registry.loaded_count()
        );
        return Task::none();
    }

    let snapshot = model.registry.snapshot_loaded();

    let jobs: Vec<_> = snapshot
        .into_iter()
        .filter_map(|snap| {
            let item = model.registry.get(snap.id)?;
            let image = RenderableImage {
                handle: item.source.handle.derive(),
                pixels: Arc::clone(&snap.image.pixels),
            };
            Some((snap, image))
        })
        .collect();

    log::info!("Auto-cropping {} images", jobs.len());
    model.busy.begin_batch();

    let predictor = Arc::clone(&services.predictor);
    let batch = async move {
        let predictions = jobs.into_iter().map(|(snap, image)| {
            let predictor = Arc::clone(&predictor);
            async move {
                let updated = match predict(predictor, image).await {
                    Ok(prediction) => {
                        let mut state = snap.image;
                        state.dimensions = prediction.dimensions;
                        state.history.commit(prediction.crop);
                        Some(state)
                    }
                    Err(e) => {
                        log::warn!("Error auto-cropping {}: {e}", snap.name);
                        None
                    }
                };
                BatchOutcome {
                    id: snap.id,
                    updated,
                }
            }
        });
        join_all(predictions).await
    };

    Task::perform(batch, AppMessage::AutoCropAllFinished)
}

/// Apply every batch result in one step and clear the busy flag.
pub fn finish_all(model: &mut AppModel, outcomes: Vec<BatchOutcome>) {
    let total = outcomes.len();
    let updates: Vec<_> = outcomes
        .into_iter()
        .filter_map(|outcome| outcome.updated.map(|state| (outcome.id, state)))
        .collect();
    let attempted = updates.len();
    let applied = model.registry.replace_loaded(updates);

    log::info!(
        "Batch auto-crop settled: {applied} applied, {} failed, {} discarded",
        total - attempted,
        attempted - applied
    );
    model.busy.settle();
}
