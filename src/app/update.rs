// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/update.rs
//
// Message handling: applies each message to the model and returns follow-up work.

use std::sync::Arc;

use super::autocrop;
use super::message::AppMessage;
use super::model::AppModel;
use super::services::Services;
use super::task::Task;
use crate::domain::item::{InputFile, ItemId};
use crate::domain::registry::RegistryResult;
use crate::export::{ExportJob, ExportedArchive, export_all, export_file_name, export_one};
use crate::media;

pub fn update(model: &mut AppModel, services: &Services, message: AppMessage) -> Task {
    match message {
        // Ingestion.
        AppMessage::FilesDropped(files) => ingest(model, files),
        AppMessage::Decoded { id, result } => {
            model.registry.finish_decode(id, result);
            Task::none()
        }
        AppMessage::Remove(id) => {
            if model.registry.remove(id) && model.focused == Some(id) {
                model.focused = None;
            }
            Task::none()
        }

        // Crop editing.
        AppMessage::CropPreview { id, crop } => {
            log_rejected(model.registry.apply_crop_preview(id, crop));
            Task::none()
        }
        AppMessage::CropCommitEnd(id) => {
            log_rejected(model.registry.commit_live_crop(id));
            Task::none()
        }
        AppMessage::CropCommit { id, crop } => {
            log_rejected(model.registry.apply_crop_update(id, crop, None));
            Task::none()
        }
        AppMessage::Undo(id) => {
            log_rejected(model.registry.undo(id));
            Task::none()
        }
        AppMessage::Redo(id) => {
            log_rejected(model.registry.redo(id));
            Task::none()
        }

        // Auto-crop.
        AppMessage::ModelReady(ready) => {
            model.model_ready = ready;
            Task::none()
        }
        AppMessage::AutoCropOne(id) => autocrop::auto_crop_one(model, services, id),
        AppMessage::AutoCropOneFinished {
            id,
            owns_busy,
            result,
        } => {
            autocrop::finish_one(model, id, owns_busy, result);
            Task::none()
        }
        AppMessage::AutoCropAll => autocrop::auto_crop_all(model, services),
        AppMessage::AutoCropAllFinished(outcomes) => {
            autocrop::finish_all(model, outcomes);
            Task::none()
        }

        // Export.
        AppMessage::ExportOne(id) => start_export_one(model, services, id),
        AppMessage::ExportOneFinished { id, file_name, png } => match png {
            Some(bytes) => deliver(model, services, &file_name, bytes),
            None => {
                log::warn!("Export of {id} produced no image");
                model.set_notice("Failed to export image.");
                Task::none()
            }
        },
        AppMessage::ExportAll => start_export_all(model, services),
        AppMessage::ExportAllFinished(result) => finish_export_all(model, services, result),
        AppMessage::DownloadReleased(handle) => {
            log::debug!("Released download {handle}");
            Task::none()
        }

        // Interaction.
        AppMessage::Focus(target) => {
            match target {
                Some(id) if !model.registry.contains(id) => {
                    log::debug!("Cannot focus missing {id}");
                }
                _ => model.focused = target,
            }
            Task::none()
        }
        AppMessage::ToggleTheme => {
            model.theme = model.theme.toggled();
            if let Err(e) = model.theme.persist(services.settings.as_ref()) {
                log::error!("Failed to persist theme: {e}");
            }
            Task::none()
        }
        AppMessage::DismissNotice => {
            model.clear_notice();
            Task::none()
        }
    }
}

fn log_rejected<T>(result: RegistryResult<T>) {
    if let Err(e) = result {
        log::debug!("Ignored edit: {e}");
    }
}

// =============================================================================
// Ingestion
// =============================================================================

fn ingest(model: &mut AppModel, files: Vec<InputFile>) -> Task {
    let pending = model.registry.ingest(files);
    if !pending.is_empty() {
        log::info!("Ingested {} images", pending.len());
    }

    Task::batch(pending.into_iter().map(|job| {
        let id = job.id;
        Task::perform(media::decode(job.bytes), move |result| AppMessage::Decoded {
            id,
            result: result.map_err(|e| format!("{e:#}")),
        })
    }))
}

// =============================================================================
// Export
// =============================================================================

fn start_export_one(model: &AppModel, services: &Services, id: ItemId) -> Task {
    let Some(job) = model.registry.get(id).and_then(ExportJob::from_item) else {
        log::debug!("Export ignored for {id}: not loaded");
        return Task::none();
    };
    let file_name = export_file_name(&services.config.export_prefix, &job.name);
    Task::perform(export_one(job), move |png| AppMessage::ExportOneFinished {
        id,
        file_name,
        png,
    })
}

fn start_export_all(model: &AppModel, services: &Services) -> Task {
    let jobs: Vec<_> = model
        .registry
        .loaded()
        .filter_map(ExportJob::from_item)
        .collect();
    let prefix = services.config.export_prefix.clone();
    let archiver = Arc::clone(&services.archiver);

    Task::perform(
        async move {
            export_all(jobs, &prefix, archiver.as_ref())
                .await
                .map_err(|e| format!("{e:#}"))
        },
        AppMessage::ExportAllFinished,
    )
}

fn finish_export_all(
    model: &mut AppModel,
    services: &Services,
    result: Result<ExportedArchive, String>,
) -> Task {
    match result {
        Ok(archive) => {
            let name = services.config.archive_name.clone();
            deliver(model, services, &name, archive.bytes)
        }
        Err(e) => {
            log::error!("Batch export failed: {e}");
            model.set_notice("Failed to export images.");
            Task::none()
        }
    }
}

/// Hand `bytes` to the download sink and release its handle after the
/// configured delay.
fn deliver(model: &mut AppModel, services: &Services, file_name: &str, bytes: Vec<u8>) -> Task {
    let handle = services.handles.create(Arc::from(bytes));
    if let Err(e) = services.downloads.deliver(file_name, &handle) {
        log::error!("Failed to deliver {file_name}: {e:#}");
        model.set_notice(format!("Failed to save {file_name}."));
        return Task::none();
    }

    let delay = services.config.download_release_delay;
    Task::perform(
        async move {
            tokio::time::sleep(delay).await;
            handle.id()
        },
        AppMessage::DownloadReleased,
    )
}
