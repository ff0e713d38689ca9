// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/services.rs
//
// External collaborators injected into the application.

use std::sync::Arc;

use crate::config::{AppConfig, MemoryStore, SettingsStore};
use crate::export::{Archiver, DownloadSink, ZipArchiver};
use crate::media::HandleLedger;
use crate::predict::CropPredictor;

/// Everything `update` talks to outside the model.
#[derive(Clone)]
pub struct Services {
    pub config: AppConfig,
    pub predictor: Arc<dyn CropPredictor>,
    pub archiver: Arc<dyn Archiver>,
    pub downloads: Arc<dyn DownloadSink>,
    pub settings: Arc<dyn SettingsStore>,
    pub handles: Arc<HandleLedger>,
}

impl Services {
    /// ZIP archives, in-memory settings and default config.
    pub fn new(predictor: Arc<dyn CropPredictor>, downloads: Arc<dyn DownloadSink>) -> Self {
        Self {
            config: AppConfig::default(),
            predictor,
            archiver: Arc::new(ZipArchiver::default()),
            downloads,
            settings: Arc::new(MemoryStore::default()),
            handles: HandleLedger::new(),
        }
    }

    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_settings(mut self, settings: Arc<dyn SettingsStore>) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_archiver(mut self, archiver: Arc<dyn Archiver>) -> Self {
        self.archiver = archiver;
        self
    }
}

impl std::fmt::Debug for Services {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Services")
            .field("config", &self.config)
            .field("live_handles", &self.handles.live_count())
            .finish_non_exhaustive()
    }
}
