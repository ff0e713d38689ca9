// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/model.rs
//
// Application state.

use std::sync::Arc;

use crate::config::{AppConfig, SettingsStore, Theme};
use crate::domain::item::ItemId;
use crate::domain::registry::ItemRegistry;
use crate::media::HandleLedger;

// =============================================================================
// Busy flag
// =============================================================================

/// Collection-wide busy flag owned by the auto-crop orchestrator.
///
/// Busy while any owning operation is in flight. `settle_count` counts
/// `Busy -> Idle` transitions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BusyFlag {
    in_flight: usize,
    batch: bool,
    settle_count: usize,
}

impl BusyFlag {
    pub fn is_busy(&self) -> bool {
        self.in_flight > 0
    }

    /// Whether the flag is held by a batch run.
    pub fn is_batch_running(&self) -> bool {
        self.batch
    }

    pub fn settle_count(&self) -> usize {
        self.settle_count
    }

    pub(crate) fn begin(&mut self) {
        self.in_flight += 1;
    }

    pub(crate) fn begin_batch(&mut self) {
        self.batch = true;
        self.begin();
    }

    pub(crate) fn settle(&mut self) {
        if self.in_flight == 0 {
            return;
        }
        self.in_flight -= 1;
        if self.in_flight == 0 {
            self.batch = false;
            self.settle_count += 1;
        }
    }
}

// =============================================================================
// Model
// =============================================================================

pub struct AppModel {
    // Items.
    pub registry: ItemRegistry,

    // Auto-crop.
    pub busy: BusyFlag,
    pub model_ready: bool,

    // Interaction.
    pub focused: Option<ItemId>,
    pub theme: Theme,

    // UI state.
    pub notice: Option<String>,
}

impl AppModel {
    pub fn new(
        config: &AppConfig,
        settings: &dyn SettingsStore,
        handles: Arc<HandleLedger>,
    ) -> Self {
        Self {
            registry: ItemRegistry::new(handles),
            busy: BusyFlag::default(),
            model_ready: false,
            focused: None,
            theme: Theme::resolve(settings, config),
            notice: None,
        }
    }

    pub fn set_notice<S: Into<String>>(&mut self, msg: S) {
        self.notice = Some(msg.into());
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    /// Whether batch controls (auto-crop all) are enabled.
    pub fn can_auto_crop_all(&self) -> bool {
        self.model_ready && !self.busy.is_busy() && self.registry.loaded_count() > 0
    }
}
