// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/runtime.rs
//
// Cooperative event loop: every message, including task results, is applied
// to the model one at a time.

use futures_util::FutureExt;
use futures_util::StreamExt;
use futures_util::future::BoxFuture;
use futures_util::stream::FuturesUnordered;

use super::message::AppMessage;
use super::model::AppModel;
use super::services::Services;
use super::task::Task;
use super::update::update;

pub struct Runtime {
    model: AppModel,
    services: Services,
    pending: FuturesUnordered<BoxFuture<'static, AppMessage>>,
}

impl Runtime {
    /// Build the model and report the predictor's readiness.
    pub fn new(services: Services) -> Self {
        let model = AppModel::new(
            &services.config,
            services.settings.as_ref(),
            services.handles.clone(),
        );
        let ready = services.predictor.is_ready();

        let mut runtime = Self {
            model,
            services,
            pending: FuturesUnordered::new(),
        };
        runtime.dispatch(AppMessage::ModelReady(ready));
        log::debug!("Runtime initialized (theme: {}, model ready: {ready})", runtime.model.theme);
        runtime
    }

    pub fn model(&self) -> &AppModel {
        &self.model
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    /// Number of tasks still outstanding.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    /// Apply a message now and queue the work it produces.
    pub fn dispatch(&mut self, message: AppMessage) {
        let task = update(&mut self.model, &self.services, message);
        self.spawn(task);
    }

    fn spawn(&mut self, task: Task) {
        for future in task.into_futures() {
            self.pending.push(future);
        }
    }

    /// Apply every task result that is ready without waiting.
    ///
    /// Also gives queued tasks their first poll. Returns the number of
    /// results applied.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Some(Some(message)) = self.pending.next().now_or_never() {
            self.dispatch(message);
            applied += 1;
        }
        applied
    }

    /// Wait for the next task result and apply it. `false` when idle.
    pub async fn step(&mut self) -> bool {
        match self.pending.next().await {
            Some(message) => {
                self.dispatch(message);
                true
            }
            None => false,
        }
    }

    /// Apply task results until nothing is outstanding.
    pub async fn run_until_idle(&mut self) {
        while self.step().await {}
    }
}
