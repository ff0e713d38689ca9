// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/task.rs
//
// Deferred work produced by `update`, resolving to follow-up messages.

use std::future::Future;

use futures_util::FutureExt;
use futures_util::future::BoxFuture;

use super::message::AppMessage;

/// A set of futures, each producing one message.
#[must_use = "tasks do nothing unless handed to the runtime"]
pub struct Task(Vec<BoxFuture<'static, AppMessage>>);

impl Task {
    pub fn none() -> Self {
        Self(Vec::new())
    }

    /// Run `future` and map its output into a message.
    pub fn perform<F, T>(future: F, map: impl FnOnce(T) -> AppMessage + Send + 'static) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Self(vec![future.map(map).boxed()])
    }

    /// Emit `message` without doing any work.
    pub fn done(message: AppMessage) -> Self {
        Self(vec![futures_util::future::ready(message).boxed()])
    }

    pub fn batch(tasks: impl IntoIterator<Item = Task>) -> Self {
        Self(tasks.into_iter().flat_map(|task| task.0).collect())
    }

    pub fn is_none(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub(crate) fn into_futures(self) -> Vec<BoxFuture<'static, AppMessage>> {
        self.0
    }
}

impl std::fmt::Debug for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Task({} pending)", self.0.len())
    }
}
