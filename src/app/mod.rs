// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/mod.rs
//
// Interaction layer: messages, model, update and the event loop.

pub mod autocrop;
pub mod message;
pub mod model;
pub mod runtime;
pub mod services;
pub mod task;
pub mod update;

pub use autocrop::{BatchOutcome, Prediction};
pub use message::AppMessage;
pub use model::{AppModel, BusyFlag};
pub use runtime::Runtime;
pub use services::Services;
pub use task::Task;
pub use update::update;
