// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/crop/history.rs
//
// Linear crop history with a cursor and a live (previewed) crop.

use super::region::CropRect;

/// Per-item crop history.
///
/// `entries[cursor]` is the last committed crop the item is positioned at.
/// `live` mirrors it except while a drag preview is in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CropHistory {
    live: CropRect,
    entries: Vec<CropRect>,
    cursor: usize,
}

impl CropHistory {
    /// Start a history holding a single entry.
    pub fn new(initial: CropRect) -> Self {
        Self {
            live: initial,
            entries: vec![initial],
            cursor: 0,
        }
    }

    /// The active crop, including an uncommitted preview.
    pub fn current(&self) -> CropRect {
        self.live
    }

    pub fn entries(&self) -> &[CropRect] {
        &self.entries
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Record `crop`, discarding every entry after the cursor first.
    pub fn commit(&mut self, crop: CropRect) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(crop);
        self.cursor = self.entries.len() - 1;
        self.live = crop;
    }

    /// Commit whatever the live crop currently is.
    pub fn commit_live(&mut self) {
        self.commit(self.live);
    }

    /// Update the live crop only. History is untouched.
    pub fn preview(&mut self, crop: CropRect) {
        self.live = crop;
    }

    /// Step back one entry. Returns `false` at the start of history.
    pub fn undo(&mut self) -> bool {
        if !self.can_undo() {
            return false;
        }
        self.cursor -= 1;
        self.live = self.entries[self.cursor];
        true
    }

    /// Step forward one entry. Returns `false` at the end of history.
    pub fn redo(&mut self) -> bool {
        if !self.can_redo() {
            return false;
        }
        self.cursor += 1;
        self.live = self.entries[self.cursor];
        true
    }
}
