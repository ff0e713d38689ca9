// SPDX-License-Identifier: GPL-3.0-or-later
// src/media/handle.rs
//
// Renderable handles over binary payloads, tracked by a shared ledger.

use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Identifier of a live handle within its ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandleId(u64);

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "handle:{}", self.0)
    }
}

/// Records which handles are currently live.
///
/// Handles register on creation and unregister exactly once when dropped.
#[derive(Debug, Default)]
pub struct HandleLedger {
    next: AtomicU64,
    live: Mutex<HashSet<HandleId>>,
}

impl HandleLedger {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Create a handle over `bytes`.
    pub fn create(self: &Arc<Self>, bytes: Arc<[u8]>) -> RenderHandle {
        let id = HandleId(self.next.fetch_add(1, Ordering::Relaxed) + 1);
        self.live
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id);
        RenderHandle {
            id,
            bytes,
            ledger: Arc::clone(self),
        }
    }

    pub fn live_count(&self) -> usize {
        self.live
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_live(&self, id: HandleId) -> bool {
        self.live
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&id)
    }

    fn release(&self, id: HandleId) {
        let removed = self
            .live
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);
        if !removed {
            log::warn!("Released {id} which was not live");
        }
    }
}

/// Exclusively owned handle to a binary payload.
///
/// Not `Clone`: each handle is released exactly once, on drop.
pub struct RenderHandle {
    id: HandleId,
    bytes: Arc<[u8]>,
    ledger: Arc<HandleLedger>,
}

impl RenderHandle {
    pub fn id(&self) -> HandleId {
        self.id
    }

    pub fn bytes(&self) -> &Arc<[u8]> {
        &self.bytes
    }

    /// Create a new, independently released handle over the same payload.
    pub fn derive(&self) -> RenderHandle {
        self.ledger.create(Arc::clone(&self.bytes))
    }
}

impl fmt::Debug for RenderHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderHandle")
            .field("id", &self.id)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl Drop for RenderHandle {
    fn drop(&mut self) {
        self.ledger.release(self.id);
    }
}
