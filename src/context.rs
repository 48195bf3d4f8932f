//! Active context registry.
//!
//! Holds the single active context id plus a monotonically increasing epoch.
//! Switching never cancels outstanding operations; commits are suppressed by
//! the epoch guard in the fetch arbiter and by scope-keyed tickets. The epoch
//! (rather than the id alone) is what commit guards compare, because switching
//! away and back to the same context must still discard pre-switch responses.

use crate::types::ContextId;
use parking_lot::Mutex;
use tracing::info;

/// Opaque generation of the active context. Bumped on every effective switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextEpoch(u64);

struct RegistryState {
    active: Option<ContextId>,
    epoch: u64,
}

/// Registry of the currently selected context. One per coordinator; created
/// at session start and dropped at logout.
pub struct ContextRegistry {
    inner: Mutex<RegistryState>,
}

impl ContextRegistry {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(RegistryState {
                active: None,
                epoch: 0,
            }),
        }
    }

    /// Replace the active context. Re-selecting the already-active context is
    /// a no-op (no epoch bump). Returns the outgoing context when the active
    /// context actually changed and one was previously set.
    pub fn switch(&self, next: Option<ContextId>) -> Option<ContextId> {
        let mut state = self.inner.lock();
        if state.active == next {
            return None;
        }
        state.epoch += 1;
        let outgoing = std::mem::replace(&mut state.active, next);
        info!(
            outgoing = outgoing.as_ref().map(ContextId::as_str),
            incoming = state.active.as_ref().map(ContextId::as_str),
            epoch = state.epoch,
            "Switched active context"
        );
        outgoing
    }

    /// Clear the active context (the underlying entity disappeared).
    pub fn clear(&self) -> Option<ContextId> {
        self.switch(None)
    }

    pub fn active(&self) -> Option<ContextId> {
        self.inner.lock().active.clone()
    }

    /// Epoch to capture at request-issue time.
    pub fn epoch(&self) -> ContextEpoch {
        ContextEpoch(self.inner.lock().epoch)
    }

    /// Whether a captured epoch is still the live one.
    pub fn is_live(&self, epoch: ContextEpoch) -> bool {
        self.inner.lock().epoch == epoch.0
    }
}

impl Default for ContextRegistry {
    fn default() -> Self {
        Self::new()
    }
}
