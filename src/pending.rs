//! Pending mutation guard.
//!
//! Membership set of scope keys with an in-flight mutation. Consulted by the
//! mutation arbiter before any network call so that duplicate rapid-fire
//! triggers (e.g. a double-click) collapse into a single write instead of
//! queuing or racing.

use crate::types::{ContextId, ScopeKey};
use parking_lot::Mutex;
use std::collections::HashSet;
use tracing::debug;

pub struct PendingGuard {
    inflight: Mutex<HashSet<ScopeKey>>,
}

impl PendingGuard {
    pub fn new() -> Self {
        Self {
            inflight: Mutex::new(HashSet::new()),
        }
    }

    /// Claim `scope` for a new mutation. Returns false when a mutation for
    /// this exact scope is already outstanding.
    pub fn try_acquire(&self, scope: &ScopeKey) -> bool {
        self.inflight.lock().insert(scope.clone())
    }

    /// Release `scope`. Returns false when no entry was held.
    pub fn release(&self, scope: &ScopeKey) -> bool {
        self.inflight.lock().remove(scope)
    }

    pub fn contains(&self, scope: &ScopeKey) -> bool {
        self.inflight.lock().contains(scope)
    }

    /// Drop every entry belonging to `context`. Called on context switch:
    /// stale in-flight mutations for the outgoing context must not block new
    /// attempts once the user returns.
    pub fn clear_context(&self, context: &ContextId) -> usize {
        let mut inflight = self.inflight.lock();
        let before = inflight.len();
        inflight.retain(|key| key.context() != context);
        let cleared = before - inflight.len();
        if cleared > 0 {
            debug!(context = %context, cleared, "Cleared pending mutations for outgoing context");
        }
        cleared
    }
}

impl Default for PendingGuard {
    fn default() -> Self {
        Self::new()
    }
}
