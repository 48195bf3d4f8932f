//! Fetch arbitration: last-ticket-wins commits for scoped reads.
//!
//! Wraps a read operation so that only the most recently issued ticket for a
//! scope key may commit its result into visible state. Requests issued before
//! the latest one never overwrite newer state, regardless of arrival order or
//! latency. Context switches are handled twice over: the scope key embeds the
//! context id, and commits additionally require the context epoch captured at
//! issue time to still be live, so a switch away and back to the same context
//! also fences out pre-switch responses.

use crate::context::ContextRegistry;
use crate::error::RemoteError;
use crate::ticket::TicketLedger;
use crate::types::{ContextId, ScopeKey};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, warn};

/// Committed view of a read resource, as exposed to the UI layer.
#[derive(Debug, Clone)]
pub struct ResourceState<T> {
    pub value: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> Default for ResourceState<T> {
    fn default() -> Self {
        Self {
            value: None,
            loading: false,
            error: None,
        }
    }
}

/// How a `load` call settled. Superseded loads have no state effect at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Committed,
    Failed,
    Superseded,
}

/// Arbiter owning the committed resource state for every read scope.
///
/// Resource state is mutated exclusively here; the UI layer only reads
/// snapshots via [`FetchArbiter::state`].
pub struct FetchArbiter<T> {
    states: RwLock<HashMap<ScopeKey, ResourceState<T>>>,
    tickets: Arc<TicketLedger>,
    registry: Arc<ContextRegistry>,
}

impl<T: Clone> FetchArbiter<T> {
    pub fn new(tickets: Arc<TicketLedger>, registry: Arc<ContextRegistry>) -> Self {
        Self {
            states: RwLock::new(HashMap::new()),
            tickets,
            registry,
        }
    }

    /// Snapshot of the committed state for `scope`. Unknown scopes read as
    /// empty, not-loading, no error.
    pub fn state(&self, scope: &ScopeKey) -> ResourceState<T> {
        self.states.read().get(scope).cloned().unwrap_or_default()
    }

    /// Run a read operation under ticket arbitration.
    ///
    /// The ticket is issued and the scope marked loading before the first
    /// suspension point. On completion the result commits only if the ticket
    /// is still the highest issued for the scope and the captured context
    /// epoch is still live; otherwise it is discarded silently.
    pub async fn load<F, Fut>(&self, scope: ScopeKey, op: F) -> LoadOutcome
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, RemoteError>>,
    {
        let epoch = self.registry.epoch();
        let ticket = self.tickets.next(&scope);
        {
            let mut states = self.states.write();
            let entry = states.entry(scope.clone()).or_default();
            entry.loading = true;
            entry.error = None;
        }
        debug!(scope = %scope, ticket = %ticket, "Issued fetch ticket");

        let result = op().await;

        let mut states = self.states.write();
        if !self.tickets.is_current(&scope, ticket) || !self.registry.is_live(epoch) {
            debug!(scope = %scope, ticket = %ticket, "Discarded superseded fetch completion");
            return LoadOutcome::Superseded;
        }
        let entry = states.entry(scope.clone()).or_default();
        entry.loading = false;
        match result {
            Ok(value) => {
                entry.value = Some(value);
                entry.error = None;
                debug!(scope = %scope, ticket = %ticket, "Committed fetch result");
                LoadOutcome::Committed
            }
            Err(err) => {
                entry.error = Some(err.to_string());
                warn!(scope = %scope, ticket = %ticket, error = %err, "Fetch failed on current ticket");
                LoadOutcome::Failed
            }
        }
    }

    /// Drop committed state for every scope belonging to `context`. Called on
    /// context switch; state is treated as cleared on switch-away.
    pub fn invalidate_context(&self, context: &ContextId) -> usize {
        let mut states = self.states.write();
        let before = states.len();
        states.retain(|key, _| key.context() != context);
        before - states.len()
    }
}
