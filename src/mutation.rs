//! Mutation arbitration: optimistic apply, remote confirm, conditional rollback.
//!
//! A mutation applies its optimistic value to visible state synchronously,
//! before the first suspension point, then awaits remote confirmation. On
//! failure it rolls back only while it still owns the field: its ticket must
//! still be the highest for the scope and the visible value must still equal
//! the optimistic one. A superseded attempt never touches state again, no
//! matter how late or with what outcome it settles.

use crate::pending::PendingGuard;
use crate::ticket::TicketLedger;
use crate::types::{ContextId, ScopeKey};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, warn};

/// Terminal state of a mutation attempt.
///
/// `Superseded` is entered the instant a newer ticket is issued for the same
/// scope while this one is outstanding; it is terminal regardless of the
/// eventual network outcome. `Rejected` means the pending guard collapsed a
/// duplicate trigger before any ticket or network call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    Committed,
    RolledBack,
    Superseded,
    Rejected,
}

/// Arbiter owning the optimistic field state for every write scope.
pub struct MutationArbiter<V> {
    fields: RwLock<HashMap<ScopeKey, V>>,
    tickets: Arc<TicketLedger>,
    pending: Arc<PendingGuard>,
}

impl<V: Clone + PartialEq> MutationArbiter<V> {
    pub fn new(tickets: Arc<TicketLedger>, pending: Arc<PendingGuard>) -> Self {
        Self {
            fields: RwLock::new(HashMap::new()),
            tickets,
            pending,
        }
    }

    /// Visible value of the mutable field for `scope`, if any mutation has
    /// touched it (or it was seeded from a fetch payload).
    pub fn field(&self, scope: &ScopeKey) -> Option<V> {
        self.fields.read().get(scope).cloned()
    }

    /// Seed the confirmed value for `scope`, e.g. from a committed fetch.
    /// Skipped while a mutation for the scope is in flight so a slow refresh
    /// cannot clobber an optimistic value.
    pub fn seed(&self, scope: ScopeKey, value: V) -> bool {
        if self.pending.contains(&scope) {
            return false;
        }
        self.fields.write().insert(scope, value);
        true
    }

    /// Run a write operation under ticket arbitration with optimistic apply.
    pub async fn mutate<F, Fut>(
        &self,
        scope: ScopeKey,
        previous: V,
        optimistic: V,
        apply: F,
    ) -> MutationOutcome
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(), crate::error::RemoteError>>,
    {
        if !self.pending.try_acquire(&scope) {
            debug!(scope = %scope, "Rejected duplicate in-flight mutation");
            return MutationOutcome::Rejected;
        }
        let ticket = self.tickets.next(&scope);
        self.fields.write().insert(scope.clone(), optimistic.clone());
        debug!(scope = %scope, ticket = %ticket, "Applied optimistic value");

        let result = apply().await;

        let outcome = match result {
            Ok(()) => {
                if self.tickets.is_current(&scope, ticket) {
                    // Optimistic value is already the displayed value.
                    debug!(scope = %scope, ticket = %ticket, "Mutation confirmed");
                    MutationOutcome::Committed
                } else {
                    debug!(scope = %scope, ticket = %ticket, "Discarded superseded mutation success");
                    MutationOutcome::Superseded
                }
            }
            Err(err) => {
                if self.tickets.is_current(&scope, ticket) {
                    let mut fields = self.fields.write();
                    match fields.get(&scope) {
                        Some(current) if *current == optimistic => {
                            fields.insert(scope.clone(), previous.clone());
                            warn!(scope = %scope, ticket = %ticket, error = %err, "Rolled back failed mutation");
                            MutationOutcome::RolledBack
                        }
                        // A newer owner (or a context invalidation) holds the
                        // field now; the failure is ours to swallow.
                        _ => {
                            debug!(scope = %scope, ticket = %ticket, "Discarded failure; field no longer ours");
                            MutationOutcome::Superseded
                        }
                    }
                } else {
                    debug!(scope = %scope, ticket = %ticket, error = %err, "Discarded superseded mutation failure");
                    MutationOutcome::Superseded
                }
            }
        };

        // An older attempt finishing late must not release a pending entry
        // held by a newer one.
        if self.tickets.is_current(&scope, ticket) {
            self.pending.release(&scope);
        }
        outcome
    }

    /// Drop field state for every scope belonging to `context`, along with
    /// its pending entries (strict clear-on-context-switch policy).
    pub fn invalidate_context(&self, context: &ContextId) -> usize {
        self.pending.clear_context(context);
        let mut fields = self.fields.write();
        let before = fields.len();
        fields.retain(|key, _| key.context() != context);
        before - fields.len()
    }
}
