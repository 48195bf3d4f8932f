//! Coordinator facade exposed to the UI layer.
//!
//! Owns one ticket ledger, one context registry, one pending guard and both
//! arbiters, wired to the registered remote operations. The UI layer only
//! reads committed snapshots and calls `refresh`/`toggle`/`switch_context`;
//! it never mutates arbiter state directly. One coordinator per session:
//! created at login/app start, dropped at logout.

use crate::context::ContextRegistry;
use crate::fetch::{FetchArbiter, LoadOutcome, ResourceState};
use crate::mutation::{MutationArbiter, MutationOutcome};
use crate::pending::PendingGuard;
use crate::remote::{MutationWriter, ResourceFetcher};
use crate::ticket::TicketLedger;
use crate::types::{ContextId, EntityId, ResourceKind, ScopeKey};
use std::sync::Arc;
use tracing::debug;

pub struct Coordinator<T, V: Send + 'static> {
    registry: Arc<ContextRegistry>,
    fetches: FetchArbiter<T>,
    mutations: MutationArbiter<V>,
    fetcher: Arc<dyn ResourceFetcher<T>>,
    writer: Arc<dyn MutationWriter<V>>,
}

impl<T, V> Coordinator<T, V>
where
    T: Clone + Send + Sync + 'static,
    V: Clone + PartialEq + Send + Sync + 'static,
{
    pub fn new(
        fetcher: Arc<dyn ResourceFetcher<T>>,
        writer: Arc<dyn MutationWriter<V>>,
    ) -> Self {
        let tickets = Arc::new(TicketLedger::new());
        let registry = Arc::new(ContextRegistry::new());
        let pending = Arc::new(PendingGuard::new());
        Self {
            fetches: FetchArbiter::new(Arc::clone(&tickets), Arc::clone(&registry)),
            mutations: MutationArbiter::new(tickets, pending),
            registry,
            fetcher,
            writer,
        }
    }

    pub fn active_context(&self) -> Option<ContextId> {
        self.registry.active()
    }

    /// Committed view for `kind` under the active context. With no active
    /// context every resource reads as empty and not loading.
    pub fn state(&self, kind: &ResourceKind) -> ResourceState<T> {
        match self.registry.active() {
            Some(ctx) => self
                .fetches
                .state(&ScopeKey::resource(ctx, kind.clone())),
            None => ResourceState::default(),
        }
    }

    /// Visible value of an entity's mutable field under the active context.
    pub fn field(&self, entity: &EntityId) -> Option<V> {
        let ctx = self.registry.active()?;
        self.mutations.field(&ScopeKey::entity(ctx, entity.clone()))
    }

    /// Seed an entity's confirmed field value, e.g. after unpacking a fetched
    /// payload. Skipped while a mutation for the entity is in flight.
    pub fn seed_field(&self, entity: EntityId, value: V) -> bool {
        match self.registry.active() {
            Some(ctx) => self.mutations.seed(ScopeKey::entity(ctx, entity), value),
            None => false,
        }
    }

    /// Trigger a ticketed load of `kind` for the active context. Returns
    /// `None` when no context is active.
    pub async fn refresh(&self, kind: ResourceKind) -> Option<LoadOutcome> {
        let ctx = self.registry.active()?;
        let scope = ScopeKey::resource(ctx.clone(), kind.clone());
        let fetcher = Arc::clone(&self.fetcher);
        let outcome = self
            .fetches
            .load(scope, move || async move { fetcher.fetch(&ctx, &kind).await })
            .await;
        Some(outcome)
    }

    /// Trigger an optimistic mutation of `entity` from `previous` to `next`
    /// for the active context. Returns `Rejected` when no context is active
    /// or when a mutation for the entity is already in flight.
    pub async fn toggle(&self, entity: EntityId, previous: V, next: V) -> MutationOutcome {
        let Some(ctx) = self.registry.active() else {
            return MutationOutcome::Rejected;
        };
        let scope = ScopeKey::entity(ctx.clone(), entity.clone());
        let writer = Arc::clone(&self.writer);
        let value = next.clone();
        self.mutations
            .mutate(scope, previous, next, move || async move {
                writer.apply(&ctx, &entity, value).await
            })
            .await
    }

    /// Replace the active context. Outstanding network calls are not
    /// cancelled; committed state, field state and pending entries of the
    /// outgoing context are cleared immediately, and the epoch bump fences
    /// out any in-flight completions that captured the old context.
    pub fn switch_context(&self, next: Option<ContextId>) {
        if let Some(outgoing) = self.registry.switch(next) {
            let states = self.fetches.invalidate_context(&outgoing);
            let fields = self.mutations.invalidate_context(&outgoing);
            debug!(
                context = %outgoing,
                cleared_states = states,
                cleared_fields = fields,
                "Invalidated outgoing context"
            );
        }
    }

    /// Clear the active context entirely (the underlying entity disappeared).
    pub fn clear_context(&self) {
        self.switch_context(None);
    }
}
