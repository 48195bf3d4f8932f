//! External collaborator seams.
//!
//! The core never talks to the network itself; it arbitrates operations
//! supplied through these traits. Implementations live in the surrounding
//! application (HTTP client, mock transport, test double).

use crate::error::RemoteError;
use crate::types::{ContextId, EntityId, ResourceKind};
use async_trait::async_trait;

/// Remote read operation: fetch the payload for a resource kind within a
/// context. The payload is opaque to the core.
#[async_trait]
pub trait ResourceFetcher<T>: Send + Sync {
    async fn fetch(&self, context: &ContextId, kind: &ResourceKind) -> Result<T, RemoteError>;
}

/// Remote write operation: apply a new field value to an entity within a
/// context. Success/failure only; no returned state is required.
#[async_trait]
pub trait MutationWriter<V: Send + 'static>: Send + Sync {
    async fn apply(
        &self,
        context: &ContextId,
        entity: &EntityId,
        value: V,
    ) -> Result<(), RemoteError>;
}
