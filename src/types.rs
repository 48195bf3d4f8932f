//! Shared identifier types for the arbitration core.
//!
//! All identifiers are opaque: the core never interprets them, it only uses
//! them as map keys for ticket and state isolation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of the currently selected top-level entity (e.g. a server
/// workspace) that scopes all displayed resources.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContextId(String);

impl ContextId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContextId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Identifier of a mutable entity within a context (e.g. a detection module).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Kind of a read resource within a context (e.g. "modules", "stats").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceKind(String);

impl ResourceKind {
    pub fn new(kind: impl Into<String>) -> Self {
        Self(kind.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceKind {
    fn from(kind: &str) -> Self {
        Self(kind.to_string())
    }
}

/// Composite key identifying the unit of ticket isolation: a context paired
/// with either a resource kind (reads) or an entity id (writes). The two
/// target forms occupy disjoint key spaces by construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScopeKey {
    context: ContextId,
    target: ScopeTarget,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum ScopeTarget {
    Resource(ResourceKind),
    Entity(EntityId),
}

impl ScopeKey {
    /// Key for a read resource: (context, resource kind).
    pub fn resource(context: ContextId, kind: ResourceKind) -> Self {
        Self {
            context,
            target: ScopeTarget::Resource(kind),
        }
    }

    /// Key for a mutable entity: (context, entity id).
    pub fn entity(context: ContextId, entity: EntityId) -> Self {
        Self {
            context,
            target: ScopeTarget::Entity(entity),
        }
    }

    pub fn context(&self) -> &ContextId {
        &self.context
    }

    /// Resource kind, when this key scopes a read.
    pub fn kind(&self) -> Option<&ResourceKind> {
        match &self.target {
            ScopeTarget::Resource(kind) => Some(kind),
            ScopeTarget::Entity(_) => None,
        }
    }

    /// Entity id, when this key scopes a write.
    pub fn entity_id(&self) -> Option<&EntityId> {
        match &self.target {
            ScopeTarget::Resource(_) => None,
            ScopeTarget::Entity(entity) => Some(entity),
        }
    }
}

impl fmt::Display for ScopeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.target {
            ScopeTarget::Resource(kind) => write!(f, "{}:{}", self.context, kind),
            ScopeTarget::Entity(entity) => write!(f, "{}:{}", self.context, entity),
        }
    }
}

/// Fencing token proving recency of a request within a scope. Monotonically
/// increasing per scope key; a completion may only commit if its ticket equals
/// the highest issued for that key at commit time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(pub(crate) u64);

impl Ticket {
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
