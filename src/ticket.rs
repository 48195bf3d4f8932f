//! Per-scope fencing token ledger.
//!
//! Issues strictly increasing tickets per scope key. The ledger is pure
//! in-memory bookkeeping; the increment-and-read is a single step under the
//! mutex, which is the preemptive-environment equivalent of the cooperative
//! scheduler's uninterruptible counter bump.

use crate::types::{ScopeKey, Ticket};
use parking_lot::Mutex;
use std::collections::HashMap;

/// Ticket ledger shared by the fetch and mutation arbiters.
///
/// Counters are never removed: the ticket value for any scope key is
/// non-decreasing over the lifetime of the ledger, even across context
/// invalidation.
pub struct TicketLedger {
    counters: Mutex<HashMap<ScopeKey, u64>>,
}

impl TicketLedger {
    pub fn new() -> Self {
        Self {
            counters: Mutex::new(HashMap::new()),
        }
    }

    /// Atomically increment and return the counter for `scope`, creating it
    /// at zero if absent. The first issued ticket is therefore 1.
    pub fn next(&self, scope: &ScopeKey) -> Ticket {
        let mut counters = self.counters.lock();
        let counter = counters.entry(scope.clone()).or_insert(0);
        *counter += 1;
        Ticket(*counter)
    }

    /// Read-only peek at the latest issued ticket for `scope`, if any.
    pub fn current(&self, scope: &ScopeKey) -> Option<Ticket> {
        self.counters.lock().get(scope).copied().map(Ticket)
    }

    /// Whether `ticket` is still the highest issued for `scope`.
    pub fn is_current(&self, scope: &ScopeKey, ticket: Ticket) -> bool {
        self.current(scope) == Some(ticket)
    }
}

impl Default for TicketLedger {
    fn default() -> Self {
        Self::new()
    }
}
