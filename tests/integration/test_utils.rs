//! Shared test doubles for integration tests
//!
//! Scripted remote operations whose completions are driven explicitly through
//! oneshot channels, so tests control arrival order deterministically.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::oneshot;
use vantage::error::RemoteError;
use vantage::remote::{MutationWriter, ResourceFetcher};
use vantage::types::{ContextId, EntityId, ResourceKind};

/// Fetcher that answers each call with the next scripted receiver.
pub struct ScriptedFetcher {
    responses: Mutex<VecDeque<oneshot::Receiver<Result<u64, RemoteError>>>>,
    calls: AtomicUsize,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Queue one pending response; the returned sender resolves it.
    pub fn script(&self) -> oneshot::Sender<Result<u64, RemoteError>> {
        let (tx, rx) = oneshot::channel();
        self.responses.lock().push_back(rx);
        tx
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ResourceFetcher<u64> for ScriptedFetcher {
    async fn fetch(&self, _ctx: &ContextId, _kind: &ResourceKind) -> Result<u64, RemoteError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let rx = self
            .responses
            .lock()
            .pop_front()
            .expect("unscripted fetch call");
        rx.await.expect("scripted response dropped")
    }
}

/// Writer that answers each call with the next scripted receiver.
pub struct ScriptedWriter {
    responses: Mutex<VecDeque<oneshot::Receiver<Result<(), RemoteError>>>>,
    calls: AtomicUsize,
}

impl ScriptedWriter {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn script(&self) -> oneshot::Sender<Result<(), RemoteError>> {
        let (tx, rx) = oneshot::channel();
        self.responses.lock().push_back(rx);
        tx
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MutationWriter<bool> for ScriptedWriter {
    async fn apply(
        &self,
        _ctx: &ContextId,
        _entity: &EntityId,
        _value: bool,
    ) -> Result<(), RemoteError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let rx = self
            .responses
            .lock()
            .pop_front()
            .expect("unscripted apply call");
        rx.await.expect("scripted response dropped")
    }
}
