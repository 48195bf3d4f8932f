//! Background refresh loops for polled resource kinds.
//!
//! The dashboard keeps slow-moving data fresh on a 30s cadence and the
//! connection status on a 5s cadence. Each tick is an ordinary ticketed
//! `refresh`, so a context switch mid-tick is harmless: the stale completion
//! simply fails the ticket/epoch check and is discarded.

use crate::config::PollConfig;
use crate::coordinator::Coordinator;
use crate::types::ResourceKind;
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::sleep;
use tracing::{debug, info};

/// One polled resource kind and its cadence.
#[derive(Debug, Clone)]
pub struct PollEntry {
    pub kind: ResourceKind,
    pub interval: Duration,
}

impl PollEntry {
    pub fn new(kind: ResourceKind, interval: Duration) -> Self {
        Self { kind, interval }
    }

    /// Build a schedule from configured cadences: `data_kinds` on the data
    /// interval, `status_kinds` on the (faster) status interval.
    pub fn schedule(
        config: &PollConfig,
        data_kinds: Vec<ResourceKind>,
        status_kinds: Vec<ResourceKind>,
    ) -> Vec<PollEntry> {
        let data = Duration::from_secs(config.data_interval_secs);
        let status = Duration::from_secs(config.status_interval_secs);
        data_kinds
            .into_iter()
            .map(|kind| PollEntry::new(kind, data))
            .chain(
                status_kinds
                    .into_iter()
                    .map(|kind| PollEntry::new(kind, status)),
            )
            .collect()
    }
}

/// Background poller driving periodic refreshes through a coordinator.
pub struct Poller<T, V: Send + 'static> {
    coordinator: Arc<Coordinator<T, V>>,
    entries: Vec<PollEntry>,
    running: Arc<RwLock<bool>>,
    shutdown: Arc<Notify>,
    workers: RwLock<Vec<tokio::task::JoinHandle<()>>>,
}

impl<T, V> Poller<T, V>
where
    T: Clone + Send + Sync + 'static,
    V: Clone + PartialEq + Send + Sync + 'static,
{
    pub fn new(coordinator: Arc<Coordinator<T, V>>, entries: Vec<PollEntry>) -> Self {
        Self {
            coordinator,
            entries,
            running: Arc::new(RwLock::new(false)),
            shutdown: Arc::new(Notify::new()),
            workers: RwLock::new(Vec::new()),
        }
    }

    /// Start one loop per entry. Idempotent.
    pub fn start(&self) {
        let mut running = self.running.write();
        if *running {
            return;
        }
        *running = true;
        drop(running);

        let mut workers = self.workers.write();
        for entry in &self.entries {
            let coordinator = Arc::clone(&self.coordinator);
            let running = Arc::clone(&self.running);
            let shutdown = Arc::clone(&self.shutdown);
            let entry = entry.clone();

            let handle = tokio::spawn(async move {
                debug!(kind = %entry.kind, interval_ms = entry.interval.as_millis() as u64, "Poll loop started");
                loop {
                    if !*running.read() {
                        break;
                    }
                    // Arm the shutdown wakeup before the refresh so a stop
                    // issued mid-tick is not missed.
                    let stop = shutdown.notified();
                    tokio::pin!(stop);
                    stop.as_mut().enable();

                    coordinator.refresh(entry.kind.clone()).await;

                    tokio::select! {
                        _ = &mut stop => {}
                        _ = sleep(entry.interval) => {}
                    }
                }
                debug!(kind = %entry.kind, "Poll loop stopped");
            });
            workers.push(handle);
        }
        info!(loops = workers.len(), "Started poller");
    }

    /// Stop all loops and wait for them to finish.
    pub async fn stop(&self) {
        {
            let mut running = self.running.write();
            if !*running {
                return;
            }
            *running = false;
        }
        self.shutdown.notify_waiters();

        let workers = std::mem::take(&mut *self.workers.write());
        for handle in workers {
            let _ = handle.await;
        }
        info!("Stopped poller");
    }
}
