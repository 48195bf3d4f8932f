//! End-to-end arbitration scenarios through the coordinator facade.
//!
//! Completion order is driven explicitly via scripted transports, so each
//! test pins the request futures and delivers responses out of order on a
//! current-thread runtime.

use super::test_utils::{ScriptedFetcher, ScriptedWriter};
use futures::{pin_mut, poll};
use std::sync::Arc;
use vantage::coordinator::Coordinator;
use vantage::error::RemoteError;
use vantage::fetch::LoadOutcome;
use vantage::mutation::MutationOutcome;
use vantage::remote::{MutationWriter, ResourceFetcher};
use vantage::types::{ContextId, EntityId, ResourceKind};

fn setup() -> (
    Arc<Coordinator<u64, bool>>,
    Arc<ScriptedFetcher>,
    Arc<ScriptedWriter>,
) {
    let fetcher = Arc::new(ScriptedFetcher::new());
    let writer = Arc::new(ScriptedWriter::new());
    let coordinator = Arc::new(Coordinator::new(
        Arc::clone(&fetcher) as Arc<dyn ResourceFetcher<u64>>,
        Arc::clone(&writer) as Arc<dyn MutationWriter<bool>>,
    ));
    (coordinator, fetcher, writer)
}

#[tokio::test]
async fn test_loads_arriving_out_of_order_commit_only_the_latest() {
    let (coordinator, fetcher, _writer) = setup();
    coordinator.switch_context(Some(ContextId::from("srv-1")));
    let kind = ResourceKind::from("stats");

    let tx1 = fetcher.script();
    let tx2 = fetcher.script();
    let tx3 = fetcher.script();

    let f1 = coordinator.refresh(kind.clone());
    let f2 = coordinator.refresh(kind.clone());
    let f3 = coordinator.refresh(kind.clone());
    pin_mut!(f1);
    pin_mut!(f2);
    pin_mut!(f3);

    // Tickets 1, 2, 3 issued in order; all three in flight.
    assert!(poll!(&mut f1).is_pending());
    assert!(poll!(&mut f2).is_pending());
    assert!(poll!(&mut f3).is_pending());
    assert!(coordinator.state(&kind).loading);

    // Arrival order 2, 1, 3.
    tx2.send(Ok(200)).unwrap();
    assert_eq!(f2.await, Some(LoadOutcome::Superseded));
    tx1.send(Ok(100)).unwrap();
    assert_eq!(f1.await, Some(LoadOutcome::Superseded));
    tx3.send(Ok(300)).unwrap();
    assert_eq!(f3.await, Some(LoadOutcome::Committed));

    let state = coordinator.state(&kind);
    assert_eq!(state.value, Some(300));
    assert!(!state.loading);
    assert!(state.error.is_none());
    assert_eq!(fetcher.calls(), 3);
}

#[tokio::test]
async fn test_context_round_trip_does_not_repopulate_stale_data() {
    let (coordinator, fetcher, _writer) = setup();
    coordinator.switch_context(Some(ContextId::from("a")));
    let kind = ResourceKind::from("players");

    let tx = fetcher.script();
    let f = coordinator.refresh(kind.clone());
    pin_mut!(f);
    assert!(poll!(&mut f).is_pending());

    // Switch to B and back to A before A's read resolves.
    coordinator.switch_context(Some(ContextId::from("b")));
    coordinator.switch_context(Some(ContextId::from("a")));

    tx.send(Ok(7)).unwrap();
    assert_eq!(f.await, Some(LoadOutcome::Superseded));
    // State was cleared on switch-away and the stale read must not restore it.
    assert_eq!(coordinator.state(&kind).value, None);

    // Only an explicit re-request repopulates.
    let tx = fetcher.script();
    let f = coordinator.refresh(kind.clone());
    pin_mut!(f);
    assert!(poll!(&mut f).is_pending());
    tx.send(Ok(8)).unwrap();
    assert_eq!(f.await, Some(LoadOutcome::Committed));
    assert_eq!(coordinator.state(&kind).value, Some(8));
}

#[tokio::test]
async fn test_stale_error_after_switch_is_not_surfaced() {
    let (coordinator, fetcher, _writer) = setup();
    coordinator.switch_context(Some(ContextId::from("a")));
    let kind = ResourceKind::from("modules");

    let tx = fetcher.script();
    let f = coordinator.refresh(kind.clone());
    pin_mut!(f);
    assert!(poll!(&mut f).is_pending());

    coordinator.switch_context(Some(ContextId::from("b")));
    tx.send(Err(RemoteError::Timeout(30_000))).unwrap();
    assert_eq!(f.await, Some(LoadOutcome::Superseded));
    assert!(coordinator.state(&kind).error.is_none());
}

#[tokio::test]
async fn test_rapid_double_toggle_issues_one_write() {
    let (coordinator, _fetcher, writer) = setup();
    coordinator.switch_context(Some(ContextId::from("srv-1")));
    let entity = EntityId::from("mod-combat");

    let tx = writer.script();
    let first = coordinator.toggle(entity.clone(), false, true);
    pin_mut!(first);
    assert!(poll!(&mut first).is_pending());
    assert_eq!(coordinator.field(&entity), Some(true));

    // Double-click: collapsed before any network call.
    let second = coordinator.toggle(entity.clone(), false, true).await;
    assert_eq!(second, MutationOutcome::Rejected);
    assert_eq!(writer.calls(), 1);

    tx.send(Ok(())).unwrap();
    assert_eq!(first.await, MutationOutcome::Committed);
    assert_eq!(coordinator.field(&entity), Some(true));
}

#[tokio::test]
async fn test_superseding_toggle_wins_over_late_first_response() {
    let (coordinator, _fetcher, writer) = setup();
    coordinator.switch_context(Some(ContextId::from("a")));
    let entity = EntityId::from("mod-combat");

    // First toggle goes in flight.
    let tx_old = writer.script();
    let old = coordinator.toggle(entity.clone(), false, true);
    pin_mut!(old);
    assert!(poll!(&mut old).is_pending());

    // Context round trip clears the pending entry, so a fresh toggle for the
    // same entity is admitted and supersedes the first.
    coordinator.switch_context(Some(ContextId::from("b")));
    coordinator.switch_context(Some(ContextId::from("a")));

    let tx_new = writer.script();
    let new = coordinator.toggle(entity.clone(), false, true);
    pin_mut!(new);
    assert!(poll!(&mut new).is_pending());

    // Further attempts while the new one is pending are deduped.
    assert_eq!(
        coordinator.toggle(entity.clone(), false, true).await,
        MutationOutcome::Rejected
    );
    assert_eq!(
        coordinator.toggle(entity.clone(), false, true).await,
        MutationOutcome::Rejected
    );

    // The newer write confirms first; the old one lands afterwards.
    tx_new.send(Ok(())).unwrap();
    assert_eq!(new.await, MutationOutcome::Committed);
    tx_old.send(Ok(())).unwrap();
    assert_eq!(old.await, MutationOutcome::Superseded);

    assert_eq!(coordinator.field(&entity), Some(true));
    assert_eq!(writer.calls(), 2);
}

#[tokio::test]
async fn test_failed_toggle_rolls_back_then_self_heals() {
    let (coordinator, _fetcher, writer) = setup();
    coordinator.switch_context(Some(ContextId::from("srv-1")));
    let entity = EntityId::from("mod-movement");
    coordinator.seed_field(entity.clone(), false);

    let tx = writer.script();
    let toggle = coordinator.toggle(entity.clone(), false, true);
    pin_mut!(toggle);
    assert!(poll!(&mut toggle).is_pending());
    assert_eq!(coordinator.field(&entity), Some(true));

    tx.send(Err(RemoteError::Request("write refused".to_string())))
        .unwrap();
    assert_eq!(toggle.await, MutationOutcome::RolledBack);
    assert_eq!(coordinator.field(&entity), Some(false));

    // Failure is local to the scope: the next attempt goes through.
    let tx = writer.script();
    let retry = coordinator.toggle(entity.clone(), false, true);
    pin_mut!(retry);
    assert!(poll!(&mut retry).is_pending());
    tx.send(Ok(())).unwrap();
    assert_eq!(retry.await, MutationOutcome::Committed);
    assert_eq!(coordinator.field(&entity), Some(true));
}
