//! Background sync service integration tests
//!
//! Connectivity transitions drive drains through the running service.

use crate::common::*;
use crate::{assert_ok, assert_queued};
use liftlog::client::sync::{NetworkStatus, SyncEvent};
use liftlog::client::ApiMethod;
use serde_json::json;
use std::time::Duration;
use tokio::sync::broadcast::Receiver;

async fn next_reload(events: &mut Receiver<SyncEvent>) -> SyncEvent {
    tokio::time::timeout(Duration::from_secs(5), events.recv())
        .await
        .expect("drain within timeout")
        .expect("event channel open")
}

#[tokio::test]
async fn test_coming_online_drains_once() {
    let mut harness = TestClient::start(false).await;
    mount_accept_mutations(&harness.server).await;
    mount_listings(&harness.server, json!([]), json!([])).await;

    assert_queued!(
        harness
            .client
            .gateway
            .execute(ApiMethod::Delete, "/templates/3", None)
            .await
    );

    let mut events = harness.client.sync.engine().subscribe();
    assert_ok!(harness.client.sync.start());

    harness.go_online();
    let SyncEvent::Reloaded(report) = next_reload(&mut events).await;
    assert_eq!(report.replayed, 1);

    // The report is recorded before the event goes out
    let status = harness.client.sync.status().await;
    assert_eq!(status.network_status, NetworkStatus::Online);
    assert_eq!(status.pending_operations, 0);
    assert_eq!(status.last_report, Some(report));
    assert!(status.last_sync.is_some());

    // A repeated online signal is not a transition
    harness.go_online();
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(events.try_recv().is_err());
    assert_eq!(harness.mutations().await.len(), 1);

    harness.client.sync.stop();
}

#[tokio::test]
async fn test_going_offline_only_updates_state() {
    let mut harness = TestClient::start(true).await;
    let mut events = harness.client.sync.engine().subscribe();
    assert_ok!(harness.client.sync.start());

    harness.go_offline();
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert!(events.try_recv().is_err());
    assert_eq!(
        harness.client.sync.status().await.network_status,
        NetworkStatus::Offline
    );
    assert!(harness.server.received_requests().await.unwrap().is_empty());
}
