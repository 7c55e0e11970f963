//! Offline queueing and drain integration tests
//!
//! Mutations issued offline, replayed on reconnect, and the mirror reload that
//! follows.

use crate::common::*;
use crate::{assert_drained, assert_ok, assert_queued};
use liftlog::client::local_db::MirrorKind;
use liftlog::client::{ApiMethod, DrainOutcome};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_push_day_created_offline_then_synced() {
    let harness = TestClient::start(false).await;
    let client = &harness.client;

    let body = json!({"name": "Push Day", "exercises": ["Bench", "OHP"]});
    let operation_id = assert_queued!(
        client
            .gateway
            .execute(ApiMethod::Post, "/templates", Some(body.clone()))
            .await
    );

    let queued = assert_ok!(client.db.list_pending_operations().await);
    assert_eq!(queued.len(), 1);
    assert_eq!(queued[0].id, operation_id);

    let mirrored = assert_ok!(
        client
            .gateway
            .mirror()
            .read_for_user(MirrorKind::Template, TEST_USER)
            .await
    );
    assert_eq!(mirrored.len(), 1);
    assert!(!mirrored[0].synced);
    assert_eq!(mirrored[0].body, body);

    Mock::given(method("POST"))
        .and(path("/api/templates"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 11})))
        .expect(1)
        .mount(&harness.server)
        .await;
    mount_listings(
        &harness.server,
        json!([{"id": 11, "name": "Push Day"}]),
        json!([]),
    )
    .await;

    harness.go_online();
    let report = assert_drained!(client.sync.engine().drain().await);
    assert_eq!((report.attempted, report.replayed, report.failed), (1, 1, 0));
    assert!(report.reloaded);

    assert_eq!(assert_ok!(client.db.count_pending_operations().await), 0);
    assert_eq!(
        harness.mutations().await,
        vec![RecordedMutation {
            method: "POST".to_string(),
            path: "/api/templates".to_string(),
            body: Some(body),
        }]
    );

    let mirrored = assert_ok!(
        client
            .gateway
            .mirror()
            .read_for_user(MirrorKind::Template, TEST_USER)
            .await
    );
    assert_eq!(mirrored.len(), 1);
    assert!(mirrored[0].synced);
    assert_eq!(mirrored[0].remote_id, Some(11));
    assert_eq!(mirrored[0].body["name"], "Push Day");
}

#[tokio::test]
async fn test_first_create_rejected_second_still_replayed() {
    let harness = TestClient::start(false).await;
    let client = &harness.client;

    let first = assert_queued!(
        client
            .gateway
            .execute(
                ApiMethod::Post,
                "/templates",
                Some(json!({"name": "A", "exercises": ["Squat"]}))
            )
            .await
    );
    let second = assert_queued!(
        client
            .gateway
            .execute(
                ApiMethod::Post,
                "/templates",
                Some(json!({"name": "B", "exercises": ["Row"]}))
            )
            .await
    );
    assert!(first < second);

    Mock::given(method("POST"))
        .and(path("/api/templates"))
        .and(body_partial_json(json!({"name": "A"})))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"error": "Template name already exists"})),
        )
        .mount(&harness.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/templates"))
        .and(body_partial_json(json!({"name": "B"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 2})))
        .mount(&harness.server)
        .await;
    mount_listings(&harness.server, json!([{"id": 2, "name": "B"}]), json!([])).await;

    harness.go_online();
    let report = assert_drained!(client.sync.engine().drain().await);
    assert_eq!((report.attempted, report.replayed, report.failed), (2, 1, 1));

    let names: Vec<_> = harness
        .mutations()
        .await
        .into_iter()
        .map(|m| m.body.unwrap()["name"].clone())
        .collect();
    assert_eq!(names, vec![json!("A"), json!("B")]);

    let remaining = assert_ok!(client.db.list_pending_operations().await);
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, first);

    // The rejected create keeps its optimistic mirror entry while it is queued
    let mirrored = assert_ok!(
        client
            .gateway
            .mirror()
            .read_for_user(MirrorKind::Template, TEST_USER)
            .await
    );
    assert_eq!(mirrored.len(), 2);
    assert_eq!(mirrored[1].pending_operation_id, Some(first));
}

#[tokio::test]
async fn test_failed_replay_is_retried_verbatim() {
    let harness = TestClient::start(false).await;
    let client = &harness.client;

    let payload = json!({
        "template_id": 3,
        "session_date": "2024-05-01T10:00:00+00:00",
        "exercises": [{"template_exercise_id": 7, "weight_kg": 62.5, "reps": 8, "sets": 3}]
    });
    assert_queued!(
        client
            .gateway
            .execute(ApiMethod::Post, "/sessions", Some(payload.clone()))
            .await
    );
    let before = assert_ok!(client.db.list_pending_operations().await);

    Mock::given(method("POST"))
        .and(path("/api/sessions"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&harness.server)
        .await;
    mount_listings(&harness.server, json!([]), json!([])).await;

    harness.go_online();
    let report = assert_drained!(client.sync.engine().drain().await);
    assert_eq!(report.failed, 1);
    assert_eq!(assert_ok!(client.db.list_pending_operations().await), before);

    mount_accept_mutations(&harness.server).await;
    let report = assert_drained!(client.sync.engine().drain().await);
    assert_eq!(report.replayed, 1);

    let mutations = harness.mutations().await;
    assert_eq!(mutations.len(), 2);
    assert_eq!(mutations[0], mutations[1]);
    assert_eq!(mutations[1].body, Some(payload));
    assert_eq!(assert_ok!(client.db.count_pending_operations().await), 0);
}

#[tokio::test]
async fn test_offline_replay_matches_online_sequence() {
    let steps = vec![
        (ApiMethod::Post, "/templates", Some(json!({"name": "Legs", "exercises": ["Squat"]}))),
        (
            ApiMethod::Put,
            "/templates/4",
            Some(json!({"name": "Legs+", "exercises": ["Squat", "Lunge"]})),
        ),
        (
            ApiMethod::Post,
            "/sessions",
            Some(json!({
                "template_id": 4,
                "session_date": "2024-05-01T10:00:00Z",
                "exercises": []
            })),
        ),
        (ApiMethod::Delete, "/sessions/9", None),
        (ApiMethod::Delete, "/templates/4", None),
    ];

    let online = TestClient::start(true).await;
    mount_accept_mutations(&online.server).await;
    for (verb, target, body) in &steps {
        assert_ok!(online.client.gateway.execute(*verb, target, body.clone()).await);
    }

    let offline = TestClient::start(false).await;
    mount_accept_mutations(&offline.server).await;
    mount_listings(&offline.server, json!([]), json!([])).await;
    for (verb, target, body) in &steps {
        assert_queued!(offline.client.gateway.execute(*verb, target, body.clone()).await);
    }
    offline.go_online();
    assert_drained!(offline.client.sync.engine().drain().await);

    assert_eq!(offline.mutations().await, online.mutations().await);
}

#[tokio::test]
async fn test_overlapping_drains_send_each_operation_once() {
    let harness = TestClient::start(false).await;
    let client = &harness.client;
    assert_queued!(
        client
            .gateway
            .execute(ApiMethod::Delete, "/sessions/5", None)
            .await
    );

    Mock::given(method("DELETE"))
        .and(path("/api/sessions/5"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(200)))
        .expect(1)
        .mount(&harness.server)
        .await;
    mount_listings(&harness.server, json!([]), json!([])).await;

    harness.go_online();
    let engine = client.sync.engine();
    let (first, second) = tokio::join!(engine.drain(), engine.drain());

    assert_eq!(assert_drained!(first).replayed, 1);
    assert_eq!(second, DrainOutcome::AlreadyRunning);
    assert_eq!(harness.mutations().await.len(), 1);
}
