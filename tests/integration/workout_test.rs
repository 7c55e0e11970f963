//! Workout service integration tests

use crate::assert_ok;
use crate::common::*;
use liftlog::client::DataSource;
use liftlog::shared::{LatestSet, SessionExerciseInput};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

async fn mount_push_day(harness: &TestClient) {
    Mock::given(method("GET"))
        .and(path("/api/templates"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{"id": 1, "name": "Push Day"}])),
        )
        .mount(&harness.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/templates/1/exercises"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 10, "name": "Bench", "order_idx": 0},
            {"id": 11, "name": "OHP", "order_idx": 1},
            {"id": 12, "name": "Dips", "order_idx": 2}
        ])))
        .mount(&harness.server)
        .await;
}

#[tokio::test]
async fn test_start_workout_survives_missing_last_values() {
    let harness = TestClient::start(true).await;
    mount_push_day(&harness).await;
    Mock::given(method("GET"))
        .and(path("/api/sessions/latest/10"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"weight_kg": 80.0, "reps": 5, "sets": 5})),
        )
        .mount(&harness.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/sessions/latest/11"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&harness.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/sessions/latest/12"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "no data"})))
        .mount(&harness.server)
        .await;

    let workout = assert_ok!(harness.client.workouts.start_workout(1).await);
    assert_eq!(workout.template_name, "Push Day");
    assert_eq!(workout.exercises.len(), 3);
    assert_eq!(
        workout.exercises[0].last,
        LatestSet {
            weight_kg: Some(80.0),
            reps: Some(5),
            sets: Some(5),
        }
    );
    assert_eq!(workout.exercises[1].last, LatestSet::default());
    assert_eq!(workout.exercises[2].last, LatestSet::default());
}

#[tokio::test]
async fn test_session_saved_offline_uses_workout_start() {
    let harness = TestClient::start(true).await;
    mount_push_day(&harness).await;

    let workout = assert_ok!(harness.client.workouts.start_workout(1).await);
    harness.go_offline();

    let outcome = assert_ok!(
        harness
            .client
            .workouts
            .save_session(
                &workout,
                vec![SessionExerciseInput {
                    template_exercise_id: 10,
                    weight_kg: 82.5,
                    reps: 5,
                    sets: 5,
                }],
            )
            .await
    );
    assert!(outcome.is_queued());

    let queued = assert_ok!(harness.client.db.list_pending_operations().await);
    let payload: serde_json::Value =
        serde_json::from_str(queued[0].payload.as_deref().unwrap()).unwrap();
    assert_eq!(payload["session_date"], json!(workout.started_at.to_rfc3339()));
    assert_eq!(payload["template_id"], json!(1));

    // The offline session shows up in history straight from the mirror
    let history = assert_ok!(harness.client.workouts.load_history(None).await);
    assert_eq!(history.source, DataSource::Mirror);
    assert_eq!(history.data.len(), 1);
    assert_eq!(history.data[0].id, None);
    assert_eq!(history.data[0].exercises[0].weight_kg, 82.5);
}
