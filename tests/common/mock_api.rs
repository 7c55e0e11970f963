//! Mock API mounts for integration tests
//!
//! Stand-ins for the workout API routes the client talks to.

use serde_json::{json, Value};
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// `GET /templates` and `GET /sessions` answer with the given listings
pub async fn mount_listings(server: &MockServer, templates: Value, sessions: Value) {
    Mock::given(method("GET"))
        .and(path("/api/templates"))
        .respond_with(ResponseTemplate::new(200).set_body_json(templates))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/sessions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sessions))
        .mount(server)
        .await;
}

/// Every POST, PUT and DELETE under the API prefix succeeds
pub async fn mount_accept_mutations(server: &MockServer) {
    for verb in ["POST", "PUT", "DELETE"] {
        Mock::given(method(verb))
            .and(path_regex(r"^/api/(templates|sessions)(/\d+)?$"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"success": true})))
            .mount(server)
            .await;
    }
}
