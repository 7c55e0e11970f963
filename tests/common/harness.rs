//! Fully wired client for integration tests
//!
//! Builds a [`LiftLogClient`] over an in-memory database, pointed at a wiremock
//! server and logged in as user `1`. Connectivity is driven by hand through the
//! monitor instead of the health probe.

use liftlog::client::{Config, ConnectivityMonitor, Credential, LiftLogClient, LocalDatabase};
use liftlog::shared::AppConfig;
use serde_json::Value;
use std::sync::Arc;
use wiremock::MockServer;

pub const TEST_USER: &str = "1";
pub const TEST_TOKEN: &str = "test-token";

/// A non-GET request the mock server received
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedMutation {
    pub method: String,
    pub path: String,
    pub body: Option<Value>,
}

pub struct TestClient {
    pub server: MockServer,
    pub client: LiftLogClient,
}

impl TestClient {
    pub async fn start(online: bool) -> Self {
        let server = MockServer::start().await;
        let config = Config::with_builder(AppConfig::builder().server_url(server.uri()))
            .expect("valid test config");
        let db = Arc::new(
            LocalDatabase::in_memory()
                .await
                .expect("in-memory database"),
        );
        let monitor = Arc::new(ConnectivityMonitor::new(online));

        let client = LiftLogClient::assemble(config, db, monitor);
        client
            .context
            .set_credential(Credential {
                access_token: TEST_TOKEN.to_string(),
                user_id: TEST_USER.to_string(),
            })
            .await;

        Self { server, client }
    }

    pub fn go_online(&self) {
        self.client.monitor().set_online(true);
    }

    pub fn go_offline(&self) {
        self.client.monitor().set_online(false);
    }

    /// Mutations received so far, in arrival order
    pub async fn mutations(&self) -> Vec<RecordedMutation> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|request| request.method.as_str() != "GET")
            .map(|request| RecordedMutation {
                method: request.method.as_str().to_string(),
                path: request.url.path().to_string(),
                body: serde_json::from_slice(&request.body).ok(),
            })
            .collect()
    }
}
