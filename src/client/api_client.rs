/**
 * API Client
 *
 * Thin reqwest transport for the workout API. Every call resolves the path
 * against the configured API base, attaches the bearer token when one is given
 * and maps the response onto `GatewayError`. Requests have no timeout: a call
 * waits as long as the server takes to answer.
 */

use crate::client::config::Config;
use crate::client::error::GatewayError;
use crate::client::types::ApiMethod;
use reqwest::{Client, StatusCode};
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct ApiClient {
    config: Config,
    client: Client,
}

impl ApiClient {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Send one request and return the decoded body
    ///
    /// `body` is sent verbatim as `application/json`, which lets queued
    /// payloads replay byte for byte.
    pub async fn send(
        &self,
        method: ApiMethod,
        path: &str,
        body: Option<String>,
        token: Option<&str>,
    ) -> Result<Value, GatewayError> {
        let url = self.config.api_url(path);
        tracing::debug!("{} {}", method, url);

        let mut request = self.client.request(method.as_reqwest(), &url);
        if let Some(token) = token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }
        if let Some(body) = body {
            request = request
                .header("Content-Type", "application/json")
                .body(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| GatewayError::RemoteUnreachable(format!("{} {}: {}", method, path, e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| GatewayError::RemoteUnreachable(format!("{} {}: {}", method, path, e)))?;

        if status.is_success() {
            if text.trim().is_empty() {
                return Ok(Value::Null);
            }
            return serde_json::from_str(&text)
                .map_err(|e| GatewayError::InvalidResponse(format!("{} {}: {}", method, path, e)));
        }

        let message = error_message(status, &text);
        tracing::debug!("{} {} rejected with {}: {}", method, path, status, message);

        if status == StatusCode::UNAUTHORIZED {
            return Err(GatewayError::unauthorized(message));
        }
        Err(GatewayError::RemoteRejected {
            status: status.as_u16(),
            message,
        })
    }

    /// `GET {server}/health`; any 2xx counts as reachable
    pub async fn health(&self) -> bool {
        match self.client.get(self.config.health_url()).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!("Health probe failed: {}", e);
                false
            }
        }
    }
}

/// The server reports failures as `{"error": "..."}`; fall back to the status text
fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| value.get("error").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        })
}
