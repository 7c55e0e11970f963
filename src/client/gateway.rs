//! # Request Gateway
//!
//! Single entry point for application requests. Each call is either sent to the
//! server now or, when the connectivity monitor reports offline and the request
//! mutates state, appended to the durable queue for later replay.
//!
//! ```text
//! execute(method, path, payload)
//!   ├─ offline && mutating ─▶ queue.enqueue ─▶ mirror (creates only) ─▶ Queued
//!   └─ otherwise ───────────▶ ApiClient::send ─▶ Completed(body) | Err
//! ```
//!
//! A transport failure while the monitor believes we are online is returned to
//! the caller as [`GatewayError::RemoteUnreachable`]; it is never queued.

use crate::client::api_client::ApiClient;
use crate::client::context::ClientContext;
use crate::client::error::{GatewayError, StorageError};
use crate::client::local_db::MirrorKind;
use crate::client::offline::{MirrorStore, OperationQueue};
use crate::client::types::{ApiMethod, OperationMethod};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Result of a successful gateway call
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The server accepted the request; body decoded as JSON, `Null` when empty
    Completed(Value),
    /// Stored for replay once connectivity returns
    Queued { operation_id: i64 },
}

impl Outcome {
    pub fn is_queued(&self) -> bool {
        matches!(self, Outcome::Queued { .. })
    }

    /// Body of a completed call
    pub fn into_body(self) -> Option<Value> {
        match self {
            Outcome::Completed(body) => Some(body),
            Outcome::Queued { .. } => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RequestGateway {
    context: ClientContext,
    api: ApiClient,
    queue: OperationQueue,
    mirror: MirrorStore,
}

impl RequestGateway {
    pub fn new(
        context: ClientContext,
        api: ApiClient,
        queue: OperationQueue,
        mirror: MirrorStore,
    ) -> Self {
        Self {
            context,
            api,
            queue,
            mirror,
        }
    }

    pub fn context(&self) -> &ClientContext {
        &self.context
    }

    pub fn mirror(&self) -> &MirrorStore {
        &self.mirror
    }

    /// Send or queue one request
    pub async fn execute(
        &self,
        method: ApiMethod,
        path: &str,
        payload: Option<Value>,
    ) -> Result<Outcome, GatewayError> {
        let body = payload
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(StorageError::from)?;

        match method.operation() {
            Some(operation) if !self.context.is_online() => {
                self.enqueue(operation, path, body, payload.as_ref()).await
            }
            _ => {
                let token = self.context.token().await;
                if method.is_mutating() && token.is_none() {
                    return Err(GatewayError::unauthorized("not logged in"));
                }
                let body = self.api.send(method, path, body, token.as_deref()).await?;
                Ok(Outcome::Completed(body))
            }
        }
    }

    /// `GET` a resource and decode it
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, GatewayError> {
        let token = self.context.token().await;
        let body = self
            .api
            .send(ApiMethod::Get, path, None, token.as_deref())
            .await?;
        serde_json::from_value(body)
            .map_err(|e| GatewayError::InvalidResponse(format!("GET {}: {}", path, e)))
    }

    async fn enqueue(
        &self,
        operation: OperationMethod,
        path: &str,
        body: Option<String>,
        payload: Option<&Value>,
    ) -> Result<Outcome, GatewayError> {
        let queued = self.queue.enqueue(operation, path, body).await?;

        if operation == OperationMethod::Create {
            if let Some(kind) = MirrorKind::for_collection(path) {
                self.record_offline_create(kind, payload, queued.id).await;
            }
        }

        Ok(Outcome::Queued {
            operation_id: queued.id,
        })
    }

    // The operation is already durable at this point, so a mirror failure only
    // costs the optimistic entry.
    async fn record_offline_create(
        &self,
        kind: MirrorKind,
        payload: Option<&Value>,
        operation_id: i64,
    ) {
        let Some(owner) = self.context.user_id().await else {
            tracing::debug!(
                "No user for offline {} create {}, mirror not updated",
                kind,
                operation_id
            );
            return;
        };
        let body = payload.cloned().unwrap_or(Value::Null);

        if let Err(e) = self
            .mirror
            .record_offline_create(kind, &owner, &body, operation_id)
            .await
        {
            tracing::error!(
                "Failed to mirror offline {} create {}: {}",
                kind,
                operation_id,
                e
            );
        }
    }
}
