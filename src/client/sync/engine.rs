//! # Sync Engine
//!
//! Drains the operation queue once connectivity returns and then refreshes the
//! local mirror from the server.
//!
//! ## Drain
//!
//! 1. Skip when offline, or when another drain is already running
//! 2. Replay every queued operation in insertion order with the current token
//! 3. Remove each operation the server accepted; leave failed ones untouched
//! 4. Reload templates and sessions into the mirror of the current user
//! 5. Record the drain time and report, then broadcast [`SyncEvent::Reloaded`]
//!
//! Failures never abort the drain. A rejected operation stays queued, verbatim,
//! and is retried by the next drain; there is no backoff and no retry cap.

use crate::client::api_client::ApiClient;
use crate::client::context::ClientContext;
use crate::client::error::GatewayError;
use crate::client::local_db::{LocalDatabase, MirrorKind, QueuedOperation};
use crate::client::offline::{MirrorStore, OperationQueue};
use crate::client::sync::sync_state::DrainReport;
use crate::client::types::ApiMethod;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex, RwLock};

const EVENT_CAPACITY: usize = 16;

/// Result of a drain request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainOutcome {
    Completed(DrainReport),
    /// Another drain held the guard; nothing was sent
    AlreadyRunning,
    /// The monitor reported offline; nothing was sent
    Offline,
}

/// Notifications for views that render mirrored data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncEvent {
    Reloaded(DrainReport),
}

#[derive(Debug)]
pub struct SyncEngine {
    context: ClientContext,
    api: ApiClient,
    db: Arc<LocalDatabase>,
    queue: OperationQueue,
    mirror: MirrorStore,
    guard: Mutex<()>,
    last_report: RwLock<Option<DrainReport>>,
    events: broadcast::Sender<SyncEvent>,
}

impl SyncEngine {
    pub fn new(context: ClientContext, api: ApiClient, db: Arc<LocalDatabase>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            context,
            api,
            queue: OperationQueue::new(db.clone()),
            mirror: MirrorStore::new(db.clone()),
            db,
            guard: Mutex::new(()),
            last_report: RwLock::new(None),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.events.subscribe()
    }

    pub fn is_draining(&self) -> bool {
        self.guard.try_lock().is_err()
    }

    pub async fn pending_operations(&self) -> usize {
        match self.queue.len().await {
            Ok(count) => count,
            Err(e) => {
                tracing::error!("Failed to count pending operations: {}", e);
                0
            }
        }
    }

    /// Report of the most recent drain of this process
    pub async fn last_report(&self) -> Option<DrainReport> {
        *self.last_report.read().await
    }

    /// Time of the most recent drain, persisted across restarts
    pub async fn last_sync_time(&self) -> Option<String> {
        match self.db.get_last_sync_time().await {
            Ok(time) => time,
            Err(e) => {
                tracing::error!("Failed to read last sync time: {}", e);
                None
            }
        }
    }

    /// Replay the queue and reload the mirror
    pub async fn drain(&self) -> DrainOutcome {
        if !self.context.is_online() {
            tracing::debug!("Drain skipped while offline");
            return DrainOutcome::Offline;
        }
        let Ok(_running) = self.guard.try_lock() else {
            tracing::debug!("Drain already in progress");
            return DrainOutcome::AlreadyRunning;
        };

        let operations = match self.queue.list_all().await {
            Ok(operations) => operations,
            Err(e) => {
                tracing::error!("Failed to read pending operations: {}", e);
                Vec::new()
            }
        };

        let mut report = DrainReport {
            attempted: operations.len(),
            ..DrainReport::default()
        };
        if !operations.is_empty() {
            tracing::info!("Replaying {} pending operation(s)", operations.len());
        }

        for operation in &operations {
            match self.replay(operation).await {
                Ok(()) => report.replayed += 1,
                Err(e) => {
                    report.failed += 1;
                    tracing::warn!(
                        "Operation {} ({} {}) failed, kept for next sync: {}",
                        operation.id,
                        operation.method,
                        operation.target_path,
                        e
                    );
                }
            }
        }

        report.reloaded = self.reload_mirror().await;

        if let Err(e) = self.db.set_last_sync_time().await {
            tracing::error!("Failed to record sync time: {}", e);
        }
        *self.last_report.write().await = Some(report);

        tracing::info!(
            "Sync finished: {} replayed, {} failed, mirror {}",
            report.replayed,
            report.failed,
            if report.reloaded { "reloaded" } else { "stale" }
        );
        let _ = self.events.send(SyncEvent::Reloaded(report));

        DrainOutcome::Completed(report)
    }

    async fn replay(&self, operation: &QueuedOperation) -> Result<(), GatewayError> {
        let token = self
            .context
            .token()
            .await
            .ok_or_else(|| GatewayError::unauthorized("not logged in"))?;

        self.api
            .send(
                ApiMethod::from(operation.method),
                &operation.target_path,
                operation.payload.clone(),
                Some(&token),
            )
            .await?;

        if !self.queue.remove(operation.id).await? {
            tracing::warn!("Operation {} was already removed", operation.id);
        }
        Ok(())
    }

    async fn reload_mirror(&self) -> bool {
        let Some(credential) = self.context.credential().await else {
            tracing::debug!("No user logged in, mirror reload skipped");
            return false;
        };

        let mut reloaded = true;
        for kind in [MirrorKind::Template, MirrorKind::Session] {
            let result = self
                .api
                .send(
                    ApiMethod::Get,
                    kind.collection_path(),
                    None,
                    Some(&credential.access_token),
                )
                .await;

            let records = match result {
                Ok(Value::Array(records)) => records,
                Ok(other) => {
                    tracing::warn!("Unexpected {} listing: {}", kind, other);
                    reloaded = false;
                    continue;
                }
                Err(e) => {
                    tracing::warn!("Failed to reload {}s: {}", kind, e);
                    reloaded = false;
                    continue;
                }
            };

            if let Err(e) = self
                .mirror
                .upsert_from_remote(kind, &credential.user_id, &records)
                .await
            {
                tracing::error!("Failed to store {} mirror: {}", kind, e);
                reloaded = false;
            }
        }
        reloaded
    }
}
