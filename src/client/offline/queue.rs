//! # Operation Queue
//!
//! Durable, ordered log of mutations issued while offline. The queue never edits
//! an entry: it appends, lists in insertion order, and deletes by id. An entry is
//! deleted only after the server accepted a replay of exactly that entry, which
//! gives at-least-once delivery across restarts.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use liftlog::client::local_db::LocalDatabase;
//! use liftlog::client::offline::OperationQueue;
//! use liftlog::client::types::OperationMethod;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), liftlog::client::error::StorageError> {
//! let db = Arc::new(LocalDatabase::in_memory().await?);
//! let queue = OperationQueue::new(db);
//!
//! let op = queue
//!     .enqueue(OperationMethod::Create, "/templates", Some(r#"{"name":"Push Day"}"#.into()))
//!     .await?;
//!
//! for pending in queue.list_all().await? {
//!     // replay...
//!     queue.remove(pending.id).await?;
//! }
//! # Ok(())
//! # }
//! ```

use crate::client::error::StorageError;
use crate::client::local_db::{LocalDatabase, NewOperation, QueuedOperation};
use crate::client::types::OperationMethod;
use std::sync::Arc;

/// Durable queue of pending mutations
#[derive(Debug, Clone)]
pub struct OperationQueue {
    db: Arc<LocalDatabase>,
}

impl OperationQueue {
    pub fn new(db: Arc<LocalDatabase>) -> Self {
        Self { db }
    }

    /// Append an operation; the returned id fixes its replay position
    pub async fn enqueue(
        &self,
        method: OperationMethod,
        target_path: &str,
        payload: Option<String>,
    ) -> Result<QueuedOperation, StorageError> {
        let operation = NewOperation {
            method,
            target_path: target_path.to_string(),
            payload,
        };

        let queued = self.db.enqueue_operation(&operation).await.map_err(|e| {
            tracing::error!("Failed to enqueue {} {}: {}", method, target_path, e);
            StorageError::from(e)
        })?;

        tracing::info!(
            "Queued {} {} as operation {}",
            queued.method,
            queued.target_path,
            queued.id
        );
        Ok(queued)
    }

    /// Every pending operation, oldest first
    pub async fn list_all(&self) -> Result<Vec<QueuedOperation>, StorageError> {
        Ok(self.db.list_pending_operations().await?)
    }

    /// Delete one operation; `false` if it was already gone
    pub async fn remove(&self, operation_id: i64) -> Result<bool, StorageError> {
        Ok(self.db.remove_operation(operation_id).await?)
    }

    pub async fn len(&self) -> Result<usize, StorageError> {
        Ok(self.db.count_pending_operations().await?)
    }

    pub async fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.len().await? == 0)
    }
}
