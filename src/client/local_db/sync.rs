//! # Pending Operation Queue and Sync Metadata
//!
//! Statements behind the durable offline queue. The queue only ever sees two
//! writes, an append (`INSERT`) and a delete by id, each a single statement and
//! therefore atomic in SQLite. Ids come from `AUTOINCREMENT`, so they are strictly
//! increasing and never reused: ordering by id is ordering by insertion.
//!
//! The module also keeps the `sync_metadata` key/value table used to persist the
//! login credential and the last drain time.

use crate::client::local_db::schema::PENDING_OPERATIONS;
use crate::client::local_db::LocalDatabase;
use crate::client::types::OperationMethod;
use sqlx::sqlite::SqliteRow;
use sqlx::{Result as SqlxResult, Row};

/// Result type alias for sync operations
pub type Result<T> = SqlxResult<T>;

/// A mutation to append to the queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOperation {
    pub method: OperationMethod,
    pub target_path: String,
    /// Serialized request body, stored verbatim
    pub payload: Option<String>,
}

/// A mutation waiting in the queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedOperation {
    /// Store-assigned, defines replay order
    pub id: i64,
    pub method: OperationMethod,
    pub target_path: String,
    pub payload: Option<String>,
    /// RFC 3339, informational only
    pub enqueued_at: String,
}

impl LocalDatabase {
    /// Append an operation to the queue
    pub async fn enqueue_operation(&self, operation: &NewOperation) -> Result<QueuedOperation> {
        let enqueued_at = chrono::Utc::now().to_rfc3339();

        let result = sqlx::query(&format!(
            "INSERT INTO {PENDING_OPERATIONS} (method, target_path, payload, enqueued_at)
             VALUES (?, ?, ?, ?)"
        ))
        .bind(operation.method.as_str())
        .bind(&operation.target_path)
        .bind(&operation.payload)
        .bind(&enqueued_at)
        .execute(&self.pool)
        .await?;

        Ok(QueuedOperation {
            id: result.last_insert_rowid(),
            method: operation.method,
            target_path: operation.target_path.clone(),
            payload: operation.payload.clone(),
            enqueued_at,
        })
    }

    /// All queued operations in insertion order
    pub async fn list_pending_operations(&self) -> Result<Vec<QueuedOperation>> {
        let rows = sqlx::query(&format!(
            "SELECT id, method, target_path, payload, enqueued_at
             FROM {PENDING_OPERATIONS}
             ORDER BY id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_operation).collect()
    }

    /// Delete one operation; returns whether a row was removed
    pub async fn remove_operation(&self, operation_id: i64) -> Result<bool> {
        let result = sqlx::query(&format!("DELETE FROM {PENDING_OPERATIONS} WHERE id = ?"))
            .bind(operation_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() == 1)
    }

    pub async fn count_pending_operations(&self) -> Result<usize> {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {PENDING_OPERATIONS}"))
            .fetch_one(&self.pool)
            .await?;
        Ok(count.0 as usize)
    }

    /// Set sync metadata
    pub async fn set_sync_metadata(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            "INSERT OR REPLACE INTO sync_metadata (key, value, updated_at)
             VALUES (?, ?, ?)",
        )
        .bind(key)
        .bind(value)
        .bind(chrono::Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Get sync metadata
    pub async fn get_sync_metadata(&self, key: &str) -> Result<Option<String>> {
        let row = sqlx::query("SELECT value FROM sync_metadata WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(row.try_get("value")?)),
            None => Ok(None),
        }
    }

    pub async fn delete_sync_metadata(&self, key: &str) -> Result<()> {
        sqlx::query("DELETE FROM sync_metadata WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Get last drain timestamp
    pub async fn get_last_sync_time(&self) -> Result<Option<String>> {
        self.get_sync_metadata("last_sync_time").await
    }

    /// Set last drain timestamp
    pub async fn set_last_sync_time(&self) -> Result<()> {
        self.set_sync_metadata("last_sync_time", &chrono::Utc::now().to_rfc3339())
            .await
    }
}

fn row_to_operation(row: &SqliteRow) -> Result<QueuedOperation> {
    let method: String = row.try_get("method")?;
    let method = method
        .parse::<OperationMethod>()
        .map_err(|e| sqlx::Error::ColumnDecode {
            index: "method".to_string(),
            source: e.into(),
        })?;

    Ok(QueuedOperation {
        id: row.try_get("id")?,
        method,
        target_path: row.try_get("target_path")?,
        payload: row.try_get("payload")?,
        enqueued_at: row.try_get("enqueued_at")?,
    })
}
