//! # Mirror Statements
//!
//! Per-user cache of templates and sessions. Rows come from two writers only:
//! the reload path, which replaces the synced rows of an owner wholesale, and the
//! gateway's offline-create hook, which appends an unsynced row linked to the
//! queue entry that will eventually create it on the server.

use crate::client::local_db::schema::{PENDING_OPERATIONS, SESSIONS_MIRROR, TEMPLATES_MIRROR};
use crate::client::local_db::LocalDatabase;
use serde_json::Value;
use sqlx::sqlite::SqliteRow;
use sqlx::{Result as SqlxResult, Row};
use std::fmt;
use uuid::Uuid;

pub type Result<T> = SqlxResult<T>;

/// Resource type held by the mirror
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MirrorKind {
    Template,
    Session,
}

impl MirrorKind {
    pub fn table(self) -> &'static str {
        match self {
            MirrorKind::Template => TEMPLATES_MIRROR,
            MirrorKind::Session => SESSIONS_MIRROR,
        }
    }

    /// Collection path whose `POST` creates this kind
    pub fn collection_path(self) -> &'static str {
        match self {
            MirrorKind::Template => "/templates",
            MirrorKind::Session => "/sessions",
        }
    }

    /// Kind created by a `POST` to `path`, if it is a mirrored collection
    pub fn for_collection(path: &str) -> Option<Self> {
        let path = path.split('?').next().unwrap_or(path).trim_end_matches('/');
        [MirrorKind::Template, MirrorKind::Session]
            .into_iter()
            .find(|kind| kind.collection_path() == path)
    }
}

impl fmt::Display for MirrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MirrorKind::Template => f.write_str("template"),
            MirrorKind::Session => f.write_str("session"),
        }
    }
}

/// A cached template or session
#[derive(Debug, Clone, PartialEq)]
pub struct MirrorRecord {
    pub local_id: i64,
    pub kind: MirrorKind,
    pub owner_id: String,
    /// Server id, known only once the server confirmed the record
    pub remote_id: Option<i64>,
    /// Client-side key of a record created offline
    pub temp_id: Option<Uuid>,
    /// Queue entry that will create this record on the server
    pub pending_operation_id: Option<i64>,
    pub synced: bool,
    /// Server-shaped JSON body
    pub body: Value,
    pub cached_at: String,
}

impl MirrorRecord {
    /// Decode the body into a domain type
    pub fn decode<T: serde::de::DeserializeOwned>(&self) -> serde_json::Result<T> {
        T::deserialize(&self.body)
    }
}

impl LocalDatabase {
    /// Replace the synced rows of `owner_id` with `records`
    ///
    /// Unsynced rows are dropped too, except those whose creating operation is
    /// still queued. Runs in one transaction.
    pub async fn replace_mirror(
        &self,
        kind: MirrorKind,
        owner_id: &str,
        records: &[Value],
    ) -> Result<usize> {
        let table = kind.table();
        let cached_at = chrono::Utc::now().to_rfc3339();
        let mut tx = self.pool.begin().await?;

        sqlx::query(&format!(
            "DELETE FROM {table}
             WHERE owner_id = ?
               AND (synced = 1
                    OR pending_operation_id IS NULL
                    OR pending_operation_id NOT IN (SELECT id FROM {PENDING_OPERATIONS}))"
        ))
        .bind(owner_id)
        .execute(&mut *tx)
        .await?;

        for record in records {
            let body = serde_json::to_string(record)
                .map_err(|e| sqlx::Error::Protocol(format!("JSON serialization error: {}", e)))?;
            sqlx::query(&format!(
                "INSERT INTO {table} (owner_id, remote_id, synced, body, cached_at)
                 VALUES (?, ?, 1, ?, ?)"
            ))
            .bind(owner_id)
            .bind(record.get("id").and_then(Value::as_i64))
            .bind(body)
            .bind(&cached_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(records.len())
    }

    /// Append an unsynced row for a create that was queued offline
    pub async fn insert_unsynced(
        &self,
        kind: MirrorKind,
        owner_id: &str,
        body: &Value,
        pending_operation_id: i64,
    ) -> Result<MirrorRecord> {
        let temp_id = Uuid::new_v4();
        let cached_at = chrono::Utc::now().to_rfc3339();
        let encoded = serde_json::to_string(body)
            .map_err(|e| sqlx::Error::Protocol(format!("JSON serialization error: {}", e)))?;

        let result = sqlx::query(&format!(
            "INSERT INTO {} (owner_id, temp_id, pending_operation_id, synced, body, cached_at)
             VALUES (?, ?, ?, 0, ?, ?)",
            kind.table()
        ))
        .bind(owner_id)
        .bind(temp_id.to_string())
        .bind(pending_operation_id)
        .bind(encoded)
        .bind(&cached_at)
        .execute(&self.pool)
        .await?;

        Ok(MirrorRecord {
            local_id: result.last_insert_rowid(),
            kind,
            owner_id: owner_id.to_string(),
            remote_id: None,
            temp_id: Some(temp_id),
            pending_operation_id: Some(pending_operation_id),
            synced: false,
            body: body.clone(),
            cached_at,
        })
    }

    /// Rows of one owner: server order first, then unsynced rows oldest first
    pub async fn mirror_records(
        &self,
        kind: MirrorKind,
        owner_id: &str,
    ) -> Result<Vec<MirrorRecord>> {
        let rows = sqlx::query(&format!(
            "SELECT local_id, owner_id, remote_id, temp_id, pending_operation_id,
                    synced, body, cached_at
             FROM {}
             WHERE owner_id = ?
             ORDER BY synced DESC, local_id ASC",
            kind.table()
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(|row| row_to_record(kind, row)).collect()
    }
}

fn row_to_record(kind: MirrorKind, row: &SqliteRow) -> Result<MirrorRecord> {
    let body: String = row.try_get("body")?;
    let body: Value = serde_json::from_str(&body).map_err(|e| sqlx::Error::ColumnDecode {
        index: "body".to_string(),
        source: Box::new(e),
    })?;

    let temp_id: Option<String> = row.try_get("temp_id")?;
    let temp_id = temp_id
        .map(|raw| Uuid::parse_str(&raw))
        .transpose()
        .map_err(|e| sqlx::Error::ColumnDecode {
            index: "temp_id".to_string(),
            source: Box::new(e),
        })?;

    Ok(MirrorRecord {
        local_id: row.try_get("local_id")?,
        kind,
        owner_id: row.try_get("owner_id")?,
        remote_id: row.try_get("remote_id")?,
        temp_id,
        pending_operation_id: row.try_get("pending_operation_id")?,
        synced: row.try_get("synced")?,
        body,
        cached_at: row.try_get("cached_at")?,
    })
}
