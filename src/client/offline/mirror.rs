//! # Local Mirror Store
//!
//! Read cache of the last known-good templates and sessions of each user, used
//! to render views when the API cannot be reached. Records created offline are
//! kept with `synced = false` until a reload after a successful drain replaces
//! them with the server's version.

use crate::client::error::StorageError;
use crate::client::local_db::{LocalDatabase, MirrorKind, MirrorRecord};
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct MirrorStore {
    db: Arc<LocalDatabase>,
}

impl MirrorStore {
    pub fn new(db: Arc<LocalDatabase>) -> Self {
        Self { db }
    }

    /// Replace the cached `kind` records of `owner_id` with a server listing
    pub async fn upsert_from_remote(
        &self,
        kind: MirrorKind,
        owner_id: &str,
        records: &[Value],
    ) -> Result<usize, StorageError> {
        let stored = self.db.replace_mirror(kind, owner_id, records).await?;
        tracing::debug!("Mirrored {} {} record(s) for user {}", stored, kind, owner_id);
        Ok(stored)
    }

    /// Cached records of one user
    pub async fn read_for_user(
        &self,
        kind: MirrorKind,
        owner_id: &str,
    ) -> Result<Vec<MirrorRecord>, StorageError> {
        Ok(self.db.mirror_records(kind, owner_id).await?)
    }

    /// Record a create that was queued instead of sent
    pub async fn record_offline_create(
        &self,
        kind: MirrorKind,
        owner_id: &str,
        body: &Value,
        pending_operation_id: i64,
    ) -> Result<MirrorRecord, StorageError> {
        Ok(self
            .db
            .insert_unsynced(kind, owner_id, body, pending_operation_id)
            .await?)
    }
}
