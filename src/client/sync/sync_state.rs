//! # Sync State
//!
//! Snapshots exposed to status indicators: the reachability belief held by the
//! connectivity monitor and the progress of the background sync service.

use chrono::{DateTime, Utc};

/// What the client currently believes about connectivity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReachabilityState {
    pub is_online: bool,
    pub last_online_at: Option<DateTime<Utc>>,
    pub last_offline_at: Option<DateTime<Utc>>,
    /// Time of the last transition, or of construction
    pub changed_at: DateTime<Utc>,
}

impl ReachabilityState {
    pub fn initial(is_online: bool) -> Self {
        let now = Utc::now();
        Self {
            is_online,
            last_online_at: is_online.then_some(now),
            last_offline_at: (!is_online).then_some(now),
            changed_at: now,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkStatus {
    Online,
    Offline,
}

impl From<bool> for NetworkStatus {
    fn from(online: bool) -> Self {
        if online {
            NetworkStatus::Online
        } else {
            NetworkStatus::Offline
        }
    }
}

/// Counters of one completed drain
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainReport {
    /// Entries the drain tried to replay
    pub attempted: usize,
    /// Entries accepted by the server and removed from the queue
    pub replayed: usize,
    /// Entries rejected or unreachable, still queued
    pub failed: usize,
    /// Whether both mirror collections were reloaded afterwards
    pub reloaded: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncState {
    pub is_syncing: bool,
    /// RFC 3339 time of the last completed drain
    pub last_sync: Option<String>,
    pub pending_operations: usize,
    pub last_report: Option<DrainReport>,
    pub network_status: NetworkStatus,
}

impl Default for SyncState {
    fn default() -> Self {
        Self {
            is_syncing: false,
            last_sync: None,
            pending_operations: 0,
            last_report: None,
            network_status: NetworkStatus::Offline,
        }
    }
}
