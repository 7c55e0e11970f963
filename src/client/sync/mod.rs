//! # Background Sync Service
//!
//! Ties connectivity to replay: a background task listens for monitor
//! transitions and runs exactly one drain of the operation queue every time the
//! client comes back online.
//!
//! ## Architecture
//!
//! - **Network Monitor** (`network_monitor.rs`): online flag and transition events
//! - **Probe** (`probe.rs`): periodic `/health` checks feeding the monitor
//! - **Engine** (`engine.rs`): single-flight in-order drain plus mirror reload
//! - **Sync State** (`sync_state.rs`): snapshots for status indicators
//!
//! ## Usage
//!
//! ```rust,no_run
//! use liftlog::client::sync::SyncService;
//! # use liftlog::client::sync::{engine::SyncEngine, network_monitor::ConnectivityMonitor};
//! # use std::sync::Arc;
//! # async fn example(
//! #     engine: Arc<SyncEngine>,
//! #     monitor: Arc<ConnectivityMonitor>,
//! # ) -> Result<(), liftlog::client::sync::SyncServiceError> {
//! let mut sync_service = SyncService::new(engine, monitor);
//! sync_service.start()?;
//!
//! let status = sync_service.status().await;
//! println!("{} operation(s) waiting", status.pending_operations);
//!
//! sync_service.force_sync().await;
//! # Ok(())
//! # }
//! ```

pub mod engine;
pub mod network_monitor;
pub mod probe;
pub mod sync_state;

pub use engine::{DrainOutcome, SyncEngine, SyncEvent};
pub use network_monitor::{ConnectivityEvent, ConnectivityMonitor};
pub use probe::ReachabilityProbe;
pub use sync_state::{DrainReport, NetworkStatus, ReachabilityState, SyncState};

use std::sync::Arc;
use thiserror::Error;
use tokio::sync::broadcast::error::RecvError;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SyncServiceError {
    #[error("sync service is already running")]
    AlreadyRunning,
}

#[derive(Debug)]
pub struct SyncService {
    engine: Arc<SyncEngine>,
    monitor: Arc<ConnectivityMonitor>,
    background_task: Option<tokio::task::JoinHandle<()>>,
}

impl SyncService {
    pub fn new(engine: Arc<SyncEngine>, monitor: Arc<ConnectivityMonitor>) -> Self {
        Self {
            engine,
            monitor,
            background_task: None,
        }
    }

    pub fn engine(&self) -> &Arc<SyncEngine> {
        &self.engine
    }

    /// Start listening for connectivity transitions
    pub fn start(&mut self) -> Result<(), SyncServiceError> {
        if self.background_task.is_some() {
            return Err(SyncServiceError::AlreadyRunning);
        }

        // Subscribe before spawning so no transition is missed
        let events = self.monitor.subscribe();
        let engine = Arc::clone(&self.engine);
        let monitor = Arc::clone(&self.monitor);

        let handle = tokio::spawn(async move {
            Self::listen(events, engine, monitor).await;
        });

        self.background_task = Some(handle);
        tracing::debug!("Sync service started");
        Ok(())
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.background_task.take() {
            handle.abort();
            tracing::debug!("Sync service stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.background_task.is_some()
    }

    /// Drain now instead of waiting for a transition
    pub async fn force_sync(&self) -> DrainOutcome {
        self.engine.drain().await
    }

    pub async fn status(&self) -> SyncState {
        SyncState {
            is_syncing: self.engine.is_draining(),
            last_sync: self.engine.last_sync_time().await,
            pending_operations: self.engine.pending_operations().await,
            last_report: self.engine.last_report().await,
            network_status: NetworkStatus::from(self.monitor.is_online()),
        }
    }

    async fn listen(
        mut events: tokio::sync::broadcast::Receiver<ConnectivityEvent>,
        engine: Arc<SyncEngine>,
        monitor: Arc<ConnectivityMonitor>,
    ) {
        loop {
            match events.recv().await {
                Ok(ConnectivityEvent::BecameOnline) => {
                    engine.drain().await;
                }
                Ok(ConnectivityEvent::BecameOffline) => {}
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Missed {} connectivity event(s)", skipped);
                    if monitor.is_online() {
                        engine.drain().await;
                    }
                }
                Err(RecvError::Closed) => break,
            }
        }
    }
}

impl Drop for SyncService {
    fn drop(&mut self) {
        if let Some(handle) = self.background_task.take() {
            handle.abort();
        }
    }
}
