//! # Reachability Probe
//!
//! Connectivity signal for a native process: the API server's `/health` endpoint
//! is requested once at startup and then on a fixed interval. Each result is fed
//! into the [`ConnectivityMonitor`], which turns flips into transition events.

use crate::client::api_client::ApiClient;
use crate::client::sync::network_monitor::ConnectivityMonitor;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

#[derive(Debug, Clone)]
pub struct ReachabilityProbe {
    api: ApiClient,
    interval: Duration,
}

impl ReachabilityProbe {
    pub fn new(api: ApiClient, interval: Duration) -> Self {
        Self { api, interval }
    }

    /// One health check
    pub async fn probe_once(&self) -> bool {
        self.api.health().await
    }

    /// Poll forever, feeding every result to `monitor`
    pub fn spawn(self, monitor: Arc<ConnectivityMonitor>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let online = self.probe_once().await;
                monitor.set_online(online);
            }
        })
    }
}
