/**
 * Client Context
 *
 * State shared by the gateway, the sync engine and the services: the
 * connectivity monitor and the current session credential. Passed explicitly
 * instead of living in globals.
 */

use crate::client::sync::network_monitor::ConnectivityMonitor;
use crate::client::types::Credential;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
pub struct ClientContext {
    monitor: Arc<ConnectivityMonitor>,
    credential: Arc<RwLock<Option<Credential>>>,
}

impl ClientContext {
    pub fn new(monitor: Arc<ConnectivityMonitor>) -> Self {
        Self {
            monitor,
            credential: Arc::new(RwLock::new(None)),
        }
    }

    pub fn monitor(&self) -> &Arc<ConnectivityMonitor> {
        &self.monitor
    }

    pub fn is_online(&self) -> bool {
        self.monitor.is_online()
    }

    pub async fn credential(&self) -> Option<Credential> {
        self.credential.read().await.clone()
    }

    pub async fn token(&self) -> Option<String> {
        self.credential
            .read()
            .await
            .as_ref()
            .map(|c| c.access_token.clone())
    }

    pub async fn user_id(&self) -> Option<String> {
        self.credential.read().await.as_ref().map(|c| c.user_id.clone())
    }

    pub async fn set_credential(&self, credential: Credential) {
        *self.credential.write().await = Some(credential);
    }

    pub async fn clear_credential(&self) {
        *self.credential.write().await = None;
    }
}
