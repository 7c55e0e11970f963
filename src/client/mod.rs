//! Offline-First Client Module
//!
//! Client side of the workout tracker. Requests go through a gateway that sends
//! them when the server is reachable and durably queues mutations when it is
//! not; a background sync service replays the queue once connectivity returns.
//!
//! # Architecture
//!
//! - **`config`** - Configuration (server URL, API prefix, database path)
//! - **`api_client`** - reqwest transport and response mapping
//! - **`context`** - Connectivity monitor and session credential
//! - **`gateway`** - Send-or-queue entry point for every request
//! - **`offline`** - Durable operation queue and local mirror
//! - **`local_db`** - SQLite storage behind the offline stores
//! - **`sync`** - Connectivity monitor, probe, drain engine, sync service
//! - **`auth`** - Login, logout, session restore
//! - **`workout`** - Templates, workouts, sessions and history
//! - **`main`** - Headless sync agent (binary)
//!
//! # Module Structure
//!
//! ```text
//! client/
//! ├── mod.rs        - Module exports and client assembly
//! ├── main.rs       - Sync agent entry point
//! ├── config.rs     - Configuration management
//! ├── api_client.rs - HTTP transport
//! ├── context.rs    - Shared client context
//! ├── gateway.rs    - Request gateway
//! ├── auth.rs       - Authentication
//! ├── workout.rs    - Workout operations
//! ├── error.rs      - Error types
//! ├── types.rs      - Request verbs and auth payloads
//! ├── local_db/     - SQLite tables and statements
//! ├── offline/      - Queue and mirror stores
//! └── sync/         - Monitor, probe, engine, service
//! ```

pub mod api_client;
pub mod auth;
pub mod config;
pub mod context;
pub mod error;
pub mod gateway;
pub mod local_db;
pub mod offline;
pub mod sync;
pub mod types;
pub mod workout;

// Re-export commonly used types
pub use api_client::ApiClient;
pub use auth::AuthService;
pub use config::Config;
pub use context::ClientContext;
pub use error::{ClientError, GatewayError, StorageError};
pub use gateway::{Outcome, RequestGateway};
pub use local_db::LocalDatabase;
pub use offline::{MirrorStore, OperationQueue};
pub use sync::{ConnectivityMonitor, DrainOutcome, ReachabilityProbe, SyncEngine, SyncService};
pub use types::{ApiMethod, Credential, OperationMethod};
pub use workout::{DataSource, Loaded, WorkoutService};

use std::sync::Arc;

/// Every client component wired over one database and one context
#[derive(Debug)]
pub struct LiftLogClient {
    pub config: Config,
    pub db: Arc<LocalDatabase>,
    pub context: ClientContext,
    pub gateway: RequestGateway,
    pub auth: AuthService,
    pub workouts: WorkoutService,
    pub sync: SyncService,
}

impl LiftLogClient {
    /// Open the configured database and seed connectivity from one health probe
    pub async fn open(config: Config) -> Result<Self, ClientError> {
        let db = Arc::new(
            LocalDatabase::open(config.database_path())
                .await
                .map_err(StorageError::from)?,
        );
        let probe = ReachabilityProbe::new(ApiClient::new(config.clone()), config.probe_interval());
        let online = probe.probe_once().await;
        tracing::info!(
            "Server {} is {}",
            config.server_url(),
            if online { "reachable" } else { "unreachable" }
        );

        Ok(Self::assemble(config, db, Arc::new(ConnectivityMonitor::new(online))))
    }

    /// Wire the components over an existing database and monitor
    pub fn assemble(
        config: Config,
        db: Arc<LocalDatabase>,
        monitor: Arc<ConnectivityMonitor>,
    ) -> Self {
        let context = ClientContext::new(monitor.clone());
        let api = ApiClient::new(config.clone());

        let gateway = RequestGateway::new(
            context.clone(),
            api.clone(),
            OperationQueue::new(db.clone()),
            MirrorStore::new(db.clone()),
        );
        let engine = Arc::new(SyncEngine::new(context.clone(), api.clone(), db.clone()));

        Self {
            auth: AuthService::new(context.clone(), api, db.clone()),
            workouts: WorkoutService::new(gateway.clone()),
            sync: SyncService::new(engine, monitor),
            config,
            db,
            context,
            gateway,
        }
    }

    pub fn monitor(&self) -> &Arc<ConnectivityMonitor> {
        self.context.monitor()
    }

    pub fn probe(&self) -> ReachabilityProbe {
        ReachabilityProbe::new(ApiClient::new(self.config.clone()), self.config.probe_interval())
    }
}
