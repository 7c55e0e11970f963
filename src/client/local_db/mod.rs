//! # Local Database Module
//!
//! SQLite storage backing the offline-first client. Three logical tables hold
//! the client's durable state:
//!
//! - `pending_operations`: the ordered queue of mutations waiting for connectivity
//! - `templates_mirror` / `sessions_mirror`: last known-good server data per user,
//!   plus unsynced records created while offline
//! - `sync_metadata`: small key/value facts such as the persisted credential
//!
//! ## Key Components
//!
//! - `LocalDatabase`: connection pool and schema setup
//! - `schema.rs`: table names and DDL
//! - `sync.rs`: pending operation queue and metadata statements
//! - `mirror.rs`: mirror statements
//!
//! ## Usage
//!
//! ```rust,no_run
//! use liftlog::client::local_db::LocalDatabase;
//!
//! # async fn example() -> sqlx::Result<()> {
//! let db = LocalDatabase::open("/tmp/liftlog/local.db").await?;
//! let stats = db.get_stats().await?;
//! println!("{} operations waiting", stats.pending_operations);
//! # Ok(())
//! # }
//! ```

pub mod mirror;
pub mod schema;
pub mod sync;

pub use mirror::{MirrorKind, MirrorRecord};
pub use sync::{NewOperation, QueuedOperation};

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Result as SqlxResult, SqlitePool};
use std::path::Path;
use std::str::FromStr;

/// Result type for local database operations
pub type Result<T> = SqlxResult<T>;

/// Local database connection manager
#[derive(Debug, Clone)]
pub struct LocalDatabase {
    pool: SqlitePool,
}

impl LocalDatabase {
    /// Open or create the database file at `path`
    ///
    /// Creates missing parent directories, enables WAL mode and initializes the
    /// schema.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.init_schema().await?;
        tracing::debug!("Opened local database at {}", path.display());
        Ok(db)
    }

    /// Open a private in-memory database
    ///
    /// The pool is pinned to a single connection that never expires, otherwise
    /// every new connection would see an empty database.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.init_schema().await?;
        Ok(db)
    }

    /// Create missing tables; safe to run on every open
    async fn init_schema(&self) -> Result<()> {
        sqlx::raw_sql(schema::SCHEMA_SQL)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Get connection pool reference
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Row counts, for diagnostics
    pub async fn get_stats(&self) -> Result<DatabaseStats> {
        let templates: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM templates_mirror")
            .fetch_one(&self.pool)
            .await?;

        let sessions: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM sessions_mirror")
            .fetch_one(&self.pool)
            .await?;

        let unsynced: (i64,) = sqlx::query_as(
            "SELECT (SELECT COUNT(*) FROM templates_mirror WHERE synced = 0)
                  + (SELECT COUNT(*) FROM sessions_mirror WHERE synced = 0)",
        )
        .fetch_one(&self.pool)
        .await?;

        let pending_operations: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM pending_operations")
            .fetch_one(&self.pool)
            .await?;

        Ok(DatabaseStats {
            template_count: templates.0 as u64,
            session_count: sessions.0 as u64,
            unsynced_count: unsynced.0 as u64,
            pending_operations: pending_operations.0 as u64,
        })
    }
}

/// Database statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseStats {
    /// Mirrored templates, synced or not
    pub template_count: u64,
    /// Mirrored sessions, synced or not
    pub session_count: u64,
    /// Mirror records created offline and not yet confirmed
    pub unsynced_count: u64,
    /// Queued mutations
    pub pending_operations: u64,
}
