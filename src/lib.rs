//! LiftLog - Offline-First Workout Tracker Client
//!
//! LiftLog tracks workout templates and recorded sessions against a remote API
//! while staying usable without connectivity.
//!
//! # Overview
//!
//! The library provides:
//! - A request gateway that sends requests when the server is reachable and
//!   durably queues mutations when it is not
//! - An SQLite-backed operation queue replayed in order on reconnect
//! - A per-user local mirror of templates and sessions for offline display
//! - Connectivity monitoring driven by a periodic health probe
//! - Workout operations (templates, sessions, history) built on the gateway
//!
//! # Module Structure
//!
//! - **`shared`** - Platform-agnostic types
//!   - Workout domain shapes and drafts
//!   - Configuration
//!   - Error types
//!
//! - **`client`** - Offline-first client
//!   - Request gateway and HTTP transport
//!   - Local database, queue and mirror
//!   - Sync engine and background sync service
//!   - Auth and workout services
//!
//! # Usage
//!
//! ```rust,no_run
//! use liftlog::client::{ApiMethod, Config, LiftLogClient, Outcome};
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut client = LiftLogClient::open(Config::from_env()?).await?;
//! client.auth.login("ana", "secret").await?;
//! client.sync.start()?;
//!
//! let outcome = client
//!     .gateway
//!     .execute(
//!         ApiMethod::Post,
//!         "/templates",
//!         Some(json!({"name": "Push Day", "exercises": ["Bench"]})),
//!     )
//!     .await?;
//! if let Outcome::Queued { operation_id } = outcome {
//!     println!("offline, queued as {}", operation_id);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! Fallible operations return typed errors built with `thiserror`:
//! `GatewayError` for requests, `StorageError` for the local database and
//! `ClientError` for the services. Being offline is not an error: a queued
//! mutation is an `Ok(Outcome::Queued { .. })`.

pub mod client;
pub mod shared;
