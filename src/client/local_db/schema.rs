//! Database Schema Definitions
//!
//! Table names and the DDL of the local store.

/// DDL creating every table, idempotent
pub const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Ordered queue of mutations waiting for connectivity
pub const PENDING_OPERATIONS: &str = "pending_operations";

/// Mirror of `GET /templates`
pub const TEMPLATES_MIRROR: &str = "templates_mirror";

/// Mirror of `GET /sessions`
pub const SESSIONS_MIRROR: &str = "sessions_mirror";
