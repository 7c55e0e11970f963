//! Client Error Types
//!
//! Taxonomy of failures surfaced by the request gateway and the local store.
//! Being offline is not an error: a mutating request issued while offline is
//! reported as [`Outcome::Queued`](crate::client::gateway::Outcome::Queued).
//!
//! - `RemoteRejected` - the server answered with an error status and body
//! - `Unauthorized` - missing credential or a 401 from the server
//! - `RemoteUnreachable` - transport failure while the monitor believed we were online
//! - `Storage` - the local queue or mirror could not be read or written

use crate::shared::error::SharedError;
use thiserror::Error;

/// Failures of the local SQLite store
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("failed to encode payload: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Failures of a single gateway request
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The server returned a structured error
    #[error("request rejected ({status}): {message}")]
    RemoteRejected { status: u16, message: String },

    /// No credential, or the server rejected the one we sent
    #[error("authentication required: {message}")]
    Unauthorized { message: String },

    /// No response at all although the monitor reported online
    #[error("server unreachable: {0}")]
    RemoteUnreachable(String),

    /// The server answered 2xx with a body we could not decode
    #[error("invalid response body: {0}")]
    InvalidResponse(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl GatewayError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Whether the caller should send the user back to the login screen
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}

/// Umbrella error of the workout service and auth flows
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Invalid(#[from] SharedError),

    #[error("{0} not found")]
    NotFound(String),
}

impl ClientError {
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Gateway(e) if e.is_auth())
    }
}
