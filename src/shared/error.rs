//! Shared Error Types
//!
//! Validation failures raised while building a draft, before anything is sent
//! to the server or queued.
//!
//! ```rust
//! use liftlog::shared::error::SharedError;
//!
//! let error = SharedError::validation("name", "Please enter a template name");
//! assert!(error.to_string().contains("name"));
//! ```
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    /// A draft field holds an unusable value
    #[error("Validation error in field '{field}': {message}")]
    ValidationError { field: String, message: String },
}

impl SharedError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }
}
