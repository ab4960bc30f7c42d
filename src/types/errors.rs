//! Application error types.
//!
//! All errors use `thiserror` for automatic Error trait derivation and provide
//! clear error messages with context.

use thiserror::Error;

/// Application result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error enum for template event routing.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid configuration, context or callback name.
    #[error("validation error: {0}")]
    Validation(String),

    /// Event name not mapped by the receiving listener.
    #[error("not found: {0}")]
    NotFound(String),

    /// A downstream handler failed while processing an event.
    #[error("handler error in {event}: {message}")]
    Handler { event: String, message: String },

    /// Internal errors.
    #[error("internal error: {0}")]
    Internal(String),

    /// Serialization/deserialization errors.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

// Convenience constructors
impl Error {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn handler(event: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Handler {
            event: event.into(),
            message: message.into(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
