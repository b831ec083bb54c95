//! Error types for the plug locator
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Result type alias for locator operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the plug locator
#[derive(Error, Debug)]
pub enum Error {
    /// No device with the requested alias answered within the attempt budget
    #[error("no device with alias \"{0}\" found")]
    NotFound(String),

    /// Transient network failure (probe or control call)
    ///
    /// Never fatal to a resolve loop: the locator treats this as
    /// "unreachable" and evicts and/or retries.
    #[error("network error: {0}")]
    Network(String),

    /// The durable address cache is unreadable or unwritable
    ///
    /// Fatal and never masked: silently disabling the cache would cause
    /// unbounded rediscovery cost without the caller's knowledge.
    #[error("address cache error: {0}")]
    Storage(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// A device answered but its reply could not be understood
    #[error("protocol error: {0}")]
    Protocol(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a "not found" error naming the alias
    pub fn not_found(alias: impl Into<String>) -> Self {
        Self::NotFound(alias.into())
    }

    /// Create a transient network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a protocol error
    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }

    /// Whether this error is transient from the locator's point of view
    ///
    /// Transient errors trigger cache eviction and/or the next discovery
    /// attempt instead of aborting the resolve loop.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Protocol(_))
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
