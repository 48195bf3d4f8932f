//! Error types for the Vantage arbitration core.

use thiserror::Error;

/// Failures reported by the external read/write operations.
///
/// Only a failure carried by the current ticket for a scope is ever surfaced;
/// superseded failures are discarded by the arbiters.
#[derive(Debug, Clone, Error)]
pub enum RemoteError {
    #[error("Remote request failed: {0}")]
    Request(String),

    #[error("Remote endpoint unauthorized: {0}")]
    Unauthorized(String),

    #[error("Remote request timed out after {0}ms")]
    Timeout(u64),
}

/// Core lifecycle and configuration errors.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Remote error: {0}")]
    Remote(#[from] RemoteError),
}

impl From<config::ConfigError> for CoreError {
    fn from(err: config::ConfigError) -> Self {
        CoreError::Config(err.to_string())
    }
}
