//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Playlist Bridge
///
/// Covers failures outside the OAuth/session taxonomy: configuration,
/// HTTP client construction and malformed user input.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum BridgeError {
    /// Missing or invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Outbound HTTP could not be set up or completed.
    #[error("Network error: {0}")]
    Network(String),

    /// Malformed user input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A broken internal invariant.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for Playlist Bridge operations
pub type Result<T> = std::result::Result<T, BridgeError>;
