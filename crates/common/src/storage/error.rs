//! Storage error types

use thiserror::Error;

/// Session store error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A prefix of the requested path is absent, the final segment is
    /// absent, or the walk reached a plain value before running out of
    /// segments.
    #[error("Namespace not found: {path}")]
    NamespaceNotFound { path: String },

    /// The path names a mapping where a leaf value was expected.
    #[error("Expected a value at {path}, found a namespace")]
    NotAValue { path: String },

    /// A session id that is not 64 lowercase hex characters.
    #[error("Invalid session id: {0}")]
    InvalidSessionId(String),
}

impl StoreError {
    pub(crate) fn not_found(key: &str, segments: &[&str]) -> Self {
        Self::NamespaceNotFound { path: render_path(key, segments) }
    }

    pub(crate) fn not_a_value(key: &str, segments: &[&str]) -> Self {
        Self::NotAValue { path: render_path(key, segments) }
    }

    /// Whether this error means the path does not resolve.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NamespaceNotFound { .. })
    }
}

fn render_path(key: &str, segments: &[&str]) -> String {
    std::iter::once(key).chain(segments.iter().copied()).collect::<Vec<_>>().join("/")
}

/// Result alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;
