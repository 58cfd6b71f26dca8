//! Error type of the routing boundary
//!
//! Every failure a handler can meet ends here and is turned into a
//! response: a redirect home when there is no session, `400` with a short
//! message for everything the user can cause, `500` for the rest.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use playlist_bridge_common::auth::OAuthError;
use playlist_bridge_common::storage::StoreError;
use playlist_bridge_domain::BridgeError;
use playlist_bridge_infra::services::ExportError;
use thiserror::Error;
use tracing::{error, warn};

use crate::routes::found;
use crate::utils::logging::error_label;

/// Failures surfaced by route handlers
#[derive(Debug, Error)]
pub enum ApiError {
    /// No session cookie, or the cookie names a session that no longer
    /// exists.
    #[error("Session not created")]
    NoSession,

    /// An authorization callback arrived for a provider the session never
    /// started authorizing.
    #[error("Unexpected callback from service")]
    UnexpectedCallback,

    /// A store path the flow depends on does not resolve.
    #[error("OAuth session not created")]
    NamespaceNotFound,

    /// A required parameter is missing or malformed.
    #[error("Invalid request")]
    InvalidRequest,

    /// The export target is not one of the user's playlists.
    #[error("Invalid playlist id")]
    InvalidPlaylist,

    /// Session or provider request failure.
    #[error(transparent)]
    OAuth(#[from] OAuthError),

    /// Anything the user cannot fix.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Message shown to the user for a `400`.
    fn message(&self) -> &'static str {
        match self {
            Self::NoSession => "Session not created",
            Self::UnexpectedCallback => "Unexpected callback from service",
            Self::NamespaceNotFound => "OAuth session not created",
            Self::InvalidRequest => "Invalid request",
            Self::InvalidPlaylist => "Invalid playlist id",
            Self::OAuth(OAuthError::NotAuthorized) => "Not authorized",
            Self::OAuth(OAuthError::AuthorizationFailed) => "Authorization failed",
            Self::OAuth(OAuthError::AccessTokenRequestFailed { .. }) => {
                "Request access token failed"
            }
            Self::OAuth(OAuthError::RequestFailed(_)) => "Request failed",
            Self::OAuth(OAuthError::PostRequestFailed(_)) => "Failed to add tracks to playlist",
            Self::Internal(_) => "Internal error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::NoSession => found("/"),
            Self::Internal(ref detail) => {
                error!(error = %detail, "request failed with internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, self.message()).into_response()
            }
            _ => {
                warn!(kind = error_label(&self), error = %self, "request rejected");
                (StatusCode::BAD_REQUEST, self.message()).into_response()
            }
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NamespaceNotFound { .. } => Self::NamespaceNotFound,
            StoreError::InvalidSessionId(_) => Self::NoSession,
            StoreError::NotAValue { .. } => Self::Internal(err.to_string()),
        }
    }
}

impl From<BridgeError> for ApiError {
    fn from(err: BridgeError) -> Self {
        match err {
            BridgeError::InvalidInput(_) => Self::InvalidRequest,
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<ExportError> for ApiError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::InvalidPlaylist => Self::InvalidPlaylist,
            ExportError::Request(err) => Self::OAuth(err),
        }
    }
}
