//! Tracing setup and request logging middleware

use std::time::{Duration, Instant};

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use playlist_bridge_common::auth::OAuthError;
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::errors::ApiError;

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,playlist_bridge=debug";

/// Install the global subscriber.
///
/// Output is human-readable unless `BRIDGE_LOG_FORMAT=json`. Calling this
/// twice is harmless; the second install is ignored.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let json = std::env::var("BRIDGE_LOG_FORMAT").is_ok_and(|format| format == "json");

    let registry = tracing_subscriber::registry().with(filter);
    let result = if json {
        registry.with(fmt::layer().json().with_target(true)).try_init()
    } else {
        registry.with(fmt::layer().with_target(true)).try_init()
    };

    if result.is_err() {
        warn!("tracing subscriber already installed");
    }
}

/// Log the outcome of a routed request with structured fields.
///
/// `route` is the matched path template, never the raw URI, so query
/// strings (codes, playlist ids) stay out of the logs.
#[inline]
pub fn log_route_execution(method: &str, route: &str, status: u16, elapsed: Duration) {
    let duration_ms = elapsed.as_millis() as u64;

    if status < 400 {
        info!(method, route, status, duration_ms, "route_execution_success");
    } else {
        warn!(method, route, status, duration_ms, "route_execution_failure");
    }
}

/// Middleware timing every request through [`log_route_execution`].
pub async fn log_requests(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<axum::extract::MatchedPath>()
        .map_or_else(|| "<unmatched>".to_string(), |path| path.as_str().to_string());

    let response = next.run(request).await;
    log_route_execution(&method, &route, response.status().as_u16(), start.elapsed());
    response
}

/// Convert an `ApiError` into a stable label suitable for logging.
#[inline]
pub fn error_label(error: &ApiError) -> &'static str {
    match error {
        ApiError::NoSession => "no_session",
        ApiError::UnexpectedCallback => "unexpected_callback",
        ApiError::NamespaceNotFound => "namespace_not_found",
        ApiError::InvalidRequest => "invalid_request",
        ApiError::InvalidPlaylist => "invalid_playlist",
        ApiError::OAuth(OAuthError::NotAuthorized) => "not_authorized",
        ApiError::OAuth(OAuthError::AuthorizationFailed) => "authorization_failed",
        ApiError::OAuth(OAuthError::AccessTokenRequestFailed { .. }) => "token_request_failed",
        ApiError::OAuth(OAuthError::RequestFailed(_)) => "request_failed",
        ApiError::OAuth(OAuthError::PostRequestFailed(_)) => "post_request_failed",
        ApiError::Internal(_) => "internal",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_stable() {
        assert_eq!(error_label(&ApiError::NoSession), "no_session");
        assert_eq!(error_label(&ApiError::OAuth(OAuthError::NotAuthorized)), "not_authorized");
        assert_eq!(error_label(&ApiError::Internal("x".into())), "internal");
    }

    #[test]
    fn default_filter_parses() {
        assert!(EnvFilter::try_new(DEFAULT_LOG_FILTER).is_ok());
    }
}
