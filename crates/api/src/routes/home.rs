//! Session lifecycle and status

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::State;
use axum::response::{Json, Response};
use axum_extra::extract::cookie::CookieJar;
use playlist_bridge_common::auth::SessionStatus;
use serde::Serialize;
use tracing::info;

use super::found;
use crate::context::AppContext;
use crate::errors::ApiError;
use crate::session::{clear_session_cookie, resolve, session_cookie};

/// Body of `GET /`
#[derive(Debug, Serialize)]
pub struct HomeStatus {
    /// `None` for a guest.
    pub session_id: Option<String>,
    /// Keyed by provider name; only providers the session has started
    /// authorizing appear.
    pub services: BTreeMap<String, ServiceStatus>,
}

/// Lifecycle of one provider session
#[derive(Debug, Serialize)]
pub struct ServiceStatus {
    /// An authorization code has been received.
    pub authenticated: bool,
    /// An access token is held.
    pub has_token: bool,
    /// Human-readable one-line summary.
    pub summary: String,
}

impl From<SessionStatus> for ServiceStatus {
    fn from(status: SessionStatus) -> Self {
        Self {
            summary: status.to_string(),
            authenticated: status.authenticated,
            has_token: status.has_token,
        }
    }
}

pub(super) async fn create_session(
    State(ctx): State<Arc<AppContext>>,
    jar: CookieJar,
) -> (CookieJar, Response) {
    if let Some(previous) = resolve(&jar, &ctx) {
        ctx.destroy_session(&previous);
    }

    let id = ctx.create_session();
    info!(sessions = ctx.session_count(), "session started");

    let jar = jar.add(session_cookie(&id, ctx.config.server.secure_cookies));
    (jar, found("/"))
}

pub(super) async fn remove_session(
    State(ctx): State<Arc<AppContext>>,
    jar: CookieJar,
) -> (CookieJar, Response) {
    if let Some(id) = resolve(&jar, &ctx) {
        ctx.destroy_session(&id);
        info!(sessions = ctx.session_count(), "session ended");
    }

    (jar.remove(clear_session_cookie()), found("/"))
}

pub(super) async fn status(
    State(ctx): State<Arc<AppContext>>,
    jar: CookieJar,
) -> Result<Json<HomeStatus>, ApiError> {
    let Some(id) = resolve(&jar, &ctx) else {
        return Ok(Json(HomeStatus { session_id: None, services: BTreeMap::new() }));
    };

    let mut services = BTreeMap::new();
    for client in ctx.clients(&id)? {
        let status = client.session().status();
        services.insert(client.provider().name().to_string(), ServiceStatus::from(status));
    }

    Ok(Json(HomeStatus { session_id: Some(id.to_string()), services }))
}
