//! Session cookie handling

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use playlist_bridge_common::storage::SessionId;
use playlist_bridge_domain::constants::SESSION_COOKIE_NAME;

use crate::context::AppContext;
use crate::errors::ApiError;

/// The caller's live session, taken from the `session_id` cookie.
///
/// Rejects with [`ApiError::NoSession`], which redirects home, when the
/// cookie is missing, malformed, or names a session the store has dropped.
#[derive(Debug, Clone)]
pub struct ActiveSession(pub SessionId);

impl FromRequestParts<Arc<AppContext>> for ActiveSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppContext>,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        resolve(&jar, state).map(Self).ok_or(ApiError::NoSession)
    }
}

/// The session named by the cookie, if it is still live.
pub fn resolve(jar: &CookieJar, ctx: &AppContext) -> Option<SessionId> {
    let raw = jar.get(SESSION_COOKIE_NAME)?.value();
    let id = SessionId::parse(raw).ok()?;
    ctx.has_session(&id).then_some(id)
}

/// Session cookie for `id`, scoped to the whole site.
pub fn session_cookie(id: &SessionId, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, id.to_string()))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .build()
}

/// Removal cookie for the session cookie.
pub fn clear_session_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE_NAME).path("/").build()
}
