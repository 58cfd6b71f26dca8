//! HTTP routes
//!
//! | Route                                   | Purpose                              |
//! |-----------------------------------------|--------------------------------------|
//! | `GET /create_session`                   | start a session, set the cookie      |
//! | `GET /remove_session`                   | drop the session and the cookie      |
//! | `GET /`                                 | session status                       |
//! | `GET /auth/{provider}`                  | redirect to the provider consent page|
//! | `GET /{provider}-authorization-callback`| store the authorization code         |
//! | `GET /request_token?service=`           | force a token exchange               |
//! | `GET /read_youtube_playlist`            | translate a YouTube playlist         |
//! | `GET/POST /select_export_playlist`      | pick a Spotify playlist and export   |

mod auth;
mod export;
mod home;
mod translation;

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::header::LOCATION;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{middleware, Router};
use playlist_bridge_infra::integrations::Provider;

use crate::context::AppContext;
use crate::session::ActiveSession;
use crate::utils::logging::log_requests;

/// Build the application router.
pub fn router(ctx: Arc<AppContext>) -> Router {
    let mut router = Router::new()
        .route("/", get(home::status))
        .route("/create_session", get(home::create_session))
        .route("/remove_session", get(home::remove_session))
        .route("/auth/{provider}", get(auth::authorize))
        .route("/request_token", get(auth::request_token))
        .route("/read_youtube_playlist", get(translation::read_youtube_playlist))
        .route(
            "/select_export_playlist",
            get(export::list_playlists).post(export::export_to_playlist),
        );

    for provider in Provider::ALL {
        router = router.route(
            provider.callback_path(),
            get(
                move |state: State<Arc<AppContext>>,
                      session: ActiveSession,
                      query: Query<auth::CallbackParams>| {
                    auth::callback(provider, state, session, query)
                },
            ),
        );
    }

    router.layer(middleware::from_fn(log_requests)).with_state(ctx)
}

/// `302 Found` to `location`.
///
/// axum's `Redirect::to` answers `303`; OAuth consent redirects and the
/// post-action returns home are plain `302`s.
pub(crate) fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(LOCATION, location.to_string())]).into_response()
}
