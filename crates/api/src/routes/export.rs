//! Export of a translated playlist into Spotify

use std::sync::Arc;

use axum::extract::{Form, State};
use axum::response::Json;
use playlist_bridge_domain::constants::{MAPPINGS_KEY, PLAYLISTS_KEY, PROFILE_KEY};
use playlist_bridge_domain::{PlaylistSummary, SpotifyProfile, TrackMapping};
use playlist_bridge_infra::integrations::{Provider, SpotifyClient};
use playlist_bridge_infra::services::export_mappings;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::context::AppContext;
use crate::errors::ApiError;
use crate::session::ActiveSession;

#[derive(Debug, Deserialize)]
pub(super) struct ExportForm {
    playlist_id: Option<String>,
}

/// Body of `GET /select_export_playlist`
#[derive(Debug, Serialize)]
pub struct ExportChoices {
    /// The signed-in Spotify user.
    pub profile: SpotifyProfile,
    /// Playlists the user can export into.
    pub playlists: Vec<PlaylistSummary>,
}

fn spotify_client(ctx: &AppContext, id: &ActiveSession) -> Result<SpotifyClient, ApiError> {
    ctx.client(&id.0, Provider::Spotify)?
        .as_spotify()
        .cloned()
        .ok_or_else(|| ApiError::Internal("spotify slot holds another provider".into()))
}

/// Fetch the user's profile and playlists and remember them for the export.
pub(super) async fn list_playlists(
    State(ctx): State<Arc<AppContext>>,
    session: ActiveSession,
) -> Result<Json<ExportChoices>, ApiError> {
    let spotify = spotify_client(&ctx, &session)?;

    let profile = spotify.user_profile().await?;
    let playlists = spotify.user_playlists().await?;

    ctx.put_translation_data(&session.0, PROFILE_KEY, &profile)?;
    ctx.put_translation_data(&session.0, PLAYLISTS_KEY, &playlists)?;

    Ok(Json(ExportChoices { profile, playlists }))
}

/// Add the matched tracks to the chosen playlist and finish the
/// translation.
pub(super) async fn export_to_playlist(
    State(ctx): State<Arc<AppContext>>,
    session: ActiveSession,
    Form(form): Form<ExportForm>,
) -> Result<String, ApiError> {
    let spotify = spotify_client(&ctx, &session)?;

    let profile: SpotifyProfile = ctx.translation_data(&session.0, PROFILE_KEY)?;
    let playlists: Vec<PlaylistSummary> = ctx.translation_data(&session.0, PLAYLISTS_KEY)?;
    let mappings: Vec<TrackMapping> = ctx.translation_data(&session.0, MAPPINGS_KEY)?;

    let playlist_id = form.playlist_id.ok_or(ApiError::InvalidRequest)?;
    let summary = export_mappings(&spotify, &profile, &playlists, &mappings, &playlist_id).await?;

    ctx.clear_translation(&session.0)?;

    info!(tracks = summary.tracks_added, requests = summary.requests, "export finished");
    Ok(summary.to_string())
}
