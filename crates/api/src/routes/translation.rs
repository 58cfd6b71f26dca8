//! YouTube playlist translation

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::Json;
use playlist_bridge_domain::constants::MAPPINGS_KEY;
use playlist_bridge_domain::TrackMapping;
use playlist_bridge_infra::integrations::Provider;
use playlist_bridge_infra::services::translate_playlist;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::context::AppContext;
use crate::errors::ApiError;
use crate::session::ActiveSession;

#[derive(Debug, Deserialize)]
pub(super) struct TranslationParams {
    youtube_playlist_id: Option<String>,
}

/// Body of `GET /read_youtube_playlist`
#[derive(Debug, Serialize)]
pub struct TranslationResult {
    /// The playlist that was read.
    pub youtube_playlist_id: String,
    /// One mapping per playlist item, in playlist order.
    pub items: Vec<TrackMapping>,
}

/// Map every item of a YouTube playlist onto Spotify and keep the result in
/// the session for the export step.
pub(super) async fn read_youtube_playlist(
    State(ctx): State<Arc<AppContext>>,
    ActiveSession(id): ActiveSession,
    Query(params): Query<TranslationParams>,
) -> Result<Json<TranslationResult>, ApiError> {
    let playlist_id = params
        .youtube_playlist_id
        .filter(|id| !id.trim().is_empty())
        .ok_or(ApiError::InvalidRequest)?;

    let spotify = ctx.client(&id, Provider::Spotify)?;
    let youtube = ctx.client(&id, Provider::YouTube)?;
    let (Some(spotify), Some(youtube)) = (spotify.as_spotify(), youtube.as_youtube()) else {
        return Err(ApiError::Internal("provider client stored under wrong name".into()));
    };

    let items = translate_playlist(youtube, spotify, &playlist_id, ctx.cleaner.as_ref()).await?;
    ctx.put_translation_data(&id, MAPPINGS_KEY, &items)?;

    info!(items = items.len(), "translation stored");
    Ok(Json(TranslationResult { youtube_playlist_id: playlist_id, items }))
}
