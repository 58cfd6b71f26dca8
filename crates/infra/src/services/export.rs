//! Writing translated mappings into a Spotify playlist

use playlist_bridge_common::auth::OAuthError;
use playlist_bridge_domain::{exportable_uris, PlaylistSummary, SpotifyProfile, TrackMapping};
use serde::Serialize;
use thiserror::Error;

use crate::integrations::SpotifyClient;

/// Why an export was refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExportError {
    /// The chosen playlist is not one of the user's playlists.
    #[error("Invalid playlist id")]
    InvalidPlaylist,

    /// Spotify rejected a request.
    #[error(transparent)]
    Request(#[from] OAuthError),
}

/// Outcome of an export
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportSummary {
    /// Playlist the tracks went into.
    pub playlist_id: String,
    /// Matched tracks sent to Spotify.
    pub tracks_added: usize,
    /// Pages posted.
    pub requests: usize,
}

impl std::fmt::Display for ExportSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Added {} tracks to {}.", self.tracks_added, self.playlist_id)
    }
}

/// Add every matched track of `mappings` to `playlist_id`.
///
/// The playlist must be among `playlists`, the user's playlists as fetched
/// earlier in the flow.
pub async fn export_mappings(
    spotify: &SpotifyClient,
    profile: &SpotifyProfile,
    playlists: &[PlaylistSummary],
    mappings: &[TrackMapping],
    playlist_id: &str,
) -> Result<ExportSummary, ExportError> {
    if !playlists.iter().any(|playlist| playlist.id == playlist_id) {
        return Err(ExportError::InvalidPlaylist);
    }

    let uris = exportable_uris(mappings);
    let requests = spotify.add_tracks_to_playlist(&profile.id, playlist_id, &uris).await?;

    Ok(ExportSummary { playlist_id: playlist_id.to_string(), tracks_added: uris.len(), requests })
}
