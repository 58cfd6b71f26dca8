//! Spotify Web API client

use playlist_bridge_common::auth::{OAuthError, RequestFailure};
use playlist_bridge_domain::constants::SPOTIFY_TRACKS_PAGE_SIZE;
use playlist_bridge_domain::{PlaylistSummary, SpotifyProfile, TrackMatch};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, instrument};

use super::batch::submit_in_pages;
use super::providers::ProviderDescriptor;
use crate::http::AuthorizedCaller;

#[derive(Debug, Deserialize)]
struct ExternalUrls {
    spotify: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProfileResponse {
    id: String,
    display_name: Option<String>,
    external_urls: Option<ExternalUrls>,
}

#[derive(Debug, Deserialize)]
struct PlaylistObject {
    id: String,
    name: String,
    external_urls: Option<ExternalUrls>,
}

#[derive(Debug, Deserialize)]
struct PlaylistsResponse {
    items: Vec<PlaylistObject>,
}

#[derive(Debug, Deserialize)]
struct TrackObject {
    name: String,
    uri: String,
}

#[derive(Debug, Deserialize)]
struct TrackPage {
    items: Vec<TrackObject>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    tracks: TrackPage,
}

/// Spotify calls made on behalf of one authorized user
#[derive(Debug, Clone)]
pub struct SpotifyClient {
    caller: AuthorizedCaller,
    descriptor: ProviderDescriptor,
}

impl SpotifyClient {
    /// Client over an authorized caller.
    pub fn new(caller: AuthorizedCaller, descriptor: ProviderDescriptor) -> Self {
        Self { caller, descriptor }
    }

    /// Caller used for every request.
    pub fn caller(&self) -> &AuthorizedCaller {
        &self.caller
    }

    /// Endpoints the client talks to.
    pub fn descriptor(&self) -> &ProviderDescriptor {
        &self.descriptor
    }

    /// `GET /v1/me`
    pub async fn user_profile(&self) -> Result<SpotifyProfile, OAuthError> {
        let raw = self.caller.get(&self.descriptor.api_url("/v1/me"), &[]).await?;
        let profile: ProfileResponse = decode(raw)?;

        Ok(SpotifyProfile {
            id: profile.id,
            display_name: profile.display_name,
            external_url: profile.external_urls.and_then(|urls| urls.spotify),
        })
    }

    /// `GET /v1/me/playlists` (first page)
    pub async fn user_playlists(&self) -> Result<Vec<PlaylistSummary>, OAuthError> {
        let raw = self.caller.get(&self.descriptor.api_url("/v1/me/playlists"), &[]).await?;
        let playlists: PlaylistsResponse = decode(raw)?;

        Ok(playlists
            .items
            .into_iter()
            .map(|playlist| PlaylistSummary {
                id: playlist.id,
                name: playlist.name,
                external_url: playlist.external_urls.and_then(|urls| urls.spotify),
            })
            .collect())
    }

    /// Best single track match for `query`.
    ///
    /// No results yields an empty [`TrackMatch`]; a body without
    /// `tracks.items` is a failed request.
    #[instrument(skip(self))]
    pub async fn search_track(&self, query: &str) -> Result<TrackMatch, OAuthError> {
        debug!("querying spotify");
        let params = [("q", query), ("type", "track"), ("limit", "1")];
        let raw = self.caller.get(&self.descriptor.api_url("/v1/search"), &params).await?;
        let result: SearchResponse = decode(raw)?;

        Ok(result
            .tracks
            .items
            .into_iter()
            .next()
            .map(|track| TrackMatch::found(track.name, track.uri))
            .unwrap_or_default())
    }

    /// Append `uris` to a playlist, one request per page of 100.
    ///
    /// Returns the number of requests made. Stops at the first rejected page.
    #[instrument(skip(self, uris), fields(tracks = uris.len()))]
    pub async fn add_tracks_to_playlist(
        &self,
        user_id: &str,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<usize, OAuthError> {
        let url = self
            .descriptor
            .api_url(&format!("/v1/users/{user_id}/playlists/{playlist_id}/tracks"));

        let pages = submit_in_pages(uris, SPOTIFY_TRACKS_PAGE_SIZE, |page| {
            let body = json!({ "uris": page });
            let url = url.as_str();
            async move { self.caller.post(url, &body).await.map(|_| ()) }
        })
        .await?;

        info!(pages, "tracks added to playlist");
        Ok(pages)
    }
}

fn decode<T: DeserializeOwned>(raw: Value) -> Result<T, OAuthError> {
    serde_json::from_value(raw)
        .map_err(|e| OAuthError::RequestFailed(RequestFailure::UnexpectedShape(e.to_string())))
}
