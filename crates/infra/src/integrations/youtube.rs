//! YouTube Data API client

use playlist_bridge_common::auth::{OAuthError, RequestFailure};
use playlist_bridge_domain::constants::YOUTUBE_PLAYLIST_PAGE_SIZE;
use playlist_bridge_domain::PlaylistItem;
use serde::Deserialize;

use super::providers::ProviderDescriptor;
use crate::http::AuthorizedCaller;

#[derive(Debug, Deserialize)]
struct Snippet {
    title: String,
}

#[derive(Debug, Deserialize)]
struct PlaylistItemObject {
    snippet: Snippet,
}

#[derive(Debug, Deserialize)]
struct PlaylistItemsResponse {
    items: Vec<PlaylistItemObject>,
}

/// YouTube calls made on behalf of one authorized user
#[derive(Debug, Clone)]
pub struct YouTubeClient {
    caller: AuthorizedCaller,
    descriptor: ProviderDescriptor,
}

impl YouTubeClient {
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

    /// Titles of the first page (up to 50 entries) of a playlist.
    pub async fn playlist_items(&self, playlist_id: &str) -> Result<Vec<PlaylistItem>, OAuthError> {
        let page_size = YOUTUBE_PLAYLIST_PAGE_SIZE.to_string();
        let params = [
            ("part", "snippet"),
            ("playlistId", playlist_id),
            ("maxResults", page_size.as_str()),
        ];
        let raw = self
            .caller
            .get(&self.descriptor.api_url("/youtube/v3/playlistItems"), &params)
            .await?;

        let response: PlaylistItemsResponse = serde_json::from_value(raw).map_err(|e| {
            OAuthError::RequestFailed(RequestFailure::UnexpectedShape(e.to_string()))
        })?;

        Ok(response
            .items
            .into_iter()
            .map(|item| PlaylistItem { title: item.snippet.title })
            .collect())
    }
}
