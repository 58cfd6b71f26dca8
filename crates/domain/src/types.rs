//! Data types exchanged between the provider clients and the routing layer

use serde::{Deserialize, Serialize};

/// Best Spotify match for a search query.
///
/// Both fields are `None` when the search returned no items, or when the
/// search was abandoned under sustained rate limiting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackMatch {
    /// Track name.
    pub name: Option<String>,
    /// Spotify URI of the track.
    pub uri: Option<String>,
}

impl TrackMatch {
    /// A successful match.
    pub fn found(name: impl Into<String>, uri: impl Into<String>) -> Self {
        Self { name: Some(name.into()), uri: Some(uri.into()) }
    }

    /// Whether a track was matched.
    pub fn is_found(&self) -> bool {
        self.uri.is_some()
    }
}

/// One YouTube playlist entry paired with its Spotify match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackMapping {
    /// Original YouTube video title.
    pub youtube: String,
    /// Best Spotify match for the cleaned title.
    pub spotify: TrackMatch,
}

/// Item of a YouTube playlist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistItem {
    /// Video title as shown on YouTube.
    pub title: String,
}

/// Condensed Spotify user profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpotifyProfile {
    /// Spotify user id.
    pub id: String,
    /// Name shown on the profile.
    pub display_name: Option<String>,
    /// Link to the profile page.
    pub external_url: Option<String>,
}

/// Condensed Spotify playlist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistSummary {
    /// Spotify playlist id.
    pub id: String,
    /// Playlist name.
    pub name: String,
    /// Link to the playlist page.
    pub external_url: Option<String>,
}

/// Collect the URIs of every mapping that found a Spotify track, in order.
pub fn exportable_uris(mappings: &[TrackMapping]) -> Vec<String> {
    mappings.iter().filter_map(|mapping| mapping.spotify.uri.clone()).collect()
}
