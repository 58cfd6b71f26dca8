//! YouTube playlist → Spotify track mapping

use playlist_bridge_common::auth::OAuthError;
use playlist_bridge_domain::{BridgeError, TrackMapping, TrackMatch};
use regex::Regex;
use tracing::{info, warn};

use crate::integrations::{SpotifyClient, YouTubeClient};

/// Turns a video title into a catalog search query
pub trait TitleCleaner: Send + Sync {
    fn clean(&self, title: &str) -> String;
}

/// Strips ` [...]` and ` (...)` groups and a trailing ` ft...` credit.
#[derive(Debug, Clone)]
pub struct BracketTitleCleaner {
    pattern: Regex,
}

impl BracketTitleCleaner {
    const PATTERN: &'static str = r"( \[.+?\]| \(.+?\)| ft.+?$)";

    /// Compile the cleaning pattern.
    pub fn new() -> Result<Self, BridgeError> {
        let pattern = Regex::new(Self::PATTERN)
            .map_err(|e| BridgeError::Internal(format!("invalid title pattern: {e}")))?;
        Ok(Self { pattern })
    }
}

impl TitleCleaner for BracketTitleCleaner {
    fn clean(&self, title: &str) -> String {
        self.pattern.replace_all(title, "").into_owned()
    }
}

/// Map every item of a YouTube playlist to its best Spotify match.
///
/// Mappings keep the original video title. A search given up on because of
/// sustained rate limiting yields an empty match instead of failing the
/// whole translation; any other failure aborts it.
pub async fn translate_playlist(
    youtube: &YouTubeClient,
    spotify: &SpotifyClient,
    playlist_id: &str,
    cleaner: &dyn TitleCleaner,
) -> Result<Vec<TrackMapping>, OAuthError> {
    let items = youtube.playlist_items(playlist_id).await?;
    let mut mappings = Vec::with_capacity(items.len());

    for item in items {
        let query = cleaner.clean(&item.title);
        let matched = match spotify.search_track(&query).await {
            Ok(matched) => matched,
            Err(err) if err.is_rate_limit_exhaustion() => {
                warn!(error = %err, "search abandoned under rate limiting, leaving unmatched");
                TrackMatch::default()
            }
            Err(err) => return Err(err),
        };
        mappings.push(TrackMapping { youtube: item.title, spotify: matched });
    }

    let matched = mappings.iter().filter(|m| m.spotify.is_found()).count();
    info!(total = mappings.len(), matched, "playlist translated");
    Ok(mappings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_brackets_parentheses_and_featuring() {
        let cleaner = BracketTitleCleaner::new().unwrap();

        assert_eq!(cleaner.clean("Artist - Song (Official Video)"), "Artist - Song");
        assert_eq!(cleaner.clean("Artist - Song [HD] (Lyrics)"), "Artist - Song");
        assert_eq!(cleaner.clean("Artist - Song ft. Someone Else"), "Artist - Song");
        assert_eq!(cleaner.clean("Plain Title"), "Plain Title");
    }

    #[test]
    fn leaves_unspaced_groups_alone() {
        let cleaner = BracketTitleCleaner::new().unwrap();
        assert_eq!(cleaner.clean("Song(Remix)"), "Song(Remix)");
    }
}
