//! End-to-end translation and export against mock provider APIs.

mod support;

use playlist_bridge_common::testing::MockClock;
use playlist_bridge_domain::{PlaylistSummary, SpotifyProfile, TrackMapping, TrackMatch};
use playlist_bridge_infra::services::{
    export_mappings, translate_playlist, BracketTitleCleaner, ExportError,
};
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_playlist(server: &MockServer, titles: &[&str]) {
    let items: Vec<_> = titles.iter().map(|t| json!({"snippet": {"title": t}})).collect();
    Mock::given(method("GET"))
        .and(path("/youtube/v3/playlistItems"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": items })))
        .mount(server)
        .await;
}

async fn mount_search(server: &MockServer, query: &str, result: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("q", query))
        .respond_with(ResponseTemplate::new(200).set_body_json(result))
        .mount(server)
        .await;
}

fn profile() -> SpotifyProfile {
    SpotifyProfile { id: "user-1".into(), display_name: None, external_url: None }
}

fn playlists() -> Vec<PlaylistSummary> {
    vec![PlaylistSummary { id: "p1".into(), name: "Mix".into(), external_url: None }]
}

/// Validates translation of a playlist with mixed outcomes.
///
/// Assertions:
/// - titles are cleaned before searching
/// - mappings keep the original title and follow playlist order
/// - a search with no results maps to an empty match
#[tokio::test]
async fn translation_maps_each_title_to_a_search_result() {
    let server = MockServer::start().await;
    support::mount_token_endpoint(&server).await;
    mount_playlist(&server, &["Artist - Hit (Official Video)", "Unknown [HD]"]).await;
    mount_search(
        &server,
        "Artist - Hit",
        json!({"tracks": {"items": [{"name": "Hit", "uri": "spotify:track:hit"}]}}),
    )
    .await;
    mount_search(&server, "Unknown", json!({"tracks": {"items": []}})).await;

    let clock = MockClock::new();
    let youtube = support::youtube(&server, &clock).await;
    let spotify = support::spotify(&server, &clock).await;
    let cleaner = BracketTitleCleaner::new().unwrap();

    let mappings = translate_playlist(&youtube, &spotify, "PL1", &cleaner).await.unwrap();

    assert_eq!(
        mappings,
        vec![
            TrackMapping {
                youtube: "Artist - Hit (Official Video)".into(),
                spotify: TrackMatch::found("Hit", "spotify:track:hit"),
            },
            TrackMapping { youtube: "Unknown [HD]".into(), spotify: TrackMatch::default() },
        ]
    );
}

#[tokio::test]
async fn sustained_search_rate_limiting_leaves_track_unmatched() {
    let server = MockServer::start().await;
    support::mount_token_endpoint(&server).await;
    mount_playlist(&server, &["Busy Song"]).await;
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "1"))
        .mount(&server)
        .await;

    let clock = MockClock::new();
    let youtube = support::youtube(&server, &clock).await;
    let spotify = support::spotify(&server, &clock).await;
    let cleaner = BracketTitleCleaner::new().unwrap();

    let mappings = translate_playlist(&youtube, &spotify, "PL1", &cleaner).await.unwrap();

    assert_eq!(mappings.len(), 1);
    assert!(!mappings[0].spotify.is_found());
    assert!(!clock.sleeps().is_empty());
}

#[tokio::test]
async fn translation_fails_when_playlist_cannot_be_read() {
    let server = MockServer::start().await;
    support::mount_token_endpoint(&server).await;
    Mock::given(method("GET"))
        .and(path("/youtube/v3/playlistItems"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let clock = MockClock::new();
    let youtube = support::youtube(&server, &clock).await;
    let spotify = support::spotify(&server, &clock).await;
    let cleaner = BracketTitleCleaner::new().unwrap();

    assert!(translate_playlist(&youtube, &spotify, "PL1", &cleaner).await.is_err());
}

#[tokio::test]
async fn export_adds_only_matched_tracks() {
    let server = MockServer::start().await;
    support::mount_token_endpoint(&server).await;
    Mock::given(method("POST"))
        .and(path("/v1/users/user-1/playlists/p1/tracks"))
        .and(body_json(json!({"uris": ["spotify:track:a", "spotify:track:c"]})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"snapshot_id": "s"})))
        .expect(1)
        .mount(&server)
        .await;

    let spotify = support::spotify(&server, &MockClock::new()).await;
    let mappings = vec![
        TrackMapping { youtube: "A".into(), spotify: TrackMatch::found("A", "spotify:track:a") },
        TrackMapping { youtube: "B".into(), spotify: TrackMatch::default() },
        TrackMapping { youtube: "C".into(), spotify: TrackMatch::found("C", "spotify:track:c") },
    ];

    let summary = export_mappings(&spotify, &profile(), &playlists(), &mappings, "p1").await.unwrap();

    assert_eq!(summary.tracks_added, 2);
    assert_eq!(summary.requests, 1);
    assert_eq!(summary.to_string(), "Added 2 tracks to p1.");
}

#[tokio::test]
async fn export_rejects_playlist_not_owned_by_user() {
    let server = MockServer::start().await;
    support::mount_token_endpoint(&server).await;
    Mock::given(method("POST"))
        .and(path("/v1/users/user-1/playlists/zz/tracks"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let spotify = support::spotify(&server, &MockClock::new()).await;

    let err = export_mappings(&spotify, &profile(), &playlists(), &[], "zz").await.unwrap_err();
    assert_eq!(err, ExportError::InvalidPlaylist);
    assert_eq!(err.to_string(), "Invalid playlist id");
}
