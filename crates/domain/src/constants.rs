//! Application constants
//!
//! Centralized location for domain-level constants shared by the store
//! layout, the provider clients and the HTTP layer.

// Session store layout
/// Per-session namespace holding one client per provider.
pub const OAUTH_SESSIONS_NAMESPACE: &str = "oauth_sessions";
/// Per-session namespace holding translation flow data.
pub const ONGOING_TRANSLATION_NAMESPACE: &str = "ongoing_translation";
/// Translated track mappings.
pub const MAPPINGS_KEY: &str = "mappings";
/// Spotify profile chosen for export.
pub const PROFILE_KEY: &str = "profile";
/// Spotify playlists offered for export.
pub const PLAYLISTS_KEY: &str = "playlists";

/// Spotify accepts at most 100 URIs per "add tracks" request.
pub const SPOTIFY_TRACKS_PAGE_SIZE: usize = 100;

/// YouTube `playlistItems` page size requested per call.
pub const YOUTUBE_PLAYLIST_PAGE_SIZE: u32 = 50;

// Rate-limit protocol defaults
/// Total GET attempts, the first included.
pub const DEFAULT_RATE_LIMIT_MAX_ATTEMPTS: u32 = 4;
/// Longest single `Retry-After` honored.
pub const DEFAULT_MAX_RETRY_AFTER_SECS: u64 = 10;
/// Cap on the sum of all waits for one request.
pub const DEFAULT_MAX_TOTAL_WAIT_SECS: u64 = 30;

// HTTP server defaults
/// Listener address when none is configured.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";
/// Externally visible base URL used to build callback URLs.
pub const DEFAULT_PUBLIC_URL: &str = "http://localhost:5000";
/// Cookie carrying the session id.
pub const SESSION_COOKIE_NAME: &str = "session_id";
