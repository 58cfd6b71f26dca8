//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `BRIDGE_SPOTIFY_CLIENT_ID`, `BRIDGE_SPOTIFY_CLIENT_SECRET` (required)
//! - `BRIDGE_YOUTUBE_CLIENT_ID`, `BRIDGE_YOUTUBE_CLIENT_SECRET` (required)
//! - `BRIDGE_BIND_ADDR`: listen address (default `0.0.0.0:5000`)
//! - `BRIDGE_PUBLIC_URL`: externally reachable base URL used for OAuth
//!   callbacks (default `http://localhost:5000`)
//! - `BRIDGE_SECURE_COOKIES`: mark the session cookie `Secure` (true/false)
//! - `BRIDGE_PREFER_REFRESH_TOKEN`: renew with the refresh grant (true/false)
//!
//! ## File Locations
//! The loader searches the following paths (in order):
//! 1. `./client_info.json` or `./client_info.toml` (current working directory)
//! 2. `./playlist-bridge.json` or `./playlist-bridge.toml`
//! 3. The same names in the parent and grandparent directories
//! 4. Relative to executable location

use std::path::{Path, PathBuf};

use playlist_bridge_domain::{
    BridgeError, ClientCredentials, Config, RateLimitSettings, Result, ServerConfig,
};
use url::Url;

use crate::errors::InfraError;

const CONFIG_FILE_NAMES: [&str; 4] =
    ["client_info.json", "client_info.toml", "playlist-bridge.json", "playlist-bridge.toml"];

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If any required
/// variables are missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `BridgeError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - Required fields are missing or empty
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = %e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// # Errors
/// Returns `BridgeError::Config` if a required variable is missing or the
/// result fails validation.
pub fn load_from_env() -> Result<Config> {
    let spotify = ClientCredentials::new(
        env_var("BRIDGE_SPOTIFY_CLIENT_ID")?,
        env_var("BRIDGE_SPOTIFY_CLIENT_SECRET")?,
    );
    let youtube = ClientCredentials::new(
        env_var("BRIDGE_YOUTUBE_CLIENT_ID")?,
        env_var("BRIDGE_YOUTUBE_CLIENT_SECRET")?,
    );

    let defaults = ServerConfig::default();
    let server = ServerConfig {
        bind_addr: std::env::var("BRIDGE_BIND_ADDR").unwrap_or(defaults.bind_addr),
        public_url: std::env::var("BRIDGE_PUBLIC_URL").unwrap_or(defaults.public_url),
        secure_cookies: env_bool("BRIDGE_SECURE_COOKIES", false),
    };

    let config = Config {
        server,
        spotify,
        youtube,
        rate_limit: RateLimitSettings::default(),
        prefer_refresh_token: env_bool("BRIDGE_PREFER_REFRESH_TOKEN", false),
    };
    validate(&config)?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, searches several locations for a config file.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `BridgeError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid or validation fails
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(BridgeError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => find_config_path().ok_or_else(|| {
            BridgeError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path).map_err(InfraError::from)?;

    let config = parse_config(&contents, &config_path)?;
    validate(&config)?;
    Ok(config)
}

/// Check that credentials are present and the public URL is usable.
///
/// # Errors
/// Returns `BridgeError::Config` naming the first offending field.
pub fn validate(config: &Config) -> Result<()> {
    for (name, credentials) in [("spotify", &config.spotify), ("youtube", &config.youtube)] {
        if credentials.client_id.trim().is_empty() {
            return Err(BridgeError::Config(format!("{name}.client_id must not be empty")));
        }
        if credentials.client_secret.trim().is_empty() {
            return Err(BridgeError::Config(format!("{name}.client_secret must not be empty")));
        }
    }

    Url::parse(&config.server.public_url).map_err(|e| {
        BridgeError::Config(format!("Invalid public URL {}: {e}", config.server.public_url))
    })?;

    Ok(())
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => Ok(toml::from_str(contents).map_err(InfraError::from)?),
        "json" => Ok(serde_json::from_str(contents).map_err(InfraError::from)?),
        _ => Err(BridgeError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn find_config_path() -> Option<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.extend([cwd.clone(), cwd.join(".."), cwd.join("../..")]);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            roots.extend([exe_dir.to_path_buf(), exe_dir.join(".."), exe_dir.join("../..")]);
        }
    }

    roots
        .iter()
        .flat_map(|root| CONFIG_FILE_NAMES.iter().map(move |name| root.join(name)))
        .find(|path| path.exists())
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        BridgeError::Config(format!("Missing required environment variable: {}", key))
    })
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Mutex;

    use once_cell::sync::Lazy;
    use tempfile::Builder;

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    const ENV_KEYS: [&str; 8] = [
        "BRIDGE_SPOTIFY_CLIENT_ID",
        "BRIDGE_SPOTIFY_CLIENT_SECRET",
        "BRIDGE_YOUTUBE_CLIENT_ID",
        "BRIDGE_YOUTUBE_CLIENT_SECRET",
        "BRIDGE_BIND_ADDR",
        "BRIDGE_PUBLIC_URL",
        "BRIDGE_SECURE_COOKIES",
        "BRIDGE_PREFER_REFRESH_TOKEN",
    ];

    fn clear_env() {
        for key in ENV_KEYS {
            std::env::remove_var(key);
        }
    }

    fn write_temp(contents: &str, suffix: &str) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_env_bool_parsing() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");

        std::env::set_var("BRIDGE_TEST_BOOL_YES", "Yes");
        std::env::set_var("BRIDGE_TEST_BOOL_OFF", "off");
        std::env::remove_var("BRIDGE_TEST_BOOL_MISSING");

        assert!(env_bool("BRIDGE_TEST_BOOL_YES", false));
        assert!(!env_bool("BRIDGE_TEST_BOOL_OFF", true));
        assert!(env_bool("BRIDGE_TEST_BOOL_MISSING", true));

        std::env::remove_var("BRIDGE_TEST_BOOL_YES");
        std::env::remove_var("BRIDGE_TEST_BOOL_OFF");
    }

    #[test]
    fn test_load_from_env_all_vars_set() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("BRIDGE_SPOTIFY_CLIENT_ID", "sp-id");
        std::env::set_var("BRIDGE_SPOTIFY_CLIENT_SECRET", "sp-secret");
        std::env::set_var("BRIDGE_YOUTUBE_CLIENT_ID", "yt-id");
        std::env::set_var("BRIDGE_YOUTUBE_CLIENT_SECRET", "yt-secret");
        std::env::set_var("BRIDGE_BIND_ADDR", "127.0.0.1:8080");
        std::env::set_var("BRIDGE_PREFER_REFRESH_TOKEN", "true");

        let config = load_from_env();
        clear_env();

        let config = config.unwrap();
        assert_eq!(config.spotify.client_id, "sp-id");
        assert_eq!(config.youtube.client_secret, "yt-secret");
        assert_eq!(config.server.bind_addr, "127.0.0.1:8080");
        assert_eq!(config.server.public_url, "http://localhost:5000");
        assert!(config.prefer_refresh_token);
    }

    #[test]
    fn test_load_from_env_missing_var() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();
        std::env::set_var("BRIDGE_SPOTIFY_CLIENT_ID", "sp-id");

        let result = load_from_env();
        clear_env();

        assert!(matches!(result, Err(BridgeError::Config(ref msg)) if msg.contains("SPOTIFY_CLIENT_SECRET")));
    }

    #[test]
    fn test_load_from_file_json_legacy_shape() {
        let file = write_temp(
            r#"{
                "spotify": {"client_id": "sp-id", "client_secret": "sp-secret"},
                "youtube": {"client_id": "yt-id", "client_secret": "yt-secret"}
            }"#,
            ".json",
        );

        let config = load_from_file(Some(file.path().to_path_buf())).unwrap();

        assert_eq!(config.spotify.client_id, "sp-id");
        assert_eq!(config.server, ServerConfig::default());
        assert_eq!(config.rate_limit, RateLimitSettings::default());
    }

    #[test]
    fn test_load_from_file_toml() {
        let file = write_temp(
            r#"
prefer_refresh_token = true

[server]
public_url = "https://bridge.example.com"

[spotify]
client_id = "sp-id"
client_secret = "sp-secret"
api_base = "http://127.0.0.1:9000"

[youtube]
client_id = "yt-id"
client_secret = "yt-secret"

[rate_limit]
max_attempts = 2
"#,
            ".toml",
        );

        let config = load_from_file(Some(file.path().to_path_buf())).unwrap();

        assert_eq!(config.server.public_url, "https://bridge.example.com");
        assert_eq!(config.spotify.api_base.as_deref(), Some("http://127.0.0.1:9000"));
        assert_eq!(config.rate_limit.max_attempts, 2);
        assert_eq!(config.rate_limit.max_retry_after_secs, 10);
        assert!(config.prefer_refresh_token);
    }

    #[test]
    fn test_load_from_file_rejects_empty_secret() {
        let file = write_temp(
            r#"{
                "spotify": {"client_id": "sp-id", "client_secret": ""},
                "youtube": {"client_id": "yt-id", "client_secret": "yt-secret"}
            }"#,
            ".json",
        );

        let err = load_from_file(Some(file.path().to_path_buf())).unwrap_err();
        assert!(matches!(err, BridgeError::Config(ref msg) if msg.contains("spotify.client_secret")));
    }

    #[test]
    fn test_load_from_file_not_found() {
        let result = load_from_file(Some(PathBuf::from("/nonexistent/client_info.json")));
        assert!(matches!(result, Err(BridgeError::Config(_))));
    }

    #[test]
    fn test_load_from_file_invalid_json() {
        let file = write_temp(r#"{ "this is": "not valid json" "#, ".json");

        let err = load_from_file(Some(file.path().to_path_buf())).unwrap_err();
        assert!(matches!(err, BridgeError::Config(ref msg) if msg.starts_with("Invalid JSON")));
    }

    #[test]
    fn test_validate_rejects_bad_public_url() {
        let mut config: Config = serde_json::from_str(
            r#"{
                "spotify": {"client_id": "a", "client_secret": "b"},
                "youtube": {"client_id": "c", "client_secret": "d"}
            }"#,
        )
        .unwrap();
        config.server.public_url = "not a url".into();

        assert!(matches!(validate(&config), Err(BridgeError::Config(_))));
    }

    #[test]
    fn test_parse_config_unsupported_format() {
        let result = parse_config("some content", Path::new("client_info.yaml"));
        assert!(result.is_err(), "Should fail with unsupported format");
    }
}
