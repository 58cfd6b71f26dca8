//! Configuration structures
//!
//! The on-disk shape is a superset of the legacy `client_info.json`
//! (`{"spotify": {...}, "youtube": {...}}`): every section other than the
//! provider credentials is optional and falls back to defaults.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_BIND_ADDR, DEFAULT_MAX_RETRY_AFTER_SECS, DEFAULT_MAX_TOTAL_WAIT_SECS,
    DEFAULT_PUBLIC_URL, DEFAULT_RATE_LIMIT_MAX_ATTEMPTS,
};

/// Root application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP listener and cookie settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Spotify application credentials.
    pub spotify: ClientCredentials,
    /// Google application credentials for YouTube.
    pub youtube: ClientCredentials,
    /// Limits of the rate-limit retry loop.
    #[serde(default)]
    pub rate_limit: RateLimitSettings,
    /// Renew expired tokens with the refresh secret when one was issued,
    /// instead of replaying the stored authorization code.
    #[serde(default)]
    pub prefer_refresh_token: bool,
}

/// HTTP server settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Socket address the server listens on.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    /// Externally reachable base URL, used to build OAuth callback URLs.
    #[serde(default = "default_public_url")]
    pub public_url: String,
    /// Mark the session cookie `Secure`.
    #[serde(default)]
    pub secure_cookies: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            public_url: default_public_url(),
            secure_cookies: false,
        }
    }
}

/// OAuth client credentials for one provider, plus optional endpoint
/// overrides (used against sandboxes and in tests).
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientCredentials {
    /// OAuth client id.
    pub client_id: String,
    /// OAuth client secret.
    pub client_secret: String,
    /// Overrides the provider's consent page URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorize_url: Option<String>,
    /// Overrides the provider's token endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_url: Option<String>,
    /// Overrides the provider's API scheme and host.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
}

impl ClientCredentials {
    /// Credentials using the provider's production endpoints.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            authorize_url: None,
            token_url: None,
            api_base: None,
        }
    }
}

impl fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("authorize_url", &self.authorize_url)
            .field("token_url", &self.token_url)
            .field("api_base", &self.api_base)
            .finish()
    }
}

/// Bounds on the rate-limit retry loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitSettings {
    /// Total GET attempts, the first included.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// A `Retry-After` above this ceiling gives up immediately.
    #[serde(default = "default_max_retry_after_secs")]
    pub max_retry_after_secs: u64,
    /// Cap on the sum of all waits for one request.
    #[serde(default = "default_max_total_wait_secs")]
    pub max_total_wait_secs: u64,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            max_retry_after_secs: default_max_retry_after_secs(),
            max_total_wait_secs: default_max_total_wait_secs(),
        }
    }
}

fn default_bind_addr() -> String {
    DEFAULT_BIND_ADDR.to_string()
}

fn default_public_url() -> String {
    DEFAULT_PUBLIC_URL.to_string()
}

fn default_max_attempts() -> u32 {
    DEFAULT_RATE_LIMIT_MAX_ATTEMPTS
}

fn default_max_retry_after_secs() -> u64 {
    DEFAULT_MAX_RETRY_AFTER_SECS
}

fn default_max_total_wait_secs() -> u64 {
    DEFAULT_MAX_TOTAL_WAIT_SECS
}
