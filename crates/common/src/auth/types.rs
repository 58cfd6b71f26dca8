//! OAuth 2.0 types and structures
//!
//! Token state, token endpoint responses, per-provider session
//! configuration and the redirect value handed back by `authorize`.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// One OAuth 2.0 token as accepted from the token endpoint
///
/// `issued_at` is the local time the response was accepted, not a time
/// reported by the provider.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenState {
    /// Token type, used verbatim as the `Authorization` scheme (e.g. "Bearer")
    pub kind: String,
    /// Bearer credential sent with API calls.
    pub access_secret: String,
    /// Refresh credential, when the provider issued one.
    pub refresh_secret: Option<String>,
    /// Local time the token was accepted.
    pub issued_at: DateTime<Utc>,
    /// Lifetime from `issued_at`.
    pub valid_for: Duration,
}

impl TokenState {
    /// Whether the token is past its validity window at `now`.
    ///
    /// The comparison is strict: a token is still valid at exactly
    /// `issued_at + valid_for`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        let Ok(valid_for) = TimeDelta::from_std(self.valid_for) else {
            return false;
        };
        now - self.issued_at > valid_for
    }

    /// `"<kind> <access_secret>"`, the value of the `Authorization` header.
    #[must_use]
    pub fn header_value(&self) -> String {
        format!("{} {}", self.kind, self.access_secret)
    }

    /// Instant the token stops being valid.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        TimeDelta::from_std(self.valid_for).ok().map(|delta| self.issued_at + delta)
    }
}

impl fmt::Debug for TokenState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenState")
            .field("kind", &self.kind)
            .field("access_secret", &"<redacted>")
            .field("refresh_secret", &self.refresh_secret.as_ref().map(|_| "<redacted>"))
            .field("issued_at", &self.issued_at)
            .field("valid_for", &self.valid_for)
            .finish()
    }
}

/// OAuth token response from the authorization server (RFC 6749 §5.1)
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    /// Token type, e.g. "Bearer".
    pub token_type: String,
    /// The access token itself.
    pub access_token: String,
    /// Lifetime in seconds
    pub expires_in: u64,
    /// Refresh token, when issued.
    #[serde(default)]
    pub refresh_token: Option<String>,
}

impl TokenResponse {
    /// Token state issued at `issued_at`.
    #[must_use]
    pub fn into_token_state(self, issued_at: DateTime<Utc>) -> TokenState {
        TokenState {
            kind: self.token_type,
            access_secret: self.access_token,
            refresh_secret: self.refresh_token,
            issued_at,
            valid_for: Duration::from_secs(self.expires_in),
        }
    }
}

/// How an expired token is re-acquired
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenewalStrategy {
    /// Replay the stored authorization code against the token endpoint.
    #[default]
    ReauthorizeWithCode,
    /// Use the `refresh_token` grant when a refresh secret was issued,
    /// falling back to the authorization code otherwise.
    PreferRefreshToken,
}

/// Static per-provider configuration of an [`OAuth2Session`](super::OAuth2Session)
#[derive(Clone)]
pub struct OAuthSessionConfig {
    /// Provider name, used in logs and status output
    pub provider: String,
    /// OAuth client id.
    pub client_id: String,
    /// OAuth client secret.
    pub client_secret: String,
    /// Consent page of the provider.
    pub authorize_url: String,
    /// Where the provider sends the authorization code.
    pub callback_url: String,
    /// Token endpoint of the provider.
    pub token_url: String,
    /// How an expired token is re-acquired.
    pub renewal: RenewalStrategy,
}

impl fmt::Debug for OAuthSessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthSessionConfig")
            .field("provider", &self.provider)
            .field("client_id", &self.client_id)
            .field("authorize_url", &self.authorize_url)
            .field("callback_url", &self.callback_url)
            .field("token_url", &self.token_url)
            .field("renewal", &self.renewal)
            .finish_non_exhaustive()
    }
}

/// Redirect to the provider's consent page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    /// Target URL, query included.
    pub location: String,
    /// Always [`Redirect::FOUND`].
    pub status: u16,
}

impl Redirect {
    /// HTTP 302 Found
    pub const FOUND: u16 = 302;

    /// A `302` to `location`.
    #[must_use]
    pub fn found(location: impl Into<String>) -> Self {
        Self { location: location.into(), status: Self::FOUND }
    }
}

/// Snapshot of where a session is in its lifecycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionStatus {
    /// Provider name.
    pub provider: String,
    /// An authorization code has been received.
    pub authenticated: bool,
    /// A token is currently held (it may be expired).
    pub has_token: bool,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<OAuth2Session {} (authenticated: {}, has_token: {})>",
            self.provider, self.authenticated, self.has_token
        )
    }
}
