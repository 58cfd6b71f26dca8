//! Provider catalog and factory data

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use playlist_bridge_domain::{BridgeError, ClientCredentials};
use serde::{Deserialize, Serialize};

use crate::http::{FailFast, ResponsePolicy, RetryOnRateLimit};

/// Supported OAuth service providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Spotify Web API.
    Spotify,
    /// YouTube Data API v3.
    YouTube,
}

impl Provider {
    /// Every provider, in display order.
    pub const ALL: [Provider; 2] = [Provider::Spotify, Provider::YouTube];

    /// Key used in the session store and in URLs.
    pub fn name(self) -> &'static str {
        match self {
            Self::Spotify => "spotify",
            Self::YouTube => "youtube",
        }
    }

    /// Path of the authorization callback route, relative to the public URL.
    pub fn callback_path(self) -> &'static str {
        match self {
            Self::Spotify => "/spotify-authorization-callback",
            Self::YouTube => "/youtube-authorization-callback",
        }
    }

    /// Production endpoints, scopes and authorize parameters.
    pub fn descriptor(self) -> ProviderDescriptor {
        match self {
            Self::Spotify => ProviderDescriptor {
                provider: self,
                authorize_url: "https://accounts.spotify.com/authorize".to_string(),
                token_url: "https://accounts.spotify.com/api/token".to_string(),
                api_base: "https://api.spotify.com".to_string(),
                scopes: vec![
                    "playlist-read-private".to_string(),
                    "playlist-read-collaborative".to_string(),
                    "playlist-modify-public".to_string(),
                    "playlist-modify-private".to_string(),
                ],
                extra_authorize_params: Vec::new(),
            },
            Self::YouTube => ProviderDescriptor {
                provider: self,
                authorize_url: "https://accounts.google.com/o/oauth2/v2/auth".to_string(),
                token_url: "https://accounts.google.com/o/oauth2/token".to_string(),
                api_base: "https://www.googleapis.com".to_string(),
                scopes: vec!["https://www.googleapis.com/auth/youtube.readonly".to_string()],
                extra_authorize_params: vec![("response_type".to_string(), "code".to_string())],
            },
        }
    }

    /// Status handling for GET requests against this provider's API.
    pub fn response_policy(self) -> Arc<dyn ResponsePolicy> {
        match self {
            Self::Spotify => Arc::new(RetryOnRateLimit),
            Self::YouTube => Arc::new(FailFast),
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Provider {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "spotify" => Ok(Self::Spotify),
            "youtube" => Ok(Self::YouTube),
            _ => Err(BridgeError::InvalidInput(format!("unknown provider: {s}"))),
        }
    }
}

/// Endpoint catalog of one provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderDescriptor {
    /// Provider these endpoints belong to.
    pub provider: Provider,
    /// Consent page.
    pub authorize_url: String,
    /// Token endpoint.
    pub token_url: String,
    /// Scheme and host prefixed to every API path.
    pub api_base: String,
    /// Scopes requested at authorization.
    pub scopes: Vec<String>,
    /// Extra query parameters of the consent redirect.
    pub extra_authorize_params: Vec<(String, String)>,
}

impl ProviderDescriptor {
    /// Apply endpoint overrides from configured credentials.
    #[must_use]
    pub fn with_overrides(mut self, credentials: &ClientCredentials) -> Self {
        if let Some(url) = &credentials.authorize_url {
            self.authorize_url = url.clone();
        }
        if let Some(url) = &credentials.token_url {
            self.token_url = url.clone();
        }
        if let Some(base) = &credentials.api_base {
            self.api_base = base.trim_end_matches('/').to_string();
        }
        self
    }

    /// Absolute URL of an API `path`.
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    /// Scopes as borrowed strings.
    pub fn scope_refs(&self) -> Vec<&str> {
        self.scopes.iter().map(String::as_str).collect()
    }

    /// Extra authorize parameters as borrowed pairs.
    pub fn extra_param_refs(&self) -> Vec<(&str, &str)> {
        self.extra_authorize_params.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_names_round_trip_through_from_str() {
        for provider in Provider::ALL {
            assert_eq!(provider.name().parse::<Provider>(), Ok(provider));
        }
        assert!(matches!("myspace".parse::<Provider>(), Err(BridgeError::InvalidInput(_))));
    }

    #[test]
    fn youtube_requests_code_response_type_explicitly() {
        let youtube = Provider::YouTube.descriptor();
        let spotify = Provider::Spotify.descriptor();

        assert_eq!(youtube.extra_param_refs(), vec![("response_type", "code")]);
        assert!(spotify.extra_authorize_params.is_empty());
    }

    #[test]
    fn overrides_replace_endpoints() {
        let mut credentials = ClientCredentials::new("id", "secret");
        credentials.token_url = Some("http://127.0.0.1:9999/token".into());
        credentials.api_base = Some("http://127.0.0.1:9999/".into());

        let descriptor = Provider::Spotify.descriptor().with_overrides(&credentials);

        assert_eq!(descriptor.token_url, "http://127.0.0.1:9999/token");
        assert_eq!(descriptor.authorize_url, "https://accounts.spotify.com/authorize");
        assert_eq!(descriptor.api_url("/v1/me"), "http://127.0.0.1:9999/v1/me");
    }
}
