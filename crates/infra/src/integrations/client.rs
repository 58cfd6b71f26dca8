//! Provider client factory

use std::sync::Arc;

use playlist_bridge_common::auth::{OAuth2Session, OAuthSessionConfig, Redirect, RenewalStrategy};
use playlist_bridge_common::time::Clock;
use playlist_bridge_domain::ClientCredentials;
use tracing::debug;

use super::providers::{Provider, ProviderDescriptor};
use super::spotify::SpotifyClient;
use super::youtube::YouTubeClient;
use crate::http::{AuthorizedCaller, HttpClient, RateLimitPolicy};

/// Process-wide collaborators shared by every provider client
#[derive(Clone)]
pub struct ClientContext {
    /// Shared outbound HTTP client.
    pub http: HttpClient,
    /// Time source for token expiry and rate-limit waits.
    pub clock: Arc<dyn Clock>,
    /// Limits of the rate-limit retry loop.
    pub rate_limit: RateLimitPolicy,
    /// How sessions re-acquire expired tokens.
    pub renewal: RenewalStrategy,
}

/// A provider client bound to a fresh OAuth session
#[derive(Debug, Clone)]
pub enum ServiceClient {
    /// Spotify Web API client.
    Spotify(SpotifyClient),
    /// YouTube Data API client.
    YouTube(YouTubeClient),
}

impl ServiceClient {
    /// Create a client with an unauthorized session for `descriptor`'s
    /// provider.
    pub fn connect(
        descriptor: ProviderDescriptor,
        credentials: &ClientCredentials,
        callback_url: impl Into<String>,
        ctx: &ClientContext,
    ) -> Self {
        let provider = descriptor.provider;
        let session = Arc::new(OAuth2Session::new(
            OAuthSessionConfig {
                provider: provider.name().to_string(),
                client_id: credentials.client_id.clone(),
                client_secret: credentials.client_secret.clone(),
                authorize_url: descriptor.authorize_url.clone(),
                callback_url: callback_url.into(),
                token_url: descriptor.token_url.clone(),
                renewal: ctx.renewal,
            },
            ctx.http.inner().clone(),
            ctx.clock.clone(),
        ));

        let caller = AuthorizedCaller::new(
            ctx.http.clone(),
            session,
            provider.response_policy(),
            ctx.rate_limit,
            ctx.clock.clone(),
        );
        debug!(%provider, "created provider client");

        match provider {
            Provider::Spotify => Self::Spotify(SpotifyClient::new(caller, descriptor)),
            Provider::YouTube => Self::YouTube(YouTubeClient::new(caller, descriptor)),
        }
    }

    /// Provider this client talks to.
    pub fn provider(&self) -> Provider {
        self.descriptor().provider
    }

    /// Endpoints the client talks to.
    pub fn descriptor(&self) -> &ProviderDescriptor {
        match self {
            Self::Spotify(client) => client.descriptor(),
            Self::YouTube(client) => client.descriptor(),
        }
    }

    /// The OAuth session shared with the client's caller.
    pub fn session(&self) -> &Arc<OAuth2Session> {
        match self {
            Self::Spotify(client) => client.caller().session(),
            Self::YouTube(client) => client.caller().session(),
        }
    }

    /// Redirect to the provider's consent page with its scopes and extra
    /// authorize parameters.
    pub fn authorize(&self) -> Redirect {
        let descriptor = self.descriptor();
        self.session().authorize(&descriptor.scope_refs(), &descriptor.extra_param_refs())
    }

    /// The Spotify client, if this is one.
    pub fn as_spotify(&self) -> Option<&SpotifyClient> {
        match self {
            Self::Spotify(client) => Some(client),
            Self::YouTube(_) => None,
        }
    }

    /// The YouTube client, if this is one.
    pub fn as_youtube(&self) -> Option<&YouTubeClient> {
        match self {
            Self::YouTube(client) => Some(client),
            Self::Spotify(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use playlist_bridge_common::testing::MockClock;

    use super::*;

    fn ctx() -> ClientContext {
        ClientContext {
            http: HttpClient::new().unwrap(),
            clock: Arc::new(MockClock::new()),
            rate_limit: RateLimitPolicy::default(),
            renewal: RenewalStrategy::default(),
        }
    }

    #[test]
    fn youtube_authorize_carries_scope_and_response_type() {
        let client = ServiceClient::connect(
            Provider::YouTube.descriptor(),
            &ClientCredentials::new("yt-id", "yt-secret"),
            "http://localhost:5000/youtube-authorization-callback",
            &ctx(),
        );

        let redirect = client.authorize();
        let url = url::Url::parse(&redirect.location).unwrap();
        let query: HashMap<String, String> = url.query_pairs().into_owned().collect();

        assert_eq!(url.host_str(), Some("accounts.google.com"));
        assert_eq!(query["client_id"], "yt-id");
        assert_eq!(query["response_type"], "code");
        assert_eq!(query["scope"], "https://www.googleapis.com/auth/youtube.readonly");
        assert!(client.as_youtube().is_some());
        assert!(client.as_spotify().is_none());
    }

    #[test]
    fn spotify_client_uses_space_joined_scopes() {
        let client = ServiceClient::connect(
            Provider::Spotify.descriptor(),
            &ClientCredentials::new("sp-id", "sp-secret"),
            "http://localhost:5000/spotify-authorization-callback",
            &ctx(),
        );

        let redirect = client.authorize();
        let url = url::Url::parse(&redirect.location).unwrap();
        let query: HashMap<String, String> = url.query_pairs().into_owned().collect();

        assert_eq!(client.provider(), Provider::Spotify);
        assert_eq!(client.session().provider(), "spotify");
        assert!(query["scope"].starts_with("playlist-read-private playlist-read-collaborative"));
        assert_eq!(query.len(), 4);
    }
}
