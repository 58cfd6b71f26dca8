//! Shared fixtures for infra integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use playlist_bridge_common::auth::{OAuth2Session, OAuthSessionConfig, RenewalStrategy};
use playlist_bridge_common::testing::MockClock;
use playlist_bridge_domain::ClientCredentials;
use playlist_bridge_infra::http::{AuthorizedCaller, HttpClient, RateLimitPolicy, ResponsePolicy};
use playlist_bridge_infra::integrations::{
    ClientContext, Provider, ServiceClient, SpotifyClient, YouTubeClient,
};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TOKEN_PATH: &str = "/api/token";

/// Token endpoint that always issues `Bearer test-token`.
pub async fn mount_token_endpoint(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token_type": "Bearer",
            "access_token": "test-token",
            "expires_in": 3600,
        })))
        .mount(server)
        .await;
}

/// Session that already holds an authorization code for `server`.
pub async fn authorized_session(server: &MockServer, clock: &MockClock) -> Arc<OAuth2Session> {
    let session = OAuth2Session::new(
        OAuthSessionConfig {
            provider: "testing".into(),
            client_id: "client_id".into(),
            client_secret: "client_secret".into(),
            authorize_url: format!("{}/authorize", server.uri()),
            callback_url: "http://localhost:5000/callback".into(),
            token_url: format!("{}{}", server.uri(), TOKEN_PATH),
            renewal: RenewalStrategy::default(),
        },
        reqwest::Client::new(),
        Arc::new(clock.clone()),
    );
    session.handle_auth_callback(Some("code")).await.expect("callback should store code");
    Arc::new(session)
}

pub async fn caller(
    server: &MockServer,
    clock: &MockClock,
    policy: Arc<dyn ResponsePolicy>,
    rate_limit: RateLimitPolicy,
) -> AuthorizedCaller {
    mount_token_endpoint(server).await;
    let session = authorized_session(server, clock).await;
    AuthorizedCaller::new(
        HttpClient::new().expect("http client should build"),
        session,
        policy,
        rate_limit,
        Arc::new(clock.clone()),
    )
}

pub fn context(clock: &MockClock) -> ClientContext {
    ClientContext {
        http: HttpClient::new().expect("http client should build"),
        clock: Arc::new(clock.clone()),
        rate_limit: RateLimitPolicy::default(),
        renewal: RenewalStrategy::default(),
    }
}

/// A provider client whose every endpoint points at `server`, already past
/// the authorization callback.
pub async fn connected(server: &MockServer, provider: Provider, clock: &MockClock) -> ServiceClient {
    let mut credentials = ClientCredentials::new("client_id", "client_secret");
    credentials.authorize_url = Some(format!("{}/authorize", server.uri()));
    credentials.token_url = Some(format!("{}{}", server.uri(), TOKEN_PATH));
    credentials.api_base = Some(server.uri());

    let client = ServiceClient::connect(
        provider.descriptor().with_overrides(&credentials),
        &credentials,
        format!("http://localhost:5000{}", provider.callback_path()),
        &context(clock),
    );
    client.session().handle_auth_callback(Some("code")).await.expect("callback should store code");
    client
}

pub async fn spotify(server: &MockServer, clock: &MockClock) -> SpotifyClient {
    let client = connected(server, Provider::Spotify, clock).await;
    client.as_spotify().cloned().expect("spotify client")
}

pub async fn youtube(server: &MockServer, clock: &MockClock) -> YouTubeClient {
    let client = connected(server, Provider::YouTube, clock).await;
    client.as_youtube().cloned().expect("youtube client")
}
