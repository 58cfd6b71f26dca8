//! Shared fixtures for route tests.
#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{anyhow, Result};
use axum::body::{to_bytes, Body};
use axum::http::header::{COOKIE, LOCATION, SET_COOKIE};
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use playlist_bridge::{router, AppContext};
use playlist_bridge_common::testing::MockClock;
use playlist_bridge_domain::{ClientCredentials, Config};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub struct TestApp {
    pub router: Router,
    pub ctx: Arc<AppContext>,
    pub clock: MockClock,
}

fn credentials(server: &MockServer, id: &str) -> ClientCredentials {
    let mut credentials = ClientCredentials::new(id, format!("{id}-secret"));
    credentials.authorize_url = Some(format!("{}/authorize", server.uri()));
    credentials.token_url = Some(format!("{}/api/token", server.uri()));
    credentials.api_base = Some(server.uri());
    credentials
}

impl TestApp {
    /// Application whose providers all point at `server`.
    pub fn new(server: &MockServer) -> Self {
        let config = Config {
            server: Default::default(),
            spotify: credentials(server, "spotify-client"),
            youtube: credentials(server, "youtube-client"),
            rate_limit: Default::default(),
            prefer_refresh_token: false,
        };
        let clock = MockClock::new();
        let ctx = Arc::new(
            AppContext::with_clock(config, Arc::new(clock.clone())).expect("context should build"),
        );
        Self { router: router(ctx.clone()), ctx, clock }
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Result<Response> {
        self.send(Method::GET, uri, cookie, None).await
    }

    pub async fn post_form(&self, uri: &str, cookie: Option<&str>, form: &str) -> Result<Response> {
        self.send(Method::POST, uri, cookie, Some(form)).await
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        cookie: Option<&str>,
        form: Option<&str>,
    ) -> Result<Response> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(COOKIE, cookie);
        }
        let body = match form {
            Some(form) => {
                builder = builder.header("content-type", "application/x-www-form-urlencoded");
                Body::from(form.to_string())
            }
            None => Body::empty(),
        };
        Ok(self.router.clone().oneshot(builder.body(body)?).await?)
    }

    /// Start a session and return its `name=value` cookie pair.
    pub async fn create_session(&self) -> Result<String> {
        let response = self.get("/create_session", None).await?;
        assert_eq!(response.status(), StatusCode::FOUND);
        session_cookie(&response)
    }

    /// Create a session with both providers past the authorization callback.
    pub async fn authorized_session(&self) -> Result<String> {
        let cookie = self.create_session().await?;
        for provider in ["spotify", "youtube"] {
            let response = self.get(&format!("/auth/{provider}"), Some(&cookie)).await?;
            assert_eq!(response.status(), StatusCode::FOUND);
            let response = self
                .get(&format!("/{provider}-authorization-callback?code={provider}-code"), Some(&cookie))
                .await?;
            assert_eq!(location(&response).as_deref(), Some("/"));
        }
        Ok(cookie)
    }
}

pub fn session_cookie(response: &Response) -> Result<String> {
    let header = response
        .headers()
        .get(SET_COOKIE)
        .ok_or_else(|| anyhow!("no set-cookie header"))?
        .to_str()?;
    let pair = header.split(';').next().unwrap_or_default();
    Ok(pair.trim().to_string())
}

pub fn location(response: &Response) -> Option<String> {
    response.headers().get(LOCATION).and_then(|v| v.to_str().ok()).map(str::to_string)
}

pub async fn body_text(response: Response) -> Result<String> {
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    Ok(String::from_utf8(bytes.to_vec())?)
}

pub async fn body_json(response: Response) -> Result<Value> {
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

pub async fn mount_token_endpoint(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token_type": "Bearer",
            "access_token": "route-token",
            "expires_in": 3600,
        })))
        .mount(server)
        .await;
}
