//! Outbound HTTP client wrapper over reqwest

use std::time::Duration;

use playlist_bridge_domain::BridgeError;
use reqwest::header::HeaderMap;
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use tracing::debug;

use crate::errors::InfraError;

/// Shared HTTP client with timeout and default headers.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: ReqwestClient,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Convenience constructor with default configuration.
    pub fn new() -> Result<Self, BridgeError> {
        Self::builder().build()
    }

    /// The underlying reqwest client, for components that issue their own
    /// requests (e.g. the OAuth token exchange).
    pub fn inner(&self) -> &ReqwestClient {
        &self.client
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Execute the provided request builder once.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, BridgeError> {
        let request = builder.build().map_err(|err| BridgeError::from(InfraError::from(err)))?;

        let method = request.method().clone();
        let url = redacted_url(request.url());
        debug!(%method, %url, "sending HTTP request");

        match self.client.execute(request).await {
            Ok(response) => {
                let status = response.status();
                debug!(%method, %url, %status, "received HTTP response");
                Ok(response)
            }
            Err(err) => {
                debug!(%method, %url, error = %err, "HTTP request failed");
                Err(InfraError::from(err).into())
            }
        }
    }
}

/// URL without its query string; search terms and ids stay out of logs.
fn redacted_url(url: &reqwest::Url) -> String {
    let mut url = url.clone();
    url.set_query(None);
    url.to_string()
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    user_agent: Option<String>,
    default_headers: Option<HeaderMap>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: Some(concat!("playlist-bridge/", env!("CARGO_PKG_VERSION")).to_string()),
            default_headers: None,
        }
    }
}

impl HttpClientBuilder {
    /// Per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// `User-Agent` header value.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Headers sent with every request.
    pub fn default_headers(mut self, headers: HeaderMap) -> Self {
        self.default_headers = Some(headers);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<HttpClient, BridgeError> {
        let mut builder = ReqwestClient::builder().timeout(self.timeout).no_proxy();

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        if let Some(headers) = self.default_headers {
            builder = builder.default_headers(headers);
        }

        let client = builder.build().map_err(|err| BridgeError::from(InfraError::from(err)))?;

        Ok(HttpClient { client })
    }
}

#[cfg(test)]
mod tests {
    use reqwest::header::{HeaderValue, USER_AGENT};
    use reqwest::StatusCode;
    use wiremock::matchers::{header, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[tokio::test]
    async fn sends_single_request_and_returns_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let response = client.send(client.request(Method::GET, server.uri())).await.unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn applies_user_agent_and_default_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("user-agent", "bridge-test"))
            .and(header("x-extra", "1"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let mut headers = HeaderMap::new();
        headers.insert("x-extra", HeaderValue::from_static("1"));
        let client =
            HttpClient::builder().user_agent("bridge-test").default_headers(headers).build().unwrap();

        let response = client.send(client.request(Method::GET, server.uri())).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests[0].headers.get(USER_AGENT).unwrap(), "bridge-test");
    }

    #[tokio::test]
    async fn connection_errors_map_to_network_error() {
        let client = HttpClient::builder().timeout(Duration::from_millis(200)).build().unwrap();

        let err = client.send(client.request(Method::GET, "http://127.0.0.1:9")).await.unwrap_err();

        assert!(matches!(err, BridgeError::Network(_)));
    }

    #[test]
    fn redacted_url_drops_query() {
        let url = reqwest::Url::parse("https://api.example.com/v1/search?q=secret").unwrap();
        assert_eq!(redacted_url(&url), "https://api.example.com/v1/search");
    }
}
