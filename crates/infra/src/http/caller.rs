//! Authorized GET/POST with rate-limit retry and error classification
//!
//! Every attempt fetches the `Authorization` header from the session, which
//! may trigger a token exchange. GET responses are classified by a
//! per-provider [`ResponsePolicy`]; a rate-limited response is retried after
//! the server's `Retry-After`, within the bounds of [`RateLimitPolicy`].
//! POST is never retried.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use playlist_bridge_common::auth::{OAuth2Session, OAuthError, RequestFailure};
use playlist_bridge_common::time::Clock;
use playlist_bridge_domain::RateLimitSettings;
use reqwest::header::{HeaderMap, CONTENT_TYPE, RETRY_AFTER};
use reqwest::{Method, Response, StatusCode};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::client::HttpClient;

/// Bounds on the rate-limit retry loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    /// Total attempts, the first one included.
    pub max_attempts: u32,
    /// A `Retry-After` above this gives up without waiting.
    pub max_retry_after: Duration,
    /// Upper bound on the sum of all waits for one call.
    pub max_total_wait: Duration,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        RateLimitSettings::default().into()
    }
}

impl From<RateLimitSettings> for RateLimitPolicy {
    fn from(settings: RateLimitSettings) -> Self {
        Self {
            max_attempts: settings.max_attempts.max(1),
            max_retry_after: Duration::from_secs(settings.max_retry_after_secs),
            max_total_wait: Duration::from_secs(settings.max_total_wait_secs),
        }
    }
}

/// How a GET response status is treated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseClass {
    /// Parse the body and return it.
    Success,
    /// Wait for `Retry-After` and try again.
    RateLimited,
    /// Give up with the status.
    Failure,
}

/// Provider-specific status handling for GET requests
pub trait ResponsePolicy: Send + Sync + fmt::Debug {
    /// Decide what to do with a GET response status.
    fn classify(&self, status: StatusCode) -> ResponseClass;
}

/// 200 succeeds, 429 waits and retries, everything else fails.
///
/// 427 is not a rate-limit status and fails like any other.
#[derive(Debug, Clone, Copy, Default)]
pub struct RetryOnRateLimit;

impl ResponsePolicy for RetryOnRateLimit {
    fn classify(&self, status: StatusCode) -> ResponseClass {
        match status {
            StatusCode::OK => ResponseClass::Success,
            StatusCode::TOO_MANY_REQUESTS => ResponseClass::RateLimited,
            _ => ResponseClass::Failure,
        }
    }
}

/// 200 succeeds, everything else fails without retry.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailFast;

impl ResponsePolicy for FailFast {
    fn classify(&self, status: StatusCode) -> ResponseClass {
        if status == StatusCode::OK {
            ResponseClass::Success
        } else {
            ResponseClass::Failure
        }
    }
}

/// Body of a successful POST
#[derive(Debug, Clone, PartialEq)]
pub enum PostResponse {
    /// Parsed JSON body.
    Json(Value),
    /// The write succeeded but the body was not JSON.
    Raw(String),
}

/// Makes authenticated calls on behalf of one [`OAuth2Session`]
#[derive(Clone)]
pub struct AuthorizedCaller {
    http: HttpClient,
    session: Arc<OAuth2Session>,
    policy: Arc<dyn ResponsePolicy>,
    rate_limit: RateLimitPolicy,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for AuthorizedCaller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizedCaller")
            .field("provider", &self.session.provider())
            .field("policy", &self.policy)
            .field("rate_limit", &self.rate_limit)
            .finish_non_exhaustive()
    }
}

impl AuthorizedCaller {
    /// Caller for `session` with the given status policy and retry limits.
    pub fn new(
        http: HttpClient,
        session: Arc<OAuth2Session>,
        policy: Arc<dyn ResponsePolicy>,
        rate_limit: RateLimitPolicy,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { http, session, policy, rate_limit, clock }
    }

    /// Session whose token authorizes every call.
    pub fn session(&self) -> &Arc<OAuth2Session> {
        &self.session
    }

    /// GET `url` with query `params` and parse the JSON body.
    ///
    /// # Errors
    /// - any session error from acquiring the token
    /// - [`OAuthError::RequestFailed`] for failure statuses, non-JSON bodies,
    ///   transport errors and exhausted rate-limit retries
    #[instrument(skip_all, fields(provider = %self.session.provider(), url = %url))]
    pub async fn get(&self, url: &str, params: &[(&str, &str)]) -> Result<Value, OAuthError> {
        let mut attempt: u32 = 0;
        let mut waited = Duration::ZERO;

        loop {
            attempt += 1;
            let (name, value) = self.session.auth_header().await?;
            let request = self.http.request(Method::GET, url).query(params).header(name, value);
            let response = self.http.send(request).await.map_err(|e| {
                OAuthError::RequestFailed(RequestFailure::Transport(e.to_string()))
            })?;
            let status = response.status();

            match self.policy.classify(status) {
                ResponseClass::Success => return parse_json(response).await,
                ResponseClass::Failure => {
                    debug!(status = status.as_u16(), attempt, "request failed");
                    return Err(OAuthError::RequestFailed(RequestFailure::Status(status.as_u16())));
                }
                ResponseClass::RateLimited => {
                    let wait = self.admit_retry(response.headers(), attempt, waited)?;
                    warn!(attempt, wait_secs = wait.as_secs(), "rate limited, waiting to retry");
                    self.clock.sleep(wait).await;
                    waited += wait;
                }
            }
        }
    }

    /// POST `body` as JSON to `url`.
    ///
    /// 200 and 201 succeed; the body is returned parsed, or raw if it is not
    /// JSON.
    ///
    /// # Errors
    /// - any session error from acquiring the token
    /// - [`OAuthError::PostRequestFailed`] for any other status or a
    ///   transport error
    #[instrument(skip_all, fields(provider = %self.session.provider(), url = %url))]
    pub async fn post(&self, url: &str, body: &Value) -> Result<PostResponse, OAuthError> {
        let (name, value) = self.session.auth_header().await?;
        let request = self
            .http
            .request(Method::POST, url)
            .header(name, value)
            .header(CONTENT_TYPE, "application/json")
            .json(body);
        let response = self
            .http
            .send(request)
            .await
            .map_err(|e| OAuthError::PostRequestFailed(RequestFailure::Transport(e.to_string())))?;

        let status = response.status();
        if !matches!(status, StatusCode::OK | StatusCode::CREATED) {
            debug!(status = status.as_u16(), "post rejected");
            return Err(OAuthError::PostRequestFailed(RequestFailure::Status(status.as_u16())));
        }

        let text = response
            .text()
            .await
            .map_err(|e| OAuthError::PostRequestFailed(RequestFailure::Transport(e.to_string())))?;

        Ok(match serde_json::from_str(&text) {
            Ok(json) => PostResponse::Json(json),
            Err(_) => PostResponse::Raw(text),
        })
    }

    /// Decide whether a rate-limited attempt may be retried, and after how
    /// long.
    fn admit_retry(
        &self,
        headers: &HeaderMap,
        attempt: u32,
        waited: Duration,
    ) -> Result<Duration, OAuthError> {
        let wait = retry_after(headers)
            .ok_or(OAuthError::RequestFailed(RequestFailure::MissingRetryAfter))?;

        let failure = if wait > self.rate_limit.max_retry_after {
            Some(RequestFailure::RetryAfterTooLong {
                wait_secs: wait.as_secs(),
                ceiling_secs: self.rate_limit.max_retry_after.as_secs(),
            })
        } else if attempt >= self.rate_limit.max_attempts {
            Some(RequestFailure::AttemptsExhausted { attempts: attempt })
        } else if waited + wait > self.rate_limit.max_total_wait {
            Some(RequestFailure::WaitBudgetExceeded {
                budget_secs: self.rate_limit.max_total_wait.as_secs(),
            })
        } else {
            None
        };

        match failure {
            Some(reason) => {
                warn!(attempt, reason = %reason, "giving up on rate-limited request");
                Err(OAuthError::RequestFailed(reason))
            }
            None => Ok(wait),
        }
    }
}

/// `Retry-After` as a whole number of seconds.
fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

async fn parse_json(response: Response) -> Result<Value, OAuthError> {
    let text = response
        .text()
        .await
        .map_err(|e| OAuthError::RequestFailed(RequestFailure::Transport(e.to_string())))?;
    serde_json::from_str(&text).map_err(|_| OAuthError::RequestFailed(RequestFailure::InvalidBody))
}
