//! OAuth session and authorized-request errors

use thiserror::Error;

/// Failure taxonomy of the OAuth session and the calls made through it
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OAuthError {
    /// No authorization code has been received for this session yet.
    #[error("Not authorized")]
    NotAuthorized,

    /// The provider callback arrived without a usable code.
    #[error("Authorization failed")]
    AuthorizationFailed,

    /// The token endpoint rejected the exchange or returned garbage.
    #[error("Access token request failed: {reason}")]
    AccessTokenRequestFailed { reason: String },

    /// An authorized GET failed.
    #[error("Request failed: {0}")]
    RequestFailed(RequestFailure),

    /// An authorized POST was not accepted.
    #[error("POST request failed: {0}")]
    PostRequestFailed(RequestFailure),
}

impl OAuthError {
    pub(crate) fn token_request(reason: impl Into<String>) -> Self {
        Self::AccessTokenRequestFailed { reason: reason.into() }
    }

    /// Whether this is a request given up on because of sustained rate
    /// limiting, as opposed to a hard failure.
    #[must_use]
    pub fn is_rate_limit_exhaustion(&self) -> bool {
        match self {
            Self::RequestFailed(reason) => reason.is_rate_limit_exhaustion(),
            _ => false,
        }
    }
}

/// Why an authorized request failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestFailure {
    /// The provider answered with a failure status.
    #[error("unexpected status {0}")]
    Status(u16),

    /// A success response whose body is not JSON.
    #[error("response body is not valid JSON")]
    InvalidBody,

    /// JSON that lacks a field the client needs.
    #[error("response is missing {0}")]
    UnexpectedShape(String),

    /// A 429 without a parseable `Retry-After`.
    #[error("rate limited without a usable Retry-After header")]
    MissingRetryAfter,

    /// The requested wait is above the configured ceiling.
    #[error("Retry-After of {wait_secs}s exceeds the {ceiling_secs}s ceiling")]
    RetryAfterTooLong { wait_secs: u64, ceiling_secs: u64 },

    /// Every allowed attempt was rate limited.
    #[error("still rate limited after {attempts} attempts")]
    AttemptsExhausted { attempts: u32 },

    /// Waiting again would exceed the total wait budget.
    #[error("rate-limit waits would exceed the {budget_secs}s budget")]
    WaitBudgetExceeded { budget_secs: u64 },

    /// The request never got a response.
    #[error("transport error: {0}")]
    Transport(String),
}

impl RequestFailure {
    /// Whether the rate-limit loop gave up.
    #[must_use]
    pub fn is_rate_limit_exhaustion(&self) -> bool {
        matches!(
            self,
            Self::RetryAfterTooLong { .. }
                | Self::AttemptsExhausted { .. }
                | Self::WaitBudgetExceeded { .. }
        )
    }
}
