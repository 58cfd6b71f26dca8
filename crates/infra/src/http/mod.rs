//! Outbound HTTP: a thin reqwest wrapper and the authorized caller built on it

pub mod caller;
pub mod client;

pub use caller::{
    AuthorizedCaller, FailFast, PostResponse, RateLimitPolicy, ResponseClass, ResponsePolicy,
    RetryOnRateLimit,
};
pub use client::{HttpClient, HttpClientBuilder};
