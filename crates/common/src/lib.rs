//! Shared building blocks for the playlist bridge crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: namespaced session store, session identifiers
//! - `runtime`: clock abstraction, OAuth 2.0 session lifecycle
//! - `test-utils`: deterministic clock for tests

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Foundation tier
// -----------------------------------------------------------------
#[cfg(feature = "foundation")]
pub mod storage;

// Runtime tier
// --------------------------------------------------------------------
#[cfg(feature = "runtime")]
pub mod auth;
#[cfg(feature = "runtime")]
pub mod time;

// Testing utilities
// ---------------------------------------------------------------
#[cfg(any(feature = "test-utils", all(test, feature = "runtime")))]
pub mod testing;

// Re-export commonly used types and traits for convenience
// ------------------------
#[cfg(feature = "runtime")]
pub use auth::{OAuth2Session, OAuthError, OAuthSessionConfig, RequestFailure, TokenState};
#[cfg(feature = "foundation")]
pub use storage::{Entry, Namespace, NamespacedStore, SessionId, StoreError};
#[cfg(feature = "runtime")]
pub use time::{Clock, SystemClock};
