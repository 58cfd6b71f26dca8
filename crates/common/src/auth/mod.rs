//! OAuth 2.0 authorization-code session lifecycle
//!
//! An [`OAuth2Session`] walks one end user through the authorization-code
//! grant against one provider and keeps the resulting token fresh:
//!
//! ```text
//! Unauthorized ──callback──► CodeReceived ──exchange──► Authorized
//!                                 ▲                         │
//!                                 └──────── expiry ─────────┘
//! ```
//!
//! Expired tokens are discarded the moment they are touched and re-acquired
//! with the stored authorization code. Under
//! [`RenewalStrategy::PreferRefreshToken`] the refresh secret is tried first.
//!
//! The session holds no storage of its own; callers park it wherever they
//! keep per-user state.

pub mod error;
pub mod session;
pub mod types;

pub use error::{OAuthError, RequestFailure};
pub use session::OAuth2Session;
pub use types::{
    OAuthSessionConfig, Redirect, RenewalStrategy, SessionStatus, TokenResponse, TokenState,
};
