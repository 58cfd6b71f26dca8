//! # Playlist Bridge
//!
//! HTTP application layer - routes and application context.
//!
//! This crate contains:
//! - axum routes for the session, authorization, translation and export
//!   flows
//! - Application context (dependency injection and the session store)
//! - Main entry point and setup
//!
//! ## Architecture
//! - Depends on `domain`, `common` and `infra`
//! - Wires the provider clients into per-user sessions
//! - Maps every failure to a response at the routing boundary

pub mod context;
pub mod errors;
pub mod routes;
pub mod session;
pub mod utils;

// Re-export for convenience
pub use context::*;
pub use errors::ApiError;
pub use routes::router;
