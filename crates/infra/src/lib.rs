//! # Playlist Bridge Infrastructure
//!
//! Everything that talks to the outside world.
//!
//! This crate contains:
//! - HTTP client and the authorized, rate-limit aware caller
//! - Spotify and YouTube integrations
//! - Translation and export workflows
//! - Configuration loading (environment, JSON, TOML)

pub mod config;
pub mod errors;
pub mod http;
pub mod integrations;
pub mod services;

// Re-export commonly used items
pub use errors::InfraError;
pub use http::*;
pub use integrations::*;
pub use services::*;
