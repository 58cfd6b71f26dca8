//! # Playlist Bridge Domain
//!
//! Business domain types and models for Playlist Bridge.
//!
//! This crate contains:
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Playlist, track and profile models exchanged between providers
//! - Domain constants (store namespaces, page sizes)
//!
//! ## Architecture
//! - No dependencies on other Playlist Bridge crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
