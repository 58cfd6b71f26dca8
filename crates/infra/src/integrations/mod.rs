//! External service integrations
//!
//! [`Provider`] names the supported services and carries their endpoint
//! catalogs; [`ServiceClient`] binds one provider to an OAuth session and
//! exposes the calls the bridge makes against it.

pub mod batch;
pub mod client;
pub mod providers;
pub mod spotify;
pub mod youtube;

pub use batch::submit_in_pages;
pub use client::{ClientContext, ServiceClient};
pub use providers::{Provider, ProviderDescriptor};
pub use spotify::SpotifyClient;
pub use youtube::YouTubeClient;
