//! Application context - dependency injection container
//!
//! Owns the configuration, the process-wide session store and the
//! collaborators every provider client is built from. Handlers reach the
//! store only through the methods here, which take the lock for the duration
//! of one read or write and hand back owned clones.

use std::sync::Arc;

use parking_lot::RwLock;
use playlist_bridge_common::auth::RenewalStrategy;
use playlist_bridge_common::storage::{NamespacedStore, SessionId, StoreError, StoreResult};
use playlist_bridge_common::time::{Clock, SystemClock};
use playlist_bridge_domain::constants::{ONGOING_TRANSLATION_NAMESPACE, OAUTH_SESSIONS_NAMESPACE};
use playlist_bridge_domain::{ClientCredentials, Config, Result};
use playlist_bridge_infra::http::{HttpClient, RateLimitPolicy};
use playlist_bridge_infra::integrations::{ClientContext, Provider, ProviderDescriptor, ServiceClient};
use playlist_bridge_infra::services::{BracketTitleCleaner, TitleCleaner};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::errors::ApiError;

/// A leaf of the session store
#[derive(Debug, Clone)]
pub enum SessionValue {
    /// A provider client and its OAuth session
    Client(ServiceClient),
    /// Intermediate results of the translation flow
    Data(Value),
}

/// Session store holding provider clients and translation data.
pub type SessionStore = NamespacedStore<SessionValue>;

/// Application context - holds all services and dependencies
pub struct AppContext {
    /// Loaded configuration.
    pub config: Config,
    /// Collaborators every provider client is built from.
    pub clients: ClientContext,
    /// Cleans video titles into search queries.
    pub cleaner: Arc<dyn TitleCleaner>,
    store: RwLock<SessionStore>,
}

impl AppContext {
    /// Build the context with the system clock.
    ///
    /// # Errors
    /// Returns `BridgeError` if the HTTP client or title cleaner cannot be
    /// constructed.
    pub fn new(config: Config) -> Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Build the context around an explicit clock.
    pub fn with_clock(config: Config, clock: Arc<dyn Clock>) -> Result<Self> {
        let http = HttpClient::new()?;
        let renewal = if config.prefer_refresh_token {
            RenewalStrategy::PreferRefreshToken
        } else {
            RenewalStrategy::ReauthorizeWithCode
        };

        let clients = ClientContext {
            http,
            clock,
            rate_limit: RateLimitPolicy::from(config.rate_limit),
            renewal,
        };

        info!(public_url = %config.server.public_url, ?renewal, "application context ready");

        Ok(Self {
            config,
            clients,
            cleaner: Arc::new(BracketTitleCleaner::new()?),
            store: RwLock::new(SessionStore::new()),
        })
    }

    // -------------------------------------------------------------------------
    // Session lifecycle
    // -------------------------------------------------------------------------

    /// Register a new session with empty OAuth and translation namespaces.
    pub fn create_session(&self) -> SessionId {
        let id = SessionId::generate();
        self.store
            .write()
            .create_session(id.as_str(), &[OAUTH_SESSIONS_NAMESPACE, ONGOING_TRANSLATION_NAMESPACE]);
        debug!("session created");
        id
    }

    /// Drop a session and everything stored under it.
    pub fn destroy_session(&self, id: &SessionId) -> bool {
        self.store.write().destroy_session(id.as_str())
    }

    /// Whether `id` names a live session.
    pub fn has_session(&self, id: &SessionId) -> bool {
        self.store.read().contains_session(id.as_str())
    }

    /// Number of live sessions.
    pub fn session_count(&self) -> usize {
        self.store.read().session_count()
    }

    // -------------------------------------------------------------------------
    // Provider clients
    // -------------------------------------------------------------------------

    /// Configured client credentials of `provider`.
    pub fn credentials(&self, provider: Provider) -> &ClientCredentials {
        match provider {
            Provider::Spotify => &self.config.spotify,
            Provider::YouTube => &self.config.youtube,
        }
    }

    /// Provider endpoints with any configured overrides applied.
    pub fn descriptor(&self, provider: Provider) -> ProviderDescriptor {
        provider.descriptor().with_overrides(self.credentials(provider))
    }

    /// Absolute URL the provider redirects back to after consent.
    pub fn callback_url(&self, provider: Provider) -> String {
        format!(
            "{}{}",
            self.config.server.public_url.trim_end_matches('/'),
            provider.callback_path()
        )
    }

    /// Create a fresh client for `provider` and park it in the session,
    /// replacing any earlier one.
    ///
    /// # Errors
    /// `NamespaceNotFound` if the session does not exist.
    pub fn connect(&self, id: &SessionId, provider: Provider) -> StoreResult<ServiceClient> {
        let client = ServiceClient::connect(
            self.descriptor(provider),
            self.credentials(provider),
            self.callback_url(provider),
            &self.clients,
        );

        let mut store = self.store.write();
        store.get_namespace(id.as_str(), &[OAUTH_SESSIONS_NAMESPACE])?;
        store.set(
            id.as_str(),
            &[OAUTH_SESSIONS_NAMESPACE, provider.name()],
            SessionValue::Client(client.clone()),
        );
        Ok(client)
    }

    /// The session's client for `provider`.
    ///
    /// # Errors
    /// `NamespaceNotFound` if the provider was never authorized in this
    /// session.
    pub fn client(&self, id: &SessionId, provider: Provider) -> StoreResult<ServiceClient> {
        let path = [OAUTH_SESSIONS_NAMESPACE, provider.name()];
        match self.store.read().get_value(id.as_str(), &path)? {
            SessionValue::Client(client) => Ok(client.clone()),
            SessionValue::Data(_) => Err(StoreError::NamespaceNotFound {
                path: format!("{}/{}", id, path.join("/")),
            }),
        }
    }

    /// Every provider client in the session, in provider order.
    pub fn clients(&self, id: &SessionId) -> StoreResult<Vec<ServiceClient>> {
        let store = self.store.read();
        let sessions = store.get_namespace(id.as_str(), &[OAUTH_SESSIONS_NAMESPACE])?;

        Ok(Provider::ALL
            .iter()
            .filter_map(|provider| match sessions.get(provider.name())?.as_value()? {
                SessionValue::Client(client) => Some(client.clone()),
                SessionValue::Data(_) => None,
            })
            .collect())
    }

    // -------------------------------------------------------------------------
    // Translation data
    // -------------------------------------------------------------------------

    /// Store `value` at `ongoing_translation/<key>`.
    ///
    /// # Errors
    /// - [`ApiError::NamespaceNotFound`] if the session no longer exists
    /// - [`ApiError::Internal`] if `value` does not serialize
    pub fn put_translation_data<T: Serialize>(
        &self,
        id: &SessionId,
        key: &str,
        value: &T,
    ) -> std::result::Result<(), ApiError> {
        let value = serde_json::to_value(value)
            .map_err(|e| ApiError::Internal(format!("failed to serialize {key}: {e}")))?;

        let mut store = self.store.write();
        // A write landing after the session was destroyed must not revive it.
        store.get_namespace(id.as_str(), &[])?;
        store.set(id.as_str(), &[ONGOING_TRANSLATION_NAMESPACE, key], SessionValue::Data(value));
        Ok(())
    }

    /// Read `ongoing_translation/<key>`.
    ///
    /// # Errors
    /// - [`ApiError::NamespaceNotFound`] if nothing is stored there
    /// - [`ApiError::Internal`] if the stored value has an unexpected shape
    pub fn translation_data<T: DeserializeOwned>(
        &self,
        id: &SessionId,
        key: &str,
    ) -> std::result::Result<T, ApiError> {
        let path = [ONGOING_TRANSLATION_NAMESPACE, key];
        let value = match self.store.read().get_value(id.as_str(), &path)? {
            SessionValue::Data(value) => value.clone(),
            SessionValue::Client(_) => {
                return Err(ApiError::Internal(format!("{key} does not hold data")))
            }
        };

        serde_json::from_value(value)
            .map_err(|e| ApiError::Internal(format!("stored {key} is malformed: {e}")))
    }

    /// Discard everything the translation flow stored for this session.
    pub fn clear_translation(&self, id: &SessionId) -> StoreResult<()> {
        self.store.write().remove(id.as_str(), &[ONGOING_TRANSLATION_NAMESPACE]).map(|_| ())
    }
}
