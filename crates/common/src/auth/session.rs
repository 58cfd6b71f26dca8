//! Per-user, per-provider OAuth 2.0 session

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use reqwest::{Client, StatusCode};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};
use url::form_urlencoded;

use super::error::OAuthError;
use super::types::{
    OAuthSessionConfig, Redirect, RenewalStrategy, SessionStatus, TokenResponse, TokenState,
};
use crate::time::Clock;

#[derive(Debug, Default)]
struct SessionState {
    /// Set by the authorization callback. Kept after a successful exchange
    /// so it can be replayed when the token expires.
    pending_code: Option<String>,
    token: Option<TokenState>,
}

/// OAuth 2.0 authorization-code session for one user and one provider
///
/// The mutable state sits behind an async mutex held across the whole of
/// [`get_token`](Self::get_token), so concurrent callers on one session
/// trigger at most one token exchange and later callers observe its result.
/// [`status`](Self::status) reads flags published after every state change
/// and never waits on that mutex.
pub struct OAuth2Session {
    config: OAuthSessionConfig,
    http: Client,
    clock: Arc<dyn Clock>,
    state: Mutex<SessionState>,
    authenticated: AtomicBool,
    has_token: AtomicBool,
}

impl std::fmt::Debug for OAuth2Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuth2Session").field("config", &self.config).finish_non_exhaustive()
    }
}

impl OAuth2Session {
    /// Create a session with no authorization code and no token.
    #[must_use]
    pub fn new(config: OAuthSessionConfig, http: Client, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            http,
            clock,
            state: Mutex::new(SessionState::default()),
            authenticated: AtomicBool::new(false),
            has_token: AtomicBool::new(false),
        }
    }

    /// Provider name, as used in logs and status lines.
    #[must_use]
    pub fn provider(&self) -> &str {
        &self.config.provider
    }

    /// Endpoints and credentials this session was built with.
    #[must_use]
    pub fn config(&self) -> &OAuthSessionConfig {
        &self.config
    }

    /// Build the redirect to the provider's consent page.
    ///
    /// The query carries `client_id`, `response_type=code`, `redirect_uri`
    /// and the space-joined `scope`; `extra_params` add to these or
    /// override them by key. Does not touch session state.
    #[must_use]
    pub fn authorize(&self, scopes: &[&str], extra_params: &[(&str, &str)]) -> Redirect {
        let mut params: Vec<(&str, String)> = vec![
            ("client_id", self.config.client_id.clone()),
            ("response_type", "code".to_string()),
            ("redirect_uri", self.config.callback_url.clone()),
            ("scope", scopes.join(" ")),
        ];

        for (key, value) in extra_params {
            match params.iter_mut().find(|(existing, _)| *existing == *key) {
                Some(slot) => slot.1 = (*value).to_string(),
                None => params.push((*key, (*value).to_string())),
            }
        }

        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())))
            .finish();

        debug!(provider = %self.config.provider, "redirecting to authorization page");
        Redirect::found(format!("{}?{}", self.config.authorize_url, query))
    }

    /// Record the authorization code delivered to the callback URL.
    ///
    /// # Errors
    /// [`OAuthError::AuthorizationFailed`] if the code is absent or blank.
    pub async fn handle_auth_callback(&self, code: Option<&str>) -> Result<(), OAuthError> {
        let code = code.map(str::trim).filter(|c| !c.is_empty()).ok_or_else(|| {
            warn!(provider = %self.config.provider, "authorization callback without code");
            OAuthError::AuthorizationFailed
        })?;

        let mut state = self.state.lock().await;
        state.pending_code = Some(code.to_string());
        self.publish(&state);
        info!(provider = %self.config.provider, "authorization code received");
        Ok(())
    }

    /// Exchange the stored authorization code for a new token.
    ///
    /// # Errors
    /// - [`OAuthError::NotAuthorized`] if no code has been received
    /// - [`OAuthError::AccessTokenRequestFailed`] on a non-200 response or an
    ///   unparsable body
    pub async fn request_new_token(&self) -> Result<(), OAuthError> {
        let mut state = self.state.lock().await;
        self.exchange_code(&mut state).await
    }

    /// Return a usable token, re-acquiring it if absent or expired.
    ///
    /// An expired token is dropped before re-acquisition starts, so a
    /// failed renewal leaves the session without a token.
    ///
    /// # Errors
    /// Same as [`request_new_token`](Self::request_new_token).
    pub async fn get_token(&self) -> Result<TokenState, OAuthError> {
        let mut state = self.state.lock().await;
        let now = self.clock.now();

        match state.token.take() {
            Some(token) if !token.is_expired(now) => {
                state.token = Some(token.clone());
                return Ok(token);
            }
            Some(expired) => {
                debug!(provider = %self.config.provider, "access token expired, discarding");
                self.publish(&state);
                self.renew(&mut state, expired.refresh_secret).await?;
            }
            None => self.exchange_code(&mut state).await?,
        }

        state.token.clone().ok_or_else(|| OAuthError::token_request("no token after exchange"))
    }

    /// `("Authorization", "<kind> <access_secret>")` for a usable token.
    ///
    /// # Errors
    /// Same as [`get_token`](Self::get_token).
    pub async fn auth_header(&self) -> Result<(&'static str, String), OAuthError> {
        let token = self.get_token().await?;
        Ok(("Authorization", token.header_value()))
    }

    /// Current token without triggering any exchange.
    pub async fn token(&self) -> Option<TokenState> {
        self.state.lock().await.token.clone()
    }

    /// Where the session is in its lifecycle.
    ///
    /// Reflects the last completed state change; a token exchange still in
    /// flight is not visible until it finishes.
    #[must_use]
    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            provider: self.config.provider.clone(),
            authenticated: self.authenticated.load(Ordering::Acquire),
            has_token: self.has_token.load(Ordering::Acquire),
        }
    }

    fn publish(&self, state: &SessionState) {
        self.authenticated.store(state.pending_code.is_some(), Ordering::Release);
        self.has_token.store(state.token.is_some(), Ordering::Release);
    }

    async fn renew(
        &self,
        state: &mut SessionState,
        refresh_secret: Option<String>,
    ) -> Result<(), OAuthError> {
        match (self.config.renewal, refresh_secret) {
            (RenewalStrategy::PreferRefreshToken, Some(refresh)) => {
                match self.exchange_refresh(state, &refresh).await {
                    Ok(()) => Ok(()),
                    Err(err) if state.pending_code.is_some() => {
                        warn!(
                            provider = %self.config.provider,
                            error = %err,
                            "refresh grant failed, falling back to authorization code"
                        );
                        self.exchange_code(state).await
                    }
                    Err(err) => Err(err),
                }
            }
            _ => self.exchange_code(state).await,
        }
    }

    #[instrument(skip_all, fields(provider = %self.config.provider))]
    async fn exchange_code(&self, state: &mut SessionState) -> Result<(), OAuthError> {
        let code = state.pending_code.clone().ok_or(OAuthError::NotAuthorized)?;
        info!("requesting new access token");

        let form = [
            ("grant_type", "authorization_code"),
            ("code", code.as_str()),
            ("redirect_uri", self.config.callback_url.as_str()),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
        ];
        let response = self.post_token_form(&form).await?;

        state.token = Some(response.into_token_state(self.clock.now()));
        self.publish(state);
        debug!("access token stored");
        Ok(())
    }

    #[instrument(skip_all, fields(provider = %self.config.provider))]
    async fn exchange_refresh(
        &self,
        state: &mut SessionState,
        refresh_secret: &str,
    ) -> Result<(), OAuthError> {
        info!("refreshing access token");

        let form = [
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_secret),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
        ];
        let response = self.post_token_form(&form).await?;

        let mut token = response.into_token_state(self.clock.now());
        if token.refresh_secret.is_none() {
            token.refresh_secret = Some(refresh_secret.to_string());
        }
        state.token = Some(token);
        self.publish(state);
        debug!("access token refreshed");
        Ok(())
    }

    async fn post_token_form(&self, form: &[(&str, &str)]) -> Result<TokenResponse, OAuthError> {
        let response = self
            .http
            .post(&self.config.token_url)
            .form(form)
            .send()
            .await
            .map_err(|e| OAuthError::token_request(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!(status = status.as_u16(), "token endpoint rejected request");
            return Err(OAuthError::token_request(format!("token endpoint returned {status}")));
        }

        response
            .json::<TokenResponse>()
            .await
            .map_err(|e| OAuthError::token_request(format!("invalid token response: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::testing::MockClock;

    fn session() -> OAuth2Session {
        let config = OAuthSessionConfig {
            provider: "TestingService".into(),
            client_id: "client_id".into(),
            client_secret: "client_secret".into(),
            authorize_url: "http://authorize.url".into(),
            callback_url: "http://authorize.callback.url".into(),
            token_url: "http://request.token.url".into(),
            renewal: RenewalStrategy::default(),
        };
        OAuth2Session::new(config, Client::new(), Arc::new(MockClock::new()))
    }

    fn query_of(location: &str) -> HashMap<String, String> {
        let url = url::Url::parse(location).unwrap();
        url.query_pairs().into_owned().collect()
    }

    /// Validates the consent redirect carries exactly the expected query.
    ///
    /// Assertions:
    /// - status is 302
    /// - scheme and host come from the authorize URL
    /// - scopes are space-joined and extra params are merged in
    #[test]
    fn authorize_builds_redirect_with_scopes_and_extras() {
        let redirect = session().authorize(&["scope-a", "scope-b"], &[("extra", "params")]);

        assert_eq!(redirect.status, 302);
        let url = url::Url::parse(&redirect.location).unwrap();
        assert_eq!(url.scheme(), "http");
        assert_eq!(url.host_str(), Some("authorize.url"));

        let expected: HashMap<String, String> = [
            ("client_id", "client_id"),
            ("response_type", "code"),
            ("redirect_uri", "http://authorize.callback.url"),
            ("scope", "scope-a scope-b"),
            ("extra", "params"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        assert_eq!(query_of(&redirect.location), expected);
    }

    #[test]
    fn authorize_extra_params_override_defaults() {
        let redirect = session().authorize(&[], &[("response_type", "token")]);

        let query = query_of(&redirect.location);
        assert_eq!(query.get("response_type").map(String::as_str), Some("token"));
        assert_eq!(query.len(), 4);
    }

    #[test]
    fn authorize_does_not_mutate_state() {
        let session = session();
        let _ = session.authorize(&["scope"], &[]);

        let status = session.status();
        assert!(!status.authenticated);
        assert!(!status.has_token);
    }

    #[tokio::test]
    async fn callback_without_code_fails() {
        let session = session();

        assert_eq!(session.handle_auth_callback(None).await, Err(OAuthError::AuthorizationFailed));
        assert_eq!(
            session.handle_auth_callback(Some("  ")).await,
            Err(OAuthError::AuthorizationFailed)
        );
        assert!(!session.status().authenticated);
    }

    #[tokio::test]
    async fn callback_stores_code() {
        let session = session();
        session.handle_auth_callback(Some("the-code")).await.unwrap();

        assert!(session.status().authenticated);
    }

    #[tokio::test]
    async fn status_does_not_wait_for_state_lock() {
        let session = session();
        session.handle_auth_callback(Some("the-code")).await.unwrap();

        let _exchange_in_flight = session.state.lock().await;
        let status = session.status();

        assert!(status.authenticated);
        assert!(!status.has_token);
    }

    #[tokio::test]
    async fn get_token_without_code_is_not_authorized() {
        let session = session();

        assert_eq!(session.get_token().await, Err(OAuthError::NotAuthorized));
        assert_eq!(session.request_new_token().await, Err(OAuthError::NotAuthorized));
        assert_eq!(session.auth_header().await, Err(OAuthError::NotAuthorized));
    }
}
