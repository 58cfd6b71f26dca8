//! Provider authorization

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::Response;
use playlist_bridge_infra::integrations::Provider;
use serde::Deserialize;
use tracing::info;

use super::found;
use crate::context::AppContext;
use crate::errors::ApiError;
use crate::session::ActiveSession;

#[derive(Debug, Deserialize)]
pub(crate) struct CallbackParams {
    code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct TokenRequestParams {
    service: Option<String>,
}

/// Start authorizing `provider`: a fresh client replaces any earlier one in
/// the session, then the browser goes to the consent page.
pub(super) async fn authorize(
    State(ctx): State<Arc<AppContext>>,
    ActiveSession(id): ActiveSession,
    Path(provider): Path<String>,
) -> Result<Response, ApiError> {
    let provider: Provider = provider.parse()?;
    let client = ctx.connect(&id, provider)?;
    let redirect = client.authorize();

    info!(%provider, "redirecting to provider for authorization");
    Ok(found(&redirect.location))
}

pub(super) async fn callback(
    provider: Provider,
    State(ctx): State<Arc<AppContext>>,
    ActiveSession(id): ActiveSession,
    Query(params): Query<CallbackParams>,
) -> Result<Response, ApiError> {
    let client = ctx.client(&id, provider).map_err(|_| ApiError::UnexpectedCallback)?;
    client.session().handle_auth_callback(params.code.as_deref()).await?;

    Ok(found("/"))
}

/// Exchange the stored authorization code for a token right away.
pub(super) async fn request_token(
    State(ctx): State<Arc<AppContext>>,
    ActiveSession(id): ActiveSession,
    Query(params): Query<TokenRequestParams>,
) -> Result<Response, ApiError> {
    let Some(service) = params.service else {
        return Ok(found("/"));
    };

    let provider: Provider = service.parse().map_err(|_| ApiError::NamespaceNotFound)?;
    let client = ctx.client(&id, provider)?;
    client.session().request_new_token().await?;

    info!(%provider, "access token acquired on request");
    Ok(found("/"))
}
