use axum::http::HeaderMap;
use uuid::Uuid;

use crate::auth;
use crate::background;
use crate::error::ApiError;
use crate::state::AppState;

pub const INTEGRATION_HEADER: &str = "x-integration-id";

/// Outcome of the shared gateway prefix: the resolved key owner and the
/// short-lived token scoping this request's store calls.
pub struct Authorized {
    pub user_id: Uuid,
    pub token: String,
}

/// Shared prefix of the gateway state machine:
/// ConfigCheck -> IntegrationHeaderCheck -> KeyResolve -> ActiveCheck ->
/// TokenIssue. Any failure is terminal for the request.
pub async fn authorize(state: &AppState, headers: &HeaderMap) -> Result<Authorized, ApiError> {
    if let Err(e) = state.config.ensure_complete() {
        tracing::error!("configuration check failed: {}", e);
        return Err(ApiError::Configuration);
    }

    let key = headers
        .get(INTEGRATION_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(ApiError::MissingHeader(INTEGRATION_HEADER))?;

    // Lookup failure and absent key are deliberately indistinguishable to
    // the caller.
    let resolved = state.keys.resolve(key).await.map_err(|e| {
        tracing::warn!("integration key lookup failed: {}", e);
        ApiError::KeyNotFound
    })?;

    // Every presentation of a resolvable key is stamped, even when the
    // request goes on to fail the active check or token issuance.
    let keys = state.keys.clone();
    let (key_id, user_id) = (resolved.id, resolved.user_id);
    background::spawn_logged("integration key usage stamp", async move {
        keys.touch_last_used(key_id, user_id).await
    });

    if !resolved.is_active {
        return Err(ApiError::InactiveKey);
    }

    // The token subject is the store-resolved key owner, never client input.
    let token = auth::issue_token(
        &resolved.user_id.to_string(),
        &state.config.jwt_secret,
        &state.config.store_url,
    )
    .map_err(|e| {
        tracing::error!("token issuance failed: {}", e);
        ApiError::TokenGeneration
    })?;

    Ok(Authorized { user_id: resolved.user_id, token })
}
