use axum::{body::Bytes, extract::State, http::HeaderMap, Json};
use serde_json::{json, Value};

use super::gateway;
use crate::error::ApiError;
use crate::state::AppState;
use crate::store::StoreError;
use crate::validate;

/// POST /update-task - update a task owned by the integration key's owner.
///
/// A task that exists but belongs to another user is reported as not found,
/// never as forbidden, so callers cannot probe for other users' task ids.
pub async fn update_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let auth = gateway::authorize(&state, &headers).await?;

    let raw: Value = serde_json::from_slice(&body)
        .map_err(|_| ApiError::MalformedJson("Invalid JSON in request body.".to_string()))?;

    let update = validate::validate_update(&raw)
        .map_err(|details| ApiError::validation("Invalid task data", details))?;

    let row = state
        .tasks
        .update_task(&auth.token, auth.user_id, &update)
        .await
        .map_err(|e| match e {
            StoreError::NotFound => ApiError::NotFound(
                "Task not found or user does not have permission to update it.".to_string(),
            ),
            other => ApiError::StoreRejected(other.to_string()),
        })?;

    Ok(Json(json!({
        "message": "Task updated successfully.",
        "task": row,
    })))
}
