use axum::{body::Bytes, extract::State, http::HeaderMap, Json};
use serde_json::{json, Value};

use super::gateway;
use crate::error::ApiError;
use crate::state::AppState;
use crate::store::NewTask;
use crate::validate;

/// POST /task-management - create a task for the integration key's owner.
///
/// The optional `user_id` payload field overrides the created row's owner
/// column only; the token subject stays the resolved key owner.
pub async fn create_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let auth = gateway::authorize(&state, &headers).await?;

    let raw: Value = serde_json::from_slice(&body)
        .map_err(|_| ApiError::MalformedJson("Invalid JSON format".to_string()))?;

    let payload = validate::validate_create(&raw)
        .map_err(|details| ApiError::validation("Invalid task data", details))?;

    let task = NewTask {
        user_id: payload
            .user_id
            .unwrap_or_else(|| auth.user_id.to_string()),
        title: payload.title,
        description: payload.description,
        estimated_minute: payload.estimated_minute,
        task_date: payload.task_date,
        task_order: payload.task_order,
        start_time: payload.start_time,
        end_time: payload.end_time,
    };

    let row = state
        .tasks
        .insert_task(&auth.token, &task)
        .await
        .map_err(|e| ApiError::StoreRejected(e.to_string()))?;

    Ok(Json(json!({
        "message": "タスクが正常に作成されました",
        "task": row,
    })))
}
