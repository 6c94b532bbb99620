use axum::{body::Bytes, extract::State, http::HeaderMap, Json};
use serde_json::{json, Value};

use super::gateway;
use crate::error::ApiError;
use crate::state::AppState;
use crate::validate::{self, SearchDateError};

/// POST /search-tasks-per-day - list the key owner's tasks for one date.
///
/// Filtering is exact calendar-date equality, not a timestamp range. No
/// matches is an empty array, never null.
pub async fn search_tasks_per_day(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let auth = gateway::authorize(&state, &headers).await?;

    let raw: Value = serde_json::from_slice(&body)
        .map_err(|_| ApiError::BadRequest("Missing or invalid date parameter".to_string()))?;

    let date = validate::validate_search_date(&raw).map_err(|e| match e {
        SearchDateError::Missing => {
            ApiError::BadRequest("Missing or invalid date parameter".to_string())
        }
        SearchDateError::Invalid => ApiError::BadRequest("Invalid date format".to_string()),
    })?;

    let tasks = state
        .tasks
        .tasks_for_day(&auth.token, auth.user_id, date)
        .await
        .map_err(|e| ApiError::StoreRead(e.to_string()))?;

    Ok(Json(json!({ "tasks": tasks })))
}
