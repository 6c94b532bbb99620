// Task Access Gateway endpoints.
//
// Each endpoint walks the same state machine: config check, method check,
// integration header check, key resolve, active check, token issue, body
// parse, validation, store operation. The shared prefix lives in gateway.rs;
// the per-endpoint tails live in their own files.
pub mod create;
pub mod gateway;
pub mod search;
pub mod update;

use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};

use crate::error::ApiError;

pub use create::create_task;
pub use search::search_tasks_per_day;
pub use update::update_task;

/// Fallback for non-POST verbs on the gateway endpoints.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "Taskbridge API",
        "version": version,
        "description": "Integration-key gateway for the task-management service",
        "endpoints": {
            "create": "POST /task-management",
            "update": "POST /update-task",
            "search": "POST /search-tasks-per-day",
        },
        "authentication": "x-integration-id header on every gateway endpoint",
    }))
}

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": Utc::now(),
    }))
}
