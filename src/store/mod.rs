pub mod rest;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

pub use rest::RestStore;

/// Errors from the record store.
///
/// `NotFound` and `Transport` are distinguished internally for logging, but
/// the gateway collapses both to the same client-visible outcome during key
/// lookup so callers cannot probe for internal failures.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no matching record")]
    NotFound,

    #[error("store request failed: {0}")]
    Transport(String),

    #[error("{0}")]
    Rejected(String),
}

/// The owning user and state of a presented integration key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedKey {
    pub id: Uuid,
    pub user_id: Uuid,
    pub is_active: bool,
}

/// A task row as the store returns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskRow {
    pub id: i64,
    pub user_id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub estimated_minute: Option<i64>,
    pub task_date: NaiveDate,
    #[serde(default)]
    pub task_order: Option<i64>,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub category_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// A validated create payload, ready for insertion. `user_id` is the resolved
/// key owner unless the payload overrode the row owner explicitly.
#[derive(Debug, Clone, Serialize)]
pub struct NewTask {
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub estimated_minute: Option<i64>,
    pub task_date: NaiveDate,
    pub task_order: Option<i64>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

/// A validated update: the target row id plus a normalized column/value map.
/// Explicit nulls survive as `Value::Null` so a caller can clear a column.
#[derive(Debug, Clone)]
pub struct TaskUpdate {
    pub id: i64,
    pub changes: Map<String, Value>,
}

/// Integration-key lookup with elevated store privileges.
#[async_trait]
pub trait KeyStore: Send + Sync {
    /// Exact-match lookup of the presented key string.
    async fn resolve(&self, key: &str) -> Result<ResolvedKey, StoreError>;

    /// Stamp last-used-at on the matched key, scoped by key id and owner to
    /// prevent cross-tenant writes. Best-effort; callers detach this.
    async fn touch_last_used(&self, key_id: Uuid, user_id: Uuid) -> Result<(), StoreError>;
}

/// Task reads and writes scoped to one resolved user via a short-lived token.
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn insert_task(&self, token: &str, task: &NewTask) -> Result<TaskRow, StoreError>;

    /// Updates the row matching both id and owner. Zero matched rows is
    /// `NotFound` whether the task is absent or belongs to someone else.
    async fn update_task(
        &self,
        token: &str,
        user_id: Uuid,
        update: &TaskUpdate,
    ) -> Result<TaskRow, StoreError>;

    /// All of the user's tasks whose task_date equals `date` exactly.
    async fn tasks_for_day(
        &self,
        token: &str,
        user_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<TaskRow>, StoreError>;
}
