#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use taskbridge_api::config::AppConfig;
use taskbridge_api::state::AppState;
use taskbridge_api::store::{
    KeyStore, NewTask, ResolvedKey, StoreError, TaskRow, TaskStore, TaskUpdate,
};

/// In-memory store standing in for the hosted record store. Keys are seeded
/// up front; tasks live behind a mutex so tests can inspect rows afterwards.
pub struct FakeStore {
    keys: HashMap<String, ResolvedKey>,
    pub tasks: Mutex<Vec<TaskRow>>,
    pub touched: Mutex<Vec<Uuid>>,
    next_id: AtomicI64,
    fail_key_lookup: bool,
    fail_reads: bool,
}

impl FakeStore {
    pub fn new() -> Self {
        Self {
            keys: HashMap::new(),
            tasks: Mutex::new(Vec::new()),
            touched: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
            fail_key_lookup: false,
            fail_reads: false,
        }
    }

    pub fn with_key(mut self, key: &str, user_id: Uuid, is_active: bool) -> Self {
        self.keys.insert(
            key.to_string(),
            ResolvedKey { id: Uuid::new_v4(), user_id, is_active },
        );
        self
    }

    pub fn with_task(self, row: TaskRow) -> Self {
        self.tasks.lock().unwrap().push(row);
        self
    }

    /// Every key lookup fails at the transport level.
    pub fn failing_key_lookup(mut self) -> Self {
        self.fail_key_lookup = true;
        self
    }

    /// Every task read fails at the transport level.
    pub fn failing_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }
}

#[async_trait]
impl KeyStore for FakeStore {
    async fn resolve(&self, key: &str) -> Result<ResolvedKey, StoreError> {
        if self.fail_key_lookup {
            return Err(StoreError::Transport("store unavailable".to_string()));
        }
        self.keys.get(key).cloned().ok_or(StoreError::NotFound)
    }

    async fn touch_last_used(&self, key_id: Uuid, _user_id: Uuid) -> Result<(), StoreError> {
        self.touched.lock().unwrap().push(key_id);
        Ok(())
    }
}

#[async_trait]
impl TaskStore for FakeStore {
    async fn insert_task(&self, _token: &str, task: &NewTask) -> Result<TaskRow, StoreError> {
        let user_id = Uuid::parse_str(&task.user_id)
            .map_err(|_| StoreError::Rejected("invalid input syntax for type uuid".to_string()))?;

        let row = TaskRow {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            user_id,
            title: task.title.clone(),
            description: task.description.clone(),
            estimated_minute: task.estimated_minute,
            task_date: task.task_date,
            task_order: task.task_order,
            start_time: task.start_time,
            end_time: task.end_time,
            category_id: None,
            created_at: Utc::now(),
        };
        self.tasks.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn update_task(
        &self,
        _token: &str,
        user_id: Uuid,
        update: &TaskUpdate,
    ) -> Result<TaskRow, StoreError> {
        let mut tasks = self.tasks.lock().unwrap();
        let row = tasks
            .iter_mut()
            .find(|t| t.id == update.id && t.user_id == user_id)
            .ok_or(StoreError::NotFound)?;

        for (field, value) in &update.changes {
            match field.as_str() {
                "title" => {
                    if let Some(s) = value.as_str() {
                        row.title = s.to_string();
                    }
                }
                "description" => row.description = value.as_str().map(str::to_string),
                "estimated_minute" => row.estimated_minute = value.as_i64(),
                "task_date" => {
                    if let Some(d) = value.as_str().and_then(|s| s.parse().ok()) {
                        row.task_date = d;
                    }
                }
                "task_order" => row.task_order = value.as_i64(),
                "start_time" => row.start_time = parse_rfc3339(value),
                "end_time" => row.end_time = parse_rfc3339(value),
                _ => {}
            }
        }
        Ok(row.clone())
    }

    async fn tasks_for_day(
        &self,
        _token: &str,
        user_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<TaskRow>, StoreError> {
        if self.fail_reads {
            return Err(StoreError::Transport("store unavailable".to_string()));
        }
        Ok(self
            .tasks
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.user_id == user_id && t.task_date == date)
            .cloned()
            .collect())
    }
}

fn parse_rfc3339(value: &Value) -> Option<DateTime<Utc>> {
    value
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

pub fn test_config() -> AppConfig {
    AppConfig {
        store_url: "https://store.test".to_string(),
        service_role_key: "service-role".to_string(),
        anon_key: "anon".to_string(),
        jwt_secret: "test-secret".to_string(),
    }
}

pub fn app_with(store: Arc<FakeStore>) -> Router {
    app_with_config(store, test_config())
}

pub fn app_with_config(store: Arc<FakeStore>, config: AppConfig) -> Router {
    taskbridge_api::app(AppState {
        config,
        keys: store.clone(),
        tasks: store,
    })
}

pub fn task(id: i64, user_id: Uuid, title: &str, date: &str) -> TaskRow {
    TaskRow {
        id,
        user_id,
        title: title.to_string(),
        description: None,
        estimated_minute: None,
        task_date: date.parse().expect("test date"),
        task_order: None,
        start_time: None,
        end_time: None,
        category_id: None,
        created_at: Utc::now(),
    }
}

/// Sends a POST with an optional integration key header and decodes the JSON
/// response body.
pub async fn post_json(
    app: &Router,
    path: &str,
    key: Option<&str>,
    body: &str,
) -> (StatusCode, Value) {
    let mut request = Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json");
    if let Some(key) = key {
        request = request.header("x-integration-id", key);
    }

    let response = app
        .clone()
        .oneshot(request.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}
