use chrono::{NaiveDate, Utc};
use reqwest::{Client, Response};
use serde_json::Value;
use url::Url;
use uuid::Uuid;

use async_trait::async_trait;

use crate::config::AppConfig;
use crate::store::{KeyStore, NewTask, ResolvedKey, StoreError, TaskRow, TaskStore, TaskUpdate};

const KEYS_TABLE: &str = "integration_keys";
const TASKS_TABLE: &str = "tasks";

/// REST client for the hosted record store.
///
/// Key operations authenticate with the service-role credential; task
/// operations send the public credential plus the per-request user token, so
/// the store's own row policies apply on top of the explicit owner filters
/// here.
pub struct RestStore {
    client: Client,
    base: Url,
    service_role_key: String,
    anon_key: String,
}

impl RestStore {
    pub fn new(config: &AppConfig) -> Result<Self, StoreError> {
        let base = Url::parse(&config.store_url)
            .map_err(|e| StoreError::Transport(format!("invalid store URL: {}", e)))?;

        Ok(Self {
            client: Client::new(),
            base,
            service_role_key: config.service_role_key.clone(),
            anon_key: config.anon_key.clone(),
        })
    }

    fn table_url(&self, table: &str) -> Result<Url, StoreError> {
        self.base
            .join(&format!("rest/v1/{}", table))
            .map_err(|e| StoreError::Transport(format!("invalid table URL: {}", e)))
    }

    /// Request builder for key operations (elevated privileges).
    fn service_request(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.header("apikey", &self.service_role_key)
            .bearer_auth(&self.service_role_key)
    }

    /// Request builder for task operations scoped by the minted user token.
    fn scoped_request(&self, req: reqwest::RequestBuilder, token: &str) -> reqwest::RequestBuilder {
        req.header("apikey", &self.anon_key).bearer_auth(token)
    }
}

/// Pulls the store's error message out of a failed response, falling back to
/// the HTTP status when the body is not the expected JSON shape.
async fn error_message(response: Response) -> String {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();

    serde_json::from_str::<Value>(&text)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| format!("store returned status {}", status))
}

#[async_trait]
impl KeyStore for RestStore {
    async fn resolve(&self, key: &str) -> Result<ResolvedKey, StoreError> {
        let url = self.table_url(KEYS_TABLE)?;
        let response = self
            .service_request(self.client.get(url))
            .query(&[
                ("select", "id,user_id,is_active".to_string()),
                ("key", format!("eq.{}", key)),
                ("limit", "1".to_string()),
            ])
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(StoreError::Transport(error_message(response).await));
        }

        let mut rows: Vec<ResolvedKey> = response
            .json()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        rows.pop().ok_or(StoreError::NotFound)
    }

    async fn touch_last_used(&self, key_id: Uuid, user_id: Uuid) -> Result<(), StoreError> {
        let url = self.table_url(KEYS_TABLE)?;
        let response = self
            .service_request(self.client.patch(url))
            .query(&[
                ("id", format!("eq.{}", key_id)),
                ("user_id", format!("eq.{}", user_id)),
            ])
            .json(&serde_json::json!({ "last_used_at": Utc::now() }))
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(StoreError::Transport(error_message(response).await));
        }
        Ok(())
    }
}

#[async_trait]
impl TaskStore for RestStore {
    async fn insert_task(&self, token: &str, task: &NewTask) -> Result<TaskRow, StoreError> {
        let url = self.table_url(TASKS_TABLE)?;
        let response = self
            .scoped_request(self.client.post(url), token)
            .header("Prefer", "return=representation")
            .json(task)
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(StoreError::Rejected(error_message(response).await));
        }

        let mut rows: Vec<TaskRow> = response
            .json()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        rows.pop()
            .ok_or_else(|| StoreError::Rejected("insert returned no row".to_string()))
    }

    async fn update_task(
        &self,
        token: &str,
        user_id: Uuid,
        update: &TaskUpdate,
    ) -> Result<TaskRow, StoreError> {
        let url = self.table_url(TASKS_TABLE)?;
        let response = self
            .scoped_request(self.client.patch(url), token)
            .query(&[
                ("id", format!("eq.{}", update.id)),
                ("user_id", format!("eq.{}", user_id)),
            ])
            .header("Prefer", "return=representation")
            .json(&update.changes)
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(StoreError::Rejected(error_message(response).await));
        }

        let mut rows: Vec<TaskRow> = response
            .json()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        // Zero matched rows: absent and not-yours look identical on purpose.
        rows.pop().ok_or(StoreError::NotFound)
    }

    async fn tasks_for_day(
        &self,
        token: &str,
        user_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<TaskRow>, StoreError> {
        let url = self.table_url(TASKS_TABLE)?;
        let response = self
            .scoped_request(self.client.get(url), token)
            .query(&[
                ("user_id", format!("eq.{}", user_id)),
                ("task_date", format!("eq.{}", date)),
                ("order", "task_order.asc".to_string()),
            ])
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(StoreError::Transport(error_message(response).await));
        }

        response
            .json()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))
    }
}
