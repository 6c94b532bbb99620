mod common;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

use common::{app_with, app_with_config, post_json, test_config, FakeStore};

const ENDPOINTS: [&str; 3] = ["/task-management", "/update-task", "/search-tasks-per-day"];

#[tokio::test]
async fn missing_integration_header_is_rejected_everywhere() -> Result<()> {
    let store = Arc::new(FakeStore::new());
    let app = app_with(store);

    for path in ENDPOINTS {
        let (status, body) = post_json(&app, path, None, r#"{"title":"t"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "unexpected status for {}", path);
        assert_eq!(body["error"], "x-integration-id header is missing");
    }
    Ok(())
}

#[tokio::test]
async fn unknown_key_is_not_found() -> Result<()> {
    let store = Arc::new(FakeStore::new());
    let app = app_with(store);

    let (status, body) = post_json(&app, "/task-management", Some("nope"), r#"{"title":"t"}"#).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Integration key not found.");
    Ok(())
}

#[tokio::test]
async fn key_lookup_transport_failure_is_indistinguishable_from_absence() -> Result<()> {
    let store = Arc::new(FakeStore::new().failing_key_lookup());
    let app = app_with(store);

    let (status, body) = post_json(&app, "/task-management", Some("key"), r#"{"title":"t"}"#).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Integration key not found.");
    Ok(())
}

#[tokio::test]
async fn inactive_key_is_forbidden_everywhere() -> Result<()> {
    let user = Uuid::new_v4();
    let store = Arc::new(FakeStore::new().with_key("dormant", user, false));
    let app = app_with(store);

    for path in ENDPOINTS {
        let body = json!({ "title": "t", "id": 1, "date": "2024-03-10" }).to_string();
        let (status, body) = post_json(&app, path, Some("dormant"), &body).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "unexpected status for {}", path);
        assert_eq!(body["error"], "Integration key is inactive.");
    }
    Ok(())
}

#[tokio::test]
async fn non_post_verbs_are_method_not_allowed() -> Result<()> {
    let store = Arc::new(FakeStore::new());
    let app = app_with(store);

    for path in ENDPOINTS {
        let response = app
            .clone()
            .oneshot(Request::builder().method("GET").uri(path).body(Body::empty()).unwrap())
            .await?;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let body: serde_json::Value = serde_json::from_slice(&bytes)?;
        assert_eq!(body["error"], "Method not allowed");
    }
    Ok(())
}

#[tokio::test]
async fn blank_configuration_fails_closed() -> Result<()> {
    let user = Uuid::new_v4();
    let store = Arc::new(FakeStore::new().with_key("key", user, true));

    let mut config = test_config();
    config.jwt_secret = String::new();
    let app = app_with_config(store, config);

    let (status, body) = post_json(&app, "/task-management", Some("key"), r#"{"title":"t"}"#).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Server configuration error.");
    Ok(())
}

#[tokio::test]
async fn successful_requests_stamp_key_usage() -> Result<()> {
    let user = Uuid::new_v4();
    let store = Arc::new(FakeStore::new().with_key("key", user, true));
    let app = app_with(store.clone());

    let (status, _) = post_json(&app, "/task-management", Some("key"), r#"{"title":"t"}"#).await;
    assert_eq!(status, StatusCode::OK);

    // The stamp is detached from the response path; give it a moment.
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(store.touched.lock().unwrap().len(), 1);
    Ok(())
}

#[tokio::test]
async fn inactive_key_presentations_still_stamp_usage() -> Result<()> {
    let user = Uuid::new_v4();
    let store = Arc::new(FakeStore::new().with_key("dormant", user, false));
    let app = app_with(store.clone());

    let (status, _) = post_json(&app, "/task-management", Some("dormant"), r#"{"title":"t"}"#).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // The key resolved, so its owner must still see the presentation.
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(store.touched.lock().unwrap().len(), 1);
    Ok(())
}

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let store = Arc::new(FakeStore::new());
    let app = app_with(store);

    let response = app
        .oneshot(Request::builder().method("GET").uri("/health").body(Body::empty()).unwrap())
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let body: serde_json::Value = serde_json::from_slice(&bytes)?;
    assert_eq!(body["status"], "ok");
    Ok(())
}
