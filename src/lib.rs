pub mod auth;
pub mod background;
pub mod config;
pub mod error;
pub mod handlers;
pub mod state;
pub mod store;
pub mod validate;

use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::error::ApiError;
use crate::state::AppState;

/// Builds the gateway router. Each endpoint accepts POST only; other verbs
/// fall through to a 405 body. Preflight is answered by the CORS layer
/// before method routing.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route(
            "/task-management",
            post(handlers::create_task).fallback(handlers::method_not_allowed),
        )
        .route(
            "/update-task",
            post(handlers::update_task).fallback(handlers::method_not_allowed),
        )
        .route(
            "/search-tasks-per-day",
            post(handlers::search_tasks_per_day).fallback(handlers::method_not_allowed),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(handle_panic))
        .with_state(state)
}

/// Outer error boundary: anything unanticipated becomes a generic 500; the
/// detail is logged server-side only.
fn handle_panic(err: Box<dyn std::any::Any + Send + 'static>) -> axum::response::Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic".to_string()
    };

    ApiError::Internal(detail).into_response()
}
