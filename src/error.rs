// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

/// HTTP API error with appropriate status codes and client-friendly messages.
///
/// Every terminal failure of the gateway state machine maps to exactly one
/// variant here, so the wire contract lives in one place.
#[derive(Debug)]
pub enum ApiError {
    // 500 Internal Server Error
    Configuration,
    TokenGeneration,
    StoreRead(String),
    Internal(String),

    // 405 Method Not Allowed
    MethodNotAllowed,

    // 400 Bad Request
    BadRequest(String),
    MissingHeader(&'static str),
    MalformedJson(String),
    Validation { error: String, details: Vec<String> },
    StoreRejected(String),

    // 403 Forbidden
    InactiveKey,

    // 404 Not Found
    KeyNotFound,
    NotFound(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Configuration => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::TokenGeneration => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::StoreRead(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::MissingHeader(_) => StatusCode::BAD_REQUEST,
            ApiError::MalformedJson(_) => StatusCode::BAD_REQUEST,
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::StoreRejected(_) => StatusCode::BAD_REQUEST,
            ApiError::InactiveKey => StatusCode::FORBIDDEN,
            ApiError::KeyNotFound => StatusCode::NOT_FOUND,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> String {
        match self {
            ApiError::Configuration => "Server configuration error.".to_string(),
            ApiError::TokenGeneration => "Failed to generate authentication token.".to_string(),
            ApiError::StoreRead(msg) => msg.clone(),
            // Full detail is logged at the point of capture; clients get a
            // generic message only.
            ApiError::Internal(_) => "An unexpected error occurred.".to_string(),
            ApiError::MethodNotAllowed => "Method not allowed".to_string(),
            ApiError::BadRequest(msg) => msg.clone(),
            ApiError::MissingHeader(name) => format!("{} header is missing", name),
            ApiError::MalformedJson(msg) => msg.clone(),
            ApiError::Validation { error, .. } => error.clone(),
            ApiError::StoreRejected(msg) => msg.clone(),
            ApiError::InactiveKey => "Integration key is inactive.".to_string(),
            ApiError::KeyNotFound => "Integration key not found.".to_string(),
            ApiError::NotFound(msg) => msg.clone(),
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        match self {
            ApiError::Validation { error, details } => {
                json!({ "error": error, "details": details })
            }
            _ => json!({ "error": self.message() }),
        }
    }

    pub fn validation(error: impl Into<String>, details: Vec<String>) -> Self {
        ApiError::Validation { error: error.into(), details }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        if let ApiError::Internal(detail) = &self {
            tracing::error!("unexpected error: {}", detail);
        }
        (self.status_code(), Json(self.to_json())).into_response()
    }
}
