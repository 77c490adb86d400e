//! Error types for Blogtree
//!
//! All errors in the application are converted to `AppError`,
//! which implements `IntoResponse` for proper HTTP error responses.

use std::collections::BTreeMap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Per-field validation messages, keyed by payload field name.
///
/// A `BTreeMap` keeps field order deterministic in responses.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Application-wide error type
///
/// This enum represents all possible errors that can occur
/// in the application. It implements `IntoResponse` to
/// automatically convert errors to appropriate HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    /// Resource not found (404)
    #[error("Resource not found")]
    NotFound,

    /// Authentication required (401)
    #[error("Unauthorized")]
    Unauthorized,

    /// Authenticated but not the resource owner (403)
    #[error("Forbidden")]
    Forbidden,

    /// Payload failed field constraints (400, per-field messages)
    #[error("Validation failed")]
    Validation(FieldErrors),

    /// Malformed request input (400)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Database error (500)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Session store error (500)
    #[error("Session store error: {0}")]
    SessionStore(String),

    /// Outbound HTTP client error (502)
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Identity provider returned an unusable response (502)
    #[error("OAuth error: {0}")]
    OAuth(String),

    /// Configuration error (500)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal server error (500)
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl IntoResponse for AppError {
    /// Convert error to HTTP response
    ///
    /// Maps each error variant to an HTTP status code and a
    /// `{"msg": ...}` JSON body. Validation errors carry the
    /// per-field message map instead of a flat string.
    fn into_response(self) -> Response {
        use axum::Json;

        let (status, msg) = match &self {
            AppError::NotFound => (StatusCode::NOT_FOUND, self.to_string().into()),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string().into()),
            AppError::Forbidden => (StatusCode::FORBIDDEN, self.to_string().into()),
            AppError::Validation(fields) => {
                let fields = serde_json::to_value(fields).unwrap_or_default();
                (StatusCode::BAD_REQUEST, fields)
            }
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                serde_json::Value::String(msg.clone()),
            ),
            AppError::HttpClient(_) => (StatusCode::BAD_GATEWAY, self.to_string().into()),
            AppError::OAuth(msg) => (
                StatusCode::BAD_GATEWAY,
                serde_json::Value::String(msg.clone()),
            ),
            AppError::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Database error".to_string().into(),
            ),
            AppError::SessionStore(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Session store error".to_string().into(),
            ),
            AppError::Config(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                serde_json::Value::String(msg.clone()),
            ),
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string().into(),
            ),
        };

        if status.is_server_error() {
            tracing::error!(%status, error = ?self, "request failed");
        }

        let body = Json(serde_json::json!({ "msg": msg }));
        (status, body).into_response()
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
