//! Error types for synth-daemon

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use synth_engine::EngineError;
use synth_feedback::FeedbackError;
use thiserror::Error;

/// Daemon-level errors
#[derive(Debug, Error)]
pub enum DaemonError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Server startup error
    #[error("Server error: {0}")]
    Server(String),

    /// Engine construction error
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// API-specific errors
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Engine error
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            ApiError::Engine(EngineError::UnknownCandidate(_)) => {
                (StatusCode::NOT_FOUND, "UNKNOWN_CANDIDATE")
            }
            ApiError::Engine(EngineError::InvalidConfig(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INVALID_CONFIG")
            }
            ApiError::Engine(EngineError::Feedback(FeedbackError::InvalidConfig(_))) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INVALID_CONFIG")
            }
            ApiError::Engine(EngineError::Feedback(FeedbackError::Rejected(_))) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "FEEDBACK_REJECTED")
            }
            ApiError::Engine(EngineError::Store(_)) => {
                (StatusCode::SERVICE_UNAVAILABLE, "STORE_UNAVAILABLE")
            }
        };

        let body = ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
            details: None,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Result type alias for daemon operations
pub type DaemonResult<T> = Result<T, DaemonError>;
