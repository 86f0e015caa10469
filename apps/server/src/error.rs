//! Server error types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use task_store::TaskStoreError;

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Invalid request parameters.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Resource not found.
    #[error("{0}")]
    NotFound(String),

    /// Duplicate resource.
    #[error("{0}")]
    Conflict(String),

    /// Store error.
    #[error("Store error: {0}")]
    Store(TaskStoreError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<TaskStoreError> for ServerError {
    fn from(err: TaskStoreError) -> Self {
        match err {
            TaskStoreError::NotFound { entity_type, id } => {
                ServerError::NotFound(format!("{entity_type} not found: {id}"))
            }
            TaskStoreError::Conflict {
                entity_type,
                field,
                value,
            } => ServerError::Conflict(format!(
                "{entity_type} with this {field} already exists: {value}"
            )),
            other => ServerError::Store(other),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ServerError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ServerError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ServerError::Conflict(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ServerError::Store(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            ServerError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = json!({ "error": message });

        (status, Json(body)).into_response()
    }
}

/// Result type alias for server operations.
pub type ServerResult<T> = Result<T, ServerError>;
