//! HTTP error responses.
//!
//! # Design
//! Handlers return `AppError`, which renders as `{"error": "<message>"}`
//! with the matching status. Storage failures are logged with their full
//! source chain and answered with a short, operation-specific message; the
//! driver's text never reaches the client.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use todo_core::TodoError;

#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
    source: Option<TodoError>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            source: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn invalid_id() -> Self {
        Self::bad_request("Invalid todo ID")
    }

    pub fn invalid_body() -> Self {
        Self::bad_request("Invalid request body")
    }

    /// Map a lifecycle error to a response. `failure` is the message sent
    /// for storage failures, e.g. "Failed to create todo".
    pub fn from_todo(err: TodoError, failure: &str) -> Self {
        match err {
            TodoError::InvalidData(_) => Self::bad_request(err.to_string()),
            TodoError::NotFound(_) => Self::new(StatusCode::NOT_FOUND, "todo not found"),
            TodoError::Storage { .. } => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: failure.to_string(),
                source: Some(err),
            },
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Some(source) = &self.source {
            tracing::error!(
                status = %self.status,
                message = %self.message,
                error = %source,
                cause = ?std::error::Error::source(source).map(ToString::to_string),
                "request failed"
            );
        }
        let body = ErrorBody {
            error: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}
