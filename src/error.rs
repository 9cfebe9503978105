// SPDX-License-Identifier: MIT
// Copyright 2026 The Pathy Authors

//! Application error types with consistent API responses.

use crate::db::StoreError;
use crate::services::recording::RecordingError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Recording(#[from] RecordingError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl AppError {
    /// HTTP status and machine-readable code for this error.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            AppError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
            AppError::Recording(RecordingError::ProviderBusy) => {
                (StatusCode::CONFLICT, "provider_busy")
            }
            AppError::Recording(_) => (StatusCode::CONFLICT, "invalid_recording_state"),
            AppError::Store(StoreError::NotFound(_)) => (StatusCode::NOT_FOUND, "not_found"),
            AppError::Store(StoreError::Rejected(_)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "route_rejected")
            }
            AppError::Store(StoreError::Unavailable(_)) => {
                (StatusCode::SERVICE_UNAVAILABLE, "store_unavailable")
            }
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = self.status_and_code();

        let details = match &self {
            AppError::Store(StoreError::Unavailable(msg)) => {
                tracing::error!(error = %msg, "Route store error");
                Some(self.to_string())
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                None
            }
            other => Some(other.to_string()),
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
