// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Email already registered")]
    DuplicateEmail,

    #[error("Invalid Credentials")]
    InvalidCredentials,

    #[error("Not Authorized. Login Again")]
    Unauthorized,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Machine-readable error code used in API responses.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::DuplicateEmail => "duplicate_email",
            AppError::InvalidCredentials => "invalid_credentials",
            AppError::Unauthorized => "unauthorized",
            AppError::InvalidToken => "invalid_token",
            AppError::NotFound(_) => "not_found",
            AppError::BadRequest(_) => "bad_request",
            AppError::Database(_) => "database_error",
            AppError::Internal(_) => "internal_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::DuplicateEmail => StatusCode::CONFLICT,
            AppError::InvalidCredentials | AppError::Unauthorized | AppError::InvalidToken => {
                StatusCode::UNAUTHORIZED
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match &self {
            AppError::Database(msg) => {
                tracing::error!(error = %msg, "Database error");
                "Database error".to_string()
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = ErrorResponse {
            success: false,
            error: self.code().to_string(),
            message,
        };

        (self.status(), Json(body)).into_response()
    }
}

impl From<crate::db::StoreError> for AppError {
    fn from(err: crate::db::StoreError) -> Self {
        AppError::Database(err.to_string())
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
