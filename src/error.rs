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
    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Administrator privileges required")]
    Forbidden,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Rate limit reached: {0}")]
    RateLimited(String),

    #[error("YouTube API quota exhausted: {0}")]
    QuotaExceeded(String),

    #[error("YouTube API error: {0}")]
    YouTubeApi(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Error string used when the YouTube API itself reports quota exhaustion.
    pub const YOUTUBE_QUOTA_EXCEEDED: &'static str = "quotaExceeded";

    /// Whether the error should surface to callers as "try again later".
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::QuotaExceeded(_) => true,
            AppError::YouTubeApi(msg) => msg.contains(Self::YOUTUBE_QUOTA_EXCEEDED),
            _ => false,
        }
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized", None),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "invalid_token", None),
            AppError::Forbidden => (StatusCode::FORBIDDEN, "forbidden", None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", Some(msg.clone())),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()))
            }
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", Some(msg.clone())),
            AppError::RateLimited(msg) => (
                StatusCode::TOO_MANY_REQUESTS,
                "rate_limited",
                Some(msg.clone()),
            ),
            AppError::QuotaExceeded(msg) => {
                tracing::warn!(reason = %msg, "YouTube quota exhausted");
                (
                    StatusCode::TOO_MANY_REQUESTS,
                    "quota_exceeded",
                    Some(msg.clone()),
                )
            }
            AppError::YouTubeApi(msg) if self.is_retryable() => {
                tracing::warn!(reason = %msg, "YouTube reported quota exhaustion");
                (
                    StatusCode::TOO_MANY_REQUESTS,
                    "quota_exceeded",
                    Some(msg.clone()),
                )
            }
            AppError::YouTubeApi(msg) => {
                (StatusCode::BAD_GATEWAY, "youtube_error", Some(msg.clone()))
            }
            AppError::Database(msg) => {
                tracing::error!(error = %msg, "Database error");
                (StatusCode::INTERNAL_SERVER_ERROR, "database_error", None)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
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
