//! API error types and response handling.
//!
//! This module provides a unified error type for all API handlers
//! with automatic conversion to appropriate HTTP responses.
//!
//! The calling UIs distinguish three situations from the status code alone:
//! "try again" (400 validation), "unknown ID" (404), and "system problem"
//! (500). Cooldown-ignored scans never reach this module; they are a soft
//! success shaped by the scan handler.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Result type alias for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type.
///
/// Each variant maps to a specific HTTP status code and produces a
/// consistent JSON error response.
#[derive(Debug, Clone)]
pub enum ApiError {
    /// 400 Bad Request - Invalid input from client.
    BadRequest {
        /// Machine-readable error code.
        error_code: String,
        /// Human-readable error message.
        message: String,
    },

    /// 404 Not Found - Resource does not exist.
    NotFound {
        /// Machine-readable error code.
        error_code: String,
        /// Human-readable error message.
        message: String,
    },

    /// 500 Internal Server Error - Unexpected server-side error.
    InternalError {
        /// Machine-readable error code.
        error_code: String,
        /// Human-readable error message.
        message: String,
        /// Optional details (not exposed to client in production).
        details: Option<String>,
    },
}

/// Standard JSON error response body.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "error": "STUDENT_NOT_FOUND",
    "message": "Student not found: 'ZZZ999'",
    "details": null
}))]
pub struct ErrorResponse {
    /// Machine-readable error code (e.g., "EMPTY_ENROLLMENT_NUMBER").
    #[schema(example = "STUDENT_NOT_FOUND")]
    pub error: String,

    /// Human-readable error message.
    #[schema(example = "Student not found: 'ZZZ999'")]
    pub message: String,

    /// Optional additional details for debugging.
    #[schema(nullable)]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_response) = match self {
            Self::BadRequest {
                error_code,
                message,
            } => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: error_code,
                    message,
                    details: None,
                },
            ),

            Self::NotFound {
                error_code,
                message,
            } => (
                StatusCode::NOT_FOUND,
                ErrorResponse {
                    error: error_code,
                    message,
                    details: None,
                },
            ),

            Self::InternalError {
                error_code,
                message,
                details,
            } => {
                tracing::error!(
                    error_code = %error_code,
                    message = %message,
                    details = ?details,
                    "Internal server error"
                );

                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: error_code,
                        message,
                        details: details.map(|d| serde_json::json!(d)),
                    },
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BadRequest { message, .. } => write!(f, "Bad Request: {message}"),
            Self::NotFound { message, .. } => write!(f, "Not Found: {message}"),
            Self::InternalError { message, .. } => write!(f, "Internal Error: {message}"),
        }
    }
}

impl std::error::Error for ApiError {}

/// Convert from gatelog_core errors.
impl From<gatelog_core::GatelogError> for ApiError {
    fn from(err: gatelog_core::GatelogError) -> Self {
        if err.is_validation_error() {
            Self::BadRequest {
                error_code: err.error_code().to_string(),
                message: err.to_string(),
            }
        } else if err.is_not_found() {
            Self::NotFound {
                error_code: err.error_code().to_string(),
                message: err.to_string(),
            }
        } else {
            Self::InternalError {
                error_code: err.error_code().to_string(),
                message: err.to_string(),
                details: None,
            }
        }
    }
}
