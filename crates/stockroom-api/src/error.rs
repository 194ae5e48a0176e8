//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps [`DomainError`] variants to HTTP status codes and JSON error
//! bodies. Internal detail is logged server-side and never appears in a
//! response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use stockroom_core::{DomainError, FieldError};
use thiserror::Error;

/// Structured JSON error response body.
///
/// Every error response uses this shape. `details` carries the field
/// error list for validation failures and is omitted otherwise.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g. "NOT_FOUND", "VALIDATION_ERROR").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Field errors, present only for validation failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

/// Application-level error type that implements [`IntoResponse`].
#[derive(Error, Debug)]
pub enum ApiError {
    /// Resource not found (404).
    #[error("{0}")]
    NotFound(String),

    /// Payload failed validation (400, with field list).
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    /// Malformed request: bad identifier, unparsable body, duplicate
    /// email (400).
    #[error("{0}")]
    BadRequest(String),

    /// Authentication failure (401).
    #[error("{0}")]
    Unauthorized(String),

    /// Authorization failure — authenticated but insufficient (403).
    #[error("{0}")]
    Forbidden(String),

    /// A required external collaborator is not configured (503).
    #[error("{0}")]
    ServiceUnavailable(String),

    /// Internal failure (500). Message is logged, never returned.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// The HTTP status and machine-readable code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            Self::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            Self::ServiceUnavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        // Never expose internal error messages to clients.
        let message = match &self {
            Self::Internal(detail) => {
                tracing::error!(error = %detail, "internal server error");
                "An internal error occurred".to_string()
            }
            other => other.to_string(),
        };

        let details = match self {
            Self::Validation(fields) => Some(fields),
            _ => None,
        };

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(fields) => Self::Validation(fields),
            DomainError::InvalidId { .. } => Self::BadRequest(err.to_string()),
            DomainError::NotFound { .. } => Self::NotFound(err.to_string()),
            DomainError::DuplicateEmail => Self::BadRequest(err.to_string()),
            DomainError::InvalidCredentials => Self::Unauthorized(err.to_string()),
            DomainError::AuthenticationRequired => Self::Unauthorized(err.to_string()),
            DomainError::PermissionDenied => Self::Forbidden(err.to_string()),
            DomainError::Store(store) => Self::Internal(store.to_string()),
            DomainError::Internal(detail) => Self::Internal(detail),
        }
    }
}
