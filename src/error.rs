//! Error handling module
//!
//! Centralized error types and HTTP response conversion.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::domain::{ChildKind, DomainError};
use crate::store::StoreError;

/// Application-wide Result type
pub type AppResult<T> = Result<T, AppError>;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Client errors (4xx)
    #[error("Malformed request body: {0}")]
    MalformedRequest(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Array not found: {0}")]
    ArrayNotFound(String),

    #[error("{kind} not found: {id}")]
    ChildNotFound { kind: ChildKind, id: String },

    #[error("Instance type not found: {0}")]
    InstanceTypeNotFound(String),

    // Ownership and direction policy
    #[error(transparent)]
    Domain(#[from] DomainError),

    // Server errors (5xx)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn array_not_found(id: impl ToString) -> Self {
        Self::ArrayNotFound(id.to_string())
    }

    pub fn child_not_found(kind: ChildKind, id: impl ToString) -> Self {
        Self::ChildNotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// Map a store failure on a child resource lookup
    pub fn from_child_store(kind: ChildKind, err: StoreError) -> Self {
        match err {
            StoreError::VolumeNotFound(id) => Self::child_not_found(kind, id),
            other => other.into(),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::ArrayNotFound(id) => AppError::array_not_found(id),
            StoreError::VolumeNotFound(id) => AppError::child_not_found(ChildKind::Volume, id),
            StoreError::InstanceTypeNotFound(name) => AppError::InstanceTypeNotFound(name),
            StoreError::Database(e) => AppError::Database(e),
            StoreError::InvalidData(msg) => AppError::Internal(msg),
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code, details) = match &self {
            // 400 Bad Request
            AppError::MalformedRequest(msg) => {
                (StatusCode::BAD_REQUEST, "malformed_request", Some(msg.clone()))
            }
            AppError::InvalidRequest(msg) => {
                (StatusCode::BAD_REQUEST, "invalid_request", Some(msg.clone()))
            }

            // 404 Not Found
            AppError::ArrayNotFound(id) => {
                (StatusCode::NOT_FOUND, "array_not_found", Some(id.clone()))
            }
            AppError::ChildNotFound { kind, id } => {
                let code = match kind {
                    ChildKind::Volume => "volume_not_found",
                    ChildKind::Drive => "drive_not_found",
                };
                (StatusCode::NOT_FOUND, code, Some(id.clone()))
            }
            AppError::InstanceTypeNotFound(name) => {
                (StatusCode::NOT_FOUND, "instance_type_not_found", Some(name.clone()))
            }

            // Domain errors - both are client mistakes in this context
            AppError::Domain(domain_err) => match domain_err {
                DomainError::OwnershipMismatch { .. } => {
                    (StatusCode::BAD_REQUEST, "ownership_mismatch", None)
                }
                DomainError::OperationNotPermitted { .. } => {
                    (StatusCode::BAD_REQUEST, "operation_not_permitted", None)
                }
            },

            // 500 Internal Server Error
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "database_error", None)
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: self.to_string(),
            error_code: error_code.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}
