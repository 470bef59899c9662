//! Error handling for the IML Operations Tracking Platform
//!
//! Every error is resolved at the point of the request and reported
//! synchronously; nothing is retried or queued server-side.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use shared::LedgerError;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Ledger errors
    #[error("cannot exceed available quantity of {remaining}")]
    CapacityExceeded {
        attempted: Decimal,
        remaining: Decimal,
    },

    #[error("subject is closed: {0}")]
    SubjectClosed(String),

    // Validation errors
    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Concurrent-write errors
    #[error("Conflict: {message}")]
    Conflict { resource: String, message: String },

    // Store errors
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::CapacityExceeded {
                attempted,
                remaining,
            } => AppError::CapacityExceeded {
                attempted,
                remaining,
            },
            LedgerError::RecordNotFound(id) => AppError::NotFound(format!("Record {}", id)),
        }
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = match &self {
            AppError::CapacityExceeded { remaining, .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorDetail {
                    code: "CAPACITY_EXCEEDED".to_string(),
                    message: format!("Cannot exceed available quantity of {}", remaining),
                    field: None,
                },
            ),
            AppError::SubjectClosed(subject) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorDetail {
                    code: "SUBJECT_CLOSED".to_string(),
                    message: format!("{} has been dispatched and takes no further entries", subject),
                    field: None,
                },
            ),
            AppError::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message: message.clone(),
                    field: Some(field.clone()),
                },
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorDetail {
                    code: "NOT_FOUND".to_string(),
                    message: format!("{} not found", resource),
                    field: None,
                },
            ),
            AppError::Conflict { resource, message } => (
                StatusCode::CONFLICT,
                ErrorDetail {
                    code: "CONFLICT".to_string(),
                    message: message.clone(),
                    field: Some(resource.clone()),
                },
            ),
            AppError::StoreUnavailable(message) => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorDetail {
                    code: "STORE_UNAVAILABLE".to_string(),
                    message: format!("Store unavailable: {}", message),
                    field: None,
                },
            ),
            AppError::DatabaseError(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorDetail {
                    code: "STORE_UNAVAILABLE".to_string(),
                    message: "The store is temporarily unavailable".to_string(),
                    field: None,
                },
            ),
            AppError::Configuration(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "CONFIGURATION_ERROR".to_string(),
                    message: format!("Configuration error: {}", message),
                    field: None,
                },
            ),
            AppError::Internal(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message: message.clone(),
                    field: None,
                },
            ),
            AppError::InternalError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message: "An internal server error occurred".to_string(),
                    field: None,
                },
            ),
        };

        // Log the error for debugging
        tracing::error!("Error: {:?}", self);

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
