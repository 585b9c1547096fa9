//! Error Types
//!
//! Layered error taxonomy: repository errors for storage failures, ingestion
//! errors for the adapter boundary, and the API error mapping to HTTP.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Repository-level errors for data access failures
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Data mapping error: {0}")]
    Mapping(String),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        // Unique-constraint violations surface as conflicts so callers can
        // tell a duplicate insert apart from a storage outage.
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.is_unique_violation() {
                return RepositoryError::Conflict(db_err.to_string());
            }
        }
        RepositoryError::Database(err)
    }
}

/// Errors produced at the chain adapter boundary.
///
/// Every adapter operation resolves to either success data or one of these
/// variants; nothing else crosses the boundary and nothing is retried here.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Missing or unusable setup: no endpoints registered, unknown chain
    /// type, chain not registered, unimplemented adapter operation.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Network failure or non-success remote response.
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// Malformed remote JSON or an out-of-bounds witness parse.
    #[error("Format error: {0}")]
    Format(String),

    /// Signature or rid checks failed.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Unique-constraint violation on insert.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Any other storage failure.
    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl From<RepositoryError> for IngestError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Conflict(msg) => IngestError::Conflict(msg),
            // A registration row the ingestion code cannot interpret is a
            // configuration fault, not a storage one.
            RepositoryError::Mapping(msg) => IngestError::Configuration(msg),
            other => IngestError::Persistence(other.to_string()),
        }
    }
}

impl IngestError {
    /// Get the HTTP status code for this error
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Configuration(_) => StatusCode::BAD_REQUEST,
            Self::Fetch(_) | Self::Format(_) => StatusCode::BAD_GATEWAY,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Fetch(_) => "FETCH_ERROR",
            Self::Format(_) => "FORMAT_ERROR",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::Persistence(_) => "PERSISTENCE_ERROR",
        }
    }
}

/// API error response for HTTP responses
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("{resource} not found")]
    NotFound { resource: String },

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

/// Uniform envelope rendered for failed requests
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub error: ErrorDetail,
}

/// Error detail structure
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::Ingest(err) => (
                err.status_code(),
                err.error_code().to_string(),
                err.to_string(),
            ),
            ApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST".to_string(), msg.clone())
            }
            ApiError::NotFound { .. } => {
                (StatusCode::NOT_FOUND, "NOT_FOUND".to_string(), self.to_string())
            }
            ApiError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR".to_string(),
                "An unexpected error occurred".to_string(),
            ),
        };

        let body = ErrorEnvelope {
            success: false,
            error: ErrorDetail { code, message },
        };

        (status, Json(body)).into_response()
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        ApiError::Ingest(IngestError::from(err))
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        let messages: Vec<String> = err
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| {
                    format!(
                        "{}: {}",
                        field,
                        e.message.as_ref().map_or("invalid", |m| m.as_ref())
                    )
                })
            })
            .collect();
        ApiError::BadRequest(messages.join("; "))
    }
}
