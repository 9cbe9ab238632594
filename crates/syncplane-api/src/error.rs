//! API error types.
//!
//! Every handler returns [`ApiError`]. Missing records map to 404, rejected
//! input to 400 and everything else to the generic 5xx path.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use syncplane_db::DbError;
use thiserror::Error;
use tracing::error;

/// Error type for syncplane API operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The requested key does not resolve to a persisted record.
    #[error("{kind} not found: {id}")]
    NotFound { kind: String, id: String },

    /// The request body is malformed or violates a constraint.
    #[error("validation error: {0}")]
    Validation(String),

    /// The write collides with an existing record.
    #[error("conflict: {0}")]
    Conflict(String),

    /// An external collaborator required by the endpoint is not wired in.
    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    /// Persistence failure.
    #[error("database error: {0}")]
    Database(#[source] DbError),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Build a [`ApiError::NotFound`] for any displayable key.
    pub fn not_found(kind: impl ToString, id: impl ToString) -> Self {
        ApiError::NotFound {
            kind: kind.to_string(),
            id: id.to_string(),
        }
    }

    /// HTTP status this error is rendered with.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::NotConfigured(_) => StatusCode::NOT_IMPLEMENTED,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let (error_type, message) = match &self {
            ApiError::NotFound { .. } => ("not_found", self.to_string()),
            ApiError::Validation(_) => ("validation_error", self.to_string()),
            ApiError::Conflict(_) => ("conflict", self.to_string()),
            ApiError::NotConfigured(_) => ("not_configured", self.to_string()),
            ApiError::Database(ref e) => {
                error!("Database error occurred: {:?}", e);
                ("database_error", "Internal database error".to_string())
            }
            ApiError::Internal(ref e) => {
                error!("Internal error occurred: {}", e);
                ("internal_error", "Internal server error".to_string())
            }
        };

        let body = json!({
            "error": error_type,
            "message": message,
        });

        (status, Json(body)).into_response()
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { kind, id } => ApiError::NotFound {
                kind: kind.to_string(),
                id,
            },
            DbError::ValidationFailed(message) => ApiError::Validation(message),
            DbError::Conflict { constraint, .. } => ApiError::Conflict(format!(
                "a record with the same key already exists ({constraint})"
            )),
            other => ApiError::Database(other),
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        DbError::from(err).into()
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        ApiError::Validation(err.to_string())
    }
}

/// Result type for syncplane API operations.
pub type Result<T> = std::result::Result<T, ApiError>;
