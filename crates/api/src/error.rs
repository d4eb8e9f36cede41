//! Error types for the API.
//!
//! Every failure is rendered as `{"error": "<message>"}` with a matching
//! status code. Persistence failures are logged in full and reported to the
//! caller with a generic message only.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use calculator::CalculationError;
use database::{DatabaseError, ValidationError};
use thiserror::Error;

/// Errors that can occur while handling a request.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Body is missing, not JSON, or not the expected shape.
    #[error("Invalid JSON")]
    InvalidJson,

    /// Query string could not be decoded.
    #[error("Invalid query")]
    InvalidQuery,

    /// Endpoint exists but not for this HTTP method.
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Request failed a field check.
    #[error("{0}")]
    BadRequest(String),

    /// Calculator rejected its input.
    #[error(transparent)]
    Calculation(#[from] CalculationError),

    /// User-facing field validation failed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Missing or wrong admin credentials.
    #[error("{0}")]
    Unauthorized(&'static str),

    /// Record not found.
    #[error("{0}")]
    NotFound(String),

    /// Record clashes with an existing one.
    #[error("{0}")]
    Conflict(String),

    /// Database failure; `context` is the only part shown to the caller.
    #[error("{context}")]
    Storage {
        context: &'static str,
        #[source]
        source: DatabaseError,
    },
}

impl ApiError {
    /// Wrap a database error as a 500 with the given public message.
    pub fn storage(context: &'static str) -> impl FnOnce(DatabaseError) -> ApiError {
        move |source| ApiError::Storage { context, source }
    }

    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidJson
            | ApiError::InvalidQuery
            | ApiError::BadRequest(_)
            | ApiError::Calculation(_)
            | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound { entity, .. } => {
                ApiError::NotFound(format!("{} not found", entity))
            }
            DatabaseError::AlreadyExists { entity, .. } => {
                ApiError::Conflict(format!("{} already exists", entity))
            }
            other => ApiError::Storage {
                context: "Server error",
                source: other,
            },
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("Rejected request body: {}", rejection.body_text());
        ApiError::InvalidJson
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        tracing::debug!("Rejected query string: {}", rejection.body_text());
        ApiError::InvalidQuery
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            ApiError::Storage { context, source } => {
                tracing::error!("{}: {}", context, source);
            }
            ApiError::Unauthorized(_) => {
                tracing::warn!("Unauthorized request");
            }
            _ => {}
        }

        let body = serde_json::json!({
            "error": self.to_string()
        });

        (status, Json(body)).into_response()
    }
}

/// Result type for handlers.
pub type Result<T> = std::result::Result<T, ApiError>;
