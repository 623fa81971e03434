use std::time::Duration;

use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

use crate::dao::storage::StorageError;

/// Errors that can occur in service layer operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Storage backend rejected a write.
    #[error("storage unavailable")]
    Unavailable(#[source] StorageError),
    /// Bad admin key or missing authorization.
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    /// The caller exceeded a rate limit.
    #[error("rate limited; retry in {}s", retry_after.as_secs())]
    RateLimited {
        /// Time until the window resets.
        retry_after: Duration,
    },
    /// Invalid input provided by the client.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Operation cannot be performed in the current session state.
    #[error("invalid state: {0}")]
    InvalidState(String),
    /// Requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),
    /// The question pool has nothing to draw from.
    #[error("no questions available")]
    NoQuestionsAvailable,
    /// A drawn question is missing one of its answers.
    #[error("question data incomplete for `{0}`")]
    IncompleteQuestionData(String),
}

impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        ServiceError::Unavailable(err)
    }
}

impl From<ValidationErrors> for AppError {
    fn from(err: ValidationErrors) -> Self {
        AppError::BadRequest(format!("validation failed: {err}"))
    }
}

/// Application-level errors that are converted to HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad request with invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),
    /// Unauthorized access attempt.
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    /// Requested resource not found.
    #[error("not found: {0}")]
    NotFound(String),
    /// Conflict with current session state.
    #[error("conflict: {0}")]
    Conflict(String),
    /// Too many requests from this client.
    #[error("too many requests; retry in {retry_after_secs}s")]
    TooManyRequests {
        /// Seconds until the window resets.
        retry_after_secs: u64,
    },
    /// Service unavailable or degraded.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Unavailable(source) => AppError::ServiceUnavailable(source.to_string()),
            ServiceError::Unauthorized(message) => AppError::Unauthorized(message),
            ServiceError::RateLimited { retry_after } => AppError::TooManyRequests {
                retry_after_secs: retry_after.as_secs().max(1),
            },
            ServiceError::InvalidInput(message) => AppError::BadRequest(message),
            ServiceError::InvalidState(message) => AppError::Conflict(message),
            ServiceError::NotFound(message) => AppError::NotFound(message),
            // Upstream data problems, not user errors.
            ServiceError::NoQuestionsAvailable => {
                AppError::Internal("no questions available; contact the administrator".into())
            }
            ServiceError::IncompleteQuestionData(id) => {
                AppError::Internal(format!("question data incomplete for `{id}`"))
            }
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
    #[serde(rename = "retryAfterSecs", skip_serializing_if = "Option::is_none")]
    retry_after_secs: Option<u64>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, retry_after_secs) = match &self {
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, None),
            AppError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, None),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, None),
            AppError::Conflict(_) => (StatusCode::CONFLICT, None),
            AppError::TooManyRequests { retry_after_secs } => {
                (StatusCode::TOO_MANY_REQUESTS, Some(*retry_after_secs))
            }
            AppError::ServiceUnavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, None),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, None),
        };

        let payload = Json(ErrorBody {
            message: self.to_string(),
            retry_after_secs,
        });

        (status, payload).into_response()
    }
}
