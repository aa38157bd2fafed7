//! Structured error types for HTTP responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::fmt;

use crate::db::DbError;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Validation errors
    InvalidId,
    MissingRequiredField,
    InvalidBody,

    // Not found errors
    BoardNotFound,
    ColumnNotFound,
    TaskNotFound,
    SubtaskNotFound,

    // Internal errors
    InternalError,
}

impl ErrorCode {
    /// HTTP status for this error code.
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::InvalidId | ErrorCode::MissingRequiredField | ErrorCode::InvalidBody => {
                StatusCode::BAD_REQUEST
            }
            ErrorCode::BoardNotFound
            | ErrorCode::ColumnNotFound
            | ErrorCode::TaskNotFound
            | ErrorCode::SubtaskNotFound => StatusCode::NOT_FOUND,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Structured error returned by route handlers.
///
/// Rendered as `{"error": message}` with the status of its code.
#[derive(Debug)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

/// JSON body of every error response.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.code.status()
    }

    // Convenience constructors

    /// Non-numeric path parameter, e.g. `invalid_id("board")`.
    pub fn invalid_id(entity: &str) -> Self {
        Self::new(ErrorCode::InvalidId, format!("Invalid {} ID", entity))
    }

    pub fn missing_field(what: &str) -> Self {
        Self::new(ErrorCode::MissingRequiredField, format!("{} is required", what))
    }

    pub fn empty_field(what: &str) -> Self {
        Self::new(
            ErrorCode::MissingRequiredField,
            format!("{} cannot be empty", what),
        )
    }

    pub fn invalid_body(reason: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::InvalidBody,
            format!("Invalid request body: {}", reason),
        )
    }

    pub fn board_not_found() -> Self {
        Self::new(ErrorCode::BoardNotFound, "Board not found")
    }

    pub fn column_not_found() -> Self {
        Self::new(ErrorCode::ColumnNotFound, "Column not found")
    }

    pub fn task_not_found() -> Self {
        Self::new(ErrorCode::TaskNotFound, "Task not found")
    }

    pub fn subtask_not_found() -> Self {
        Self::new(ErrorCode::SubtaskNotFound, "Subtask not found")
    }

    /// Generic 500. The message is what the client sees; the cause is only logged.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::BoardNotFound(_) => ApiError::board_not_found(),
            DbError::ColumnNotFound(_) => ApiError::column_not_found(),
            DbError::TaskNotFound(_) => ApiError::task_not_found(),
            DbError::SubtaskNotFound(_) => ApiError::subtask_not_found(),
            DbError::EmptyField(what) => ApiError::missing_field(what),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(ErrorBody { error: self.message })).into_response()
    }
}

/// Result type for route handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Extension for turning data-layer results into handler results.
///
/// Typed [`DbError`]s keep their meaning (404/400). Anything else is logged
/// with its full cause chain and surfaced as a 500 carrying only `context`.
pub trait ResultExt<T> {
    fn or_internal(self, context: &str) -> ApiResult<T>;
}

impl<T> ResultExt<T> for anyhow::Result<T> {
    fn or_internal(self, context: &str) -> ApiResult<T> {
        self.map_err(|err| match err.downcast::<DbError>() {
            Ok(db_err) => db_err.into(),
            Err(err) => {
                tracing::error!(error = ?err, "{}", context);
                ApiError::internal(context)
            }
        })
    }
}
