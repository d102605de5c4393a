/// Error handling for the web server
///
/// This module provides a unified error type that maps to HTTP responses.
/// Handlers return `Result<T, AppError>` which converts to the appropriate
/// status code. Two boundary rules shape the mapping:
///
/// - A todo that exists but belongs to another user surfaces as 404, the
///   same as one that does not exist, so ownership cannot be probed.
/// - Login failure is a single uniform 401 whether the username is unknown
///   or the password is wrong, so account existence does not leak.
///
/// Unauthenticated access to protected routes never reaches a handler; the
/// session middleware in [`crate::app`] redirects it to the login flow.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Handler result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Unified web error type
#[derive(Debug)]
pub enum AppError {
    /// Bad/missing input (400)
    ValidationError(Vec<ValidationErrorDetail>),

    /// Username already registered (400)
    DuplicateUsername,

    /// Unknown user or wrong password, deliberately indistinguishable (401)
    InvalidCredentials,

    /// Nonexistent or non-owned resource (404)
    NotFound,

    /// Internal server error (500)
    InternalError(String),
}

/// Validation error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g., "validation_error", "not_found")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::ValidationError(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            AppError::DuplicateUsername => write!(f, "Username already taken"),
            AppError::InvalidCredentials => write!(f, "Invalid username or password"),
            AppError::NotFound => write!(f, "Not found"),
            AppError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl AppError {
    /// Builds a single-field validation error
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        AppError::ValidationError(vec![ValidationErrorDetail {
            field: field.to_string(),
            message: message.into(),
        }])
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match self {
            AppError::ValidationError(errors) => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                "Request validation failed".to_string(),
                Some(errors),
            ),
            AppError::DuplicateUsername => (
                StatusCode::BAD_REQUEST,
                "duplicate_username",
                "Username already taken".to_string(),
                None,
            ),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "invalid_credentials",
                "Invalid username or password".to_string(),
                None,
            ),
            AppError::NotFound => (
                StatusCode::NOT_FOUND,
                "not_found",
                "Not found".to_string(),
                None,
            ),
            AppError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

/// Convert sqlx errors to web errors
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound,
            sqlx::Error::Database(db_err) => {
                // Unique constraint on users.username maps to the duplicate
                // registration failure rather than a 500
                if let Some(constraint) = db_err.constraint() {
                    if constraint.contains("username") {
                        return AppError::DuplicateUsername;
                    }
                }
                AppError::InternalError(format!("Database error: {}", db_err))
            }
            _ => AppError::InternalError(format!("Database error: {}", err)),
        }
    }
}

/// Convert todo validation failures to web errors
impl From<todue_shared::models::todo::TodoValidationError> for AppError {
    fn from(err: todue_shared::models::todo::TodoValidationError) -> Self {
        use todue_shared::models::todo::TodoValidationError;
        let field = match err {
            TodoValidationError::EmptyContent | TodoValidationError::ContentTooLong => "content",
            TodoValidationError::InvalidDueTime => "due_time",
        };
        AppError::validation(field, err.to_string())
    }
}

/// Convert password hashing failures to web errors
impl From<todue_shared::auth::password::PasswordError> for AppError {
    fn from(err: todue_shared::auth::password::PasswordError) -> Self {
        AppError::InternalError(format!("Password operation failed: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(AppError::NotFound.to_string(), "Not found");
        assert_eq!(
            AppError::InvalidCredentials.to_string(),
            "Invalid username or password"
        );
    }

    #[test]
    fn test_validation_error_display() {
        let err = AppError::validation("content", "content must not be empty");
        assert_eq!(err.to_string(), "Validation failed: 1 errors");
    }

    #[test]
    fn test_todo_validation_maps_to_fields() {
        use todue_shared::models::todo::TodoValidationError;

        match AppError::from(TodoValidationError::EmptyContent) {
            AppError::ValidationError(details) => assert_eq!(details[0].field, "content"),
            other => panic!("unexpected error: {:?}", other),
        }

        match AppError::from(TodoValidationError::InvalidDueTime) {
            AppError::ValidationError(details) => assert_eq!(details[0].field, "due_time"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_row_not_found_maps_to_404() {
        match AppError::from(sqlx::Error::RowNotFound) {
            AppError::NotFound => {}
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
