// src/error.rs
use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::validators::{join_messages, ValidationError};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{}", join_messages(.0))]
    Validation(Vec<ValidationError>),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    BadRequest(String),
}

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        AppError::Conflict(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        AppError::Unauthorized(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        AppError::BadRequest(msg.into())
    }

    /// Single-field validation failure.
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        AppError::Validation(vec![ValidationError::new(field, message)])
    }

    /// Turns a validator result into an error when it reported anything.
    pub fn check(errors: Vec<ValidationError>) -> Result<(), AppError> {
        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(errors))
        }
    }

    /// Reports unique-key violations (SQLSTATE 23505) as conflicts, everything
    /// else unchanged.
    pub fn from_unique_violation(err: sqlx::Error, message: &str) -> Self {
        match err {
            sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
                AppError::conflict(message)
            }
            other => other.into(),
        }
    }
}

/// Malformed query strings get the same JSON error body as everything else.
impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::bad_request(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({ "error": self.to_string(), "details": errors }),
            ),
            AppError::Database(e) => {
                tracing::error!(error = %e, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Database error occurred" }),
                )
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, json!({ "error": msg })),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, json!({ "error": msg })),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_joins_messages() {
        let err = AppError::Validation(vec![
            ValidationError::new("name", "Name is required."),
            ValidationError::new("slug", "Slug is required."),
        ]);
        assert_eq!(err.to_string(), "Name is required.\nSlug is required.");
    }

    #[test]
    fn status_codes() {
        assert_eq!(
            AppError::invalid("units", "bad").into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::not_found("Product not found").into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Database(sqlx::Error::RowNotFound).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::conflict("dup").into_response().status(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn check_passes_empty_list() {
        assert!(AppError::check(Vec::new()).is_ok());
        assert!(matches!(
            AppError::check(vec![ValidationError::new("name", "x")]),
            Err(AppError::Validation(_))
        ));
    }
}
