//! Error handling module
//!
//! Centralized error types and HTTP response conversion.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::domain::DomainError;
use crate::store::StoreError;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Domain errors (4xx)
    #[error(transparent)]
    Domain(#[from] DomainError),

    // Server errors (5xx)
    #[error("Database error occurred while {operation}.")]
    Database {
        operation: &'static str,
        #[source]
        source: StoreError,
    },
}

impl AppError {
    /// Wrap a store failure with the step that was running.
    ///
    /// ```ignore
    /// store.insert_book(&book).await.map_err(AppError::database("adding the book"))?;
    /// ```
    pub fn database(operation: &'static str) -> impl FnOnce(StoreError) -> AppError {
        move |source| AppError::Database { operation, source }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub error_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Status for a business rule violation
fn domain_status(err: &DomainError) -> StatusCode {
    if err.is_validation_error() {
        StatusCode::BAD_REQUEST
    } else if err.is_not_found() {
        StatusCode::NOT_FOUND
    } else if err.is_conflict() {
        StatusCode::CONFLICT
    } else {
        StatusCode::UNPROCESSABLE_ENTITY
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code, details) = match &self {
            AppError::Domain(domain_err) => {
                let details = match domain_err {
                    DomainError::InvalidBook(msg) => Some(msg.to_string()),
                    _ => None,
                };
                (domain_status(domain_err), domain_err.error_code(), details)
            }

            // 500 Internal Server Error
            AppError::Database { operation, source } => {
                tracing::error!(operation, error = ?source, "Database error");
                (StatusCode::INTERNAL_SERVER_ERROR, "database_error", None)
            }
        };

        let body = ErrorResponse {
            success: false,
            error: self.to_string(),
            error_code: error_code.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_error_status() {
        let response = AppError::from(DomainError::InvalidPatron).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = AppError::from(DomainError::BookNotFound).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = AppError::from(DomainError::DuplicateIsbn).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = AppError::from(DomainError::LimitExceeded).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_database_error_hides_source() {
        let err = AppError::database("creating borrow record")(StoreError::Unavailable(
            "connection reset".to_string(),
        ));
        assert_eq!(err.to_string(), "Database error occurred while creating borrow record.");

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
