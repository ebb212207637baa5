//! Error types and the error response body

use super::codes::ErrorCode;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Application error with structured error code and details
///
/// This is the error type every service and handler returns:
/// - Standardized error codes via [`ErrorCode`]
/// - Human-readable message, or a list of reasons for multi-field validation
/// - Optional structured details (offending id, collection, field)
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the type of error
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Individual reasons when several checks failed at once
    pub reasons: Vec<String>,
    /// Optional additional details (offending id, context, etc.)
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            reasons: Vec::new(),
            details: None,
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            reasons: Vec::new(),
            details: None,
        }
    }

    /// Add a detail entry to this error
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Attach the offending document id
    pub fn with_id(self, id: impl Into<String>) -> Self {
        self.with_detail("id", id.into())
    }

    /// Get the HTTP status code for this error
    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    // ==================== Convenience constructors ====================

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    /// Create a validation error carrying every failed reason
    pub fn validation_many(reasons: Vec<String>) -> Self {
        let mut err = Self::new(ErrorCode::ValidationFailed);
        if let Some(first) = reasons.first() {
            err.message = first.clone();
        }
        err.reasons = reasons;
        err
    }

    /// Create a not found error for a document of `resource` with `id`
    pub fn not_found(resource: impl Into<String>, id: impl Into<String>) -> Self {
        let r = resource.into();
        let id = id.into();
        Self::with_message(ErrorCode::NotFound, format!("{} {} not found", r, id))
            .with_detail("resource", r)
            .with_id(id)
    }

    /// Create an already exists error
    pub fn already_exists(resource: impl Into<String>) -> Self {
        let r = resource.into();
        Self::with_message(ErrorCode::AlreadyExists, format!("{} already exists", r))
            .with_detail("resource", r)
    }

    /// Create an already removed error
    pub fn already_removed(resource: impl Into<String>, id: impl Into<String>) -> Self {
        let r = resource.into();
        Self::with_message(ErrorCode::AlreadyRemoved, format!("{} already removed", r))
            .with_detail("resource", r)
            .with_id(id)
    }

    /// Create a conflict error
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::AlreadyExists, msg)
    }

    /// Create a business rule error
    pub fn business_rule(code: ErrorCode) -> Self {
        Self::new(code)
    }

    /// Create an invalid request error
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InvalidRequest, msg)
    }

    /// Create an unauthorized error
    pub fn unauthorized() -> Self {
        Self::new(ErrorCode::NotAuthenticated)
    }

    /// Create an invalid token error
    pub fn invalid_token() -> Self {
        Self::new(ErrorCode::TokenInvalid)
    }

    /// Create a token expired error
    pub fn token_expired() -> Self {
        Self::new(ErrorCode::TokenExpired)
    }

    /// Create a forbidden/permission denied error
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::PermissionDenied, msg)
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, msg)
    }

    /// Create a database error
    pub fn database(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::DatabaseError, msg)
    }
}

/// `message` is a plain string, or an array when several reasons failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorMessage {
    One(String),
    Many(Vec<String>),
}

/// Error response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: ErrorMessage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl From<&AppError> for ErrorResponse {
    fn from(err: &AppError) -> Self {
        let message = if err.reasons.len() > 1 {
            ErrorMessage::Many(err.reasons.clone())
        } else {
            ErrorMessage::One(err.message.clone())
        };
        Self {
            code: err.code.code(),
            message,
            details: err.details.clone(),
        }
    }
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

// ===== Axum Integration =====

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;

        let status = self.http_status();
        let body = ErrorResponse::from(&self);

        // Log system errors
        if matches!(self.code.category(), super::category::ErrorCategory::System) {
            tracing::error!(
                code = %self.code,
                message = %self.message,
                "System error occurred"
            );
        }

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_new() {
        let err = AppError::new(ErrorCode::NotFound);
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Resource not found");
        assert!(err.details.is_none());
    }

    #[test]
    fn test_not_found_names_the_id() {
        let err = AppError::not_found("author", "a-1");
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "author a-1 not found");
        let details = err.details.unwrap();
        assert_eq!(details.get("id").unwrap(), "a-1");
        assert_eq!(details.get("resource").unwrap(), "author");
    }

    #[test]
    fn test_already_removed_is_conflict() {
        let err = AppError::already_removed("publisher", "p-1");
        assert_eq!(err.http_status(), StatusCode::CONFLICT);
        assert_eq!(err.message, "publisher already removed");
    }

    #[test]
    fn test_error_response_single_message() {
        let err = AppError::validation("name is required");
        let body = serde_json::to_value(ErrorResponse::from(&err)).unwrap();
        assert_eq!(body["code"], 2);
        assert_eq!(body["message"], "name is required");
        assert!(body.get("details").is_none());
    }

    #[test]
    fn test_error_response_many_messages() {
        let err = AppError::validation_many(vec![
            "name is required".to_string(),
            "price must not be negative".to_string(),
        ]);
        assert_eq!(err.message, "name is required");
        let body = serde_json::to_value(ErrorResponse::from(&err)).unwrap();
        assert_eq!(
            body["message"],
            serde_json::json!(["name is required", "price must not be negative"])
        );
    }

    #[test]
    fn test_into_response_status() {
        use axum::response::IntoResponse;

        let response = AppError::token_expired().into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = AppError::new(ErrorCode::SectionHasProducts).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::with_message(ErrorCode::OrderNotFound, "Order 7 not found");
        assert_eq!(format!("{}", err), "Order 7 not found");
    }
}
