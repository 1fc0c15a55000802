// src/errors.rs
// DOCUMENTATION: Custom error types and HTTP responses
// PURPOSE: Centralized error handling for entire application

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use thiserror::Error;

/// Application-specific error types
/// DOCUMENTATION: Each variant maps to an HTTP status code and JSON error body
#[derive(Error, Debug)]
pub enum VenueError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Authentication required")]
    Unauthorized,

    #[error("You do not have permission to access this page.")]
    Forbidden,

    #[error("Upload exceeds {0} bytes")]
    PayloadTooLarge(usize),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Internal server error")]
    InternalError,

    #[error("Rate limit exceeded")]
    RateLimitExceeded,
}

impl VenueError {
    fn code(&self) -> &'static str {
        match self {
            VenueError::NotFound(_) => "NOT_FOUND",
            VenueError::AlreadyExists(_) => "ALREADY_EXISTS",
            VenueError::DatabaseError(_) => "DATABASE_ERROR",
            VenueError::InvalidInput(_) => "INVALID_INPUT",
            VenueError::ValidationError(_) => "VALIDATION_ERROR",
            VenueError::Unauthorized => "UNAUTHORIZED",
            VenueError::Forbidden => "FORBIDDEN",
            VenueError::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            VenueError::StorageError(_) => "STORAGE_ERROR",
            VenueError::InternalError => "INTERNAL_ERROR",
            VenueError::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
        }
    }
}

impl From<validator::ValidationErrors> for VenueError {
    fn from(e: validator::ValidationErrors) -> Self {
        VenueError::ValidationError(e.to_string())
    }
}

/// Convert VenueError to HTTP response
/// DOCUMENTATION: Maps error types to HTTP status codes and JSON responses
impl ResponseError for VenueError {
    fn error_response(&self) -> HttpResponse {
        let body = json!({
            "error": {
                "code": self.code(),
                "message": self.to_string(),
                "timestamp": chrono::Utc::now().to_rfc3339()
            }
        });

        HttpResponse::build(self.status_code()).json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            VenueError::NotFound(_) => StatusCode::NOT_FOUND,
            VenueError::AlreadyExists(_) => StatusCode::CONFLICT,
            VenueError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            VenueError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            VenueError::ValidationError(_) => StatusCode::BAD_REQUEST,
            VenueError::Unauthorized => StatusCode::UNAUTHORIZED,
            VenueError::Forbidden => StatusCode::FORBIDDEN,
            VenueError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            VenueError::StorageError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            VenueError::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            VenueError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            VenueError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            VenueError::AlreadyExists("x".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(VenueError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(VenueError::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            VenueError::PayloadTooLarge(10).status_code(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            VenueError::RateLimitExceeded.status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
    }

    #[actix_web::test]
    async fn test_error_body_shape() {
        let resp = VenueError::InvalidInput("No venues selected.".into()).error_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(resp.into_body()).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["error"]["code"], "INVALID_INPUT");
        assert_eq!(
            value["error"]["message"],
            "Invalid input: No venues selected."
        );
        assert!(value["error"]["timestamp"].is_string());
    }
}
