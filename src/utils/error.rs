//! Error handling module
//!
//! Defines error types and handling logic used in the project

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Webhook signature missing or wrong
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Request validation failed
    #[error("{0}")]
    Validation(String),

    /// Gateway or TTS provider returned an error
    #[error("External API error: {0}")]
    ExternalApi(String),

    /// Gateway or TTS provider did not answer in time
    #[error("Upstream timeout: {0}")]
    UpstreamTimeout(String),

    /// Service temporarily unavailable
    #[error("{0}")]
    ServiceUnavailable(String),

    /// Internal server error
    #[error("Internal server error: {0}")]
    Internal(String),

    /// Payload too large
    #[error("Payload too large")]
    PayloadTooLarge,
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human readable message
    pub error: String,
    /// Error type
    #[serde(rename = "type")]
    pub error_type: String,
}

impl AppError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Authentication(_) => StatusCode::UNAUTHORIZED,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::ExternalApi(_) => StatusCode::BAD_GATEWAY,
            AppError::UpstreamTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error type string
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::Authentication(_) => "authentication_error",
            AppError::Validation(_) | AppError::PayloadTooLarge => "invalid_request_error",
            AppError::ServiceUnavailable(_) => "unavailable_error",
            AppError::ExternalApi(_) => "upstream_error",
            AppError::UpstreamTimeout(_) => "timeout_error",
            AppError::Internal(_) => "api_error",
        }
    }

    /// Whether detailed error information should be logged
    pub fn should_log_details(&self) -> bool {
        !matches!(self, AppError::Authentication(_))
    }

    /// Map a failed call to the gateway or TTS provider
    ///
    /// Timeouts become 504 whether they hit while connecting or while
    /// reading the body; everything else is a 502.
    pub fn upstream(error: reqwest::Error, context: &str) -> Self {
        if error.is_timeout() {
            AppError::UpstreamTimeout(format!("{} timed out", context))
        } else {
            AppError::ExternalApi(format!("{}: {}", context, error))
        }
    }

    /// Convert to the JSON error body
    pub fn to_error_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.to_string(),
            error_type: self.error_type().to_string(),
        }
    }
}

/// Implement IntoResponse trait to allow errors to be returned directly as HTTP responses
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if self.should_log_details() {
            if status.is_server_error() {
                tracing::error!("Application error: {} - Status code: {}", self, status);
            } else {
                tracing::warn!("Rejected request: {} - Status code: {}", self, status);
            }
        } else {
            tracing::warn!("Client error: {} - Status code: {}", self.error_type(), status);
        }

        (status, Json(self.to_error_response())).into_response()
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Error context extension trait
pub trait ErrorContext<T> {
    /// Add validation error context
    fn validation_context(self, message: &str) -> AppResult<T>;

    /// Add external API error context
    fn external_api_context(self, message: &str) -> AppResult<T>;

    /// Add internal error context
    fn internal_context(self, message: &str) -> AppResult<T>;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn validation_context(self, message: &str) -> AppResult<T> {
        self.map_err(|e| AppError::Validation(format!("{}: {}", message, e)))
    }

    fn external_api_context(self, message: &str) -> AppResult<T> {
        self.map_err(|e| AppError::ExternalApi(format!("{}: {}", message, e)))
    }

    fn internal_context(self, message: &str) -> AppResult<T> {
        self.map_err(|e| AppError::Internal(format!("{}: {}", message, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(AppError::Authentication("test".to_string()).status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::Validation("test".to_string()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::ExternalApi("test".to_string()).status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(AppError::UpstreamTimeout("test".to_string()).status_code(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(AppError::Internal("test".to_string()).status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_validation_message_is_bare() {
        let error = AppError::Validation("No JSON data received".to_string());
        let body = error.to_error_response();

        assert_eq!(body.error, "No JSON data received");
        assert_eq!(body.error_type, "invalid_request_error");
    }

    #[test]
    fn test_error_context() {
        let result: Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "file not found",
        ));

        let app_result = result.external_api_context("Failed to run openclaw");

        if let Err(AppError::ExternalApi(msg)) = app_result {
            assert!(msg.contains("Failed to run openclaw"));
            assert!(msg.contains("file not found"));
        } else {
            panic!("Expected external API error");
        }
    }
}
