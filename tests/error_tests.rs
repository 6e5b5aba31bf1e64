//! Error handling module unit tests

use axum::http::StatusCode;
use axum::response::IntoResponse;
use vapi_relay::utils::error::*;

#[test]
fn test_app_error_status_codes() {
    let test_cases = vec![
        (AppError::Authentication("test".to_string()), StatusCode::UNAUTHORIZED),
        (AppError::Validation("test".to_string()), StatusCode::BAD_REQUEST),
        (AppError::PayloadTooLarge, StatusCode::PAYLOAD_TOO_LARGE),
        (AppError::ServiceUnavailable("test".to_string()), StatusCode::SERVICE_UNAVAILABLE),
        (AppError::ExternalApi("test".to_string()), StatusCode::BAD_GATEWAY),
        (AppError::UpstreamTimeout("test".to_string()), StatusCode::GATEWAY_TIMEOUT),
        (AppError::Internal("test".to_string()), StatusCode::INTERNAL_SERVER_ERROR),
    ];

    for (error, expected_status) in test_cases {
        assert_eq!(error.status_code(), expected_status);
    }
}

#[test]
fn test_app_error_types() {
    let test_cases = vec![
        (AppError::Authentication("test".to_string()), "authentication_error"),
        (AppError::Validation("test".to_string()), "invalid_request_error"),
        (AppError::PayloadTooLarge, "invalid_request_error"),
        (AppError::ServiceUnavailable("test".to_string()), "unavailable_error"),
        (AppError::ExternalApi("test".to_string()), "upstream_error"),
        (AppError::UpstreamTimeout("test".to_string()), "timeout_error"),
        (AppError::Internal("test".to_string()), "api_error"),
    ];

    for (error, expected_type) in test_cases {
        assert_eq!(error.error_type(), expected_type);
    }
}

#[test]
fn test_should_log_details() {
    assert!(!AppError::Authentication("test".to_string()).should_log_details());

    assert!(AppError::Validation("test".to_string()).should_log_details());
    assert!(AppError::ExternalApi("test".to_string()).should_log_details());
    assert!(AppError::Internal("test".to_string()).should_log_details());
}

#[test]
fn test_error_response_shape() {
    let error = AppError::ServiceUnavailable("Channel TTS not available".to_string());
    let body = serde_json::to_value(error.to_error_response()).unwrap();

    assert_eq!(
        body,
        serde_json::json!({
            "error": "Channel TTS not available",
            "type": "unavailable_error"
        })
    );
}

#[tokio::test]
async fn test_upstream_connection_failure_is_bad_gateway() {
    // Nothing listens on port 9 in the test environment
    let error = reqwest::Client::new()
        .get("http://127.0.0.1:9")
        .send()
        .await
        .unwrap_err();

    let error = AppError::upstream(error, "Gateway call check_cron");

    match &error {
        AppError::ExternalApi(message) => assert!(message.starts_with("Gateway call check_cron: ")),
        other => panic!("Expected external API error, got {:?}", other),
    }
    assert_eq!(error.status_code(), StatusCode::BAD_GATEWAY);
}

#[test]
fn test_validation_context() {
    let result = serde_json::from_str::<serde_json::Value>("{oops");
    let error = result.validation_context("Invalid JSON payload").unwrap_err();

    match error {
        AppError::Validation(message) => assert!(message.starts_with("Invalid JSON payload: ")),
        other => panic!("Expected validation error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_into_response() {
    let response = AppError::UpstreamTimeout("Gateway did not answer check_cron".to_string())
        .into_response();

    assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(value["type"], "timeout_error");
    assert!(value["error"].as_str().unwrap().contains("check_cron"));
}
