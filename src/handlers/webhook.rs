//! Vapi webhook handlers
//!
//! Dispatches call-lifecycle events on `message.type`.
//!
//! Malformed payloads are rejected before any third party is contacted.

use crate::gateway::FunctionInvocation;
use crate::handlers::AppState;
use crate::models::*;
use crate::services::build_assistant;
use crate::utils::error::{AppError, AppResult, ErrorContext};
use crate::utils::logging::create_payload_log_summary;
use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Handle a Vapi server webhook
///
/// POST /api/webhook/vapi
pub async fn handle_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Response> {
    let envelope = parse_envelope(&body)?;

    let message = envelope
        .message
        .as_ref()
        .ok_or_else(|| AppError::Validation("Missing message object".to_string()))?;

    let message_type = message
        .message_type
        .as_deref()
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Validation("Missing message type".to_string()))?;

    let call_id = envelope.call_id();

    match WebhookEvent::from_type(message_type) {
        WebhookEvent::AssistantRequest => Ok(handle_assistant_request(&state, &headers)),
        WebhookEvent::FunctionCall => handle_function_call(&state, message, call_id).await,
        WebhookEvent::Transcript => Ok(handle_transcript(message, call_id)),
        WebhookEvent::StatusUpdate => Ok(handle_status_update(message, call_id)),
        WebhookEvent::EndOfCallReport => Ok(handle_end_of_call(message, call_id)),
        WebhookEvent::Other(other) => {
            warn!("Unknown message type: {}", other);
            Ok(acknowledge())
        }
    }
}

fn parse_envelope(body: &[u8]) -> AppResult<WebhookEnvelope> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(AppError::Validation("No JSON data received".to_string()));
    }

    let payload = serde_json::from_slice::<Value>(body).validation_context("Invalid JSON payload")?;
    if !payload.is_object() {
        return Err(AppError::Validation("Webhook payload must be a JSON object".to_string()));
    }

    if let Ok(summary) = serde_json::to_string_pretty(&create_payload_log_summary(&payload)) {
        debug!("📥 Webhook received:\n{}", summary);
    }

    serde_json::from_value::<WebhookEnvelope>(payload).validation_context("Malformed webhook payload")
}

/// Answer `assistant-request` with the assistant for this call
fn handle_assistant_request(state: &AppState, headers: &HeaderMap) -> Response {
    info!("Assistant request received");

    let base_url = public_base_url(&state.settings.vapi.webhook_base_url, headers);
    let response = build_assistant(&state.settings, &base_url);

    if state.settings.tts.enabled {
        info!("Using Channel.io TTS (custom provider)");
    } else {
        info!("Using default 11labs TTS");
    }

    Json(response).into_response()
}

/// Relay a function call to the gateway
async fn handle_function_call(
    state: &AppState,
    message: &WebhookMessage,
    call_id: &str,
) -> AppResult<Response> {
    let function_call = message
        .function_call
        .as_ref()
        .ok_or_else(|| AppError::Validation("Missing functionCall object".to_string()))?;

    let name = function_call
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| AppError::Validation("Missing function name".to_string()))?;

    let Some(function) = KnownFunction::from_name(name) else {
        warn!("Unsupported function requested: {}", name);
        return Ok(Json(FunctionResult::text(format!(
            "Sorry, {} isn't supported yet.",
            name
        )))
        .into_response());
    };

    let invocation = FunctionInvocation {
        function,
        parameters: function_call
            .parameters
            .clone()
            .unwrap_or_else(|| Value::Object(Default::default())),
        call_id: call_id.to_string(),
    };

    info!(
        "Function call: {} with params: {} (call {}, via {})",
        name,
        invocation.parameters,
        call_id,
        state.gateway.name()
    );

    let result = state.gateway.invoke(&invocation).await?;

    Ok(Json(FunctionResult { result }).into_response())
}

fn handle_transcript(message: &WebhookMessage, call_id: &str) -> Response {
    if text_field(&message.transcript_type) == Some("final") {
        let role = text_field(&message.role).unwrap_or("unknown").to_uppercase();
        info!(
            "[{}] [{}] {}",
            call_id,
            role,
            text_field(&message.transcript).unwrap_or_default()
        );
    }

    acknowledge()
}

fn handle_status_update(message: &WebhookMessage, call_id: &str) -> Response {
    info!("Call {} status: {}", call_id, describe(&message.status));

    acknowledge()
}

fn handle_end_of_call(message: &WebhookMessage, call_id: &str) -> Response {
    info!(
        "Call {} ended. Duration: {}s, Reason: {}",
        call_id,
        message.duration_secs().unwrap_or(0.0),
        describe(&message.ended_reason)
    );

    if let Some(summary) = text_field(&message.summary).filter(|s| !s.is_empty()) {
        debug!("Call {} summary: {}", call_id, summary);
    }

    acknowledge()
}

/// Loggable rendering of a loosely typed field
fn describe(field: &Option<Value>) -> String {
    match field {
        None | Some(Value::Null) => "unknown".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn acknowledge() -> Response {
    Json(Acknowledgement::received()).into_response()
}

/// Public origin of the relay
///
/// The configured base URL wins; otherwise it is rebuilt from the request.
pub fn public_base_url(configured: &str, headers: &HeaderMap) -> String {
    if !configured.is_empty() {
        return configured.trim_end_matches('/').to_string();
    }

    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or("http");

    let host = headers
        .get("x-forwarded-host")
        .or_else(|| headers.get(header::HOST))
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");

    format!("{}://{}", scheme, host)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_base_url_prefers_configuration() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, "internal:8080".parse().unwrap());

        assert_eq!(
            public_base_url("https://relay.example.com/", &headers),
            "https://relay.example.com"
        );
    }

    #[test]
    fn test_public_base_url_from_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, "relay.vercel.app".parse().unwrap());
        assert_eq!(public_base_url("", &headers), "http://relay.vercel.app");

        headers.insert("x-forwarded-proto", "https".parse().unwrap());
        assert_eq!(public_base_url("", &headers), "https://relay.vercel.app");
    }

    #[test]
    fn test_parse_envelope_rejects_bad_input() {
        assert!(matches!(parse_envelope(b""), Err(AppError::Validation(_))));
        assert!(matches!(parse_envelope(b"  \n"), Err(AppError::Validation(_))));
        assert!(matches!(parse_envelope(b"{not json"), Err(AppError::Validation(_))));
        assert!(matches!(parse_envelope(b"[1, 2]"), Err(AppError::Validation(_))));
        assert!(matches!(
            parse_envelope(br#"{"message": {"type": 5}}"#),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_describe_loose_fields() {
        assert_eq!(describe(&None), "unknown");
        assert_eq!(describe(&Some(Value::Null)), "unknown");
        assert_eq!(describe(&Some(Value::String("ended".to_string()))), "ended");
        assert_eq!(
            describe(&Some(serde_json::json!({"code": "in-progress"}))),
            r#"{"code":"in-progress"}"#
        );
    }

    #[test]
    fn test_parse_envelope_accepts_object() {
        let envelope = parse_envelope(br#"{"message": {"type": "status-update"}}"#).unwrap();
        assert_eq!(
            envelope.message.unwrap().message_type.as_deref(),
            Some("status-update")
        );
    }
}
