//! Custom voice handler
//!
//! Vapi sends `{"message": {"type": "voice-request", "text": ..., "sampleRate": ...}}`
//! and plays back whatever raw audio bytes come back.

use crate::handlers::AppState;
use crate::models::VoiceRequestEnvelope;
use crate::utils::audio::{encode_for_call, TTS_SOURCE_SAMPLE_RATE};
use crate::utils::error::{AppError, AppResult, ErrorContext};
use crate::utils::logging::truncate_content;
use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, StatusCode},
    response::Response,
};
use std::sync::Arc;
use tracing::info;

/// Handle a custom voice synthesis request
///
/// POST /api/webhook/vapi/tts
pub async fn handle_tts(State(state): State<Arc<AppState>>, body: Bytes) -> AppResult<Response> {
    let tts = state
        .tts
        .as_ref()
        .ok_or_else(|| AppError::ServiceUnavailable("Channel TTS not available".to_string()))?;

    let request = serde_json::from_slice::<VoiceRequestEnvelope>(&body)
        .validation_context("Invalid voice request")?
        .message
        .unwrap_or_default();

    if request.message_type.as_deref() != Some("voice-request") {
        return Err(AppError::Validation("Invalid message type".to_string()));
    }

    let text = request.text.as_deref().map(str::trim).unwrap_or_default();
    if text.is_empty() {
        return Err(AppError::Validation("No text provided".to_string()));
    }

    let sample_rate = request
        .sample_rate
        .filter(|rate| *rate > 0)
        .unwrap_or(TTS_SOURCE_SAMPLE_RATE);

    info!(
        "[TTS] Synthesizing: text={}, rate={}Hz",
        truncate_content(text, 50),
        sample_rate
    );

    let pcm = tts.synthesize(text).await?;
    let audio = encode_for_call(
        &pcm,
        TTS_SOURCE_SAMPLE_RATE,
        state.settings.tts.output_encoding,
        sample_rate,
    );

    info!(
        "[TTS] Generated {} bytes of {:?} audio",
        audio.len(),
        state.settings.tts.output_encoding
    );

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/octet-stream")
        .header(header::CONTENT_LENGTH, audio.len())
        .body(Body::from(audio))
        .internal_context("Failed to build audio response")
}
