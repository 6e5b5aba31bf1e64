//! Channel.io TTS client
//!
//! Encapsulates HTTP communication with the Channel.io text-to-speech API

use crate::config::settings::TtsConfig;
use crate::utils::error::{AppError, AppResult};
use crate::utils::logging::truncate_content;
use anyhow::{Context, Result};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, error, info};

/// PCM format requested from the provider
pub const PCM_OUTPUT_FORMAT: &str = "pcm_24000";

/// Synthesis request body
#[derive(Debug, Clone, Serialize)]
pub struct SpeechRequest<'a> {
    pub text: &'a str,
    pub model_id: &'a str,
    pub voice_settings: serde_json::Map<String, serde_json::Value>,
    pub output_format: &'a str,
}

/// Channel.io TTS API client
#[derive(Debug, Clone)]
pub struct ChannelTtsClient {
    client: Client,
    config: TtsConfig,
}

impl ChannelTtsClient {
    /// Create a new client instance
    pub fn new(config: TtsConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .user_agent(concat!("vapi-relay/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create TTS HTTP client")?;

        Ok(Self { client, config })
    }

    /// Synthesis endpoint for the configured voice
    pub fn speech_url(&self) -> String {
        format!(
            "{}/v1/text-to-speech/{}/stream",
            self.config.base_url, self.config.voice_id
        )
    }

    /// Synthesize `text`, returning 16-bit little-endian mono PCM at 24 kHz
    pub async fn synthesize(&self, text: &str) -> AppResult<Vec<u8>> {
        info!("[ChannelTTS] Generating speech for: {}", truncate_content(text, 50));

        let body = SpeechRequest {
            text,
            model_id: "default",
            voice_settings: serde_json::Map::new(),
            output_format: PCM_OUTPUT_FORMAT,
        };

        let mut request = self
            .client
            .post(self.speech_url())
            .query(&[("optimize_streaming_latency", self.config.latency_level)])
            .json(&body);

        if !self.config.api_key.is_empty() {
            request = request.bearer_auth(&self.config.api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::upstream(e, "TTS request"))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("[ChannelTTS] API request failed: {} - {}", status, error_text);
            return Err(AppError::ExternalApi(format!(
                "TTS provider returned {}: {}",
                status, error_text
            )));
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| AppError::upstream(e, "TTS audio download"))?
            .to_vec();
        debug!("[ChannelTTS] Generated {} bytes of audio", audio.len());

        Ok(audio)
    }
}
