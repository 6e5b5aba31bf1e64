//! Health check handler

use crate::handlers::AppState;
use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service name
    pub service: String,
    /// Version information
    pub version: String,
    /// Timestamp
    pub timestamp: String,
    /// Whether the custom voice is offered
    pub channel_tts: bool,
    /// Gateway transport
    pub gateway: String,
    /// Deployment environment
    pub environment: String,
}

/// Basic health check
///
/// GET /health
/// Never touches the gateway or the TTS provider.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    debug!("Executing health check");

    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "vapi-openclaw-webhook".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        channel_tts: state.tts.is_some(),
        gateway: state.gateway.name().to_string(),
        environment: state.settings.server.environment.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;

    #[tokio::test]
    async fn test_health_check() {
        let settings = Settings::from_lookup(|key| match key {
            "APP_ENV" => Some("vercel".to_string()),
            "CHANNEL_TTS_ENABLED" => Some("false".to_string()),
            _ => None,
        })
        .unwrap();
        let state = Arc::new(AppState::from_settings(settings).unwrap());

        let response = health_check(State(state)).await.0;

        assert_eq!(response.status, "healthy");
        assert_eq!(response.environment, "vercel");
        assert_eq!(response.gateway, "http");
        assert!(!response.channel_tts);
    }
}
