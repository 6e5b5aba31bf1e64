//! HTTP gateway transport
//!
//! Posts function arguments to the OpenClaw HTTP API

use super::{FunctionInvocation, Gateway};
use crate::config::settings::GatewayConfig;
use crate::utils::error::{AppError, AppResult};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error};

/// Header carrying the Vapi call id to the gateway
pub const CALL_ID_HEADER: &str = "X-Vapi-Call-Id";

/// Gateway reached over HTTP
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
    api_key: String,
}

impl HttpGateway {
    /// Create a new gateway client
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .user_agent(concat!("vapi-relay/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create gateway HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// Endpoint for a function
    pub fn function_url(&self, name: &str) -> String {
        format!("{}/api/functions/{}", self.base_url, name)
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    fn name(&self) -> &str {
        "http"
    }

    async fn invoke(&self, invocation: &FunctionInvocation) -> AppResult<Value> {
        let url = self.function_url(invocation.function.name());
        debug!("Forwarding {} to {}", invocation.function.name(), url);

        let mut request = self
            .client
            .post(&url)
            .header(CALL_ID_HEADER, &invocation.call_id)
            .json(&invocation.parameters);

        if !self.api_key.is_empty() {
            request = request.bearer_auth(&self.api_key);
        }

        let context = format!("Gateway call {}", invocation.function.name());
        let response = request
            .send()
            .await
            .map_err(|e| AppError::upstream(e, &context))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::upstream(e, &context))?;

        if !status.is_success() {
            error!("Gateway request failed: {} - {}", status, body);
            return Err(AppError::ExternalApi(format!(
                "Gateway returned {}: {}",
                status, body
            )));
        }

        // Plain-text replies are relayed as a JSON string
        Ok(serde_json::from_str(&body).unwrap_or(Value::String(body)))
    }
}
