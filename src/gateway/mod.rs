//! Automation gateway module
//!
//! Defines the Gateway trait and the transports that reach OpenClaw

pub mod cli;
pub mod http;

use crate::config::{GatewayMode, Settings};
use crate::models::KnownFunction;
use crate::utils::error::AppResult;
use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// A function call on its way to the gateway
#[derive(Debug, Clone)]
pub struct FunctionInvocation {
    /// Which function is being called
    pub function: KnownFunction,
    /// Arguments exactly as Vapi sent them
    pub parameters: Value,
    /// Call the request belongs to
    pub call_id: String,
}

/// Gateway trait for fulfilling function calls
///
/// The returned value is relayed to Vapi as the function result.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Get the transport name
    fn name(&self) -> &str;

    /// Execute a function call
    async fn invoke(&self, invocation: &FunctionInvocation) -> AppResult<Value>;
}

/// Build the gateway selected by the configuration
pub fn create_gateway(settings: &Settings) -> Result<Arc<dyn Gateway>> {
    let gateway: Arc<dyn Gateway> = match settings.gateway.mode {
        GatewayMode::Http => Arc::new(HttpGateway::new(&settings.gateway)?),
        GatewayMode::Cli => Arc::new(CliGateway::new(&settings.gateway)),
    };

    Ok(gateway)
}

pub use cli::CliGateway;
pub use http::HttpGateway;
