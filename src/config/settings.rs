//! Application configuration settings
//!
//! Defines all configuration structures and loading logic

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default greeting spoken when a call starts
pub const DEFAULT_FIRST_MESSAGE: &str = "Hello! This is Polina. How can I help you?";

/// Default persona prompt for the assistant model
pub const DEFAULT_SYSTEM_PROMPT: &str = "\
You are Polina, a smart personal assistant answering a phone call.

## Abilities
You are connected to the OpenClaw system and can:
- check running sub-agents (check_sessions)
- check scheduled cron jobs (check_cron)
- schedule a call back (schedule_call)

## Style
- Keep answers to two or three short sentences.
- Use clear sentence structure and avoid repetition.
- Lists have at most three items.

Never guess. Always check with the tools first.";

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Server configuration
    pub server: ServerConfig,
    /// Vapi webhook configuration
    pub vapi: VapiConfig,
    /// Automation gateway configuration
    pub gateway: GatewayConfig,
    /// Text-to-speech configuration
    pub tts: TtsConfig,
    /// Assistant returned on `assistant-request`
    pub assistant: AssistantSettings,
    /// Request configuration
    pub request: RequestConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen host
    pub host: String,
    /// Listen port
    pub port: u16,
    /// Deployment environment name reported by the health check
    pub environment: String,
}

/// Vapi configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VapiConfig {
    /// API key (not needed for receiving webhooks)
    pub api_key: String,
    /// Phone number attached to the assistant
    pub phone_number: String,
    /// Shared webhook secret, empty disables verification
    pub webhook_secret: String,
    /// Public base URL used to build the TTS callback URL
    pub webhook_base_url: String,
}

/// How function calls reach the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GatewayMode {
    /// POST to the gateway's HTTP API
    Http,
    /// Run the local `openclaw` binary
    Cli,
}

impl FromStr for GatewayMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "http" => Ok(Self::Http),
            "cli" => Ok(Self::Cli),
            other => anyhow::bail!("Invalid gateway mode: {}", other),
        }
    }
}

impl fmt::Display for GatewayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http => write!(f, "http"),
            Self::Cli => write!(f, "cli"),
        }
    }
}

/// Automation gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Transport used to invoke functions
    pub mode: GatewayMode,
    /// Gateway HTTP base URL
    pub base_url: String,
    /// Optional bearer token for the HTTP API
    pub api_key: String,
    /// CLI binary name or path
    pub cli_path: String,
    /// Timeout in seconds for a single invocation
    pub timeout: u64,
}

/// Audio encoding returned to Vapi by the TTS endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputEncoding {
    /// 8 kHz G.711 mu-law
    Mulaw,
    /// Signed 16-bit little-endian PCM at the requested sample rate
    Pcm,
}

impl FromStr for OutputEncoding {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "mulaw" | "mu-law" | "ulaw" => Ok(Self::Mulaw),
            "pcm" | "linear16" => Ok(Self::Pcm),
            other => anyhow::bail!("Invalid TTS output encoding: {}", other),
        }
    }
}

/// Channel.io TTS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TtsConfig {
    /// Whether the custom voice provider is offered to Vapi
    pub enabled: bool,
    /// API base URL
    pub base_url: String,
    /// Optional bearer token
    pub api_key: String,
    /// Voice identifier
    pub voice_id: String,
    /// Language reported to Vapi
    pub language: String,
    /// Streaming latency optimization level (0-4)
    pub latency_level: u8,
    /// Request timeout in seconds
    pub timeout: u64,
    /// Encoding of the audio handed back to Vapi
    pub output_encoding: OutputEncoding,
}

/// Assistant configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantSettings {
    /// First sentence spoken on the call
    pub first_message: String,
    /// System prompt for the conversation model
    pub system_prompt: String,
    /// Conversation model provider
    pub model_provider: String,
    /// Conversation model name
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// 11labs voice used when the custom TTS is disabled
    pub fallback_voice_id: String,
}

/// Request configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestConfig {
    /// Maximum request size in bytes
    pub max_request_size: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    pub level: String,
    /// Log format (text/json)
    pub format: String,
}

impl Settings {
    /// Create a new configuration instance from `.env` and the process environment
    pub fn new() -> Result<Self> {
        // Load .env file if it exists
        dotenv::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| -> String {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let settings = Self {
            server: ServerConfig {
                host: get("SERVER_HOST", "0.0.0.0"),
                port: get("SERVER_PORT", "8080")
                    .parse()
                    .context("Invalid port number")?,
                environment: get("APP_ENV", "local"),
            },
            vapi: VapiConfig {
                api_key: get("VAPI_API_KEY", ""),
                phone_number: get("VAPI_PHONE_NUMBER", ""),
                webhook_secret: get("VAPI_WEBHOOK_SECRET", ""),
                webhook_base_url: get("WEBHOOK_BASE_URL", "")
                    .trim_end_matches('/')
                    .to_string(),
            },
            gateway: GatewayConfig {
                mode: get("GATEWAY_MODE", "http").parse()?,
                base_url: get("OPENCLAW_API_URL", "http://localhost:3000")
                    .trim_end_matches('/')
                    .to_string(),
                api_key: get("OPENCLAW_API_KEY", ""),
                cli_path: get("OPENCLAW_CLI", "openclaw"),
                timeout: get("GATEWAY_TIMEOUT", "10")
                    .parse()
                    .context("Invalid gateway timeout")?,
            },
            tts: TtsConfig {
                enabled: get("CHANNEL_TTS_ENABLED", "true")
                    .parse()
                    .context("Invalid CHANNEL_TTS_ENABLED flag")?,
                base_url: get("TTS_API_BASE", "https://ch-tts-streaming-demo.channel.io")
                    .trim_end_matches('/')
                    .to_string(),
                api_key: get("TTS_API_KEY", ""),
                voice_id: get("TTS_VOICE_ID", "hana"),
                language: get("TTS_LANGUAGE", "ko-KR"),
                latency_level: get("TTS_LATENCY_LEVEL", "3")
                    .parse()
                    .context("Invalid TTS latency level")?,
                timeout: get("TTS_TIMEOUT", "30")
                    .parse()
                    .context("Invalid TTS timeout")?,
                output_encoding: get("TTS_OUTPUT_ENCODING", "mulaw").parse()?,
            },
            assistant: AssistantSettings {
                first_message: get("ASSISTANT_FIRST_MESSAGE", DEFAULT_FIRST_MESSAGE),
                system_prompt: get("ASSISTANT_SYSTEM_PROMPT", DEFAULT_SYSTEM_PROMPT),
                model_provider: get("ASSISTANT_MODEL_PROVIDER", "openai"),
                model: get("ASSISTANT_MODEL", "gpt-4"),
                temperature: get("ASSISTANT_TEMPERATURE", "0.7")
                    .parse()
                    .context("Invalid assistant temperature")?,
                fallback_voice_id: get("FALLBACK_VOICE_ID", "21m00Tcm4TlvDq8ikWAM"),
            },
            request: RequestConfig {
                max_request_size: get("MAX_REQUEST_SIZE", "1048576")
                    .parse()
                    .context("Invalid maximum request size")?,
            },
            logging: LoggingConfig {
                level: get("RUST_LOG", "info"),
                format: get("LOG_FORMAT", "text"),
            },
        };

        // Validate configuration
        settings.validate()?;

        Ok(settings)
    }

    /// Validate configuration validity
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("Port number cannot be 0");
        }

        if !self.gateway.base_url.starts_with("http") {
            anyhow::bail!("Invalid OpenClaw API URL format, should start with 'http'");
        }

        if self.gateway.mode == GatewayMode::Cli && self.gateway.cli_path.trim().is_empty() {
            anyhow::bail!("OPENCLAW_CLI cannot be empty in cli gateway mode");
        }

        if !self.tts.base_url.starts_with("http") {
            anyhow::bail!("Invalid TTS API base format, should start with 'http'");
        }

        if !self.vapi.webhook_base_url.is_empty() && !self.vapi.webhook_base_url.starts_with("http") {
            anyhow::bail!("Invalid webhook base URL format, should start with 'http'");
        }

        if self.vapi.webhook_secret.contains(char::is_whitespace) {
            anyhow::bail!("Webhook secret cannot contain whitespace characters");
        }

        if self.gateway.timeout == 0 || self.tts.timeout == 0 {
            anyhow::bail!("Timeout values cannot be 0");
        }

        if self.tts.latency_level > 4 {
            anyhow::bail!("TTS latency level must be between 0 and 4");
        }

        if !(0.0..=2.0).contains(&self.assistant.temperature) {
            anyhow::bail!("Assistant temperature must be between 0.0 and 2.0");
        }

        if self.request.max_request_size == 0 {
            anyhow::bail!("Maximum request size cannot be 0");
        }

        // Accepts a bare level or full directives such as `vapi_relay=debug,tower_http=info`
        tracing_subscriber::EnvFilter::try_new(&self.logging.level)
            .with_context(|| format!("Invalid log level: {}", self.logging.level))?;

        let valid_formats = ["text", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            anyhow::bail!("Invalid log format: {}", self.logging.format);
        }

        Ok(())
    }

    /// Whether incoming webhooks must be authenticated
    pub fn requires_signature(&self) -> bool {
        !self.vapi.webhook_secret.is_empty()
    }
}
