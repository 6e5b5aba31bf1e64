//! Vapi webhook data models
//!
//! Only the fields the relay reads are modelled; everything else in the
//! payload is ignored.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Call id used when the payload carries none
pub const UNKNOWN_CALL_ID: &str = "unknown";

/// Top-level webhook body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebhookEnvelope {
    /// Event message
    #[serde(default)]
    pub message: Option<WebhookMessage>,
    /// Call object (older payloads place it at the top level)
    #[serde(default)]
    pub call: Option<Value>,
}

impl WebhookEnvelope {
    /// Call id from `message.call.id`, then `call.id`
    pub fn call_id(&self) -> &str {
        self.message
            .as_ref()
            .and_then(|m| call_id_of(m.call.as_ref()))
            .or_else(|| call_id_of(self.call.as_ref()))
            .unwrap_or(UNKNOWN_CALL_ID)
    }
}

fn call_id_of(call: Option<&Value>) -> Option<&str> {
    call?.get("id")?.as_str()
}

/// Event message
///
/// Only `type` and `functionCall` drive dispatch and are typed strictly.
/// Fields that are merely logged stay raw so an unexpected shape never
/// turns an informational event into an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookMessage {
    /// Event type, e.g. `function-call`
    #[serde(rename = "type", default)]
    pub message_type: Option<String>,
    /// Function call request
    #[serde(default)]
    pub function_call: Option<FunctionCall>,
    /// Call object attached to the message
    #[serde(default)]
    pub call: Option<Value>,
    /// `partial` or `final`
    #[serde(default)]
    pub transcript_type: Option<Value>,
    #[serde(default)]
    pub transcript: Option<Value>,
    #[serde(default)]
    pub role: Option<Value>,
    #[serde(default)]
    pub status: Option<Value>,
    #[serde(default)]
    pub summary: Option<Value>,
    #[serde(default)]
    pub duration: Option<Value>,
    #[serde(default)]
    pub duration_seconds: Option<Value>,
    #[serde(default)]
    pub ended_reason: Option<Value>,
}

impl WebhookMessage {
    /// Call duration in seconds, from `duration` then `durationSeconds`
    pub fn duration_secs(&self) -> Option<f64> {
        self.duration
            .as_ref()
            .and_then(Value::as_f64)
            .or_else(|| self.duration_seconds.as_ref().and_then(Value::as_f64))
    }
}

/// String content of a loosely typed field
pub fn text_field(field: &Option<Value>) -> Option<&str> {
    field.as_ref().and_then(Value::as_str)
}

/// Function call request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FunctionCall {
    /// Function name
    #[serde(default)]
    pub name: Option<String>,
    /// Arguments, forwarded untouched
    #[serde(default)]
    pub parameters: Option<Value>,
}

/// Webhook event kinds the relay dispatches on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookEvent {
    AssistantRequest,
    FunctionCall,
    Transcript,
    StatusUpdate,
    EndOfCallReport,
    Other(String),
}

impl WebhookEvent {
    pub fn from_type(message_type: &str) -> Self {
        match message_type {
            "assistant-request" => Self::AssistantRequest,
            "function-call" => Self::FunctionCall,
            "transcript" => Self::Transcript,
            "status-update" => Self::StatusUpdate,
            "end-of-call-report" => Self::EndOfCallReport,
            other => Self::Other(other.to_string()),
        }
    }
}

/// Functions the assistant may call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnownFunction {
    ScheduleCall,
    CheckSessions,
    CheckCron,
}

impl KnownFunction {
    pub const ALL: [KnownFunction; 3] = [Self::ScheduleCall, Self::CheckSessions, Self::CheckCron];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::ScheduleCall => "schedule_call",
            Self::CheckSessions => "check_sessions",
            Self::CheckCron => "check_cron",
        }
    }
}

/// Reply to a `function-call` event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionResult {
    pub result: Value,
}

impl FunctionResult {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            result: Value::String(text.into()),
        }
    }
}

/// Reply to informational events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Acknowledgement {
    pub status: String,
}

impl Acknowledgement {
    pub fn received() -> Self {
        Self {
            status: "received".to_string(),
        }
    }
}

/// Reply to `assistant-request`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantResponse {
    pub assistant: AssistantConfig,
}

/// Transient assistant definition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantConfig {
    pub first_message: String,
    pub model: AssistantModel,
    pub voice: VoiceConfig,
    pub recording_enabled: bool,
    pub end_call_function_enabled: bool,
    pub functions: Vec<FunctionDefinition>,
}

/// Conversation model settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantModel {
    pub provider: String,
    pub model: String,
    pub temperature: f32,
    pub system_prompt: String,
}

/// Voice settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceConfig {
    pub provider: String,
    pub voice_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<VoiceServer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// Custom voice provider callback
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceServer {
    pub url: String,
    pub timeout_seconds: u32,
}

/// Function exposed to the conversation model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionDefinition {
    pub name: String,
    pub description: String,
    /// JSON schema of the arguments
    pub parameters: Value,
}

/// Body of a custom voice request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VoiceRequestEnvelope {
    #[serde(default)]
    pub message: Option<VoiceRequest>,
}

/// Custom voice request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceRequest {
    #[serde(rename = "type", default)]
    pub message_type: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub sample_rate: Option<u32>,
}
