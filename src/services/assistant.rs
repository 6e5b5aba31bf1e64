//! Assistant definition returned on `assistant-request`

use crate::config::Settings;
use crate::models::{
    AssistantConfig, AssistantModel, AssistantResponse, FunctionDefinition, KnownFunction,
    VoiceConfig, VoiceServer,
};
use serde_json::json;

/// Path Vapi calls for custom voice synthesis
pub const TTS_ROUTE: &str = "/api/webhook/vapi/tts";

/// Seconds Vapi waits on the custom voice server
pub const TTS_SERVER_TIMEOUT_SECONDS: u32 = 10;

/// Build the assistant for a new call
///
/// `base_url` is the public origin of this relay, used for the TTS callback.
pub fn build_assistant(settings: &Settings, base_url: &str) -> AssistantResponse {
    let assistant = &settings.assistant;

    AssistantResponse {
        assistant: AssistantConfig {
            first_message: assistant.first_message.clone(),
            model: AssistantModel {
                provider: assistant.model_provider.clone(),
                model: assistant.model.clone(),
                temperature: assistant.temperature,
                system_prompt: assistant.system_prompt.clone(),
            },
            voice: voice_config(settings, base_url),
            recording_enabled: true,
            end_call_function_enabled: true,
            functions: KnownFunction::ALL.iter().map(function_definition).collect(),
        },
    }
}

fn voice_config(settings: &Settings, base_url: &str) -> VoiceConfig {
    if settings.tts.enabled {
        VoiceConfig {
            provider: "custom-provider".to_string(),
            voice_id: settings.tts.voice_id.clone(),
            server: Some(VoiceServer {
                url: format!("{}{}", base_url.trim_end_matches('/'), TTS_ROUTE),
                timeout_seconds: TTS_SERVER_TIMEOUT_SECONDS,
            }),
            language: Some(settings.tts.language.clone()),
        }
    } else {
        VoiceConfig {
            provider: "11labs".to_string(),
            voice_id: settings.assistant.fallback_voice_id.clone(),
            server: None,
            language: None,
        }
    }
}

/// Schema advertised to the conversation model for each function
pub fn function_definition(function: &KnownFunction) -> FunctionDefinition {
    let (description, parameters) = match function {
        KnownFunction::ScheduleCall => (
            "Schedule a phone call back to the user later.",
            json!({
                "type": "object",
                "properties": {
                    "minutes": {
                        "type": "integer",
                        "description": "How many minutes from now to call (1-60)"
                    },
                    "message": {
                        "type": "string",
                        "description": "What to say on the call back"
                    }
                },
                "required": ["minutes"]
            }),
        ),
        KnownFunction::CheckSessions => (
            "List the sub-agents that are currently running.",
            json!({"type": "object", "properties": {}, "required": []}),
        ),
        KnownFunction::CheckCron => (
            "List the scheduled cron jobs.",
            json!({"type": "object", "properties": {}, "required": []}),
        ),
    };

    FunctionDefinition {
        name: function.name().to_string(),
        description: description.to_string(),
        parameters,
    }
}
