//! Logging utilities
//!
//! Shared logging configuration and helper functions

use crate::config::settings::LoggingConfig;
use anyhow::Result;
use serde_json::Value;

/// Set to true to log webhook payloads without truncation
pub const VERBOSE_PAYLOAD_LOGGING: bool = false;

/// Longest string kept verbatim in a payload summary
const MAX_LOGGED_STRING: usize = 200;

/// Longest array kept verbatim in a payload summary
const MAX_LOGGED_ITEMS: usize = 5;

/// Initialize the tracing subscriber
///
/// `RUST_LOG` directives win over the configured level when present.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.level));

    let result = if config.format == "json" {
        // JSON format logs (production environment)
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .with_current_span(false)
            .with_span_list(false)
            .try_init()
    } else {
        // Human readable format (development environment)
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .try_init()
    };

    result.map_err(|e| anyhow::anyhow!("Failed to set tracing subscriber: {}", e))
}

/// Truncate a string on a char boundary with a note about the original length
pub fn truncate_content(s: &str, max_chars: usize) -> String {
    let total = s.chars().count();
    if total > max_chars {
        let kept: String = s.chars().take(max_chars).collect();
        format!("{}... ({} chars truncated)", kept, total - max_chars)
    } else {
        s.to_string()
    }
}

/// Create a filtered copy of a webhook payload for logging
///
/// Keeps the original structure but truncates long strings and arrays.
pub fn create_payload_log_summary(payload: &Value) -> Value {
    if VERBOSE_PAYLOAD_LOGGING {
        return payload.clone();
    }

    match payload {
        Value::String(s) => Value::String(truncate_content(s, MAX_LOGGED_STRING)),
        Value::Array(items) => {
            let mut summary: Vec<Value> = items
                .iter()
                .take(MAX_LOGGED_ITEMS)
                .map(create_payload_log_summary)
                .collect();
            if items.len() > MAX_LOGGED_ITEMS {
                summary.push(Value::String(format!(
                    "...and {} more items",
                    items.len() - MAX_LOGGED_ITEMS
                )));
            }
            Value::Array(summary)
        }
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), create_payload_log_summary(v)))
                .collect(),
        ),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let text = "안녕하세요 폴리나예요";
        let truncated = truncate_content(text, 3);

        assert!(truncated.starts_with("안녕하"));
        assert!(truncated.contains("8 chars truncated"));
    }

    #[test]
    fn test_short_strings_untouched() {
        assert_eq!(truncate_content("hello", 10), "hello");
    }

    #[test]
    fn test_payload_summary_truncates_nested_values() {
        let payload = json!({
            "message": {
                "type": "transcript",
                "transcript": "x".repeat(500),
                "artifacts": [1, 2, 3, 4, 5, 6, 7]
            }
        });

        let summary = create_payload_log_summary(&payload);

        assert_eq!(summary["message"]["type"], "transcript");
        let transcript = summary["message"]["transcript"].as_str().unwrap();
        assert!(transcript.contains("300 chars truncated"));
        assert_eq!(summary["message"]["artifacts"].as_array().unwrap().len(), 6);
    }
}
