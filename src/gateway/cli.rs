//! CLI gateway transport
//!
//! Runs the local `openclaw` binary and turns its JSON output into a short
//! sentence the assistant can speak.

use super::{FunctionInvocation, Gateway};
use crate::config::settings::GatewayConfig;
use crate::models::KnownFunction;
use crate::utils::error::{AppError, AppResult, ErrorContext};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, error, info};

/// Minutes used when `schedule_call` carries none
pub const DEFAULT_CALLBACK_MINUTES: i64 = 5;

/// Gateway reached through the OpenClaw CLI
#[derive(Debug, Clone)]
pub struct CliGateway {
    program: String,
    timeout: Duration,
}

impl CliGateway {
    pub fn new(config: &GatewayConfig) -> Self {
        Self {
            program: config.cli_path.clone(),
            timeout: Duration::from_secs(config.timeout),
        }
    }

    /// Run the CLI and return its stdout
    async fn run(&self, args: &[String]) -> AppResult<Vec<u8>> {
        debug!("Running {} {}", self.program, args.join(" "));

        let child = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .external_api_context("Failed to start openclaw")?;

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| {
                AppError::UpstreamTimeout(format!("openclaw {} timed out", args.first().map(String::as_str).unwrap_or("")))
            })?
            .external_api_context("Failed to wait for openclaw")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!("OpenClaw CLI error: {}", stderr.trim());
            return Err(AppError::ExternalApi(format!(
                "openclaw exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(output.stdout)
    }

    /// Run the CLI and parse its stdout as JSON
    async fn run_json(&self, args: &[String]) -> AppResult<Value> {
        let stdout = self.run(args).await?;
        serde_json::from_slice::<Value>(&stdout).external_api_context("Invalid JSON from openclaw")
    }

    async fn schedule_call(&self, parameters: &Value) -> AppResult<Value> {
        let minutes = callback_minutes(parameters);
        let note = parameters
            .get("message")
            .and_then(Value::as_str)
            .filter(|m| !m.trim().is_empty());

        let at_ms = chrono::Utc::now().timestamp_millis() + minutes * 60 * 1000;
        let payload_message = match note {
            Some(note) => format!("Place a follow-up call via vapi. {}", note),
            None => "Place a follow-up call via vapi".to_string(),
        };

        let args = vec![
            "cron".to_string(),
            "add".to_string(),
            "--schedule".to_string(),
            json!({"kind": "at", "atMs": at_ms}).to_string(),
            "--payload".to_string(),
            json!({"kind": "agentTurn", "message": payload_message}).to_string(),
            "--session".to_string(),
            "isolated".to_string(),
            "--json".to_string(),
        ];

        self.run(&args).await?;
        info!("Scheduled a call back in {} minutes", minutes);

        Ok(Value::String(format!(
            "Okay, I'll call you back in {} minutes.",
            minutes
        )))
    }

    async fn check_sessions(&self) -> AppResult<Value> {
        let args = ["sessions", "list", "--json"].map(String::from);
        let output = self.run_json(&args).await?;
        Ok(Value::String(describe_sessions(&output)))
    }

    async fn check_cron(&self) -> AppResult<Value> {
        let args = ["cron", "list", "--json"].map(String::from);
        let output = self.run_json(&args).await?;
        Ok(Value::String(describe_cron_jobs(&output)))
    }
}

#[async_trait]
impl Gateway for CliGateway {
    fn name(&self) -> &str {
        "cli"
    }

    async fn invoke(&self, invocation: &FunctionInvocation) -> AppResult<Value> {
        match invocation.function {
            KnownFunction::ScheduleCall => self.schedule_call(&invocation.parameters).await,
            KnownFunction::CheckSessions => self.check_sessions().await,
            KnownFunction::CheckCron => self.check_cron().await,
        }
    }
}

/// Minutes until the call back, clamped to 1..=60
pub fn callback_minutes(parameters: &Value) -> i64 {
    parameters
        .get("minutes")
        .and_then(|m| m.as_i64().or_else(|| m.as_f64().map(|f| f as i64)))
        .unwrap_or(DEFAULT_CALLBACK_MINUTES)
        .clamp(1, 60)
}

/// Spoken summary of `openclaw sessions list --json`
pub fn describe_sessions(output: &Value) -> String {
    let running = output
        .get("sessions")
        .and_then(Value::as_array)
        .map(|sessions| {
            sessions
                .iter()
                .filter(|s| s.get("kind").and_then(Value::as_str) == Some("isolated"))
                .count()
        })
        .unwrap_or(0);

    match running {
        0 => "No sub-agents are running right now.".to_string(),
        1 => "1 sub-agent is running right now.".to_string(),
        n => format!("{} sub-agents are running right now.", n),
    }
}

/// Spoken summary of `openclaw cron list --json`
pub fn describe_cron_jobs(output: &Value) -> String {
    let jobs = output
        .get("jobs")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    if jobs.is_empty() {
        return "There are no scheduled jobs.".to_string();
    }

    let enabled = jobs
        .iter()
        .filter(|j| j.get("enabled").and_then(Value::as_bool).unwrap_or(true))
        .count();

    match enabled {
        1 => "1 job is scheduled right now.".to_string(),
        n => format!("{} jobs are scheduled right now.", n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_callback_minutes() {
        assert_eq!(callback_minutes(&json!({})), 5);
        assert_eq!(callback_minutes(&json!({"minutes": 15})), 15);
        assert_eq!(callback_minutes(&json!({"minutes": 0})), 1);
        assert_eq!(callback_minutes(&json!({"minutes": 600})), 60);
        assert_eq!(callback_minutes(&json!({"minutes": 2.9})), 2);
        assert_eq!(callback_minutes(&json!({"minutes": "ten"})), 5);
    }

    #[test]
    fn test_describe_sessions() {
        let output = json!({"sessions": [
            {"kind": "isolated"},
            {"kind": "main"},
            {"kind": "isolated"}
        ]});
        assert_eq!(describe_sessions(&output), "2 sub-agents are running right now.");
        assert_eq!(
            describe_sessions(&json!({"sessions": []})),
            "No sub-agents are running right now."
        );
        assert_eq!(
            describe_sessions(&json!({})),
            "No sub-agents are running right now."
        );
    }

    #[test]
    fn test_describe_cron_jobs() {
        assert_eq!(describe_cron_jobs(&json!({"jobs": []})), "There are no scheduled jobs.");

        let output = json!({"jobs": [
            {"id": "a"},
            {"id": "b", "enabled": false},
            {"id": "c", "enabled": true}
        ]});
        assert_eq!(describe_cron_jobs(&output), "2 jobs are scheduled right now.");
    }
}
