//! Shared helpers for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use vapi_relay::gateway::{FunctionInvocation, Gateway};
use vapi_relay::services::ChannelTtsClient;
use vapi_relay::utils::error::{AppError, AppResult};
use vapi_relay::{build_router, AppState, Settings};

/// Build settings from key/value pairs, ignoring the process environment
pub fn test_settings(pairs: &[(&str, &str)]) -> Settings {
    let mut map: HashMap<String, String> = HashMap::from([
        ("SERVER_HOST".to_string(), "127.0.0.1".to_string()),
        ("SERVER_PORT".to_string(), "8083".to_string()),
        ("RUST_LOG".to_string(), "debug".to_string()),
        ("LOG_FORMAT".to_string(), "text".to_string()),
        ("CHANNEL_TTS_ENABLED".to_string(), "false".to_string()),
    ]);
    for (key, value) in pairs {
        map.insert(key.to_string(), value.to_string());
    }

    Settings::from_lookup(|key| map.get(key).cloned()).expect("Failed to create test settings")
}

/// Gateway double that records every invocation
pub struct RecordingGateway {
    pub calls: Mutex<Vec<FunctionInvocation>>,
    reply: Result<Value, String>,
}

impl RecordingGateway {
    /// Gateway answering every call with `reply`
    pub fn replying(reply: Value) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            reply: Ok(reply),
        })
    }

    /// Gateway failing every call
    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            reply: Err(message.to_string()),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Gateway for RecordingGateway {
    fn name(&self) -> &str {
        "recording"
    }

    async fn invoke(&self, invocation: &FunctionInvocation) -> AppResult<Value> {
        self.calls.lock().unwrap().push(invocation.clone());
        match &self.reply {
            Ok(value) => Ok(value.clone()),
            Err(message) => Err(AppError::ExternalApi(message.clone())),
        }
    }
}

/// Router wired to the given gateway double
pub fn test_app(settings: Settings, gateway: Arc<RecordingGateway>) -> Router {
    let tts = if settings.tts.enabled {
        Some(ChannelTtsClient::new(settings.tts.clone()).expect("Failed to create TTS client"))
    } else {
        None
    };

    let state = AppState {
        settings,
        gateway,
        tts,
    };
    build_router(Arc::new(state))
}

/// POST a JSON body to `uri`
pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    post_raw(uri, body.to_string())
}

/// POST raw text to `uri`
pub fn post_raw(uri: &str, body: impl Into<String>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.into()))
        .unwrap()
}

/// Send a request and return status plus raw body
pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body.to_vec())
}

/// Send a request and parse the body as JSON
pub async fn send_json(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let (status, body) = send(app, request).await;
    let value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, value)
}

/// Function-call webhook body
pub fn function_call_payload(name: &str, parameters: Value) -> Value {
    json!({
        "message": {
            "type": "function-call",
            "call": {"id": "call-123"},
            "functionCall": {"name": name, "parameters": parameters}
        }
    })
}

/// Server that sends response headers, then stalls before finishing the body
///
/// Returns its base URL.
pub async fn stalled_body_server() -> String {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut buf = vec![0u8; 8192];
                let _ = socket.read(&mut buf).await;
                let _ = socket
                    .write_all(
                        b"HTTP/1.1 200 OK\r\nContent-Type: application/octet-stream\r\nContent-Length: 4096\r\n\r\n{\"partial\"",
                    )
                    .await;
                let _ = socket.flush().await;
                tokio::time::sleep(std::time::Duration::from_secs(30)).await;
            });
        }
    });

    format!("http://{}", addr)
}
