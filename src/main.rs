//! Vapi Relay Server
//!
//! Receives Vapi webhooks, serves the custom voice endpoint and relays
//! function calls to the OpenClaw gateway

use anyhow::{Context, Result};
use tracing::{info, warn};
use vapi_relay::utils::logging::init_logging;
use vapi_relay::{create_router, version_info, Settings};

#[tokio::main]
async fn main() -> Result<()> {
    // Configuration errors abort startup before anything is served
    let settings = Settings::new().context("Failed to load server settings")?;

    init_logging(&settings.logging)?;
    info!("{}", version_info());

    if !settings.requires_signature() {
        warn!("VAPI_WEBHOOK_SECRET is not set, webhook signatures will not be checked");
    }
    if settings.vapi.phone_number.is_empty() {
        info!("No VAPI_PHONE_NUMBER configured");
    } else {
        info!("📞 Serving calls for {}", settings.vapi.phone_number);
    }
    info!(
        "Gateway: {} ({}), Channel TTS: {}",
        settings.gateway.mode,
        settings.gateway.base_url,
        if settings.tts.enabled { "enabled" } else { "disabled" }
    );

    let app = create_router(settings.clone()).await?;

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("🚀 Vapi relay started!");
    info!("📝 Health check: http://{}/health", addr);
    info!("🔄 Webhook endpoint: http://{}/api/webhook/vapi", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("Failed to start server: {}", e))?;

    info!("Server stopped");
    Ok(())
}

/// Resolve when the process receives Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
