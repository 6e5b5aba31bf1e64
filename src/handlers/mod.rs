//! HTTP handlers module
//!
//! Contains all HTTP endpoint handling logic

pub mod health;
pub mod tts;
pub mod webhook;

use crate::config::Settings;
use crate::gateway::{create_gateway, Gateway};
use crate::middleware::{request_logging_middleware, verify_webhook_signature};
use crate::services::assistant::TTS_ROUTE;
use crate::services::ChannelTtsClient;
use anyhow::Result;
use axum::{middleware, routing::get, routing::post, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

/// Path of the Vapi server webhook
pub const WEBHOOK_ROUTE: &str = "/api/webhook/vapi";

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub gateway: Arc<dyn Gateway>,
    /// Present when the custom voice is enabled
    pub tts: Option<ChannelTtsClient>,
}

impl AppState {
    /// Build state from settings, creating the gateway and TTS clients
    pub fn from_settings(settings: Settings) -> Result<Self> {
        let gateway = create_gateway(&settings)?;
        let tts = if settings.tts.enabled {
            Some(ChannelTtsClient::new(settings.tts.clone())?)
        } else {
            None
        };

        Ok(Self {
            settings,
            gateway,
            tts,
        })
    }
}

/// Create application router
pub async fn create_router(settings: Settings) -> Result<Router> {
    let state = AppState::from_settings(settings)?;
    Ok(build_router(Arc::new(state)))
}

/// Assemble routes and middleware around existing state
pub fn build_router(state: Arc<AppState>) -> Router {
    let max_request_size = state.settings.request.max_request_size;

    let webhook_routes = Router::new()
        .route(WEBHOOK_ROUTE, post(webhook::handle_webhook))
        .route(TTS_ROUTE, post(tts::handle_tts))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            verify_webhook_signature,
        ));

    let middleware_stack = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(RequestBodyLimitLayer::new(max_request_size));

    Router::new()
        .route("/health", get(health::health_check))
        .merge(webhook_routes)
        .with_state(state)
        .layer(middleware_stack)
}
