//! HTTP middleware
//!
//! Webhook authentication and request logging

pub mod auth;
pub mod logging;

pub use auth::verify_webhook_signature;
pub use logging::request_logging_middleware;
