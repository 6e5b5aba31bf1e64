//! Data models module
//!
//! Defines the webhook request and response payloads exchanged with Vapi

pub mod vapi;

pub use vapi::*;
