//! Configuration management module
//!
//! Loads relay settings from the environment and `.env` files.

pub mod settings;

pub use settings::{GatewayMode, OutputEncoding, Settings};
