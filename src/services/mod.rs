//! Service layer module
//!
//! Contains the assistant builder and the TTS client

pub mod assistant;
pub mod tts;

pub use assistant::build_assistant;
pub use tts::ChannelTtsClient;
