//! Utilities module
//!
//! Contains error handling, logging and audio helpers

pub mod audio;
pub mod error;
pub mod logging;
