//! wordcoach-providers — language-model graders for writing exercises.
//!
//! Implements the `GradingProvider` trait for Gemini and OpenAI-compatible
//! APIs, and loads the `wordcoach.toml` configuration that selects them.

pub mod config;
pub mod gemini;
mod http;
pub mod mock;
pub mod openai;

pub use config::{create_provider, load_config, load_config_from, ProviderConfig, WordcoachConfig};
pub use wordcoach_core::error::ProviderError;
