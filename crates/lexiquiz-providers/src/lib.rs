//! lexiquiz-providers: LLM provider integrations.
//!
//! Implements the `LlmProvider` trait for Google Gemini and OpenAI-compatible
//! endpoints, plus a scripted mock, and loads provider settings from
//! `lexiquiz.toml`.

pub mod config;
pub mod gemini;
mod http;
pub mod mock;
pub mod openai;

pub use config::{create_provider, load_config, LexiquizConfig, ProviderConfig};
pub use lexiquiz_core::ProviderError;
