//! # WatchClaw Providers
//!
//! Text-generation provider implementations.
//!
//! All hosted providers with an OpenAI-compatible chat-completions surface
//! (OpenAI, Gemini, DeepSeek, Groq, OpenRouter, Ollama, custom endpoints)
//! are handled by the single `OpenAiCompatibleProvider` — the base URL in
//! `[llm]` selects the service.

pub mod openai_compatible;

use std::sync::Arc;

use watchclaw_core::config::LlmConfig;
use watchclaw_core::error::Result;
use watchclaw_core::traits::TextGenerator;

pub use openai_compatible::OpenAiCompatibleProvider;

/// Create the configured text generator.
pub fn create_generator(config: &LlmConfig) -> Result<Arc<dyn TextGenerator>> {
    Ok(Arc::new(OpenAiCompatibleProvider::new(config.clone())?))
}
