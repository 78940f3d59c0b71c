//! Unified OpenAI-compatible provider.
//!
//! A single struct that handles chat completions for all OpenAI-compatible
//! APIs. Services are distinguished only by base URL and API key.

use async_trait::async_trait;
use serde_json::{Value, json};

use watchclaw_core::config::LlmConfig;
use watchclaw_core::error::{Result, WatchClawError};
use watchclaw_core::traits::TextGenerator;

/// A text generator over any OpenAI-compatible chat-completions endpoint.
pub struct OpenAiCompatibleProvider {
    config: LlmConfig,
    client: reqwest::Client,
}

impl OpenAiCompatibleProvider {
    pub fn new(config: LlmConfig) -> Result<Self> {
        if config.base_url.is_empty() {
            return Err(WatchClawError::Config("llm.base_url is empty".into()));
        }
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| WatchClawError::Http(format!("HTTP client: {e}")))?;
        Ok(Self { config, client })
    }

    fn chat_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    /// Build the request body for one prompt.
    fn request_body(&self, prompt: &str) -> Value {
        json!({
            "model": self.config.model,
            "temperature": self.config.temperature,
            "max_tokens": self.config.max_tokens,
            "messages": [{ "role": "user", "content": prompt }],
        })
    }
}

#[async_trait]
impl TextGenerator for OpenAiCompatibleProvider {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = self.chat_url();
        let mut req = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&self.request_body(prompt));
        if !self.config.api_key.is_empty() {
            req = req.header("Authorization", format!("Bearer {}", self.config.api_key));
        }

        let resp = req.send().await.map_err(|e| {
            if e.is_timeout() {
                WatchClawError::Timeout(format!("LLM request timed out ({url})"))
            } else {
                WatchClawError::Http(format!("LLM connection failed ({url}): {e}"))
            }
        })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(WatchClawError::Provider(format!(
                "API error {status}: {text}"
            )));
        }

        let body: Value = resp
            .json()
            .await
            .map_err(|e| WatchClawError::Http(format!("Invalid LLM response: {e}")))?;

        body["choices"]
            .get(0)
            .and_then(|c| c["message"]["content"].as_str())
            .map(|s| s.trim().to_string())
            .ok_or_else(|| WatchClawError::Provider("No choices in response".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> OpenAiCompatibleProvider {
        OpenAiCompatibleProvider::new(LlmConfig {
            base_url: "https://api.openai.com/v1/".into(),
            api_key: "sk-test".into(),
            model: "gpt-4o-mini".into(),
            temperature: 0.7,
            max_tokens: 1024,
            timeout_secs: 60,
        })
        .unwrap()
    }

    #[test]
    fn test_chat_url_trims_trailing_slash() {
        assert_eq!(
            provider().chat_url(),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_request_body_shape() {
        let body = provider().request_body("summarize this");
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "summarize this");
        assert_eq!(body["max_tokens"], 1024);
    }

    #[test]
    fn test_empty_base_url_rejected() {
        let result = OpenAiCompatibleProvider::new(LlmConfig {
            base_url: String::new(),
            ..LlmConfig::default()
        });
        assert!(result.is_err());
    }
}
