//! Telegram Bot API channel — message sending via `sendMessage`.

use async_trait::async_trait;

use watchclaw_core::config::TelegramConfig;
use watchclaw_core::error::{Result, WatchClawError};
use watchclaw_core::traits::NotifyChannel;

pub struct TelegramChannel {
    config: TelegramConfig,
    client: reqwest::Client,
}

impl TelegramChannel {
    pub fn new(config: TelegramConfig) -> Result<Self> {
        if config.bot_token.is_empty() {
            return Err(WatchClawError::Config("telegram.bot_token not configured".into()));
        }
        if config.chat_id.is_empty() {
            return Err(WatchClawError::Config("telegram.chat_id not configured".into()));
        }
        Ok(Self {
            config,
            client: reqwest::Client::new(),
        })
    }

    fn api_url(&self, method: &str) -> String {
        format!("https://api.telegram.org/bot{}/{}", self.config.bot_token, method)
    }
}

#[async_trait]
impl NotifyChannel for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn send(&self, message: &str) -> Result<()> {
        let resp = self
            .client
            .post(self.api_url("sendMessage"))
            .json(&serde_json::json!({
                "chat_id": self.config.chat_id,
                "text": message,
                "parse_mode": "HTML",
            }))
            .send()
            .await
            .map_err(|e| WatchClawError::Channel(format!("Telegram send failed: {e}")))?;

        if resp.status().is_success() {
            tracing::info!("✅ Telegram notification sent to {}", self.config.chat_id);
            Ok(())
        } else {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            Err(WatchClawError::Channel(format!(
                "Telegram API error {status}: {body}"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_token_and_chat_id() {
        let no_token = TelegramChannel::new(TelegramConfig {
            enabled: true,
            bot_token: String::new(),
            chat_id: "42".into(),
        });
        assert!(no_token.is_err());

        let no_chat = TelegramChannel::new(TelegramConfig {
            enabled: true,
            bot_token: "123:abc".into(),
            chat_id: String::new(),
        });
        assert!(no_chat.is_err());
    }

    #[test]
    fn test_api_url() {
        let ch = TelegramChannel::new(TelegramConfig {
            enabled: true,
            bot_token: "123:abc".into(),
            chat_id: "42".into(),
        })
        .unwrap();
        assert_eq!(
            ch.api_url("sendMessage"),
            "https://api.telegram.org/bot123:abc/sendMessage"
        );
    }
}
