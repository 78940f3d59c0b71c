//! Discord channel — bot-token message posting.

use async_trait::async_trait;

use watchclaw_core::config::DiscordConfig;
use watchclaw_core::error::{Result, WatchClawError};
use watchclaw_core::traits::NotifyChannel;

pub struct DiscordChannel {
    config: DiscordConfig,
    client: reqwest::Client,
}

impl DiscordChannel {
    pub fn new(config: DiscordConfig) -> Result<Self> {
        if config.bot_token.is_empty() {
            return Err(WatchClawError::Config("discord.bot_token not configured".into()));
        }
        if config.channel_id.is_empty() {
            return Err(WatchClawError::Config("discord.channel_id not configured".into()));
        }
        Ok(Self {
            config,
            client: reqwest::Client::new(),
        })
    }

    fn messages_url(&self) -> String {
        format!(
            "https://discord.com/api/v10/channels/{}/messages",
            self.config.channel_id
        )
    }
}

#[async_trait]
impl NotifyChannel for DiscordChannel {
    fn name(&self) -> &str {
        "discord"
    }

    async fn send(&self, message: &str) -> Result<()> {
        let resp = self
            .client
            .post(self.messages_url())
            .header("Authorization", format!("Bot {}", self.config.bot_token))
            .header("Content-Type", "application/json")
            .json(&serde_json::json!({ "content": message }))
            .send()
            .await
            .map_err(|e| WatchClawError::Channel(format!("Discord send failed: {e}")))?;

        if resp.status().is_success() {
            tracing::info!("✅ Discord notification sent to channel {}", self.config.channel_id);
            Ok(())
        } else {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            Err(WatchClawError::Channel(format!(
                "Discord API error {status}: {body}"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_url() {
        let ch = DiscordChannel::new(DiscordConfig {
            enabled: true,
            bot_token: "token".into(),
            channel_id: "999".into(),
        })
        .unwrap();
        assert_eq!(
            ch.messages_url(),
            "https://discord.com/api/v10/channels/999/messages"
        );
    }

    #[test]
    fn test_requires_token_and_channel() {
        assert!(
            DiscordChannel::new(DiscordConfig {
                enabled: true,
                bot_token: String::new(),
                channel_id: "999".into(),
            })
            .is_err()
        );
        assert!(
            DiscordChannel::new(DiscordConfig {
                enabled: true,
                bot_token: "token".into(),
                channel_id: String::new(),
            })
            .is_err()
        );
    }
}
