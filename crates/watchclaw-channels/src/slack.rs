//! Slack channel — incoming-webhook POST.

use async_trait::async_trait;

use watchclaw_core::config::SlackConfig;
use watchclaw_core::error::{Result, WatchClawError};
use watchclaw_core::traits::NotifyChannel;

pub struct SlackChannel {
    config: SlackConfig,
    client: reqwest::Client,
}

impl SlackChannel {
    pub fn new(config: SlackConfig) -> Result<Self> {
        if config.webhook_url.is_empty() {
            return Err(WatchClawError::Config("slack.webhook_url not configured".into()));
        }
        Ok(Self {
            config,
            client: reqwest::Client::new(),
        })
    }
}

#[async_trait]
impl NotifyChannel for SlackChannel {
    fn name(&self) -> &str {
        "slack"
    }

    async fn send(&self, message: &str) -> Result<()> {
        let body = serde_json::json!({
            "channel": self.config.channel,
            "text": message,
            "username": self.config.username,
            "icon_emoji": self.config.icon_emoji,
        });

        let resp = self
            .client
            .post(&self.config.webhook_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| WatchClawError::Channel(format!("Slack send failed: {e}")))?;

        if resp.status().is_success() {
            tracing::info!("✅ Slack notification sent to {}", self.config.channel);
            Ok(())
        } else {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            Err(WatchClawError::Channel(format!(
                "Slack webhook error {status}: {body}"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_webhook_url() {
        let result = SlackChannel::new(SlackConfig {
            enabled: true,
            webhook_url: String::new(),
            channel: "#general".into(),
            username: "WatchClaw".into(),
            icon_emoji: ":robot_face:".into(),
        });
        assert!(result.is_err());
    }
}
