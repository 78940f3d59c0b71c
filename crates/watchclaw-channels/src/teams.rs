//! Microsoft Teams channel — incoming-webhook MessageCard.

use async_trait::async_trait;

use watchclaw_core::config::TeamsConfig;
use watchclaw_core::error::{Result, WatchClawError};
use watchclaw_core::traits::NotifyChannel;

pub struct TeamsChannel {
    config: TeamsConfig,
    client: reqwest::Client,
}

impl TeamsChannel {
    pub fn new(config: TeamsConfig) -> Result<Self> {
        if config.webhook_url.is_empty() {
            return Err(WatchClawError::Config("teams.webhook_url not configured".into()));
        }
        Ok(Self {
            config,
            client: reqwest::Client::new(),
        })
    }

    /// MessageCard payload understood by Teams incoming webhooks.
    fn card(&self, message: &str) -> serde_json::Value {
        let title = "WatchClaw notification";
        serde_json::json!({
            "@type": "MessageCard",
            "@context": "http://schema.org/extensions",
            "themeColor": "0076D7",
            "summary": title,
            "sections": [{
                "activityTitle": title,
                "activitySubtitle": format!("WatchClaw • {}", chrono::Utc::now().format("%d/%m/%Y %H:%M")),
                "text": message,
                "markdown": true
            }]
        })
    }
}

#[async_trait]
impl NotifyChannel for TeamsChannel {
    fn name(&self) -> &str {
        "teams"
    }

    async fn send(&self, message: &str) -> Result<()> {
        let resp = self
            .client
            .post(&self.config.webhook_url)
            .json(&self.card(message))
            .send()
            .await
            .map_err(|e| WatchClawError::Channel(format!("Teams send failed: {e}")))?;

        if resp.status().is_success() {
            tracing::info!("✅ Teams notification sent");
            Ok(())
        } else {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            Err(WatchClawError::Channel(format!(
                "Teams webhook error {status}: {body}"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_shape() {
        let ch = TeamsChannel::new(TeamsConfig {
            enabled: true,
            webhook_url: "https://outlook.office.com/webhook/x".into(),
        })
        .unwrap();
        let card = ch.card("2 files processed");
        assert_eq!(card["@type"], "MessageCard");
        assert_eq!(card["sections"][0]["text"], "2 files processed");
    }

    #[test]
    fn test_requires_webhook_url() {
        assert!(
            TeamsChannel::new(TeamsConfig {
                enabled: true,
                webhook_url: String::new(),
            })
            .is_err()
        );
    }
}
