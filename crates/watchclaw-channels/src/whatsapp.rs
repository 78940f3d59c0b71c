//! WhatsApp Business Cloud API channel.
//!
//! Uses the official WhatsApp Business Platform (Cloud API).
//! Requires: Access Token + Phone Number ID from Meta Business Suite.

use async_trait::async_trait;

use watchclaw_core::config::WhatsAppConfig;
use watchclaw_core::error::{Result, WatchClawError};
use watchclaw_core::traits::NotifyChannel;

pub struct WhatsAppChannel {
    config: WhatsAppConfig,
    client: reqwest::Client,
}

impl WhatsAppChannel {
    pub fn new(config: WhatsAppConfig) -> Result<Self> {
        if config.access_token.is_empty() {
            return Err(WatchClawError::Config("whatsapp.access_token not configured".into()));
        }
        if config.phone_number_id.is_empty() {
            return Err(WatchClawError::Config("whatsapp.phone_number_id not configured".into()));
        }
        if config.to.is_empty() {
            return Err(WatchClawError::Config("whatsapp.to not configured".into()));
        }
        Ok(Self {
            config,
            client: reqwest::Client::new(),
        })
    }

    fn messages_url(&self) -> String {
        format!(
            "https://graph.facebook.com/v21.0/{}/messages",
            self.config.phone_number_id
        )
    }
}

#[async_trait]
impl NotifyChannel for WhatsAppChannel {
    fn name(&self) -> &str {
        "whatsapp"
    }

    async fn send(&self, message: &str) -> Result<()> {
        let body = serde_json::json!({
            "messaging_product": "whatsapp",
            "recipient_type": "individual",
            "to": self.config.to,
            "type": "text",
            "text": {
                "preview_url": false,
                "body": message
            }
        });

        let resp = self
            .client
            .post(self.messages_url())
            .header("Authorization", format!("Bearer {}", self.config.access_token))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| WatchClawError::Channel(format!("WhatsApp API request failed: {e}")))?;

        if resp.status().is_success() {
            tracing::info!("✅ WhatsApp notification sent to {}", self.config.to);
            Ok(())
        } else {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            Err(WatchClawError::Channel(format!(
                "WhatsApp API error {status}: {body}"
            )))
        }
    }
}
