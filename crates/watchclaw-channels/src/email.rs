//! Email channel — async SMTP sending via lettre.
//!
//! Compose-and-relay: one plain-text message per configured recipient,
//! STARTTLS against the configured SMTP host. Supports Gmail, Outlook,
//! custom servers.

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use watchclaw_core::config::EmailConfig;
use watchclaw_core::error::{Result, WatchClawError};
use watchclaw_core::traits::NotifyChannel;

pub struct EmailChannel {
    config: EmailConfig,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl EmailChannel {
    pub fn new(config: EmailConfig) -> Result<Self> {
        if config.smtp_host.is_empty() {
            return Err(WatchClawError::Config("email.smtp_host not configured".into()));
        }
        if config.from.is_empty() {
            return Err(WatchClawError::Config("email.from not configured".into()));
        }
        if config.recipients.is_empty() {
            return Err(WatchClawError::Config("email.recipients is empty".into()));
        }

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            .map_err(|e| WatchClawError::Channel(format!("SMTP relay setup: {e}")))?
            .port(config.smtp_port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        Ok(Self { config, transport })
    }

    fn subject(&self) -> String {
        format!("WatchClaw report — {}", chrono::Utc::now().format("%d/%m/%Y"))
    }

    async fn send_one(&self, from: &Mailbox, recipient: &str, subject: &str, body: &str) -> Result<()> {
        let to: Mailbox = recipient
            .parse()
            .map_err(|e| WatchClawError::Config(format!("recipient '{recipient}' invalid: {e}")))?;

        let email = Message::builder()
            .from(from.clone())
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| WatchClawError::Channel(format!("Email build failed: {e}")))?;

        self.transport
            .send(email)
            .await
            .map_err(|e| WatchClawError::Channel(format!("SMTP send failed: {e}")))?;
        Ok(())
    }
}

#[async_trait]
impl NotifyChannel for EmailChannel {
    fn name(&self) -> &str {
        "email"
    }

    /// Sends to each recipient independently: a bad address or a failed
    /// relay for one recipient never skips the rest. The channel as a whole
    /// fails only when nobody received the message.
    async fn send(&self, message: &str) -> Result<()> {
        let from: Mailbox = self
            .config
            .from
            .parse()
            .map_err(|e| WatchClawError::Config(format!("email.from invalid: {e}")))?;
        let subject = self.subject();

        let mut delivered = 0usize;
        let mut failures: Vec<String> = Vec::new();
        for recipient in &self.config.recipients {
            match self.send_one(&from, recipient, &subject, message).await {
                Ok(()) => {
                    delivered += 1;
                    tracing::info!("✅ Email sent to {recipient}");
                }
                Err(e) => {
                    tracing::warn!("⚠️ Email to {recipient} failed: {e}");
                    failures.push(format!("{recipient}: {e}"));
                }
            }
        }

        if delivered == 0 {
            return Err(WatchClawError::Channel(format!(
                "no recipients delivered: {}",
                failures.join("; ")
            )));
        }
        Ok(())
    }
}
