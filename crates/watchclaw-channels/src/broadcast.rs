//! Broadcast fan-out — one message to all enabled channels, concurrently.
//!
//! Channel sends are independent: an error, timeout, or panic in one is
//! recorded as `false` for that channel and never prevents the others.
//! The result map is assembled only after every attempt has completed,
//! and its key set equals exactly the set of channels that were built.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;

use watchclaw_core::config::ChannelConfig;
use watchclaw_core::traits::NotifyChannel;
use watchclaw_core::types::NotificationResult;

use crate::discord::DiscordChannel;
use crate::email::EmailChannel;
use crate::slack::SlackChannel;
use crate::teams::TeamsChannel;
use crate::telegram::TelegramChannel;
use crate::whatsapp::WhatsAppChannel;

pub struct Broadcaster {
    channels: Vec<Arc<dyn NotifyChannel>>,
    send_timeout: Duration,
}

impl Broadcaster {
    /// Build channels from a fresh config snapshot.
    ///
    /// Only sections with `enabled = true` are considered. A channel whose
    /// required fields are missing is skipped for this broadcast with a
    /// warning — the other channels proceed normally.
    pub fn from_config(config: &ChannelConfig) -> Self {
        let mut channels: Vec<Arc<dyn NotifyChannel>> = Vec::new();

        if let Some(c) = &config.email
            && c.enabled
        {
            match EmailChannel::new(c.clone()) {
                Ok(ch) => channels.push(Arc::new(ch)),
                Err(e) => tracing::warn!("⚠️ email channel misconfigured, skipping: {e}"),
            }
        }
        if let Some(c) = &config.telegram
            && c.enabled
        {
            match TelegramChannel::new(c.clone()) {
                Ok(ch) => channels.push(Arc::new(ch)),
                Err(e) => tracing::warn!("⚠️ telegram channel misconfigured, skipping: {e}"),
            }
        }
        if let Some(c) = &config.whatsapp
            && c.enabled
        {
            match WhatsAppChannel::new(c.clone()) {
                Ok(ch) => channels.push(Arc::new(ch)),
                Err(e) => tracing::warn!("⚠️ whatsapp channel misconfigured, skipping: {e}"),
            }
        }
        if let Some(c) = &config.slack
            && c.enabled
        {
            match SlackChannel::new(c.clone()) {
                Ok(ch) => channels.push(Arc::new(ch)),
                Err(e) => tracing::warn!("⚠️ slack channel misconfigured, skipping: {e}"),
            }
        }
        if let Some(c) = &config.discord
            && c.enabled
        {
            match DiscordChannel::new(c.clone()) {
                Ok(ch) => channels.push(Arc::new(ch)),
                Err(e) => tracing::warn!("⚠️ discord channel misconfigured, skipping: {e}"),
            }
        }
        if let Some(c) = &config.teams
            && c.enabled
        {
            match TeamsChannel::new(c.clone()) {
                Ok(ch) => channels.push(Arc::new(ch)),
                Err(e) => tracing::warn!("⚠️ teams channel misconfigured, skipping: {e}"),
            }
        }

        Self {
            channels,
            send_timeout: Duration::from_secs(config.send_timeout_secs),
        }
    }

    /// Build from explicit channels (used by tests and embedders).
    pub fn with_channels(channels: Vec<Arc<dyn NotifyChannel>>, send_timeout: Duration) -> Self {
        Self {
            channels,
            send_timeout,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn channel_names(&self) -> Vec<String> {
        self.channels.iter().map(|c| c.name().to_string()).collect()
    }

    /// Fan one message out to every channel, join all attempts, and return
    /// the per-channel outcome map.
    pub async fn broadcast(&self, message: &str) -> NotificationResult {
        let attempts = self.channels.iter().map(|channel| {
            let channel = Arc::clone(channel);
            let message = message.to_string();
            let timeout = self.send_timeout;

            // Each send runs on its own task: a panic or hang in one
            // adapter cannot take the others down with it.
            tokio::spawn(async move {
                let name = channel.name().to_string();
                let ok = match tokio::time::timeout(timeout, channel.send(&message)).await {
                    Ok(Ok(())) => true,
                    Ok(Err(e)) => {
                        tracing::warn!("⚠️ [{name}] send failed: {e}");
                        false
                    }
                    Err(_) => {
                        tracing::warn!("⚠️ [{name}] send timed out after {timeout:?}");
                        false
                    }
                };
                (name, ok)
            })
        });

        let mut results = NotificationResult::new();
        for (i, joined) in join_all(attempts).await.into_iter().enumerate() {
            match joined {
                Ok((name, ok)) => {
                    results.insert(name, ok);
                }
                Err(e) => {
                    // Task panicked — still owes its slot in the map.
                    let name = self.channels[i].name().to_string();
                    tracing::warn!("⚠️ [{name}] send task panicked: {e}");
                    results.insert(name, false);
                }
            }
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use watchclaw_core::config::{SlackConfig, TelegramConfig};
    use watchclaw_core::error::{Result, WatchClawError};

    struct FakeChannel {
        name: String,
        fail: bool,
        delay: Option<Duration>,
        calls: Arc<AtomicUsize>,
    }

    impl FakeChannel {
        fn ok(name: &str) -> Arc<Self> {
            Arc::new(Self {
                name: name.into(),
                fail: false,
                delay: None,
                calls: Arc::new(AtomicUsize::new(0)),
            })
        }

        fn failing(name: &str) -> Arc<Self> {
            Arc::new(Self {
                name: name.into(),
                fail: true,
                delay: None,
                calls: Arc::new(AtomicUsize::new(0)),
            })
        }

        fn slow(name: &str, delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                name: name.into(),
                fail: false,
                delay: Some(delay),
                calls: Arc::new(AtomicUsize::new(0)),
            })
        }
    }

    #[async_trait]
    impl NotifyChannel for FakeChannel {
        fn name(&self) -> &str {
            &self.name
        }

        async fn send(&self, _message: &str) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(d) = self.delay {
                tokio::time::sleep(d).await;
            }
            if self.fail {
                Err(WatchClawError::Channel("boom".into()))
            } else {
                Ok(())
            }
        }
    }

    #[tokio::test]
    async fn test_five_channels_one_failure() {
        let channels: Vec<Arc<dyn NotifyChannel>> = vec![
            FakeChannel::ok("email"),
            FakeChannel::ok("telegram"),
            FakeChannel::ok("slack"),
            FakeChannel::ok("discord"),
            FakeChannel::failing("teams"),
        ];
        let b = Broadcaster::with_channels(channels, Duration::from_secs(5));
        let results = b.broadcast("hello").await;

        assert_eq!(results.len(), 5);
        assert_eq!(results.values().filter(|v| **v).count(), 4);
        assert_eq!(results["teams"], false);
        for name in ["email", "telegram", "slack", "discord"] {
            assert_eq!(results[name], true);
        }
    }

    #[tokio::test]
    async fn test_key_set_matches_channel_set() {
        let channels: Vec<Arc<dyn NotifyChannel>> =
            vec![FakeChannel::ok("a"), FakeChannel::failing("b")];
        let b = Broadcaster::with_channels(channels, Duration::from_secs(5));
        let results = b.broadcast("msg").await;

        let mut keys: Vec<_> = results.keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_recorded_as_false() {
        let slow = FakeChannel::slow("slow", Duration::from_secs(60));
        let fast = FakeChannel::ok("fast");
        let b = Broadcaster::with_channels(
            vec![slow.clone(), fast.clone()],
            Duration::from_secs(1),
        );
        let results = b.broadcast("msg").await;

        assert_eq!(results["slow"], false);
        assert_eq!(results["fast"], true);
        assert_eq!(slow.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_config_yields_empty_result() {
        let b = Broadcaster::from_config(&ChannelConfig::default());
        assert!(b.is_empty());
        assert!(b.broadcast("msg").await.is_empty());
    }

    #[tokio::test]
    async fn test_disabled_channels_excluded() {
        let config = ChannelConfig {
            telegram: Some(TelegramConfig {
                enabled: false,
                bot_token: "123:abc".into(),
                chat_id: "42".into(),
            }),
            slack: Some(SlackConfig {
                enabled: true,
                webhook_url: "https://hooks.slack.com/services/x".into(),
                channel: "#ops".into(),
                username: "WatchClaw".into(),
                icon_emoji: ":robot_face:".into(),
            }),
            ..ChannelConfig::default()
        };
        let b = Broadcaster::from_config(&config);
        assert_eq!(b.channel_names(), vec!["slack"]);
    }

    #[tokio::test]
    async fn test_misconfigured_channel_skipped() {
        // Enabled but missing bot_token: treated as disabled for this
        // broadcast, others unaffected.
        let config = ChannelConfig {
            telegram: Some(TelegramConfig {
                enabled: true,
                bot_token: String::new(),
                chat_id: "42".into(),
            }),
            slack: Some(SlackConfig {
                enabled: true,
                webhook_url: "https://hooks.slack.com/services/x".into(),
                channel: "#ops".into(),
                username: "WatchClaw".into(),
                icon_emoji: ":robot_face:".into(),
            }),
            ..ChannelConfig::default()
        };
        let b = Broadcaster::from_config(&config);
        assert_eq!(b.channel_names(), vec!["slack"]);
    }
}
