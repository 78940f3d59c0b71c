//! WatchClaw configuration system.
//!
//! Components never hold config long-term: a `ConfigSource` hands out a
//! fresh snapshot per run and per broadcast, so edits to the TOML file
//! (including channel credentials) take effect on the next tick without
//! a restart.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, WatchClawError};

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WatchClawConfig {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub watch: WatchConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub dispatch: DispatchConfig,
    #[serde(default)]
    pub channel: ChannelConfig,
}

impl WatchClawConfig {
    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| WatchClawError::Config(format!("Failed to read config: {e}")))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| WatchClawError::Config(format!("Failed to parse config: {e}")))?;
        Ok(config)
    }

    /// Get the default config path (~/.watchclaw/config.toml).
    pub fn default_path() -> PathBuf {
        Self::home_dir().join("config.toml")
    }

    /// Get the WatchClaw home directory.
    pub fn home_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".watchclaw")
    }

    /// Copy with credential fields blanked, for `watchclaw config` output.
    pub fn redacted(&self) -> Self {
        let mut c = self.clone();
        redact(&mut c.llm.api_key);
        if let Some(email) = &mut c.channel.email {
            redact(&mut email.password);
        }
        if let Some(tg) = &mut c.channel.telegram {
            redact(&mut tg.bot_token);
        }
        if let Some(wa) = &mut c.channel.whatsapp {
            redact(&mut wa.access_token);
        }
        if let Some(slack) = &mut c.channel.slack {
            redact(&mut slack.webhook_url);
        }
        if let Some(dc) = &mut c.channel.discord {
            redact(&mut dc.bot_token);
        }
        if let Some(teams) = &mut c.channel.teams {
            redact(&mut teams.webhook_url);
        }
        c
    }
}

fn redact(field: &mut String) {
    if !field.is_empty() {
        *field = "***".into();
    }
}

/// Hosted LLM provider configuration (OpenAI-compatible endpoint).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String { "https://api.openai.com/v1".into() }
fn default_model() -> String { "gpt-4o-mini".into() }
fn default_temperature() -> f32 { 0.7 }
fn default_max_tokens() -> u32 { 1024 }
fn default_llm_timeout() -> u64 { 60 }

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_llm_timeout(),
        }
    }
}

/// Trigger configuration: fixed daily fire hours plus an hourly fallback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Hours of day (0-23) at which a run fires (minute 0 slot).
    #[serde(default = "default_fire_hours")]
    pub fire_hours: Vec<u32>,
    /// Also fire once in every hour slot not covered by fire_hours.
    #[serde(default = "bool_true")]
    pub hourly_fallback: bool,
    /// Loop wake interval in seconds.
    #[serde(default = "default_tick_interval")]
    pub tick_interval_secs: u64,
}

fn default_fire_hours() -> Vec<u32> { vec![9, 15, 21] }
fn default_tick_interval() -> u64 { 60 }
fn bool_true() -> bool { true }

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            fire_hours: default_fire_hours(),
            hourly_fallback: true,
            tick_interval_secs: default_tick_interval(),
        }
    }
}

/// Watched-directory configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    #[serde(default = "default_watch_dir")]
    pub dir: String,
    /// File extension filter, without the leading dot.
    #[serde(default = "default_extension")]
    pub extension: String,
    /// Only files modified within this window are candidates.
    #[serde(default = "default_lookback")]
    pub lookback_secs: u64,
}

fn default_watch_dir() -> String { "data".into() }
fn default_extension() -> String { "xlsx".into() }
fn default_lookback() -> u64 { 3600 }

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            dir: default_watch_dir(),
            extension: default_extension(),
            lookback_secs: default_lookback(),
        }
    }
}

/// Report persistence configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_report_dir")]
    pub dir: String,
    #[serde(default = "default_save_timeout")]
    pub save_timeout_secs: u64,
}

fn default_report_dir() -> String { "reports".into() }
fn default_save_timeout() -> u64 { 10 }

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            dir: default_report_dir(),
            save_timeout_secs: default_save_timeout(),
        }
    }
}

/// Job dispatch configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Per-file handler timeout.
    #[serde(default = "default_handler_timeout")]
    pub handler_timeout_secs: u64,
    /// File-name keywords routed to the sales-analysis handler.
    #[serde(default = "default_sales_keywords")]
    pub sales_keywords: Vec<String>,
}

fn default_handler_timeout() -> u64 { 120 }
fn default_sales_keywords() -> Vec<String> {
    vec!["vendas".into(), "sales".into()]
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            handler_timeout_secs: default_handler_timeout(),
            sales_keywords: default_sales_keywords(),
        }
    }
}

/// Notification channel configuration. Each section carries its own
/// enabled flag and credentials; absent sections are disabled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Per-channel send timeout during a broadcast.
    #[serde(default = "default_send_timeout")]
    pub send_timeout_secs: u64,
    #[serde(default)]
    pub email: Option<EmailConfig>,
    #[serde(default)]
    pub telegram: Option<TelegramConfig>,
    #[serde(default)]
    pub whatsapp: Option<WhatsAppConfig>,
    #[serde(default)]
    pub slack: Option<SlackConfig>,
    #[serde(default)]
    pub discord: Option<DiscordConfig>,
    #[serde(default)]
    pub teams: Option<TeamsConfig>,
}

fn default_send_timeout() -> u64 { 10 }

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            send_timeout_secs: default_send_timeout(),
            email: None,
            telegram: None,
            whatsapp: None,
            slack: None,
            discord: None,
            teams: None,
        }
    }
}

/// SMTP email channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    /// Sender address.
    #[serde(default)]
    pub from: String,
    /// Report recipients.
    #[serde(default)]
    pub recipients: Vec<String>,
}

fn default_smtp_host() -> String { "smtp.gmail.com".into() }
fn default_smtp_port() -> u16 { 587 }

/// Telegram Bot API channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub bot_token: String,
    #[serde(default)]
    pub chat_id: String,
}

/// WhatsApp Business Cloud API channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhatsAppConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub phone_number_id: String,
    /// Destination phone number.
    #[serde(default)]
    pub to: String,
}

/// Slack incoming-webhook channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlackConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub webhook_url: String,
    #[serde(default = "default_slack_channel")]
    pub channel: String,
    #[serde(default = "default_slack_username")]
    pub username: String,
    #[serde(default = "default_slack_icon")]
    pub icon_emoji: String,
}

fn default_slack_channel() -> String { "#general".into() }
fn default_slack_username() -> String { "WatchClaw".into() }
fn default_slack_icon() -> String { ":robot_face:".into() }

/// Discord bot channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscordConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub bot_token: String,
    #[serde(default)]
    pub channel_id: String,
}

/// Microsoft Teams incoming-webhook channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamsConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub webhook_url: String,
}

/// Read-only snapshot supplier. Implementations must not cache: every
/// snapshot reflects the current state of the underlying source.
pub trait ConfigSource: Send + Sync {
    fn snapshot(&self) -> Result<WatchClawConfig>;
}

/// File-backed config source. Re-reads the TOML file on every snapshot;
/// a missing file yields defaults so first runs work out of the box.
pub struct FileConfigProvider {
    path: PathBuf,
}

impl FileConfigProvider {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self {
            path: path.unwrap_or_else(WatchClawConfig::default_path),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigSource for FileConfigProvider {
    fn snapshot(&self) -> Result<WatchClawConfig> {
        if self.path.exists() {
            WatchClawConfig::load_from(&self.path)
        } else {
            Ok(WatchClawConfig::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = WatchClawConfig::default();
        assert_eq!(config.schedule.fire_hours, vec![9, 15, 21]);
        assert!(config.schedule.hourly_fallback);
        assert_eq!(config.schedule.tick_interval_secs, 60);
        assert_eq!(config.watch.extension, "xlsx");
        assert_eq!(config.watch.lookback_secs, 3600);
        assert_eq!(config.channel.send_timeout_secs, 10);
        assert!(config.channel.telegram.is_none());
    }

    #[test]
    fn test_config_from_toml() {
        let toml_str = r#"
            [schedule]
            fire_hours = [8, 20]
            hourly_fallback = false

            [watch]
            dir = "/srv/inbox"
            extension = "csv"

            [channel.telegram]
            enabled = true
            bot_token = "123:abc"
            chat_id = "42"
        "#;

        let config: WatchClawConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.schedule.fire_hours, vec![8, 20]);
        assert!(!config.schedule.hourly_fallback);
        assert_eq!(config.watch.dir, "/srv/inbox");
        assert_eq!(config.watch.extension, "csv");
        let tg = config.channel.telegram.unwrap();
        assert!(tg.enabled);
        assert_eq!(tg.bot_token, "123:abc");
    }

    #[test]
    fn test_config_missing_fields_use_defaults() {
        let config: WatchClawConfig = toml::from_str("").unwrap();
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.report.dir, "reports");
        assert_eq!(config.dispatch.handler_timeout_secs, 120);
    }

    #[test]
    fn test_redacted_blanks_credentials() {
        let mut config = WatchClawConfig::default();
        config.llm.api_key = "sk-secret".into();
        config.channel.telegram = Some(TelegramConfig {
            enabled: true,
            bot_token: "123:abc".into(),
            chat_id: "42".into(),
        });
        let red = config.redacted();
        assert_eq!(red.llm.api_key, "***");
        assert_eq!(red.channel.telegram.unwrap().bot_token, "***");
        // chat ids are not secrets
        assert_eq!(config.channel.telegram.unwrap().chat_id, "42");
    }

    #[test]
    fn test_file_provider_rereads_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[watch]\ndir = \"a\"\n").unwrap();

        let provider = FileConfigProvider::new(Some(path.clone()));
        assert_eq!(provider.snapshot().unwrap().watch.dir, "a");

        // hot reload: next snapshot sees the edit
        std::fs::write(&path, "[watch]\ndir = \"b\"\n").unwrap();
        assert_eq!(provider.snapshot().unwrap().watch.dir, "b");
    }

    #[test]
    fn test_file_provider_missing_file_defaults() {
        let provider = FileConfigProvider::new(Some(PathBuf::from("/nonexistent/cfg.toml")));
        let config = provider.snapshot().unwrap();
        assert_eq!(config.watch.extension, "xlsx");
    }

    #[test]
    fn test_file_provider_parse_error_surfaces() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "not [valid toml").unwrap();
        let provider = FileConfigProvider::new(Some(path));
        assert!(provider.snapshot().is_err());
    }
}
