//! # WatchClaw Channels
//!
//! Notification channel implementations.
//!
//! Every channel is a small adapter satisfying the uniform
//! `NotifyChannel { send(message) }` capability regardless of wire protocol:
//! message-compose-and-relay for email, signed HTTP POST for the bot and
//! webhook services. The `Broadcaster` fans one message out to all enabled
//! channels concurrently, isolating failures per channel.

pub mod broadcast;
pub mod discord;
pub mod email;
pub mod slack;
pub mod teams;
pub mod telegram;
pub mod whatsapp;

pub use broadcast::Broadcaster;
pub use discord::DiscordChannel;
pub use email::EmailChannel;
pub use slack::SlackChannel;
pub use teams::TeamsChannel;
pub use telegram::TelegramChannel;
pub use whatsapp::WhatsAppChannel;
