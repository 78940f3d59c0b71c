//! # WatchClaw Core
//!
//! Shared foundation for WatchClaw: error type, configuration system,
//! run data model, capability traits, and the injectable clock.
//!
//! Every other crate in the workspace builds on these seams:
//! - `NotifyChannel` — uniform send(message) capability per external service
//! - `TextGenerator` — hosted LLM collaborator for file summaries
//! - `ReportStore` — save(key, report) persistence contract
//! - `JobHandler` — per-file processing contract
//! - `Clock` — time source, swappable in tests

pub mod clock;
pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use clock::{Clock, SystemClock};
pub use config::{ConfigSource, FileConfigProvider, WatchClawConfig};
pub use error::{Result, WatchClawError};
pub use traits::{JobHandler, NotifyChannel, ReportStore, TextGenerator};
pub use types::{FileCandidate, JobOutcome, JobStatus, NotificationResult, RunReport};
