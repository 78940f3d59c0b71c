//! Capability traits consumed by the scheduler core.
//!
//! Heterogeneous implementations satisfy these uniformly; the components
//! holding them never branch on the concrete type.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{FileCandidate, RunReport};

/// One external notification destination (email, chat bot, webhook).
#[async_trait]
pub trait NotifyChannel: Send + Sync {
    /// Channel name — used as the key in NotificationResult.
    fn name(&self) -> &str;

    /// Deliver one message. Non-success responses are errors.
    async fn send(&self, message: &str) -> Result<()>;
}

/// Hosted text-generation collaborator.
/// Failures (timeout, quota) surface as per-file errors, never run aborts.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Report persistence contract. The core never reads back or queries.
#[async_trait]
pub trait ReportStore: Send + Sync {
    async fn save(&self, key: &str, report: &RunReport) -> Result<()>;
}

/// Per-file processing contract used by the job dispatcher.
#[async_trait]
pub trait JobHandler: Send + Sync {
    /// Handler name — recorded in the JobOutcome.
    fn name(&self) -> &str;

    /// Process one candidate, returning the result payload.
    async fn process(&self, candidate: &FileCandidate) -> Result<String>;
}
