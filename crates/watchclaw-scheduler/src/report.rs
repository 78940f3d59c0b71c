//! Run report persistence.
//!
//! `ResultLog` writes each report exactly once through a `ReportStore`,
//! under a timeout so a hung backend cannot stall the run. Persistence
//! failure is reported to the caller but never invalidates the run itself.

use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;

use watchclaw_core::error::{Result, WatchClawError};
use watchclaw_core::traits::ReportStore;
use watchclaw_core::types::RunReport;

pub struct ResultLog {
    store: std::sync::Arc<dyn ReportStore>,
    save_timeout: Duration,
}

impl ResultLog {
    pub fn new(store: std::sync::Arc<dyn ReportStore>, save_timeout: Duration) -> Self {
        Self {
            store,
            save_timeout,
        }
    }

    /// Persist the report under its timestamp-derived key.
    pub async fn persist(&self, report: &RunReport) -> Result<String> {
        let key = report.key();
        match tokio::time::timeout(self.save_timeout, self.store.save(&key, report)).await {
            Ok(Ok(())) => {
                tracing::info!("💾 Report {key} saved");
                Ok(key)
            }
            Ok(Err(e)) => Err(e),
            Err(_) => Err(WatchClawError::Timeout(format!(
                "report save exceeded {:?}",
                self.save_timeout
            ))),
        }
    }
}

/// File-backed store: one pretty-printed JSON document per run under the
/// report directory.
pub struct JsonReportStore {
    dir: PathBuf,
}

impl JsonReportStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl ReportStore for JsonReportStore {
    async fn save(&self, key: &str, report: &RunReport) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(format!("{key}.json"));
        let body = serde_json::to_vec_pretty(report)?;
        tokio::fs::write(&path, body).await?;
        Ok(())
    }
}
