//! Run data model — candidates, outcomes, and reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// A file found by the folder watcher during one scan.
/// Produced fresh on every scan — never cached across runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileCandidate {
    /// Full path to the file.
    pub path: PathBuf,
    /// Last modification time.
    pub modified: DateTime<Utc>,
    /// File size in bytes.
    pub size: u64,
}

impl FileCandidate {
    /// File name component, lossy-decoded.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Outcome status for one processed file.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Success,
    Error,
}

/// The result of processing one candidate file. Immutable once produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobOutcome {
    /// Source file name.
    pub file: String,
    /// Which handler processed the file.
    pub handler: String,
    /// Success or error.
    pub status: JobStatus,
    /// Result payload on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    /// Error message on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl JobOutcome {
    pub fn success(file: impl Into<String>, handler: impl Into<String>, result: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            handler: handler.into(),
            status: JobStatus::Success,
            result: Some(result.into()),
            error: None,
        }
    }

    pub fn error(file: impl Into<String>, handler: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            handler: handler.into(),
            status: JobStatus::Error,
            result: None,
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == JobStatus::Success
    }
}

/// One run's aggregated report. Created once per run, persisted exactly once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// When the run started.
    pub timestamp: DateTime<Utc>,
    /// Per-file outcomes, in candidate order.
    pub outcomes: Vec<JobOutcome>,
    /// Number of candidates the run processed.
    pub total_candidates: usize,
}

impl RunReport {
    pub fn new(timestamp: DateTime<Utc>, outcomes: Vec<JobOutcome>) -> Self {
        let total_candidates = outcomes.len();
        Self {
            timestamp,
            outcomes,
            total_candidates,
        }
    }

    /// Storage key derived from the run timestamp.
    pub fn key(&self) -> String {
        format!("run_{}", self.timestamp.format("%Y%m%d_%H%M%S"))
    }

    pub fn success_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.outcomes.len() - self.success_count()
    }
}

/// Per-channel broadcast outcome: channel name → delivered.
/// Key set equals exactly the channels enabled at broadcast time.
pub type NotificationResult = HashMap<String, bool>;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_outcome_constructors() {
        let ok = JobOutcome::success("sales_q3.xlsx", "sales", "looks good");
        assert!(ok.is_success());
        assert_eq!(ok.result.as_deref(), Some("looks good"));
        assert!(ok.error.is_none());

        let err = JobOutcome::error("broken.xlsx", "generic", "timeout");
        assert!(!err.is_success());
        assert_eq!(err.error.as_deref(), Some("timeout"));
        assert!(err.result.is_none());
    }

    #[test]
    fn test_report_counts_and_key() {
        let ts = chrono::Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 5).unwrap();
        let report = RunReport::new(
            ts,
            vec![
                JobOutcome::success("a.xlsx", "generic", "ok"),
                JobOutcome::error("b.xlsx", "generic", "boom"),
            ],
        );
        assert_eq!(report.total_candidates, 2);
        assert_eq!(report.success_count(), 1);
        assert_eq!(report.failure_count(), 1);
        assert_eq!(report.key(), "run_20260301_090005");
    }

    #[test]
    fn test_report_json_shape() {
        let ts = chrono::Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        let report = RunReport::new(ts, vec![JobOutcome::success("a.xlsx", "sales", "fine")]);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["total_candidates"], 1);
        assert_eq!(json["outcomes"][0]["status"], "success");
        // error side is omitted entirely on success
        assert!(json["outcomes"][0].get("error").is_none());
    }
}
