//! Job dispatch — routes each candidate file to a processing handler.
//!
//! Classification is a file-name keyword heuristic: names matching a
//! registered route go to that domain handler, everything else to the
//! generic handler. Handler calls never raise past this boundary: errors
//! and timeouts become error outcomes and the batch continues, producing
//! exactly one outcome per candidate in input order.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use watchclaw_core::error::Result;
use watchclaw_core::traits::{JobHandler, TextGenerator};
use watchclaw_core::types::{FileCandidate, JobOutcome};

pub struct JobDispatcher {
    routes: Vec<(String, Arc<dyn JobHandler>)>,
    generic: Arc<dyn JobHandler>,
    handler_timeout: Duration,
}

impl JobDispatcher {
    pub fn new(generic: Arc<dyn JobHandler>, handler_timeout: Duration) -> Self {
        Self {
            routes: Vec::new(),
            generic,
            handler_timeout,
        }
    }

    /// Register a keyword route. Matching is a case-insensitive substring
    /// test on the file name; first matching route wins.
    pub fn route(mut self, keyword: impl Into<String>, handler: Arc<dyn JobHandler>) -> Self {
        self.routes.push((keyword.into().to_lowercase(), handler));
        self
    }

    fn classify(&self, file_name: &str) -> &Arc<dyn JobHandler> {
        let lower = file_name.to_lowercase();
        self.routes
            .iter()
            .find(|(keyword, _)| lower.contains(keyword))
            .map(|(_, handler)| handler)
            .unwrap_or(&self.generic)
    }

    /// Process every candidate, isolating failures per file.
    pub async fn dispatch(&self, candidates: &[FileCandidate]) -> Vec<JobOutcome> {
        let mut outcomes = Vec::with_capacity(candidates.len());

        for candidate in candidates {
            let file_name = candidate.file_name();
            let handler = self.classify(&file_name);
            tracing::info!("⚙️ Processing {} via '{}'", file_name, handler.name());

            let outcome =
                match tokio::time::timeout(self.handler_timeout, handler.process(candidate)).await
                {
                    Ok(Ok(result)) => JobOutcome::success(&file_name, handler.name(), result),
                    Ok(Err(e)) => {
                        tracing::warn!("⚠️ Handler '{}' failed on {}: {e}", handler.name(), file_name);
                        JobOutcome::error(&file_name, handler.name(), e.to_string())
                    }
                    Err(_) => {
                        tracing::warn!(
                            "⚠️ Handler '{}' timed out on {} after {:?}",
                            handler.name(),
                            file_name,
                            self.handler_timeout
                        );
                        JobOutcome::error(
                            &file_name,
                            handler.name(),
                            format!("handler timed out after {:?}", self.handler_timeout),
                        )
                    }
                };
            outcomes.push(outcome);
        }

        outcomes
    }
}

/// Generic fallback handler — asks the text-generation collaborator for an
/// executive summary of the file based on its metadata.
pub struct GenericFileHandler {
    generator: Arc<dyn TextGenerator>,
}

impl GenericFileHandler {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl JobHandler for GenericFileHandler {
    fn name(&self) -> &str {
        "generic"
    }

    async fn process(&self, candidate: &FileCandidate) -> Result<String> {
        let prompt = format!(
            "Analyze this file and provide an executive summary:\n\
             Name: {}\n\
             Size: {} bytes\n\
             Modified: {}\n\n\
             Provide:\n\
             1. Identified file type\n\
             2. Possible uses\n\
             3. Processing recommendations",
            candidate.file_name(),
            candidate.size,
            candidate.modified.format("%Y-%m-%d %H:%M:%S UTC"),
        );
        self.generator.generate(&prompt).await
    }
}

/// Sales-report handler — structured sales-analysis prompt for files whose
/// names mark them as sales data.
pub struct SalesReportHandler {
    generator: Arc<dyn TextGenerator>,
}

impl SalesReportHandler {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl JobHandler for SalesReportHandler {
    fn name(&self) -> &str {
        "sales"
    }

    async fn process(&self, candidate: &FileCandidate) -> Result<String> {
        let prompt = format!(
            "Analyze this sales data file and generate professional insights:\n\
             File: {}\n\
             Size: {} bytes\n\
             Received: {}\n\n\
             Provide a structured analysis with:\n\
             1. 📈 KEY TRENDS identified\n\
             2. 🏆 TOP-PERFORMING products/periods\n\
             3. 💡 STRATEGIC recommendations\n\
             4. ⚠️ ALERTS about potential problems\n\
             5. 📊 SUGGESTED performance metrics\n\n\
             Be objective, professional, and actionable.",
            candidate.file_name(),
            candidate.size,
            candidate.modified.format("%Y-%m-%d %H:%M:%S UTC"),
        );
        self.generator.generate(&prompt).await
    }
}
