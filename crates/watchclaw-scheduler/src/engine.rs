//! Scheduler engine — the automated run control loop.
//!
//! A single cooperative loop wakes on a fixed tick, asks the slot tracker
//! whether the current (date, hour) slot is due, and spawns at most one
//! run at a time. A trigger arriving while a run is in flight is dropped
//! with a warning, not queued. Shutdown stops scheduling new runs and
//! waits for the in-flight one to finish.
//!
//! Every run takes a fresh config snapshot, so schedule, watch, and
//! channel edits apply on the next tick without a restart.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use watchclaw_channels::Broadcaster;
use watchclaw_core::clock::Clock;
use watchclaw_core::config::{ConfigSource, WatchClawConfig};
use watchclaw_core::error::Result;
use watchclaw_core::traits::{JobHandler, NotifyChannel, ReportStore, TextGenerator};
use watchclaw_core::types::RunReport;

use crate::dispatch::{GenericFileHandler, JobDispatcher, SalesReportHandler};
use crate::report::ResultLog;
use crate::slots::SlotTracker;
use crate::watcher::FolderWatcher;

#[derive(Clone)]
pub struct SchedulerEngine {
    config_source: Arc<dyn ConfigSource>,
    generator: Arc<dyn TextGenerator>,
    store: Arc<dyn ReportStore>,
    clock: Arc<dyn Clock>,
    channels: Option<Vec<Arc<dyn NotifyChannel>>>,
}

impl SchedulerEngine {
    pub fn new(
        config_source: Arc<dyn ConfigSource>,
        generator: Arc<dyn TextGenerator>,
        store: Arc<dyn ReportStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            config_source,
            generator,
            store,
            clock,
            channels: None,
        }
    }

    /// Replace the config-built channel set with explicit channels
    /// (used by tests and embedders).
    pub fn with_channels(mut self, channels: Vec<Arc<dyn NotifyChannel>>) -> Self {
        self.channels = Some(channels);
        self
    }

    fn dispatcher(&self, config: &WatchClawConfig) -> JobDispatcher {
        let generic: Arc<dyn JobHandler> = Arc::new(GenericFileHandler::new(self.generator.clone()));
        let sales: Arc<dyn JobHandler> = Arc::new(SalesReportHandler::new(self.generator.clone()));

        let mut dispatcher = JobDispatcher::new(
            generic,
            Duration::from_secs(config.dispatch.handler_timeout_secs),
        );
        for keyword in &config.dispatch.sales_keywords {
            dispatcher = dispatcher.route(keyword.clone(), sales.clone());
        }
        dispatcher
    }

    /// One complete run: scan, dispatch, persist, broadcast.
    ///
    /// Only a config snapshot failure aborts the run. Handler failures are
    /// per-file outcomes; a persistence failure is logged and the broadcast
    /// still goes out.
    pub async fn run_once(&self) -> Result<RunReport> {
        let config = self.config_source.snapshot()?;
        let started = self.clock.now();
        tracing::info!("🚀 Run started at {}", started.format("%Y-%m-%d %H:%M:%S"));

        let candidates = FolderWatcher::new(&config.watch).scan(started);
        let outcomes = self.dispatcher(&config).dispatch(&candidates).await;
        let report = RunReport::new(started, outcomes);

        let log = ResultLog::new(
            self.store.clone(),
            Duration::from_secs(config.report.save_timeout_secs),
        );
        if let Err(e) = log.persist(&report).await {
            tracing::warn!("⚠️ Report persistence failed: {e}");
        }

        if report.total_candidates == 0 {
            tracing::info!("✅ Run finished, nothing to process");
            return Ok(report);
        }

        let broadcaster = match &self.channels {
            Some(channels) => Broadcaster::with_channels(
                channels.clone(),
                Duration::from_secs(config.channel.send_timeout_secs),
            ),
            None => Broadcaster::from_config(&config.channel),
        };
        if broadcaster.is_empty() {
            tracing::info!("📭 No channels enabled, skipping broadcast");
        } else {
            let results = broadcaster.broadcast(&summary_message(&report)).await;
            let delivered = results.values().filter(|v| **v).count();
            tracing::info!("📨 Broadcast delivered to {delivered}/{} channel(s)", results.len());
        }

        tracing::info!(
            "✅ Run finished: {}/{} file(s) succeeded",
            report.success_count(),
            report.total_candidates
        );
        Ok(report)
    }

    /// Run the control loop until `shutdown` flips to true.
    pub async fn run_loop(&self, mut shutdown: watch::Receiver<bool>) {
        let mut tick_secs = match self.config_source.snapshot() {
            Ok(c) => c.schedule.tick_interval_secs.max(1),
            Err(e) => {
                tracing::warn!("⚠️ Config unreadable at startup, using 60s ticks: {e}");
                60
            }
        };
        let mut ticker = tokio::time::interval(Duration::from_secs(tick_secs));
        let mut tracker = SlotTracker::new();
        let mut current_run: Option<JoinHandle<()>> = None;

        tracing::info!("⏰ Scheduler loop started ({tick_secs}s ticks)");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let config = match self.config_source.snapshot() {
                        Ok(c) => c,
                        Err(e) => {
                            tracing::warn!("⚠️ Config snapshot failed, skipping tick: {e}");
                            continue;
                        }
                    };
                    // Tick interval hot-reloads like the rest of the schedule.
                    let secs = config.schedule.tick_interval_secs.max(1);
                    if secs != tick_secs {
                        tick_secs = secs;
                        ticker = tokio::time::interval(Duration::from_secs(secs));
                        tracing::info!("⏰ Tick interval changed to {secs}s");
                    }
                    let now = self.clock.now();
                    if !tracker.check_and_mark(now, &config.schedule) {
                        continue;
                    }
                    if let Some(handle) = &current_run
                        && !handle.is_finished()
                    {
                        tracing::warn!("⚠️ Previous run still in flight, dropping this trigger");
                        continue;
                    }
                    let engine = self.clone();
                    current_run = Some(tokio::spawn(async move {
                        if let Err(e) = engine.run_once().await {
                            tracing::error!("❌ Run failed: {e}");
                        }
                    }));
                }
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        tracing::info!("🛑 Shutdown requested, no new runs will start");
        if let Some(handle) = current_run
            && !handle.is_finished()
        {
            tracing::info!("⏳ Waiting for in-flight run to finish");
            if let Err(e) = handle.await {
                tracing::error!("❌ In-flight run panicked: {e}");
            }
        }
        tracing::info!("👋 Scheduler loop stopped");
    }
}

/// Human-readable run summary sent to the notification channels.
pub fn summary_message(report: &RunReport) -> String {
    let failures = report.failure_count();
    let mut lines = Vec::with_capacity(report.outcomes.len() + 2);

    if failures == 0 {
        lines.push(format!(
            "✅ WatchClaw run completed: {} file(s) processed",
            report.total_candidates
        ));
    } else {
        lines.push(format!(
            "⚠️ WatchClaw run completed with {failures} failure(s): {}/{} file(s) succeeded",
            report.success_count(),
            report.total_candidates
        ));
    }
    lines.push(format!("🕐 {}", report.timestamp.format("%Y-%m-%d %H:%M UTC")));

    for outcome in &report.outcomes {
        match &outcome.error {
            None => lines.push(format!("  ✅ {} ({})", outcome.file, outcome.handler)),
            Some(e) => lines.push(format!("  ❌ {}: {e}", outcome.file)),
        }
    }

    lines.join("\n")
}
