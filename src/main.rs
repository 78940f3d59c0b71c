//! # WatchClaw — Scheduled Folder Processing Agent
//!
//! Watches a folder on a fixed schedule, summarizes fresh files through a
//! hosted LLM, persists a JSON report per run, and fans a status summary
//! out to the enabled notification channels.
//!
//! Usage:
//!   watchclaw run                        # Start the scheduler loop
//!   watchclaw once                       # One run, then exit
//!   watchclaw config                     # Print effective config (redacted)
//!   watchclaw -c custom.toml run         # Custom config path

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use watchclaw_core::clock::SystemClock;
use watchclaw_core::config::{ConfigSource, FileConfigProvider};
use watchclaw_providers::create_generator;
use watchclaw_scheduler::{JsonReportStore, SchedulerEngine};

#[derive(Parser)]
#[command(
    name = "watchclaw",
    version,
    about = "🦅 WatchClaw — scheduled folder processing with multi-channel notifications"
)]
struct Cli {
    /// Config file path (default: ~/.watchclaw/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the scheduler loop (Ctrl-C for graceful shutdown)
    Run,
    /// Execute a single run immediately and exit
    Once,
    /// Print the effective configuration with credentials redacted
    Config,
}

fn build_engine(config_source: Arc<dyn ConfigSource>) -> Result<SchedulerEngine> {
    let config = config_source.snapshot()?;
    let generator = create_generator(&config.llm)?;
    let store = Arc::new(JsonReportStore::new(&config.report.dir));
    Ok(SchedulerEngine::new(
        config_source,
        generator,
        store,
        Arc::new(SystemClock),
    ))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "watchclaw=debug"
    } else {
        "watchclaw=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .init();

    let provider = FileConfigProvider::new(cli.config.clone());
    let config_path = provider.path().to_path_buf();
    let config_source: Arc<dyn ConfigSource> = Arc::new(provider);

    match cli.command {
        Command::Config => {
            let config = config_source.snapshot()?;
            println!("# Config: {}", config_path.display());
            print!("{}", toml::to_string_pretty(&config.redacted())?);
        }
        Command::Once => {
            let engine = build_engine(config_source)?;
            let report = engine.run_once().await?;
            println!(
                "✅ Run finished: {}/{} file(s) succeeded",
                report.success_count(),
                report.total_candidates
            );
        }
        Command::Run => {
            let config = config_source.snapshot()?;
            let engine = build_engine(config_source)?;

            println!("🦅 WatchClaw v{}", env!("CARGO_PKG_VERSION"));
            println!("   ⚙️  Config:     {}", config_path.display());
            println!("   📁 Watch dir:  {}", config.watch.dir);
            println!("   💾 Reports:    {}", config.report.dir);
            println!(
                "   ⏰ Fire hours: {:?} (hourly fallback: {})",
                config.schedule.fire_hours, config.schedule.hourly_fallback
            );
            println!();

            let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::info!("🛑 Ctrl-C received");
                    let _ = shutdown_tx.send(true);
                }
            });

            engine.run_loop(shutdown_rx).await;
        }
    }

    Ok(())
}
