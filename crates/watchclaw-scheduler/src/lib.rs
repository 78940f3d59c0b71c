//! # WatchClaw Scheduler
//!
//! The automated run engine: a single cooperative control loop that fires
//! on fire-hour slots (with an hourly fallback), scans the watched folder,
//! dispatches each fresh file to a processing handler, persists a JSON run
//! report, and broadcasts a status summary to the enabled channels.
//!
//! ## Architecture
//! ```text
//! SchedulerEngine (tokio interval, 60s ticks)
//!   ├── SlotTracker: at most one run per (date, hour) slot
//!   ├── on due slot → spawned run (overlapping triggers dropped)
//!   │     FolderWatcher  → fresh FileCandidates
//!   │     JobDispatcher  → one JobOutcome per candidate
//!   │     ResultLog      → RunReport persisted (failure = warning)
//!   │     Broadcaster    → summary fan-out to enabled channels
//!   └── shutdown signal → stop scheduling, let in-flight run finish
//! ```

pub mod dispatch;
pub mod engine;
pub mod report;
pub mod slots;
pub mod watcher;

pub use dispatch::{GenericFileHandler, JobDispatcher, SalesReportHandler};
pub use engine::{SchedulerEngine, summary_message};
pub use report::{JsonReportStore, ResultLog};
pub use slots::SlotTracker;
pub use watcher::FolderWatcher;
