//! Folder watcher — scans the watched directory for fresh files.
//!
//! Degrades to "nothing found" on any I/O error rather than aborting the
//! run. The only side effect is creating the directory when absent.

use chrono::{DateTime, Duration, Utc};
use std::path::{Path, PathBuf};

use watchclaw_core::config::WatchConfig;
use watchclaw_core::types::FileCandidate;

pub struct FolderWatcher {
    dir: PathBuf,
    extension: String,
    lookback: Duration,
}

impl FolderWatcher {
    pub fn new(config: &WatchConfig) -> Self {
        Self {
            dir: PathBuf::from(&config.dir),
            extension: config.extension.trim_start_matches('.').to_string(),
            lookback: Duration::seconds(config.lookback_secs as i64),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Scan for files matching the extension filter whose modification
    /// time is strictly newer than `now - lookback`. Candidates are
    /// produced fresh on every call and sorted by path for reproducible
    /// dispatch order.
    pub fn scan(&self, now: DateTime<Utc>) -> Vec<FileCandidate> {
        if !self.dir.exists() {
            if let Err(e) = std::fs::create_dir_all(&self.dir) {
                tracing::warn!("⚠️ Cannot create watch dir {}: {e}", self.dir.display());
                return Vec::new();
            }
            tracing::info!("📁 Created watch dir {}", self.dir.display());
            return Vec::new();
        }

        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("⚠️ Cannot read watch dir {}: {e}", self.dir.display());
                return Vec::new();
            }
        };

        let cutoff = now - self.lookback;
        let mut candidates = Vec::new();

        for entry in entries.flatten() {
            let path = entry.path();
            if !self.matches_extension(&path) {
                continue;
            }
            let meta = match entry.metadata() {
                Ok(m) if m.is_file() => m,
                Ok(_) => continue,
                Err(e) => {
                    tracing::warn!("⚠️ Cannot stat {}: {e}", path.display());
                    continue;
                }
            };
            let modified = match meta.modified() {
                Ok(t) => DateTime::<Utc>::from(t),
                Err(e) => {
                    tracing::warn!("⚠️ No mtime for {}: {e}", path.display());
                    continue;
                }
            };
            if modified > cutoff {
                candidates.push(FileCandidate {
                    path,
                    modified,
                    size: meta.len(),
                });
            }
        }

        candidates.sort_by(|a, b| a.path.cmp(&b.path));
        tracing::info!(
            "🔍 Found {} fresh file(s) in {}",
            candidates.len(),
            self.dir.display()
        );
        candidates
    }

    fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(&self.extension))
    }
}
