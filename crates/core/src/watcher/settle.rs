use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Tracks files and determines when they've "settled" (stopped changing).
#[derive(Debug)]
pub struct FileSettleTracker {
    /// Map of file path to last change time
    pending: HashMap<PathBuf, Instant>,
    /// How long a file must be unchanged to be considered settled
    settle_duration: Duration,
}

impl FileSettleTracker {
    pub fn new(settle_duration: Duration) -> Self {
        Self {
            pending: HashMap::new(),
            settle_duration,
        }
    }

    /// Record that a file changed at `now`, restarting its timer.
    pub fn file_changed(&mut self, path: PathBuf, now: Instant) {
        self.pending.insert(path, now);
    }

    /// Remove and return every file quiet for at least the settle duration.
    pub fn drain_settled(&mut self, now: Instant) -> Vec<PathBuf> {
        let settle_duration = self.settle_duration;
        let mut settled = Vec::new();
        self.pending.retain(|path, last_change| {
            if now.duration_since(*last_change) >= settle_duration {
                settled.push(path.clone());
                false
            } else {
                true
            }
        });
        settled.sort();
        settled
    }

    /// Remove a file from tracking (e.g., if deleted)
    pub fn remove(&mut self, path: &Path) {
        self.pending.remove(path);
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}
