//! Source folder watcher.
//!
//! Watches a directory for new video files, waits until each one has been
//! quiet for the settle time, then hands it to the [`Organizer`]. The
//! watcher is an owned [`WatchHandle`]: stopping it (or dropping it) ends
//! the watch and cancels the chains it started.

mod config;
mod filter;
mod settle;

pub use config::WatchConfig;
pub use filter::WatchFilter;
pub use settle::FileSettleTracker;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use notify::event::ModifyKind;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::metrics;
use crate::orchestrator::Organizer;

/// How often pending files are checked for settling.
const SETTLE_CHECK_INTERVAL: Duration = Duration::from_millis(250);

/// Errors starting a watch.
#[derive(Debug, Error)]
pub enum WatchError {
    /// The directory to watch does not exist.
    #[error("watch directory does not exist: {0}")]
    SourceMissing(PathBuf),

    /// The OS watcher could not be created or attached.
    #[error("failed to watch {path}: {error}")]
    Notify {
        path: PathBuf,
        #[source]
        error: notify::Error,
    },
}

/// What a filesystem event means for a path.
#[derive(Debug, PartialEq, Eq)]
enum PathEvent {
    Changed(PathBuf),
    Removed(PathBuf),
}

/// Reduce a notify event to the paths we care about.
///
/// Creations, data writes and renames count as changes. Metadata-only
/// modifications are skipped: hard linking a file touches its link count.
fn classify_event(event: Event) -> Vec<PathEvent> {
    match event.kind {
        EventKind::Create(_)
        | EventKind::Modify(ModifyKind::Data(_))
        | EventKind::Modify(ModifyKind::Name(_))
        | EventKind::Modify(ModifyKind::Any) => {
            event.paths.into_iter().map(PathEvent::Changed).collect()
        }
        EventKind::Remove(_) => event.paths.into_iter().map(PathEvent::Removed).collect(),
        _ => Vec::new(),
    }
}

/// A running watch.
pub struct WatchHandle {
    root: PathBuf,
    started_at: DateTime<Utc>,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl WatchHandle {
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn is_running(&self) -> bool {
        !self.cancel.is_cancelled() && self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Stop watching and cancel every chain this watch started.
    pub async fn stop(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!("Watcher task ended abnormally: {}", e);
            }
        }
    }
}

impl Drop for WatchHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Starts watches.
pub struct FileWatcher;

impl FileWatcher {
    /// Start watching `root`. Settled files are submitted to `organizer`.
    pub fn start(
        root: impl Into<PathBuf>,
        config: &WatchConfig,
        organizer: Arc<Organizer>,
    ) -> Result<WatchHandle, WatchError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(WatchError::SourceMissing(root));
        }

        let (event_tx, event_rx) = mpsc::channel::<Event>(256);

        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| match res {
                Ok(event) => {
                    let _ = event_tx.blocking_send(event);
                }
                Err(e) => warn!("Watch error: {}", e),
            },
            notify::Config::default(),
        )
        .map_err(|error| WatchError::Notify {
            path: root.clone(),
            error,
        })?;

        let mode = if config.recursive {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };
        watcher
            .watch(&root, mode)
            .map_err(|error| WatchError::Notify {
                path: root.clone(),
                error,
            })?;

        let cancel = organizer.session_token();
        let task = tokio::spawn(run_loop(
            watcher,
            event_rx,
            WatchFilter::new(config),
            FileSettleTracker::new(Duration::from_secs(config.settle_secs)),
            organizer,
            cancel.clone(),
        ));

        info!("Watching directory: {}", root.display());

        Ok(WatchHandle {
            root,
            started_at: Utc::now(),
            cancel,
            task: Some(task),
        })
    }
}

async fn run_loop(
    watcher: RecommendedWatcher,
    mut event_rx: mpsc::Receiver<Event>,
    filter: WatchFilter,
    mut tracker: FileSettleTracker,
    organizer: Arc<Organizer>,
    cancel: CancellationToken,
) {
    let mut check_interval = tokio::time::interval(SETTLE_CHECK_INTERVAL);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,

            Some(event) = event_rx.recv() => {
                let now = Instant::now();
                for path_event in classify_event(event) {
                    match path_event {
                        PathEvent::Changed(path) if filter.accepts(&path) => {
                            debug!("File event: {}", path.display());
                            metrics::WATCH_EVENTS.with_label_values(&["accepted"]).inc();
                            tracker.file_changed(path, now);
                        }
                        PathEvent::Changed(path) => {
                            // A rename away from an accepted name ends its settle timer.
                            tracker.remove(&path);
                            metrics::WATCH_EVENTS.with_label_values(&["ignored"]).inc();
                        }
                        PathEvent::Removed(path) => tracker.remove(&path),
                    }
                }
            }

            _ = check_interval.tick() => {
                for path in tracker.drain_settled(Instant::now()) {
                    if !path.is_file() {
                        debug!("Settled path is gone: {}", path.display());
                        continue;
                    }
                    metrics::WATCH_EVENTS.with_label_values(&["settled"]).inc();
                    organizer.submit(path, cancel.clone());
                }
            }
        }
    }

    drop(watcher);
    info!("File watcher stopped");
}
