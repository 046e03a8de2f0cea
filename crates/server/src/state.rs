use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::info;

use autoshelf_core::{
    Config, FileWatcher, Organizer, SanitizedConfig, WatchError, WatchFilter, WatchHandle,
};

/// Why a watch could not be started.
#[derive(Debug, Error)]
pub enum WatchControlError {
    #[error("library.source_dir is not configured")]
    NoSourceDir,

    #[error("already watching {0}")]
    AlreadyRunning(PathBuf),

    #[error(transparent)]
    Watch(#[from] WatchError),
}

/// Snapshot of the watcher for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct WatchStatus {
    pub running: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
}

impl WatchStatus {
    fn stopped() -> Self {
        Self {
            running: false,
            root: None,
            started_at: None,
        }
    }

    fn of(handle: &WatchHandle) -> Self {
        Self {
            running: handle.is_running(),
            root: Some(handle.root().to_path_buf()),
            started_at: Some(handle.started_at()),
        }
    }
}

/// Shared application state
pub struct AppState {
    config: Config,
    organizer: Arc<Organizer>,
    watch: Mutex<Option<WatchHandle>>,
    import_filter: WatchFilter,
}

impl AppState {
    pub fn new(config: Config, organizer: Arc<Organizer>) -> Self {
        let import_filter = WatchFilter::new(&config.watch);
        Self {
            config,
            organizer,
            watch: Mutex::new(None),
            import_filter,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn organizer(&self) -> &Arc<Organizer> {
        &self.organizer
    }

    pub fn import_filter(&self) -> &WatchFilter {
        &self.import_filter
    }

    /// Start watching the configured source directory.
    pub async fn start_watch(&self) -> Result<WatchStatus, WatchControlError> {
        let source = self
            .config
            .library
            .source_dir
            .clone()
            .ok_or(WatchControlError::NoSourceDir)?;

        let mut watch = self.watch.lock().await;
        if let Some(handle) = watch.as_ref() {
            if handle.is_running() {
                return Err(WatchControlError::AlreadyRunning(handle.root().to_path_buf()));
            }
        }

        let handle = FileWatcher::start(source, &self.config.watch, Arc::clone(&self.organizer))?;
        let status = WatchStatus::of(&handle);
        *watch = Some(handle);
        Ok(status)
    }

    /// Stop the watcher and cancel the chains it started.
    ///
    /// Returns whether a watch was running.
    pub async fn stop_watch(&self) -> bool {
        let handle = self.watch.lock().await.take();
        match handle {
            Some(handle) => {
                info!("Stopping watch on {}", handle.root().display());
                handle.stop().await;
                true
            }
            None => false,
        }
    }

    pub async fn watch_status(&self) -> WatchStatus {
        self.watch
            .lock()
            .await
            .as_ref()
            .map(WatchStatus::of)
            .unwrap_or_else(WatchStatus::stopped)
    }
}
