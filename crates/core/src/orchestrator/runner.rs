//! Organizer implementation.
//!
//! Runs one chain per file:
//! classify (bounded) -> correct (bounded, best-effort) -> plan -> place.
//! Chains are independent; nothing orders one file against another.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures::future::join_all;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::classifier::Classifier;
use crate::config::Config;
use crate::metadata::Corrector;
use crate::metrics;
use crate::placer::{FsPlacer, PlacementMode, PlacementResult, Placer};
use crate::planner::PathPlanner;

use super::config::OrganizerConfig;
use super::pool::EndpointPool;
use super::types::{
    FileStage, OrchestratorError, OrganizerStatus, OutcomeCounts, ProcessError, ProcessOutcome,
};

#[derive(Default)]
struct OutcomeCounters {
    placed: AtomicU64,
    skipped: AtomicU64,
    failed: AtomicU64,
    cancelled: AtomicU64,
}

impl OutcomeCounters {
    fn record(&self, stage: FileStage) {
        let counter = match stage {
            FileStage::Placed => &self.placed,
            FileStage::Skipped => &self.skipped,
            FileStage::Cancelled => &self.cancelled,
            _ => &self.failed,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> OutcomeCounts {
        OutcomeCounts {
            placed: self.placed.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            cancelled: self.cancelled.load(Ordering::Relaxed),
        }
    }
}

/// Keeps the active chain count right even if a chain future is dropped.
struct ActiveChain<'a>(&'a AtomicU64);

impl<'a> ActiveChain<'a> {
    fn enter(counter: &'a AtomicU64) -> Self {
        counter.fetch_add(1, Ordering::Relaxed);
        metrics::ACTIVE_CHAINS.inc();
        Self(counter)
    }
}

impl Drop for ActiveChain<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::Relaxed);
        metrics::ACTIVE_CHAINS.dec();
    }
}

/// Drives files from detection to the library.
pub struct Organizer {
    classifier: Classifier,
    corrector: Corrector,
    planner: PathPlanner,
    placer: Arc<dyn Placer>,
    mode: PlacementMode,
    classification_pool: EndpointPool,
    lookup_pool: EndpointPool,
    counters: OutcomeCounters,
    active_chains: AtomicU64,
    shutdown: CancellationToken,
}

impl Organizer {
    pub fn new(
        config: OrganizerConfig,
        classifier: Classifier,
        corrector: Corrector,
        planner: PathPlanner,
        placer: Arc<dyn Placer>,
        mode: PlacementMode,
    ) -> Self {
        Self {
            classifier,
            corrector,
            planner,
            placer,
            mode,
            classification_pool: EndpointPool::new(
                "classification",
                config.max_concurrent_classifications,
            ),
            lookup_pool: EndpointPool::new("lookup", config.max_concurrent_lookups),
            counters: OutcomeCounters::default(),
            active_chains: AtomicU64::new(0),
            shutdown: CancellationToken::new(),
        }
    }

    /// Build the production organizer: chat completions classifier, TMDB
    /// corrector (when a key is configured) and the filesystem placer.
    pub fn from_config(config: &Config) -> Result<Self, OrchestratorError> {
        let classifier = Classifier::from_config(&config.classifier)?;
        let corrector = Corrector::from_config(config.catalog.as_ref())?;
        let planner = PathPlanner::new(
            &config.library.target_dir,
            config.library.category_dirs.clone(),
        );

        info!(
            "Organizer ready: library={}, mode={}, correction={}",
            planner.root().display(),
            config.library.mode,
            if corrector.is_enabled() { "on" } else { "off" }
        );

        Ok(Self::new(
            config.orchestrator.clone(),
            classifier,
            corrector,
            planner,
            Arc::new(FsPlacer::new()),
            config.library.mode,
        ))
    }

    pub fn planner(&self) -> &PathPlanner {
        &self.planner
    }

    pub fn mode(&self) -> PlacementMode {
        self.mode
    }

    /// A token for a group of chains (e.g. one watch session).
    ///
    /// Cancelling it stops only those chains; [`shutdown`](Self::shutdown)
    /// stops every chain.
    pub fn session_token(&self) -> CancellationToken {
        self.shutdown.child_token()
    }

    /// Cancel every running and future chain.
    pub fn shutdown(&self) {
        if !self.shutdown.is_cancelled() {
            info!("Organizer shutting down, cancelling in-flight chains");
            self.shutdown.cancel();
        }
    }

    pub fn is_shut_down(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    /// Current pool and outcome statistics.
    pub fn status(&self) -> OrganizerStatus {
        OrganizerStatus {
            active_chains: self.active_chains.load(Ordering::Relaxed) as usize,
            correction_enabled: self.corrector.is_enabled(),
            mode: self.mode,
            classification_pool: self.classification_pool.status(),
            lookup_pool: self.lookup_pool.status(),
            outcomes: self.counters.snapshot(),
        }
    }

    /// Spawn a chain for `source` and return immediately.
    pub fn submit(
        self: &Arc<Self>,
        source: PathBuf,
        cancel: CancellationToken,
    ) -> JoinHandle<ProcessOutcome> {
        let organizer = Arc::clone(self);
        tokio::spawn(async move { organizer.process_one(&source, &cancel).await })
    }

    /// Process several files concurrently and collect their outcomes in input order.
    pub async fn process_batch(
        &self,
        sources: &[PathBuf],
        cancel: &CancellationToken,
    ) -> Vec<ProcessOutcome> {
        join_all(sources.iter().map(|source| self.process_one(source, cancel))).await
    }

    /// Run one chain to its terminal outcome.
    ///
    /// Emits exactly one info/warn line for the outcome.
    pub async fn process_one(&self, source: &Path, cancel: &CancellationToken) -> ProcessOutcome {
        let file_name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let span = info_span!("chain", id = %Uuid::new_v4(), file = %file_name);
        async {
            let _active = ActiveChain::enter(&self.active_chains);
            let outcome = self.run_chain(source, &file_name, cancel).await;
            self.finish(&outcome, &file_name);
            outcome
        }
        .instrument(span)
        .await
    }

    async fn run_chain(
        &self,
        source: &Path,
        file_name: &str,
        cancel: &CancellationToken,
    ) -> ProcessOutcome {
        if file_name.is_empty() {
            return ProcessOutcome::Failed {
                source: source.to_path_buf(),
                info: None,
                error: ProcessError::InvalidPath(source.to_path_buf()),
            };
        }
        let cancelled = || ProcessOutcome::Cancelled {
            source: source.to_path_buf(),
        };
        debug!(stage = %FileStage::Detected, "{}", source.display());

        let classified = tokio::select! {
            biased;
            _ = self.cancelled(cancel) => return cancelled(),
            result = self.classification_pool.run(self.classifier.classify(file_name), |r| r.is_ok()) => result,
        };
        let info = match classified {
            Ok(info) => info,
            Err(e) => {
                return ProcessOutcome::Failed {
                    source: source.to_path_buf(),
                    info: None,
                    error: e.into(),
                }
            }
        };
        debug!(stage = %FileStage::Classified, "{}", info.label());

        let info = if self.corrector.is_enabled() {
            let corrected = tokio::select! {
                biased;
                _ = self.cancelled(cancel) => return cancelled(),
                info = self.lookup_pool.run(self.corrector.correct(info), |_| true) => info,
            };
            debug!(stage = %FileStage::Corrected, "{}", corrected.label());
            corrected
        } else {
            info
        };

        let destination = self.planner.plan_for_source(&info, source);
        debug!(stage = %FileStage::Planned, "{}", destination.display());

        if self.is_cancelled(cancel) {
            return cancelled();
        }

        // Placement is not interrupted once started.
        match self.placer.place(source, &destination, self.mode).await {
            PlacementResult::Placed { destination, mode } => ProcessOutcome::Placed {
                source: source.to_path_buf(),
                destination,
                info,
                mode,
            },
            PlacementResult::SkippedExisting { destination } => ProcessOutcome::Skipped {
                source: source.to_path_buf(),
                destination,
                info,
            },
            PlacementResult::Failed(e) => ProcessOutcome::Failed {
                source: source.to_path_buf(),
                info: Some(info),
                error: e.into(),
            },
        }
    }

    async fn cancelled(&self, cancel: &CancellationToken) {
        tokio::select! {
            _ = cancel.cancelled() => {}
            _ = self.shutdown.cancelled() => {}
        }
    }

    fn is_cancelled(&self, cancel: &CancellationToken) -> bool {
        cancel.is_cancelled() || self.shutdown.is_cancelled()
    }

    fn finish(&self, outcome: &ProcessOutcome, file_name: &str) {
        let stage = outcome.stage();
        self.counters.record(stage);
        let label = stage.to_string();
        metrics::FILES_PROCESSED
            .with_label_values(&[label.as_str()])
            .inc();

        match outcome {
            ProcessOutcome::Placed {
                destination,
                info,
                mode,
                ..
            } => info!(
                "Placed {} {} -> {} ({})",
                info.label(),
                file_name,
                destination.display(),
                mode
            ),
            ProcessOutcome::Skipped {
                destination, info, ..
            } => info!(
                "Skipped {} {}: {} already exists",
                info.label(),
                file_name,
                destination.display()
            ),
            ProcessOutcome::Failed {
                info: Some(info),
                error,
                ..
            } => warn!("Failed {} {}: {}", info.label(), file_name, error),
            ProcessOutcome::Failed {
                info: None, error, ..
            } => warn!("Failed {}: {}", file_name, error),
            ProcessOutcome::Cancelled { .. } => info!("Cancelled {}", file_name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::CategoryDirs;
    use crate::testing::{MockLlmClient, MockPlacer};
    use std::time::Duration;

    const ANIME: &str =
        r#"{"title":"Shingeki no Kyojin","type":"Anime","year":"","season":4,"episode":5}"#;

    fn organizer(llm: Arc<MockLlmClient>, placer: Arc<MockPlacer>, config: OrganizerConfig) -> Organizer {
        Organizer::new(
            config,
            Classifier::new(llm),
            Corrector::disabled(),
            PathPlanner::new("/library", CategoryDirs::default()),
            placer,
            PlacementMode::HardLink,
        )
    }

    #[tokio::test]
    async fn test_chain_reaches_placement() {
        let llm = Arc::new(MockLlmClient::with_response(ANIME));
        let placer = Arc::new(MockPlacer::new());
        let organizer = organizer(llm, placer.clone(), OrganizerConfig::default());

        let outcome = organizer
            .process_one(
                Path::new("/dl/Attack.on.Titan.S04E05.1080p.mkv"),
                &organizer.session_token(),
            )
            .await;

        assert!(outcome.is_placed());
        let placements = placer.recorded_placements().await;
        assert_eq!(placements.len(), 1);
        assert_eq!(
            placements[0].destination,
            PathBuf::from("/library/Anime/Shingeki no Kyojin/Season 4/Shingeki no Kyojin - S04E05.mkv")
        );
        assert_eq!(organizer.status().outcomes.placed, 1);
        assert_eq!(organizer.status().active_chains, 0);
    }

    #[tokio::test]
    async fn test_path_without_file_name_fails() {
        let llm = Arc::new(MockLlmClient::with_response(ANIME));
        let organizer = organizer(llm.clone(), Arc::new(MockPlacer::new()), OrganizerConfig::default());

        let outcome = organizer.process_one(Path::new("/"), &CancellationToken::new()).await;

        assert!(matches!(
            outcome,
            ProcessOutcome::Failed {
                error: ProcessError::InvalidPath(_),
                ..
            }
        ));
        assert_eq!(llm.call_count().await, 0);
    }

    #[tokio::test]
    async fn test_session_cancel_stops_chain_before_placement() {
        let llm = Arc::new(MockLlmClient::with_response(ANIME));
        llm.set_delay(Duration::from_secs(5)).await;
        let placer = Arc::new(MockPlacer::new());
        let organizer = Arc::new(organizer(llm, placer.clone(), OrganizerConfig::default()));

        let session = organizer.session_token();
        let handle = organizer.submit(PathBuf::from("/dl/a.mkv"), session.clone());
        tokio::time::sleep(Duration::from_millis(50)).await;
        session.cancel();

        let outcome = handle.await.unwrap();
        assert!(matches!(outcome, ProcessOutcome::Cancelled { .. }));
        assert!(placer.recorded_placements().await.is_empty());
        assert_eq!(organizer.status().outcomes.cancelled, 1);
    }

    #[tokio::test]
    async fn test_shutdown_cancels_foreign_tokens_too() {
        let llm = Arc::new(MockLlmClient::with_response(ANIME));
        llm.set_delay(Duration::from_secs(5)).await;
        let organizer = Arc::new(organizer(llm, Arc::new(MockPlacer::new()), OrganizerConfig::default()));

        let handle = organizer.submit(PathBuf::from("/dl/a.mkv"), CancellationToken::new());
        tokio::time::sleep(Duration::from_millis(50)).await;
        organizer.shutdown();

        assert!(matches!(handle.await.unwrap(), ProcessOutcome::Cancelled { .. }));
        assert!(organizer.is_shut_down());
    }

    #[tokio::test]
    async fn test_classification_pool_is_bounded() {
        let llm = Arc::new(MockLlmClient::with_response(ANIME));
        llm.set_delay(Duration::from_millis(100)).await;
        let config = OrganizerConfig {
            max_concurrent_classifications: 1,
            ..Default::default()
        };
        let organizer = Arc::new(organizer(llm, Arc::new(MockPlacer::new()), config));

        let token = organizer.session_token();
        let handles: Vec<_> = (0..3)
            .map(|i| organizer.submit(PathBuf::from(format!("/dl/{i}.mkv")), token.clone()))
            .collect();
        tokio::time::sleep(Duration::from_millis(30)).await;

        let pool = organizer.status().classification_pool;
        assert_eq!(pool.active_jobs, 1);
        assert_eq!(pool.queued_jobs, 2);

        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(organizer.status().classification_pool.total_processed, 3);
    }
}
