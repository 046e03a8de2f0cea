//! Mock placer for testing.

use async_trait::async_trait;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::placer::{PlacementMode, PlacementResult, Placer, PlacerError};

/// A recorded placement call for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedPlacement {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub mode: PlacementMode,
}

/// Mock implementation of the Placer trait.
///
/// Touches no files. Destinations it has "placed" (or that were marked as
/// existing) are reported as `SkippedExisting` on later calls.
///
/// # Example
///
/// ```rust,ignore
/// use autoshelf_core::testing::MockPlacer;
///
/// let placer = MockPlacer::new();
/// placer.mark_existing("/library/Movie/X (2023)/X (2023).mkv").await;
/// ```
#[derive(Debug, Default)]
pub struct MockPlacer {
    placements: Arc<RwLock<Vec<RecordedPlacement>>>,
    existing: Arc<RwLock<HashSet<PathBuf>>>,
    /// If set, the next placement fails with a link/move error of this kind.
    next_error: Arc<RwLock<Option<std::io::ErrorKind>>>,
}

impl MockPlacer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretend `path` already exists.
    pub async fn mark_existing(&self, path: impl Into<PathBuf>) {
        self.existing.write().await.insert(path.into());
    }

    /// Make the next placement fail.
    pub async fn fail_next(&self, kind: std::io::ErrorKind) {
        *self.next_error.write().await = Some(kind);
    }

    /// Placements attempted so far (including skipped and failed ones).
    pub async fn recorded_placements(&self) -> Vec<RecordedPlacement> {
        self.placements.read().await.clone()
    }
}

#[async_trait]
impl Placer for MockPlacer {
    async fn place(
        &self,
        source: &Path,
        destination: &Path,
        mode: PlacementMode,
    ) -> PlacementResult {
        self.placements.write().await.push(RecordedPlacement {
            source: source.to_path_buf(),
            destination: destination.to_path_buf(),
            mode,
        });

        let mut existing = self.existing.write().await;
        if existing.contains(destination) {
            return PlacementResult::SkippedExisting {
                destination: destination.to_path_buf(),
            };
        }

        if let Some(kind) = self.next_error.write().await.take() {
            let error = std::io::Error::from(kind);
            let (from, to) = (source.to_path_buf(), destination.to_path_buf());
            return PlacementResult::Failed(match mode {
                PlacementMode::HardLink => PlacerError::link_failed(from, to, error),
                PlacementMode::Move => PlacerError::move_failed(from, to, error),
            });
        }

        existing.insert(destination.to_path_buf());
        PlacementResult::Placed {
            destination: destination.to_path_buf(),
            mode,
        }
    }
}
