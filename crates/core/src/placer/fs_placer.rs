//! File system placer implementation.

use std::io::ErrorKind;
use std::path::Path;

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, warn};

use super::error::PlacerError;
use super::traits::Placer;
use super::types::{PlacementMode, PlacementResult};
use crate::metrics;

/// File system based placer.
///
/// Hard links, or in move mode links and then unlinks the source. Never
/// copies and never overwrites.
#[derive(Debug, Clone, Default)]
pub struct FsPlacer;

impl FsPlacer {
    pub fn new() -> Self {
        Self
    }

    async fn place_inner(
        &self,
        source: &Path,
        destination: &Path,
        mode: PlacementMode,
    ) -> Result<PlacementResult, PlacerError> {
        if fs::try_exists(destination).await? {
            debug!("Destination exists, skipping: {}", destination.display());
            return Ok(PlacementResult::SkippedExisting {
                destination: destination.to_path_buf(),
            });
        }

        if !fs::try_exists(source).await? {
            return Err(PlacerError::SourceNotFound {
                path: source.to_path_buf(),
            });
        }

        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| PlacerError::DirectoryCreationFailed {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }

        let outcome = match mode {
            PlacementMode::HardLink => fs::hard_link(source, destination).await.map_err(|e| {
                (e.kind(), PlacerError::link_failed(source.to_path_buf(), destination.to_path_buf(), e))
            }),
            // Not rename: it would replace a destination created since the check.
            PlacementMode::Move => match fs::hard_link(source, destination).await {
                Ok(()) => {
                    if let Err(e) = fs::remove_file(source).await {
                        warn!(
                            "Placed {} but could not remove source {}: {}",
                            destination.display(),
                            source.display(),
                            e
                        );
                    }
                    Ok(())
                }
                Err(e) => Err((
                    e.kind(),
                    PlacerError::move_failed(source.to_path_buf(), destination.to_path_buf(), e),
                )),
            },
        };

        match outcome {
            Ok(()) => Ok(PlacementResult::Placed {
                destination: destination.to_path_buf(),
                mode,
            }),
            // Another chain created the destination between the check and the link.
            Err((ErrorKind::AlreadyExists, _)) => Ok(PlacementResult::SkippedExisting {
                destination: destination.to_path_buf(),
            }),
            Err((ErrorKind::NotFound, _)) if !source.exists() => Err(PlacerError::SourceNotFound {
                path: source.to_path_buf(),
            }),
            Err((_, e)) => Err(e),
        }
    }
}

#[async_trait]
impl Placer for FsPlacer {
    async fn place(
        &self,
        source: &Path,
        destination: &Path,
        mode: PlacementMode,
    ) -> PlacementResult {
        let result = self
            .place_inner(source, destination, mode)
            .await
            .unwrap_or_else(PlacementResult::Failed);

        metrics::PLACEMENTS
            .with_label_values(&[mode.as_str(), result.label()])
            .inc();

        result
    }
}
