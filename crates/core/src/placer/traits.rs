//! Trait definitions for the placer module.

use std::path::Path;

use async_trait::async_trait;

use super::types::{PlacementMode, PlacementResult};

/// Materializes a source file at a destination path.
#[async_trait]
pub trait Placer: Send + Sync {
    /// Place `source` at `destination`.
    ///
    /// Never overwrites. Errors are reported as [`PlacementResult::Failed`].
    async fn place(&self, source: &Path, destination: &Path, mode: PlacementMode)
        -> PlacementResult;
}
