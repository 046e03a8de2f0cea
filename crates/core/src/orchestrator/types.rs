//! Types for the organizer.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::classifier::{ClassificationError, LlmError};
use crate::media::MediaInfo;
use crate::metadata::CatalogError;
use crate::placer::{PlacementMode, PlacerError};

/// Errors building an organizer from configuration.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Completion client could not be built.
    #[error("classifier setup failed: {0}")]
    Classifier(#[from] LlmError),

    /// Catalog client could not be built.
    #[error("catalog setup failed: {0}")]
    Catalog(#[from] CatalogError),
}

/// Why a file ended in `Failed`.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The path has no file name to classify.
    #[error("path has no file name: {0}")]
    InvalidPath(PathBuf),

    /// Classification failed or returned no title.
    #[error("no classification: {0}")]
    NoClassification(#[from] ClassificationError),

    /// The materializer reported a failure.
    #[error("placement failed: {0}")]
    Placement(#[from] PlacerError),
}

/// Processing stage of one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStage {
    Detected,
    Classified,
    Corrected,
    Planned,
    Placed,
    Skipped,
    Failed,
    Cancelled,
}

impl fmt::Display for FileStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FileStage::Detected => "detected",
            FileStage::Classified => "classified",
            FileStage::Corrected => "corrected",
            FileStage::Planned => "planned",
            FileStage::Placed => "placed",
            FileStage::Skipped => "skipped",
            FileStage::Failed => "failed",
            FileStage::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// Terminal outcome of one processing chain.
#[derive(Debug)]
pub enum ProcessOutcome {
    /// The file is now in the library.
    Placed {
        source: PathBuf,
        destination: PathBuf,
        info: MediaInfo,
        mode: PlacementMode,
    },
    /// The destination already existed.
    Skipped {
        source: PathBuf,
        destination: PathBuf,
        info: MediaInfo,
    },
    /// Something went wrong; nothing was moved.
    Failed {
        source: PathBuf,
        info: Option<MediaInfo>,
        error: ProcessError,
    },
    /// The chain was cancelled before placement began.
    Cancelled { source: PathBuf },
}

impl ProcessOutcome {
    pub fn stage(&self) -> FileStage {
        match self {
            ProcessOutcome::Placed { .. } => FileStage::Placed,
            ProcessOutcome::Skipped { .. } => FileStage::Skipped,
            ProcessOutcome::Failed { .. } => FileStage::Failed,
            ProcessOutcome::Cancelled { .. } => FileStage::Cancelled,
        }
    }

    pub fn source(&self) -> &PathBuf {
        match self {
            ProcessOutcome::Placed { source, .. }
            | ProcessOutcome::Skipped { source, .. }
            | ProcessOutcome::Failed { source, .. }
            | ProcessOutcome::Cancelled { source } => source,
        }
    }

    pub fn is_placed(&self) -> bool {
        matches!(self, ProcessOutcome::Placed { .. })
    }

    /// Serializable summary for the API.
    pub fn report(&self) -> OutcomeReport {
        let (destination, info, error) = match self {
            ProcessOutcome::Placed {
                destination, info, ..
            }
            | ProcessOutcome::Skipped {
                destination, info, ..
            } => (Some(destination.clone()), Some(info.clone()), None),
            ProcessOutcome::Failed { info, error, .. } => {
                (None, info.clone(), Some(error.to_string()))
            }
            ProcessOutcome::Cancelled { .. } => (None, None, None),
        };

        OutcomeReport {
            source: self.source().clone(),
            outcome: self.stage(),
            destination,
            info,
            error,
        }
    }
}

/// Serializable view of a [`ProcessOutcome`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutcomeReport {
    pub source: PathBuf,
    pub outcome: FileStage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<MediaInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Status of an outbound call pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolStatus {
    /// Pool name ("classification", "lookup").
    pub name: String,
    /// Calls in flight.
    pub active_jobs: usize,
    /// Maximum concurrent calls (0 = unlimited).
    pub max_concurrent: usize,
    /// Calls waiting for a slot.
    pub queued_jobs: usize,
    /// Successful calls since startup.
    pub total_processed: u64,
    /// Failed calls since startup.
    pub total_failed: u64,
}

/// Terminal outcome counters since startup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutcomeCounts {
    pub placed: u64,
    pub skipped: u64,
    pub failed: u64,
    pub cancelled: u64,
}

/// Current status of the organizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizerStatus {
    /// Chains currently running.
    pub active_chains: usize,
    /// Whether title correction is enabled.
    pub correction_enabled: bool,
    /// Placement mode in effect.
    pub mode: PlacementMode,
    pub classification_pool: PoolStatus,
    pub lookup_pool: PoolStatus,
    pub outcomes: OutcomeCounts,
}
