//! Types for the placer module.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::error::PlacerError;

/// How a file is materialized in the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementMode {
    /// Hard link; the source stays where it is.
    #[default]
    HardLink,
    /// Rename; the source disappears.
    Move,
}

impl PlacementMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlacementMode::HardLink => "hard_link",
            PlacementMode::Move => "move",
        }
    }
}

impl fmt::Display for PlacementMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of placing one file.
#[derive(Debug)]
pub enum PlacementResult {
    /// The file now exists at `destination`.
    Placed {
        destination: PathBuf,
        mode: PlacementMode,
    },
    /// Something already occupied `destination`; nothing was touched.
    SkippedExisting { destination: PathBuf },
    /// Placement failed; the source is unchanged.
    Failed(PlacerError),
}

impl PlacementResult {
    /// Short label for metrics and logs.
    pub fn label(&self) -> &'static str {
        match self {
            PlacementResult::Placed { .. } => "placed",
            PlacementResult::SkippedExisting { .. } => "skipped",
            PlacementResult::Failed(_) => "failed",
        }
    }

    pub fn is_placed(&self) -> bool {
        matches!(self, PlacementResult::Placed { .. })
    }
}
