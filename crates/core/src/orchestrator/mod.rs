//! Organizer: the per-file processing chain.
//!
//! Each detected or imported file runs as its own chain:
//! - **Classify**: one completion call, bounded by the classification pool
//! - **Correct**: optional catalog lookup, bounded by the lookup pool
//! - **Plan**: pure path computation
//! - **Place**: hard link or move, never interrupted once started

mod config;
mod pool;
mod runner;
mod types;

pub use config::OrganizerConfig;
pub use runner::Organizer;
pub use types::{
    FileStage, OrchestratorError, OrganizerStatus, OutcomeCounts, OutcomeReport, PoolStatus,
    ProcessError, ProcessOutcome,
};
