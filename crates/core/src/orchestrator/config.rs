//! Organizer configuration.

use serde::{Deserialize, Serialize};

/// Concurrency limits for outbound calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizerConfig {
    /// Maximum concurrent calls to the completion endpoint (0 = unlimited).
    #[serde(default = "default_limit")]
    pub max_concurrent_classifications: usize,

    /// Maximum concurrent metadata catalog lookups (0 = unlimited).
    #[serde(default = "default_limit")]
    pub max_concurrent_lookups: usize,
}

fn default_limit() -> usize {
    4
}

impl Default for OrganizerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_classifications: default_limit(),
            max_concurrent_lookups: default_limit(),
        }
    }
}
