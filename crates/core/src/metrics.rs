//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Organizer chains (files processed, active chains)
//! - External services (completion endpoint, metadata catalog)
//! - Placement and the watcher

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts};

// =============================================================================
// Organizer
// =============================================================================

/// Files that reached a terminal outcome.
pub static FILES_PROCESSED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "autoshelf_files_processed_total",
            "Total files that finished processing",
        ),
        &["outcome"], // "placed", "skipped", "failed", "cancelled"
    )
    .unwrap()
});

/// Chains currently in flight.
pub static ACTIVE_CHAINS: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new("autoshelf_active_chains", "Processing chains currently running").unwrap()
});

// =============================================================================
// External Services
// =============================================================================

/// Classification requests by result.
pub static CLASSIFICATION_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "autoshelf_classification_requests_total",
            "Total classification requests to the completion endpoint",
        ),
        &["result"], // "success", "api_error", "http_error", "timeout", "parse_error", "missing_title"
    )
    .unwrap()
});

/// Classification round-trip duration in seconds.
pub static CLASSIFICATION_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "autoshelf_classification_duration_seconds",
            "Duration of classification requests",
        )
        .buckets(vec![0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]),
        &["result"],
    )
    .unwrap()
});

/// Catalog lookups by search kind and result.
pub static CATALOG_LOOKUPS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "autoshelf_catalog_lookups_total",
            "Total metadata catalog lookups",
        ),
        &["kind", "result"], // kind: "movie", "tv"; result: "corrected", "unchanged", "not_found", "error"
    )
    .unwrap()
});

// =============================================================================
// Placement & Watcher
// =============================================================================

/// Placements by mode and result.
pub static PLACEMENTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("autoshelf_placements_total", "Total placement attempts"),
        &["mode", "result"], // mode: "hard_link", "move"; result: "placed", "skipped", "failed"
    )
    .unwrap()
});

/// Filesystem events seen by the watcher.
pub static WATCH_EVENTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("autoshelf_watch_events_total", "Watcher events by disposition"),
        &["disposition"], // "accepted", "ignored", "settled"
    )
    .unwrap()
});

/// Get all core metrics for registration.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(FILES_PROCESSED.clone()),
        Box::new(ACTIVE_CHAINS.clone()),
        Box::new(CLASSIFICATION_REQUESTS.clone()),
        Box::new(CLASSIFICATION_DURATION.clone()),
        Box::new(CATALOG_LOOKUPS.clone()),
        Box::new(PLACEMENTS.clone()),
        Box::new(WATCH_EVENTS.clone()),
    ]
}
