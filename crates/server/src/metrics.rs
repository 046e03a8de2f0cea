//! Prometheus metrics for observability.
//!
//! This module provides metrics for monitoring the autoshelf server:
//! - HTTP request metrics (latency, counts)
//! - Watcher state and organizer pools (collected dynamically)
//! - Everything the core registers (chains, endpoints, placements)

use once_cell::sync::Lazy;
use prometheus::{
    self, Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, IntGaugeVec, Opts,
    Registry, TextEncoder,
};

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

// =============================================================================
// HTTP Request Metrics
// =============================================================================

/// HTTP request duration in seconds.
pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "autoshelf_http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![
            0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0,
        ]),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests total count.
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("autoshelf_http_requests_total", "Total HTTP requests"),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests currently in flight.
pub static HTTP_REQUESTS_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "autoshelf_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
    )
    .unwrap()
});

// =============================================================================
// Watcher and Organizer (collected dynamically)
// =============================================================================

/// Watcher running state (1 = running, 0 = stopped).
pub static WATCH_RUNNING: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "autoshelf_watch_running",
        "Whether the source folder watch is running (1) or stopped (0)",
    )
    .unwrap()
});

/// Active jobs per endpoint pool.
pub static POOL_ACTIVE: Lazy<IntGaugeVec> = Lazy::new(|| {
    IntGaugeVec::new(
        Opts::new("autoshelf_pool_active", "Active calls per endpoint pool"),
        &["pool"],
    )
    .unwrap()
});

/// Queued jobs per endpoint pool.
pub static POOL_QUEUED: Lazy<IntGaugeVec> = Lazy::new(|| {
    IntGaugeVec::new(
        Opts::new("autoshelf_pool_queued", "Calls waiting for an endpoint slot"),
        &["pool"],
    )
    .unwrap()
});

// =============================================================================
// Registration
// =============================================================================

fn register_metrics(registry: &Registry) {
    // HTTP
    registry
        .register(Box::new(HTTP_REQUEST_DURATION.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_IN_FLIGHT.clone()))
        .unwrap();

    // Watcher and pools
    registry.register(Box::new(WATCH_RUNNING.clone())).unwrap();
    registry.register(Box::new(POOL_ACTIVE.clone())).unwrap();
    registry.register(Box::new(POOL_QUEUED.clone())).unwrap();

    // Core metrics (chains, endpoints, placements, watch events)
    for metric in autoshelf_core::metrics::all_metrics() {
        registry.register(metric).unwrap();
    }
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer).unwrap();
    String::from_utf8(buffer).unwrap()
}

/// Collect dynamic metrics from current application state.
///
/// Called before encoding so the gauges reflect the watcher and the
/// organizer pools at scrape time.
pub async fn collect_dynamic_metrics(state: &crate::state::AppState) {
    let watch = state.watch_status().await;
    WATCH_RUNNING.set(if watch.running { 1 } else { 0 });

    let status = state.organizer().status();
    for pool in [&status.classification_pool, &status.lookup_pool] {
        POOL_ACTIVE
            .with_label_values(&[pool.name.as_str()])
            .set(pool.active_jobs as i64);
        POOL_QUEUED
            .with_label_values(&[pool.name.as_str()])
            .set(pool.queued_jobs as i64);
    }
}
