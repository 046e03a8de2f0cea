use std::sync::Arc;

use autoshelf_core::{OrganizerStatus, SanitizedConfig};
use axum::{extract::State, http::header, response::IntoResponse, Json};
use serde::Serialize;

use crate::metrics::{collect_dynamic_metrics, encode_metrics};
use crate::state::{AppState, WatchStatus};

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

pub async fn get_config(State(state): State<Arc<AppState>>) -> Json<SanitizedConfig> {
    Json(state.sanitized_config())
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub watch: WatchStatus,
    pub organizer: OrganizerStatus,
}

/// GET /api/v1/status
///
/// Watcher state plus per-endpoint pool statistics and outcome counters.
pub async fn get_status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        watch: state.watch_status().await,
        organizer: state.organizer().status(),
    })
}

/// GET /metrics
pub async fn get_metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    collect_dynamic_metrics(&state).await;
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        encode_metrics(),
    )
}
