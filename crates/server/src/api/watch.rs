//! Watcher lifecycle handlers.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use tracing::warn;

use crate::state::{AppState, WatchControlError, WatchStatus};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct StopWatchResponse {
    /// Whether a watch was running before the call.
    pub stopped: bool,
    pub watch: WatchStatus,
}

/// POST /api/v1/watch/start
pub async fn start_watch(
    State(state): State<Arc<AppState>>,
) -> Result<Json<WatchStatus>, impl IntoResponse> {
    state.start_watch().await.map(Json).map_err(|e| {
        let status = match &e {
            WatchControlError::NoSourceDir => StatusCode::BAD_REQUEST,
            WatchControlError::AlreadyRunning(_) => StatusCode::CONFLICT,
            WatchControlError::Watch(_) => {
                warn!("Failed to start watch: {}", e);
                StatusCode::UNPROCESSABLE_ENTITY
            }
        };
        (
            status,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
    })
}

/// POST /api/v1/watch/stop
///
/// Stopping an idle watcher is not an error.
pub async fn stop_watch(State(state): State<Arc<AppState>>) -> Json<StopWatchResponse> {
    let stopped = state.stop_watch().await;
    Json(StopWatchResponse {
        stopped,
        watch: state.watch_status().await,
    })
}
