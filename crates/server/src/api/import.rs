//! Manual batch import.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use autoshelf_core::OutcomeReport;

use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    pub files: Vec<PathBuf>,
    /// Wait for every chain and return their outcomes.
    #[serde(default)]
    pub wait: bool,
}

#[derive(Debug, Serialize)]
pub struct RejectedFile {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub accepted: Vec<PathBuf>,
    pub rejected: Vec<RejectedFile>,
    /// Per-file outcomes, present when the request waited.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<OutcomeReport>>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/v1/import
///
/// Files with an extension outside `watch.import_extensions`, or that are
/// not regular files, are rejected individually. Accepted files each run
/// their own chain; with `wait = false` the call returns 202 immediately.
pub async fn import_files(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ImportRequest>,
) -> Result<(StatusCode, Json<ImportResponse>), (StatusCode, Json<ErrorResponse>)> {
    if request.files.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "files must not be empty".to_string(),
            }),
        ));
    }

    let mut accepted = Vec::new();
    let mut rejected = Vec::new();
    for path in request.files {
        if !state.import_filter().accepts_import(&path) {
            rejected.push(RejectedFile {
                path,
                reason: "unsupported extension".to_string(),
            });
        } else if !tokio::fs::metadata(&path)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false)
        {
            rejected.push(RejectedFile {
                path,
                reason: "not a file".to_string(),
            });
        } else {
            accepted.push(path);
        }
    }

    info!(
        "Import requested: {} accepted, {} rejected",
        accepted.len(),
        rejected.len()
    );

    let organizer = state.organizer();
    let session = organizer.session_token();

    if request.wait {
        let outcomes = organizer.process_batch(&accepted, &session).await;
        let results = outcomes.iter().map(|o| o.report()).collect();
        return Ok((
            StatusCode::OK,
            Json(ImportResponse {
                accepted,
                rejected,
                results: Some(results),
            }),
        ));
    }

    for path in &accepted {
        organizer.submit(path.clone(), session.clone());
    }

    Ok((
        StatusCode::ACCEPTED,
        Json(ImportResponse {
            accepted,
            rejected,
            results: None,
        }),
    ))
}
