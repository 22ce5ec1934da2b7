use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use std::sync::Arc;

use super::ApiError;
use crate::models::{FleetSnapshot, RecordIssue};
use crate::services::{summarize, AppState, StatusSummary};

#[derive(Serialize)]
pub struct ResultsAccepted {
    pub trains: usize,
    pub issues: Vec<RecordIssue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at_issue: Option<String>,
    pub status_summary: StatusSummary,
}

/// Replaces the in-memory snapshot with an uploaded result document.
pub async fn replace_results(
    State(state): State<Arc<AppState>>,
    body: String,
) -> Result<(StatusCode, Json<ResultsAccepted>), ApiError> {
    let loaded = FleetSnapshot::from_json_str(&body)?;
    let status_summary = summarize(&loaded.snapshot.records);
    let stored = state.snapshots.replace(loaded.snapshot);
    Ok((
        StatusCode::CREATED,
        Json(ResultsAccepted {
            trains: stored.len(),
            issues: loaded.issues,
            created_at_issue: loaded.created_at_issue,
            status_summary,
        }),
    ))
}
