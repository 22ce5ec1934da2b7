use axum::{body::Bytes, extract::State, Json};
use std::sync::Arc;

use super::ApiError;
use crate::models::{ParameterOverrides, SimulationReport};
use crate::services::{simulation, summarize, AppState};

/// An empty body runs with the configured defaults; any field sent overrides
/// its default.
pub async fn run_simulation(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<SimulationReport>, ApiError> {
    let overrides: ParameterOverrides = if body.iter().all(u8::is_ascii_whitespace) {
        ParameterOverrides::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| ApiError::bad_request(format!("invalid parameters: {e}")))?
    };
    let params = overrides.apply(&state.settings.simulation);

    let snapshot = state.snapshots.current();
    let summary = summarize(&snapshot.records);
    tracing::info!(fleet_size = summary.fleet_size(), ?params, "running what-if simulation");
    Ok(Json(simulation::run(&summary, &params)))
}
