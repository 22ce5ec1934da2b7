use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::services::maintenance::{MaintenanceTask, URGENT_INSIGHT_LIMIT};
use crate::services::{AppState, CleaningBoard, DashboardReport, MaintenanceBoard};

pub async fn dashboard(State(state): State<Arc<AppState>>) -> Json<DashboardReport> {
    let snapshot = state.snapshots.current();
    Json(DashboardReport::build(&snapshot))
}

pub async fn cleaning(State(state): State<Arc<AppState>>) -> Json<CleaningBoard> {
    let snapshot = state.snapshots.current();
    Json(CleaningBoard::build(&snapshot, state.teams.as_ref()))
}

#[derive(Serialize)]
pub struct MaintenanceView {
    #[serde(flatten)]
    pub board: MaintenanceBoard,
    pub urgent: Vec<MaintenanceTask>,
}

pub async fn maintenance(State(state): State<Arc<AppState>>) -> Json<MaintenanceView> {
    let snapshot = state.snapshots.current();
    let board = MaintenanceBoard::build(&snapshot, state.teams.as_ref());
    let urgent = board
        .urgent_insights(URGENT_INSIGHT_LIMIT)
        .into_iter()
        .cloned()
        .collect();
    Json(MaintenanceView { board, urgent })
}
