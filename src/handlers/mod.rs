pub mod fleet;
pub mod health;
pub mod results;
pub mod simulation;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::error::FleetError;
use crate::services::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/dashboard", get(fleet::dashboard))
        .route("/api/cleaning", get(fleet::cleaning))
        .route("/api/maintenance", get(fleet::maintenance))
        .route("/api/simulations", post(simulation::run_simulation))
        .route("/api/results", post(results::replace_results))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<FleetError> for ApiError {
    fn from(err: FleetError) -> Self {
        let status = match &err {
            FleetError::TrainNotFound(_) => StatusCode::NOT_FOUND,
            FleetError::InvalidSnapshot(_) | FleetError::Json(_) | FleetError::UnknownStatus { .. } => {
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, error = %self.message, "request failed");
        }
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}
