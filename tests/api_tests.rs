use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use fleetboard::config::Settings;
use fleetboard::handlers::create_router;
use fleetboard::models::{CleaningStats, FleetSnapshot, TrainRecord};
use fleetboard::services::assignment::AssignmentLookup;
use fleetboard::services::dashboard::SnapshotStore;
use fleetboard::services::{AppState, TeamRoster};

fn fleet() -> FleetSnapshot {
    let cleaned = |age: f64, load: f64| CleaningStats {
        last_clean_end: Some(chrono::Utc::now()),
        clean_age_hours: age,
        today_clean_load: load,
    };
    FleetSnapshot::new(
        chrono::Utc::now(),
        vec![
            TrainRecord::new("T01", "Ready")
                .with_fitness_days(20)
                .with_cleaning(cleaned(5.0, 0.0))
                .with_ranking(true, 0.82),
            TrainRecord::new("T02", "Maintenance").with_maintenance(2, 60.0),
            TrainRecord::new("T03", "Ready")
                .with_fitness_days(2)
                .with_cleaning(cleaned(3.0, 2.0))
                .with_ranking(true, 0.95),
            TrainRecord::new("T04", "Standby")
                .with_fitness_days(40)
                .with_maintenance(1, 5.0)
                .with_cleaning(cleaned(10.0, 0.0)),
        ],
    )
}

fn app() -> (Router, SnapshotStore) {
    let mut roster = TeamRoster::default();
    roster.assign_cleaning("T02", "Team 2");
    roster.assign_maintenance("T02", "Maintenance Team 1");
    let teams: Arc<dyn AssignmentLookup> = Arc::new(roster);
    let store = SnapshotStore::new(fleet());
    let state = Arc::new(AppState::new(Settings::default(), store.clone(), teams));
    (create_router(state), store)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post(uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

#[tokio::test]
async fn health_reports_fleet_size() {
    let (app, _) = app();
    let (status, body) = send(app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok", "trains": 4 }));
}

#[tokio::test]
async fn dashboard_orders_by_induction_priority() {
    let (app, _) = app();
    let (status, body) = send(app, get("/api/dashboard")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_trains"], 4);
    assert_eq!(body["eligible_count"], 2);
    assert_eq!(body["status_summary"]["Ready"], 2);
    assert_eq!(body["status_summary"]["Maintenance"], 1);
    let order: Vec<&str> = body["trains"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["train_id"].as_str().unwrap())
        .collect();
    assert_eq!(order, vec!["T03", "T01", "T02", "T04"]);
}

#[tokio::test]
async fn cleaning_board_uses_roster() {
    let (app, _) = app();
    let (status, body) = send(app, get("/api/cleaning")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["counts"]["pending"], 1);
    assert_eq!(body["counts"]["in_progress"], 1);
    assert_eq!(body["counts"]["completed"], 2);
    let t02 = body["tasks"]
        .as_array()
        .unwrap()
        .iter()
        .find(|t| t["train_id"] == "T02")
        .unwrap();
    assert_eq!(t02["status"], "Maintenance");
    assert_eq!(t02["cleaning_status"], "Pending");
    assert_eq!(t02["assigned_to"], "Team 2");
}

#[tokio::test]
async fn maintenance_board_lists_urgent_first() {
    let (app, _) = app();
    let (status, body) = send(app, get("/api/maintenance")).await;
    assert_eq!(status, StatusCode::OK);
    let tasks = body["tasks"].as_array().unwrap();
    assert_eq!(tasks[0]["train_id"], "T02");
    assert_eq!(tasks[0]["maintenance_status"], "In Progress");
    assert_eq!(tasks[0]["assigned_to"], "Maintenance Team 1");
    assert_eq!(tasks[1]["train_id"], "T03");
    assert_eq!(tasks[1]["maintenance_status"], "Due Soon");
    assert_eq!(body["counts"]["urgent"], 2);
    let urgent: Vec<&str> = body["urgent"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["train_id"].as_str().unwrap())
        .collect();
    assert_eq!(urgent, vec!["T02", "T03"]);
}

#[tokio::test]
async fn simulation_with_empty_body_uses_defaults() {
    let (app, _) = app();
    let (status, body) = send(app, post("/api/simulations", Body::empty())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fleet_size"], 4);
    assert_eq!(body["parameters"]["peak_hours_multiplier"], 1.2);
    let scenarios = body["scenarios"].as_array().unwrap();
    assert_eq!(scenarios.len(), 6);
    assert_eq!(scenarios[0]["scenario"], "Current State");
    assert_eq!(scenarios[0]["efficiency"], 75.0);
}

#[tokio::test]
async fn simulation_overrides_apply() {
    let (app, _) = app();
    let (status, body) = send(
        app,
        post("/api/simulations", r#"{"maintenanceReductionPercent": 100}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["parameters"]["maintenance_reduction_percent"], 100.0);
    assert_eq!(body["parameters"]["cleaning_efficiency_gain_percent"], 15.0);
    let reduction = &body["scenarios"][2];
    assert_eq!(reduction["scenario"], "Maintenance Reduction");
    assert_eq!(reduction["maintenance"], 0);
}

#[tokio::test]
async fn simulation_rejects_bad_parameters() {
    let (app, _) = app();
    let (status, body) = send(app, post("/api/simulations", r#"{"peak_hours_multiplier": "lots"}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("invalid parameters"));
}

#[tokio::test]
async fn results_upload_replaces_snapshot() {
    let (app, store) = app();
    let upload = json!({
        "createdAt": "2025-09-02T21:00:00Z",
        "data": [
            { "train_id": "R1", "status": "Ready", "fitness_days_left": 9 },
            { "train_id": "R2", "status": "Standby" },
            { "train_id": "R3" }
        ]
    });
    let (status, body) = send(app.clone(), post("/api/results", upload.to_string())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["trains"], 2);
    assert_eq!(body["issues"][0]["index"], 2);
    assert_eq!(body["status_summary"]["Standby"], 1);

    assert_eq!(store.current().len(), 2);
    assert!(store.current().find("T01").is_none());

    let (_, health) = send(app, get("/health")).await;
    assert_eq!(health["trains"], 2);
}

#[tokio::test]
async fn results_upload_tolerates_unreadable_created_at() {
    let (app, store) = app();
    let upload = json!({
        "createdAt": { "$date": "sometime" },
        "data": [{ "train_id": "R1", "status": "Ready" }]
    });
    let (status, body) = send(app, post("/api/results", upload.to_string())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["trains"], 1);
    assert!(body["created_at_issue"].as_str().unwrap().contains("sometime"));
    assert_eq!(store.current().len(), 1);
}

#[tokio::test]
async fn results_upload_rejects_invalid_documents() {
    let (app, store) = app();
    let (status, body) = send(app.clone(), post("/api/results", "{\"data\": 3}")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, _) = send(app, post("/api/results", "not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(store.current().len(), 4);
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let (app, _) = app();
    let (status, _) = send(app, get("/api/trains")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
