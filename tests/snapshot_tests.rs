use fleetboard::models::{FleetSnapshot, TrainStatus};
use fleetboard::FleetError;
use serde_json::json;
use std::io::Write;

fn result_document() -> serde_json::Value {
    json!({
        "_id": "66d4",
        "userId": "66d1",
        "createdAt": "2025-09-01T21:00:00.000Z",
        "data": [
            {
                "train_id": "T01",
                "eligible": true,
                "priority_score": 0.91,
                "status": "Ready",
                "fitness_days_left": 12,
                "reasons": ["+Fitness: High days left (12 vs. avg 8.0)"],
                "recommendations": [],
                "cleaning": {
                    "last_clean_end": "2025-09-01 06:00:00",
                    "clean_age_hours": 15.0,
                    "today_clean_load": 0
                },
                "maintenance": { "open_work_orders": 0, "open_work_order_hours": 0, "_id": "x" }
            },
            {
                "train_id": "T02",
                "status": "Maintenance",
                "fitness_days_left": 4.0,
                "cleaning": null
            },
            {
                "trainId": "T03",
                "status": "Standby",
                "fitnessDaysLeft": 30,
                "maintenance": { "openWorkOrders": 2, "openWorkOrderHours": 12.5 }
            }
        ]
    })
}

#[test]
fn loads_result_document() {
    let loaded = FleetSnapshot::from_json_value(result_document()).unwrap();
    assert!(loaded.issues.is_empty(), "{:?}", loaded.issues);
    let snapshot = loaded.snapshot;
    assert_eq!(snapshot.len(), 3);
    assert_eq!(snapshot.created_at.to_rfc3339(), "2025-09-01T21:00:00+00:00");

    let first = snapshot.find("T01").unwrap();
    assert!(first.eligible);
    assert!(first.cleaning.last_clean_end.is_some());
    assert_eq!(first.reasons.len(), 1);

    let second = snapshot.find("T02").unwrap();
    assert_eq!(second.status, TrainStatus::Maintenance);
    assert_eq!(second.fitness_days_left, 4);
    assert!(second.cleaning.last_clean_end.is_none());
    assert_eq!(second.maintenance.open_work_orders, 0);

    let third = snapshot.find("T03").unwrap();
    assert_eq!(third.maintenance.open_work_orders, 2);
    assert_eq!(third.maintenance.open_work_order_hours, 12.5);
}

#[test]
fn malformed_records_are_reported_not_fatal() {
    let raw = json!({
        "data": [
            { "train_id": "T01", "status": "Ready" },
            { "train_id": "T02" },
            { "train_id": "T03", "status": "Standby", "cleaning": { "last_clean_end": "yesterday-ish" } },
            { "train_id": "T01", "status": "Standby" }
        ]
    });
    let loaded = FleetSnapshot::from_json_value(raw).unwrap();
    assert_eq!(loaded.snapshot.len(), 2);

    let indexes: Vec<usize> = loaded.issues.iter().map(|i| i.index).collect();
    assert_eq!(indexes, vec![1, 2, 3]);
    assert_eq!(loaded.issues[0].train_id.as_deref(), Some("T02"));
    assert!(loaded.issues[0].message.contains("status"));
    assert_eq!(loaded.issues[2].message, "duplicate train_id");
}

#[test]
fn accepts_bare_record_array() {
    let loaded = FleetSnapshot::from_json_str(r#"[{"train_id": "T09", "status": "Overhaul"}]"#).unwrap();
    let record = &loaded.snapshot.records[0];
    assert_eq!(record.status, TrainStatus::Other("Overhaul".to_string()));
}

#[test]
fn rejects_documents_without_records() {
    assert!(matches!(
        FleetSnapshot::from_json_str(r#"{"createdAt": null}"#),
        Err(FleetError::InvalidSnapshot(_))
    ));
    assert!(matches!(
        FleetSnapshot::from_json_str(r#"{"data": {"train_id": "T1"}}"#),
        Err(FleetError::InvalidSnapshot(_))
    ));
    assert!(matches!(FleetSnapshot::from_json_str("42"), Err(FleetError::InvalidSnapshot(_))));
    assert!(matches!(FleetSnapshot::from_json_str("{not json"), Err(FleetError::Json(_))));
}

#[test]
fn loads_from_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{}", result_document()).unwrap();
    let loaded = FleetSnapshot::load(file.path()).unwrap();
    assert_eq!(loaded.snapshot.len(), 3);

    let missing = FleetSnapshot::load(std::path::Path::new("/nonexistent/fleet.json"));
    assert!(matches!(missing, Err(FleetError::Io(_))));
}

#[test]
fn snapshot_serializes_back_to_snake_case() {
    let loaded = FleetSnapshot::from_json_value(result_document()).unwrap();
    let value = serde_json::to_value(&loaded.snapshot.records[2]).unwrap();
    assert_eq!(value["train_id"], "T03");
    assert_eq!(value["status"], "Standby");
    assert_eq!(value["maintenance"]["open_work_orders"], 2);
    assert!(value["cleaning"]["last_clean_end"].is_null());
}

#[test]
fn extended_json_created_at_is_accepted() {
    let wrapped = FleetSnapshot::from_json_str(
        r#"{"createdAt": {"$date": "2025-09-01T00:00:00Z"}, "data": [{"train_id": "T1", "status": "Ready"}]}"#,
    )
    .unwrap();
    assert_eq!(wrapped.snapshot.created_at.to_rfc3339(), "2025-09-01T00:00:00+00:00");
    assert_eq!(wrapped.created_at_issue, None);

    let long = FleetSnapshot::from_json_str(
        r#"{"createdAt": {"$date": {"$numberLong": "1756684800000"}}, "data": []}"#,
    )
    .unwrap();
    assert_eq!(long.snapshot.created_at.to_rfc3339(), "2025-09-01T00:00:00+00:00");

    let millis = FleetSnapshot::from_json_str(r#"{"created_at": 1756684800000, "data": []}"#).unwrap();
    assert_eq!(millis.snapshot.created_at, long.snapshot.created_at);
}

#[test]
fn unreadable_created_at_keeps_the_records() {
    for created_at in [r#""yesterday""#, "true", r#"{"when": 3}"#, "[1, 2]"] {
        let raw = format!(
            r#"{{"createdAt": {created_at}, "data": [{{"train_id": "T1", "status": "Ready"}}, {{"train_id": "T2", "status": "Standby"}}]}}"#
        );
        let before = chrono::Utc::now();
        let loaded = FleetSnapshot::from_json_str(&raw).unwrap();
        assert_eq!(loaded.snapshot.len(), 2, "{created_at}");
        assert!(loaded.issues.is_empty());
        assert!(loaded.created_at_issue.is_some(), "{created_at}");
        assert!(loaded.snapshot.created_at >= before);
    }
}
