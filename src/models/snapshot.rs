use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;

use super::train::{parse_timestamp, TrainRecord};
use crate::error::{FleetError, FleetResult};

/// Every train record at one point in time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FleetSnapshot {
    pub created_at: DateTime<Utc>,
    pub records: Vec<TrainRecord>,
}

/// A record that was left out of (or flagged in) a snapshot while loading.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordIssue {
    pub index: usize,
    pub train_id: Option<String>,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SnapshotLoad {
    pub snapshot: FleetSnapshot,
    pub issues: Vec<RecordIssue>,
    /// Set when `createdAt` was present but unreadable and the load time was used instead.
    pub created_at_issue: Option<String>,
}

/// Reads `createdAt` as a timestamp string, epoch milliseconds, or a Mongo
/// extended-JSON wrapper (`{"$date": ...}`, `{"$numberLong": "..."}`).
fn created_at_value(value: Value) -> Result<Option<DateTime<Utc>>, String> {
    match value {
        Value::Null => Ok(None),
        Value::String(raw) => parse_timestamp(&raw),
        Value::Number(millis) => from_millis(millis.as_i64(), &millis.to_string()),
        Value::Object(mut wrapper) => {
            if let Some(inner) = wrapper.remove("$date") {
                return created_at_value(inner);
            }
            match wrapper.remove("$numberLong") {
                Some(Value::String(millis)) => from_millis(millis.parse().ok(), &millis),
                _ => Err(format!("unsupported createdAt object {}", Value::Object(wrapper))),
            }
        }
        other => Err(format!("createdAt must be a timestamp, got {other}")),
    }
}

fn from_millis(millis: Option<i64>, raw: &str) -> Result<Option<DateTime<Utc>>, String> {
    millis
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(Some)
        .ok_or_else(|| format!("unreadable epoch milliseconds {raw:?}"))
}

impl Default for FleetSnapshot {
    fn default() -> Self {
        FleetSnapshot::empty()
    }
}

impl FleetSnapshot {
    pub fn new(created_at: DateTime<Utc>, records: Vec<TrainRecord>) -> Self {
        Self { created_at, records }
    }

    pub fn empty() -> Self {
        Self::new(Utc::now(), Vec::new())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn find(&self, train_id: &str) -> Option<&TrainRecord> {
        self.records.iter().find(|record| record.train_id == train_id)
    }

    pub fn from_json_str(raw: &str) -> FleetResult<SnapshotLoad> {
        let document: Value = serde_json::from_str(raw)?;
        Self::from_json_value(document)
    }

    /// Accepts either a result document (`{"createdAt": ..., "data": [...]}`)
    /// or a bare array of records. Records that fail to decode are skipped and
    /// reported; the rest of the batch still loads.
    pub fn from_json_value(document: Value) -> FleetResult<SnapshotLoad> {
        let (raw_created_at, rows) = match document {
            Value::Array(rows) => (None, rows),
            Value::Object(mut map) => {
                let raw_created_at = map.remove("createdAt").or_else(|| map.remove("created_at"));
                match map.remove("data") {
                    Some(Value::Array(rows)) => (raw_created_at, rows),
                    Some(_) => return Err(FleetError::InvalidSnapshot("data must be an array".to_string())),
                    None => return Err(FleetError::InvalidSnapshot("missing data array".to_string())),
                }
            }
            _ => {
                return Err(FleetError::InvalidSnapshot(
                    "expected a result document or an array of records".to_string(),
                ))
            }
        };

        let (created_at, created_at_issue) = match raw_created_at.map(created_at_value).transpose() {
            Ok(parsed) => (parsed.flatten(), None),
            Err(message) => {
                tracing::warn!(error = %message, "unreadable createdAt; using load time");
                (None, Some(message))
            }
        };

        let mut records = Vec::with_capacity(rows.len());
        let mut issues = Vec::new();
        let mut seen = HashSet::new();

        for (index, row) in rows.into_iter().enumerate() {
            let train_id = row
                .get("train_id")
                .or_else(|| row.get("trainId"))
                .and_then(Value::as_str)
                .map(str::to_string);
            match serde_json::from_value::<TrainRecord>(row) {
                Ok(record) => {
                    if !seen.insert(record.train_id.clone()) {
                        issues.push(RecordIssue {
                            index,
                            train_id: Some(record.train_id.clone()),
                            message: "duplicate train_id".to_string(),
                        });
                    }
                    records.push(record);
                }
                Err(err) => {
                    tracing::warn!(index, train_id = ?train_id, error = %err, "skipping malformed train record");
                    issues.push(RecordIssue {
                        index,
                        train_id,
                        message: err.to_string(),
                    });
                }
            }
        }

        tracing::debug!(records = records.len(), issues = issues.len(), "snapshot decoded");

        Ok(SnapshotLoad {
            snapshot: FleetSnapshot::new(created_at.unwrap_or_else(Utc::now), records),
            issues,
            created_at_issue,
        })
    }

    pub fn load(path: &Path) -> FleetResult<SnapshotLoad> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }
}
