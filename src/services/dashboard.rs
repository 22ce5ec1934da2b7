use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::sync::Arc;

use super::summary::{summarize, StatusSummary};
use crate::models::{FleetSnapshot, TrainRecord, TrainStatus};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrainOverview {
    pub train_id: String,
    pub status: TrainStatus,
    pub eligible: bool,
    pub priority_score: f64,
    pub fitness_days_left: i64,
}

impl From<&TrainRecord> for TrainOverview {
    fn from(record: &TrainRecord) -> Self {
        Self {
            train_id: record.train_id.clone(),
            status: record.status.clone(),
            eligible: record.eligible,
            priority_score: record.priority_score,
            fitness_days_left: record.fitness_days_left,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DashboardReport {
    pub created_at: DateTime<Utc>,
    pub total_trains: usize,
    pub status_summary: StatusSummary,
    pub eligible_count: usize,
    pub trains: Vec<TrainOverview>,
}

/// Induction order: eligible trains first, then higher priority score.
fn induction_order(a: &TrainOverview, b: &TrainOverview) -> Ordering {
    b.eligible
        .cmp(&a.eligible)
        .then_with(|| b.priority_score.partial_cmp(&a.priority_score).unwrap_or(Ordering::Equal))
        .then_with(|| a.train_id.cmp(&b.train_id))
}

impl DashboardReport {
    pub fn build(snapshot: &FleetSnapshot) -> Self {
        let mut trains: Vec<TrainOverview> = snapshot.records.iter().map(TrainOverview::from).collect();
        trains.sort_by(induction_order);
        Self {
            created_at: snapshot.created_at,
            total_trains: snapshot.len(),
            status_summary: summarize(&snapshot.records),
            eligible_count: snapshot.records.iter().filter(|r| r.eligible).count(),
            trains,
        }
    }
}

/// Holds the current snapshot; readers get a cheap shared handle and derive
/// their views from it on every call.
#[derive(Clone, Default)]
pub struct SnapshotStore {
    current: Arc<RwLock<Arc<FleetSnapshot>>>,
}

impl SnapshotStore {
    pub fn new(snapshot: FleetSnapshot) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(snapshot))),
        }
    }

    pub fn current(&self) -> Arc<FleetSnapshot> {
        self.current.read().clone()
    }

    pub fn replace(&self, snapshot: FleetSnapshot) -> Arc<FleetSnapshot> {
        let next = Arc::new(snapshot);
        *self.current.write() = next.clone();
        tracing::info!(trains = next.len(), created_at = %next.created_at, "fleet snapshot replaced");
        next
    }
}
