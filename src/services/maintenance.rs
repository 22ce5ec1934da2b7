use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::assignment::AssignmentLookup;
use super::summary::percent;
use crate::error::{FleetError, FleetResult};
use crate::models::{FleetSnapshot, TrainRecord, TrainStatus};

pub const LONG_RUNNING_ORDER_HOURS: f64 = 48.0;
pub const AGED_ORDER_HOURS: f64 = 24.0;
pub const FITNESS_WARNING_DAYS: i64 = 5;
pub const URGENT_INSIGHT_LIMIT: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaintenanceStatus {
    #[serde(rename = "In Progress")]
    InProgress,
    Pending,
    Scheduled,
    #[serde(rename = "Due Soon")]
    DueSoon,
    Good,
}

impl fmt::Display for MaintenanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MaintenanceStatus::InProgress => "In Progress",
            MaintenanceStatus::Pending => "Pending",
            MaintenanceStatus::Scheduled => "Scheduled",
            MaintenanceStatus::DueSoon => "Due Soon",
            MaintenanceStatus::Good => "Good",
        })
    }
}

/// Declaration order is sort order: High sorts first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Urgency {
    High,
    Medium,
    Low,
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Urgency::High => "High",
            Urgency::Medium => "Medium",
            Urgency::Low => "Low",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceAssessment {
    pub status: MaintenanceStatus,
    pub urgency: Urgency,
}

struct MaintenanceRule {
    matches: fn(&TrainRecord) -> bool,
    status: MaintenanceStatus,
    urgency: Urgency,
}

fn in_depot_with_orders(record: &TrainRecord) -> bool {
    record.status == TrainStatus::Maintenance && record.maintenance.open_work_orders > 0
}

fn has_open_orders(record: &TrainRecord) -> bool {
    record.maintenance.open_work_orders > 0
}

fn orders_older_than(record: &TrainRecord, hours: f64) -> bool {
    record.maintenance.open_work_order_hours > hours
}

// First match wins; the order encodes the decision tree.
const MAINTENANCE_RULES: [MaintenanceRule; 7] = [
    MaintenanceRule {
        matches: |r| in_depot_with_orders(r) && orders_older_than(r, LONG_RUNNING_ORDER_HOURS),
        status: MaintenanceStatus::InProgress,
        urgency: Urgency::High,
    },
    MaintenanceRule {
        matches: |r| in_depot_with_orders(r) && orders_older_than(r, AGED_ORDER_HOURS),
        status: MaintenanceStatus::InProgress,
        urgency: Urgency::Medium,
    },
    MaintenanceRule {
        matches: in_depot_with_orders,
        status: MaintenanceStatus::Pending,
        urgency: Urgency::Medium,
    },
    MaintenanceRule {
        matches: |r| r.status == TrainStatus::Maintenance,
        status: MaintenanceStatus::Pending,
        urgency: Urgency::Low,
    },
    MaintenanceRule {
        matches: |r| has_open_orders(r) && orders_older_than(r, AGED_ORDER_HOURS),
        status: MaintenanceStatus::Scheduled,
        urgency: Urgency::Medium,
    },
    MaintenanceRule {
        matches: has_open_orders,
        status: MaintenanceStatus::Scheduled,
        urgency: Urgency::Low,
    },
    MaintenanceRule {
        matches: |r| r.fitness_days_left <= FITNESS_WARNING_DAYS,
        status: MaintenanceStatus::DueSoon,
        urgency: Urgency::High,
    },
];

pub fn classify_maintenance(record: &TrainRecord) -> MaintenanceAssessment {
    MAINTENANCE_RULES
        .iter()
        .find(|rule| (rule.matches)(record))
        .map(|rule| MaintenanceAssessment {
            status: rule.status,
            urgency: rule.urgency,
        })
        .unwrap_or(MaintenanceAssessment {
            status: MaintenanceStatus::Good,
            urgency: Urgency::Low,
        })
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceCounts {
    pub pending: u32,
    pub in_progress: u32,
    pub completed: u32,
    pub urgent: u32,
}

impl MaintenanceCounts {
    fn bucket(&mut self, status: MaintenanceStatus) -> &mut u32 {
        match status {
            MaintenanceStatus::InProgress => &mut self.in_progress,
            MaintenanceStatus::Pending | MaintenanceStatus::Scheduled | MaintenanceStatus::DueSoon => {
                &mut self.pending
            }
            MaintenanceStatus::Good => &mut self.completed,
        }
    }

    fn tally(&mut self, assessment: MaintenanceAssessment) {
        *self.bucket(assessment.status) += 1;
        if assessment.urgency == Urgency::High {
            self.urgent += 1;
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceRatios {
    pub in_maintenance_percent: f64,
    pub good_condition_percent: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceTask {
    pub train_id: String,
    pub status: TrainStatus,
    pub maintenance_status: MaintenanceStatus,
    pub urgency: Urgency,
    pub open_work_orders: u32,
    pub open_work_order_hours: f64,
    pub fitness_days_left: i64,
    pub assigned_to: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceBoard {
    pub created_at: DateTime<Utc>,
    pub tasks: Vec<MaintenanceTask>,
    pub counts: MaintenanceCounts,
    pub ratios: MaintenanceRatios,
}

impl MaintenanceBoard {
    pub fn build(snapshot: &FleetSnapshot, teams: &dyn AssignmentLookup) -> Self {
        let mut counts = MaintenanceCounts::default();
        let mut in_depot = 0u32;
        let mut tasks: Vec<MaintenanceTask> = snapshot
            .records
            .iter()
            .map(|record| {
                let assessment = classify_maintenance(record);
                counts.tally(assessment);
                let assigned_to = if record.status == TrainStatus::Maintenance {
                    in_depot += 1;
                    teams.maintenance_team(&record.train_id)
                } else {
                    None
                };
                MaintenanceTask {
                    train_id: record.train_id.clone(),
                    status: record.status.clone(),
                    maintenance_status: assessment.status,
                    urgency: assessment.urgency,
                    open_work_orders: record.maintenance.open_work_orders,
                    open_work_order_hours: record.maintenance.open_work_order_hours,
                    fitness_days_left: record.fitness_days_left,
                    assigned_to,
                }
            })
            .collect();
        // Stable: snapshot order is kept inside each urgency band.
        tasks.sort_by_key(|task| task.urgency);

        let fleet = snapshot.len() as u32;
        let ratios = MaintenanceRatios {
            in_maintenance_percent: percent(in_depot, fleet),
            good_condition_percent: percent(counts.completed, fleet),
        };

        tracing::debug!(
            pending = counts.pending,
            in_progress = counts.in_progress,
            completed = counts.completed,
            urgent = counts.urgent,
            "maintenance board built"
        );

        Self {
            created_at: snapshot.created_at,
            tasks,
            counts,
            ratios,
        }
    }

    pub fn task(&self, train_id: &str) -> Option<&MaintenanceTask> {
        self.tasks.iter().find(|task| task.train_id == train_id)
    }

    pub fn urgent_insights(&self, limit: usize) -> Vec<&MaintenanceTask> {
        self.tasks
            .iter()
            .filter(|task| task.urgency == Urgency::High)
            .take(limit)
            .collect()
    }

    /// Closes out a train's maintenance: the task becomes Good/Low and its
    /// count moves to `completed`.
    pub fn mark_done(&mut self, train_id: &str) -> FleetResult<()> {
        let task = self
            .tasks
            .iter_mut()
            .find(|task| task.train_id == train_id)
            .ok_or_else(|| FleetError::TrainNotFound(train_id.to_string()))?;
        if task.maintenance_status == MaintenanceStatus::Good {
            return Ok(());
        }
        let previous = MaintenanceAssessment {
            status: task.maintenance_status,
            urgency: task.urgency,
        };
        task.maintenance_status = MaintenanceStatus::Good;
        task.urgency = Urgency::Low;

        let from = self.counts.bucket(previous.status);
        *from = from.saturating_sub(1);
        if previous.urgency == Urgency::High {
            self.counts.urgent = self.counts.urgent.saturating_sub(1);
        }
        self.counts.completed += 1;
        self.ratios.good_condition_percent = percent(self.counts.completed, self.tasks.len() as u32);
        Ok(())
    }
}
