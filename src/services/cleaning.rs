use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::assignment::AssignmentLookup;
use crate::error::{FleetError, FleetResult};
use crate::models::{CleaningStats, FleetSnapshot, TrainRecord, TrainStatus};

/// Trains whose last clean ended longer ago than this are due again.
pub const CLEAN_AGE_LIMIT_HOURS: f64 = 24.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CleaningStatus {
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
}

impl fmt::Display for CleaningStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CleaningStatus::Pending => "Pending",
            CleaningStatus::InProgress => "In Progress",
            CleaningStatus::Completed => "Completed",
        })
    }
}

struct CleaningRule {
    matches: fn(&CleaningStats) -> bool,
    outcome: CleaningStatus,
}

fn cleaned_and_idle(stats: &CleaningStats) -> bool {
    stats.last_clean_end.is_some() && stats.today_clean_load == 0.0
}

fn load_logged_today(stats: &CleaningStats) -> bool {
    stats.today_clean_load > 0.0
}

fn never_cleaned_or_stale(stats: &CleaningStats) -> bool {
    stats.last_clean_end.is_none() || stats.clean_age_hours > CLEAN_AGE_LIMIT_HOURS
}

// First match wins.
const CLEANING_RULES: [CleaningRule; 3] = [
    CleaningRule {
        matches: cleaned_and_idle,
        outcome: CleaningStatus::Completed,
    },
    CleaningRule {
        matches: load_logged_today,
        outcome: CleaningStatus::InProgress,
    },
    CleaningRule {
        matches: never_cleaned_or_stale,
        outcome: CleaningStatus::Pending,
    },
];

pub fn classify_cleaning(record: &TrainRecord) -> CleaningStatus {
    CLEANING_RULES
        .iter()
        .find(|rule| (rule.matches)(&record.cleaning))
        .map(|rule| rule.outcome)
        .unwrap_or(CleaningStatus::Completed)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleaningCounts {
    pub pending: u32,
    pub in_progress: u32,
    pub completed: u32,
}

impl CleaningCounts {
    fn bucket(&mut self, status: CleaningStatus) -> &mut u32 {
        match status {
            CleaningStatus::Pending => &mut self.pending,
            CleaningStatus::InProgress => &mut self.in_progress,
            CleaningStatus::Completed => &mut self.completed,
        }
    }

    pub fn total(&self) -> u32 {
        self.pending + self.in_progress + self.completed
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CleaningTask {
    pub train_id: String,
    pub status: TrainStatus,
    pub cleaning_status: CleaningStatus,
    pub last_clean_end: Option<DateTime<Utc>>,
    pub clean_age_hours: f64,
    pub today_clean_load: f64,
    pub assigned_to: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CleaningBoard {
    pub created_at: DateTime<Utc>,
    pub tasks: Vec<CleaningTask>,
    pub counts: CleaningCounts,
}

impl CleaningBoard {
    pub fn build(snapshot: &FleetSnapshot, teams: &dyn AssignmentLookup) -> Self {
        let mut counts = CleaningCounts::default();
        let tasks: Vec<CleaningTask> = snapshot
            .records
            .iter()
            .map(|record| {
                let cleaning_status = classify_cleaning(record);
                *counts.bucket(cleaning_status) += 1;
                CleaningTask {
                    train_id: record.train_id.clone(),
                    status: record.status.clone(),
                    cleaning_status,
                    last_clean_end: record.cleaning.last_clean_end,
                    clean_age_hours: record.cleaning.clean_age_hours,
                    today_clean_load: record.cleaning.today_clean_load,
                    assigned_to: teams.cleaning_team(&record.train_id),
                }
            })
            .collect();

        tracing::debug!(
            pending = counts.pending,
            in_progress = counts.in_progress,
            completed = counts.completed,
            "cleaning board built"
        );

        Self {
            created_at: snapshot.created_at,
            tasks,
            counts,
        }
    }

    pub fn task(&self, train_id: &str) -> Option<&CleaningTask> {
        self.tasks.iter().find(|task| task.train_id == train_id)
    }

    /// Marks a train's cleaning as completed and moves it between counters.
    pub fn mark_done(&mut self, train_id: &str) -> FleetResult<()> {
        let task = self
            .tasks
            .iter_mut()
            .find(|task| task.train_id == train_id)
            .ok_or_else(|| FleetError::TrainNotFound(train_id.to_string()))?;
        if task.cleaning_status == CleaningStatus::Completed {
            return Ok(());
        }
        let previous = task.cleaning_status;
        task.cleaning_status = CleaningStatus::Completed;
        let from = self.counts.bucket(previous);
        *from = from.saturating_sub(1);
        self.counts.completed += 1;
        Ok(())
    }
}
