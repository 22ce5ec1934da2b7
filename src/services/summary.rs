use serde::{Deserialize, Serialize};

use crate::error::{FleetError, FleetResult};
use crate::models::{TrainRecord, TrainStatus};

/// Per-status train counts. Trains whose status is not one of the three
/// known values are listed under `Unknown` by id rather than dropped.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSummary {
    #[serde(rename = "Ready")]
    pub ready: u32,
    #[serde(rename = "Standby")]
    pub standby: u32,
    #[serde(rename = "Maintenance")]
    pub maintenance: u32,
    #[serde(rename = "Unknown", default)]
    pub unknown: Vec<String>,
}

impl StatusSummary {
    pub fn new(ready: u32, standby: u32, maintenance: u32) -> Self {
        Self {
            ready,
            standby,
            maintenance,
            unknown: Vec::new(),
        }
    }

    pub fn count(&self, status: &TrainStatus) -> u32 {
        match status {
            TrainStatus::Ready => self.ready,
            TrainStatus::Standby => self.standby,
            TrainStatus::Maintenance => self.maintenance,
            TrainStatus::Other(_) => self.unknown.len() as u32,
        }
    }

    /// Trains with a known status.
    pub fn fleet_size(&self) -> u32 {
        self.ready.saturating_add(self.standby).saturating_add(self.maintenance)
    }

    pub fn share_percent(&self, status: &TrainStatus) -> f64 {
        percent(self.count(status), self.fleet_size())
    }

    fn record(&mut self, record: &TrainRecord) -> Result<(), String> {
        match &record.status {
            TrainStatus::Ready => self.ready += 1,
            TrainStatus::Standby => self.standby += 1,
            TrainStatus::Maintenance => self.maintenance += 1,
            TrainStatus::Other(raw) => return Err(raw.clone()),
        }
        Ok(())
    }
}

/// `part / whole * 100`, or 0 when there is nothing to divide by.
pub fn percent(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64 * 100.0
}

pub fn summarize(records: &[TrainRecord]) -> StatusSummary {
    let mut summary = StatusSummary::default();
    for record in records {
        if let Err(status) = summary.record(record) {
            tracing::warn!(train_id = %record.train_id, status = %status, "train has unrecognised status");
            summary.unknown.push(record.train_id.clone());
        }
    }
    tracing::debug!(
        ready = summary.ready,
        standby = summary.standby,
        maintenance = summary.maintenance,
        unknown = summary.unknown.len(),
        "status summary computed"
    );
    summary
}

pub fn summarize_strict(records: &[TrainRecord]) -> FleetResult<StatusSummary> {
    let mut summary = StatusSummary::default();
    for record in records {
        summary.record(record).map_err(|status| FleetError::UnknownStatus {
            train_id: record.train_id.clone(),
            status,
        })?;
    }
    Ok(summary)
}
