use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use crate::error::FleetResult;

/// Source of crew assignments for the task boards.
pub trait AssignmentLookup: Send + Sync {
    fn cleaning_team(&self, train_id: &str) -> Option<String>;
    fn maintenance_team(&self, train_id: &str) -> Option<String>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Unassigned;

impl AssignmentLookup for Unassigned {
    fn cleaning_team(&self, _train_id: &str) -> Option<String> {
        None
    }

    fn maintenance_team(&self, _train_id: &str) -> Option<String> {
        None
    }
}

/// Explicit train-to-team table.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct TeamRoster {
    #[serde(default)]
    cleaning: HashMap<String, String>,
    #[serde(default)]
    maintenance: HashMap<String, String>,
}

impl TeamRoster {
    pub fn new(cleaning: HashMap<String, String>, maintenance: HashMap<String, String>) -> Self {
        Self { cleaning, maintenance }
    }

    pub fn from_json_str(raw: &str) -> FleetResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn load(path: &Path) -> FleetResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn assign_cleaning(&mut self, train_id: &str, team: &str) {
        self.cleaning.insert(train_id.to_string(), team.to_string());
    }

    pub fn assign_maintenance(&mut self, train_id: &str, team: &str) {
        self.maintenance.insert(train_id.to_string(), team.to_string());
    }
}

impl AssignmentLookup for TeamRoster {
    fn cleaning_team(&self, train_id: &str) -> Option<String> {
        self.cleaning.get(train_id).cloned()
    }

    fn maintenance_team(&self, train_id: &str) -> Option<String> {
        self.maintenance.get(train_id).cloned()
    }
}
