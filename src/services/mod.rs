pub mod assignment;
pub mod cleaning;
pub mod dashboard;
pub mod maintenance;
pub mod simulation;
pub mod summary;

use std::sync::Arc;

use crate::config::Settings;
use assignment::AssignmentLookup;
use dashboard::SnapshotStore;

pub use assignment::{TeamRoster, Unassigned};
pub use cleaning::{classify_cleaning, CleaningBoard, CleaningStatus};
pub use dashboard::DashboardReport;
pub use maintenance::{classify_maintenance, MaintenanceBoard, MaintenanceStatus, Urgency};
pub use simulation::simulate;
pub use summary::{summarize, summarize_strict, StatusSummary};

pub struct AppState {
    pub settings: Settings,
    pub snapshots: SnapshotStore,
    pub teams: Arc<dyn AssignmentLookup>,
}

impl AppState {
    pub fn new(settings: Settings, snapshots: SnapshotStore, teams: Arc<dyn AssignmentLookup>) -> Self {
        Self {
            settings,
            snapshots,
            teams,
        }
    }
}
