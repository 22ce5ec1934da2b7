pub mod scenario;
pub mod snapshot;
pub mod train;

pub use scenario::{ParameterOverrides, ScenarioKind, ScenarioResult, SimulationParameters, SimulationReport};
pub use snapshot::{FleetSnapshot, RecordIssue, SnapshotLoad};
pub use train::{CleaningStats, MaintenanceStats, TrainRecord, TrainStatus};
