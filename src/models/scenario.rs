use serde::{Deserialize, Serialize};

/// Tunables for the what-if simulator. No field is range-checked; the
/// scenario formulas clamp where they need to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParameters {
    #[serde(alias = "demandIncreasePercent")]
    pub demand_increase_percent: f64,
    #[serde(alias = "maintenanceReductionPercent")]
    pub maintenance_reduction_percent: f64,
    #[serde(alias = "cleaningEfficiencyGainPercent")]
    pub cleaning_efficiency_gain_percent: f64,
    #[serde(alias = "emergencyReservePercent")]
    pub emergency_reserve_percent: f64,
    #[serde(alias = "peakHoursMultiplier")]
    pub peak_hours_multiplier: f64,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            demand_increase_percent: 20.0,
            maintenance_reduction_percent: 20.0,
            cleaning_efficiency_gain_percent: 15.0,
            emergency_reserve_percent: 15.0,
            peak_hours_multiplier: 1.2,
        }
    }
}

/// Request-side overrides; unset fields fall back to a base parameter set.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ParameterOverrides {
    #[serde(default, alias = "demandIncreasePercent")]
    pub demand_increase_percent: Option<f64>,
    #[serde(default, alias = "maintenanceReductionPercent")]
    pub maintenance_reduction_percent: Option<f64>,
    #[serde(default, alias = "cleaningEfficiencyGainPercent")]
    pub cleaning_efficiency_gain_percent: Option<f64>,
    #[serde(default, alias = "emergencyReservePercent")]
    pub emergency_reserve_percent: Option<f64>,
    #[serde(default, alias = "peakHoursMultiplier")]
    pub peak_hours_multiplier: Option<f64>,
}

impl ParameterOverrides {
    pub fn apply(&self, base: &SimulationParameters) -> SimulationParameters {
        SimulationParameters {
            demand_increase_percent: self.demand_increase_percent.unwrap_or(base.demand_increase_percent),
            maintenance_reduction_percent: self
                .maintenance_reduction_percent
                .unwrap_or(base.maintenance_reduction_percent),
            cleaning_efficiency_gain_percent: self
                .cleaning_efficiency_gain_percent
                .unwrap_or(base.cleaning_efficiency_gain_percent),
            emergency_reserve_percent: self.emergency_reserve_percent.unwrap_or(base.emergency_reserve_percent),
            peak_hours_multiplier: self.peak_hours_multiplier.unwrap_or(base.peak_hours_multiplier),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScenarioKind {
    CurrentState,
    PeakHoursDemand,
    MaintenanceReduction,
    CleaningEfficiency,
    EmergencyResponse,
    FullyOptimized,
}

/// Informational percentage deltas shown next to each scenario.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScenarioImpacts {
    pub cleaning: f64,
    pub maintenance: f64,
    pub allocation: f64,
}

impl ScenarioKind {
    pub const ALL: [ScenarioKind; 6] = [
        ScenarioKind::CurrentState,
        ScenarioKind::PeakHoursDemand,
        ScenarioKind::MaintenanceReduction,
        ScenarioKind::CleaningEfficiency,
        ScenarioKind::EmergencyResponse,
        ScenarioKind::FullyOptimized,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ScenarioKind::CurrentState => "Current State",
            ScenarioKind::PeakHoursDemand => "Peak Hours Demand",
            ScenarioKind::MaintenanceReduction => "Maintenance Reduction",
            ScenarioKind::CleaningEfficiency => "Cleaning Efficiency",
            ScenarioKind::EmergencyResponse => "Emergency Response (15% outage)",
            ScenarioKind::FullyOptimized => "Fully Optimized",
        }
    }

    pub fn recommendations(self) -> &'static [&'static str] {
        match self {
            ScenarioKind::CurrentState => &[
                "Maintain current allocation strategy",
                "Monitor fitness certificate expiries daily",
            ],
            ScenarioKind::PeakHoursDemand => &[
                "Deploy standby trains to cover the peak-hour shortfall",
                "Defer non-critical cleaning to off-peak windows",
                "Increase depot staffing during peak transitions",
            ],
            ScenarioKind::MaintenanceReduction => &[
                "Prioritize preventive maintenance on high-mileage trains",
                "Fast-track closure of long-running work orders",
            ],
            ScenarioKind::CleaningEfficiency => &[
                "Rotate cleaning crews across stabling lines",
                "Schedule heavy cleaning during night stabling",
            ],
            ScenarioKind::EmergencyResponse => &[
                "Activate the emergency reserve protocol",
                "Reassign standby trains to critical routes",
                "Escalate maintenance crews for rapid turnaround",
            ],
            ScenarioKind::FullyOptimized => &[
                "Combine maintenance and cleaning improvements",
                "Re-rank induction order by priority score",
            ],
        }
    }

    pub fn impacts(self) -> ScenarioImpacts {
        let (cleaning, maintenance, allocation) = match self {
            ScenarioKind::CurrentState => (0.0, 0.0, 0.0),
            ScenarioKind::PeakHoursDemand => (-10.0, -5.0, 15.0),
            ScenarioKind::MaintenanceReduction => (0.0, -20.0, 10.0),
            ScenarioKind::CleaningEfficiency => (25.0, 0.0, 8.0),
            ScenarioKind::EmergencyResponse => (-15.0, 30.0, -15.0),
            ScenarioKind::FullyOptimized => (20.0, -25.0, 20.0),
        };
        ScenarioImpacts {
            cleaning,
            maintenance,
            allocation,
        }
    }
}

/// Change of a scenario against the "Current State" baseline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioDelta {
    pub ready: i64,
    pub standby: i64,
    pub maintenance: i64,
    pub total_available: i64,
    pub efficiency: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub kind: ScenarioKind,
    pub scenario: String,
    pub ready: u32,
    pub standby: u32,
    pub maintenance: u32,
    pub total_available: u32,
    pub efficiency: f64,
    pub recommendations: Vec<String>,
    pub impacts: ScenarioImpacts,
    pub delta: ScenarioDelta,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub fleet_size: u32,
    pub parameters: SimulationParameters,
    pub scenarios: Vec<ScenarioResult>,
    pub best_scenario: Option<String>,
}
