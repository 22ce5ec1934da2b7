use super::summary::StatusSummary;
use crate::models::scenario::{ScenarioDelta, ScenarioKind, ScenarioResult, SimulationParameters, SimulationReport};

/// Share of the fleet taken out of service by the emergency scenario.
pub const EMERGENCY_OUTAGE_RATIO: f64 = 0.15;
pub const OPTIMIZED_READY_CAP_RATIO: f64 = 0.8;
pub const OPTIMIZED_MAINTENANCE_FLOOR: i64 = 2;

/// Baseline counts every scenario is projected from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Baseline {
    ready: i64,
    standby: i64,
    maintenance: i64,
}

impl Baseline {
    fn fleet_size(&self) -> i64 {
        self.ready + self.standby + self.maintenance
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Projection {
    ready: i64,
    standby: i64,
    maintenance: i64,
    denominator: i64,
}

fn floor(value: f64) -> i64 {
    if value.is_finite() {
        value.floor() as i64
    } else {
        0
    }
}

fn ratio(part: f64, percent: f64) -> i64 {
    floor(part * percent / 100.0)
}

fn project(kind: ScenarioKind, base: Baseline, params: &SimulationParameters) -> Projection {
    let fleet = base.fleet_size();
    // Parameters are unbounded, so every step saturates instead of overflowing.
    match kind {
        ScenarioKind::CurrentState => Projection {
            ready: base.ready,
            standby: base.standby,
            maintenance: base.maintenance,
            denominator: fleet,
        },
        ScenarioKind::PeakHoursDemand => {
            let peak_demand = floor(base.ready as f64 * params.peak_hours_multiplier);
            let shortfall = peak_demand.saturating_sub(base.ready).max(0);
            let from_standby = shortfall.min(base.standby);
            Projection {
                ready: base.ready.saturating_add(from_standby),
                standby: base.standby.saturating_sub(from_standby),
                maintenance: base.maintenance,
                denominator: peak_demand,
            }
        }
        ScenarioKind::MaintenanceReduction => {
            let improvement = ratio(base.maintenance as f64, params.maintenance_reduction_percent);
            let ready = base.ready.saturating_add(floor(0.7 * improvement as f64));
            let standby = base.standby.saturating_add(floor(0.3 * improvement as f64));
            Projection {
                ready,
                standby,
                maintenance: base.maintenance.saturating_sub(improvement),
                denominator: fleet,
            }
        }
        ScenarioKind::CleaningEfficiency => {
            let gain = ratio(fleet as f64, params.cleaning_efficiency_gain_percent);
            let half_gain = floor(0.5 * gain as f64);
            let ready = fleet.min(base.ready.saturating_add(half_gain));
            let standby = fleet
                .saturating_sub(ready)
                .saturating_sub(base.maintenance)
                .min(base.standby.saturating_add(half_gain));
            Projection {
                ready,
                standby,
                maintenance: base.maintenance,
                denominator: fleet,
            }
        }
        ScenarioKind::EmergencyResponse => {
            let outage = floor(fleet as f64 * EMERGENCY_OUTAGE_RATIO);
            let ready = base.ready.saturating_sub(outage).max(0);
            Projection {
                ready,
                standby: base.standby,
                maintenance: base.maintenance.saturating_add(outage),
                denominator: fleet,
            }
        }
        ScenarioKind::FullyOptimized => {
            let cap = floor(fleet as f64 * OPTIMIZED_READY_CAP_RATIO);
            let released = floor(0.2 * base.maintenance as f64);
            let ready = cap.min(
                base.ready
                    .saturating_add(released)
                    .saturating_add(floor(fleet as f64 * 0.1)),
            );
            let maintenance = OPTIMIZED_MAINTENANCE_FLOOR.max(base.maintenance.saturating_sub(released));
            let standby = fleet.saturating_sub(ready).saturating_sub(maintenance);
            Projection {
                ready,
                standby,
                maintenance,
                denominator: fleet,
            }
        }
    }
}

/// Serving trains as a percentage of the scenario's demand; 0 when the
/// denominator is empty or negative.
fn efficiency(serving: i64, denominator: i64) -> f64 {
    if denominator <= 0 {
        return 0.0;
    }
    let value = serving.max(0) as f64 / denominator as f64 * 100.0;
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}

fn count(value: i64) -> u32 {
    value.clamp(0, u32::MAX as i64) as u32
}

fn to_result(kind: ScenarioKind, projection: Projection) -> ScenarioResult {
    let ready = count(projection.ready);
    let standby = count(projection.standby);
    let maintenance = count(projection.maintenance);
    let total_available = ready.saturating_add(standby);
    // The scenario table divides ready + standby by peak demand, but the worked
    // example (18/4/3 at 1.2 gives 21/21 = 100%) counts ready only. The worked
    // example wins: standby is not serving during the peak.
    let serving = match kind {
        ScenarioKind::PeakHoursDemand => ready,
        _ => total_available,
    };
    ScenarioResult {
        kind,
        scenario: kind.name().to_string(),
        ready,
        standby,
        maintenance,
        total_available,
        efficiency: efficiency(serving as i64, projection.denominator),
        recommendations: kind.recommendations().iter().map(|s| s.to_string()).collect(),
        impacts: kind.impacts(),
        delta: ScenarioDelta::default(),
    }
}

/// Projects the fleet under every scenario. The first entry is always the
/// unchanged current state; deltas of later entries are taken against it.
pub fn simulate(summary: &StatusSummary, params: &SimulationParameters) -> Vec<ScenarioResult> {
    let base = Baseline {
        ready: summary.ready as i64,
        standby: summary.standby as i64,
        maintenance: summary.maintenance as i64,
    };

    let mut results: Vec<ScenarioResult> = ScenarioKind::ALL
        .iter()
        .map(|&kind| to_result(kind, project(kind, base, params)))
        .collect();

    let baseline = results[0].clone();
    for result in results.iter_mut().skip(1) {
        result.delta = ScenarioDelta {
            ready: result.ready as i64 - baseline.ready as i64,
            standby: result.standby as i64 - baseline.standby as i64,
            maintenance: result.maintenance as i64 - baseline.maintenance as i64,
            total_available: result.total_available as i64 - baseline.total_available as i64,
            efficiency: result.efficiency - baseline.efficiency,
        };
    }

    tracing::debug!(fleet_size = base.fleet_size(), scenarios = results.len(), "simulation complete");
    results
}

/// The non-baseline scenario with the most available trains; earliest wins ties.
pub fn best_scenario(results: &[ScenarioResult]) -> Option<&ScenarioResult> {
    results.iter().skip(1).fold(None, |best: Option<&ScenarioResult>, candidate| match best {
        Some(current) if current.total_available >= candidate.total_available => Some(current),
        _ => Some(candidate),
    })
}

pub fn run(summary: &StatusSummary, params: &SimulationParameters) -> SimulationReport {
    let scenarios = simulate(summary, params);
    let best = best_scenario(&scenarios).map(|result| result.scenario.clone());
    SimulationReport {
        fleet_size: summary.fleet_size(),
        parameters: params.clone(),
        scenarios,
        best_scenario: best,
    }
}
