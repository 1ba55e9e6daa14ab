use std::collections::BTreeMap;
use std::time::Duration;

use distroplan::entities::FleetEntry;
use distroplan::planning::Scenario;
use distroplan::util::{AllocationConfig, ForecastConfig, RoutingConfig};
use serde::{Deserialize, Serialize};

use crate::simulator::SimulatorConfig;

/// Configuration of a full planning run
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct DpoConfig {
    pub forecast: ForecastConfig,
    pub allocation: AllocationConfig,
    pub routing: RoutingConfig,
    /// Vehicles per warehouse
    pub fleet: BTreeMap<String, FleetEntry>,
    /// Wall-clock limit for every LP solve
    pub solver_time_limit_secs: u64,
    /// What-if perturbation solved next to the baseline allocation
    pub scenario: Option<Scenario>,
    /// Used only when no demand or supply file is given
    pub simulator: SimulatorConfig,
}

impl DpoConfig {
    pub fn solver_time_limit(&self) -> Duration {
        Duration::from_secs(self.solver_time_limit_secs)
    }
}

impl Default for DpoConfig {
    fn default() -> Self {
        let entry = |num_vehicles, capacity| FleetEntry {
            num_vehicles,
            capacity,
        };
        Self {
            forecast: ForecastConfig::default(),
            // the simulated network's longest lane costs 56.7 per unit, so the penalty is raised above it
            allocation: AllocationConfig {
                stockout_penalty: 100.0,
                ..AllocationConfig::default()
            },
            routing: RoutingConfig::default(),
            fleet: BTreeMap::from([("W1".to_string(), entry(3, 120.0)), ("W2".to_string(), entry(2, 120.0))]),
            solver_time_limit_secs: 60,
            scenario: Some(Scenario {
                demand_multiplier: BTreeMap::from([
                    ("Mumbai".to_string(), 1.2),
                    ("Pune".to_string(), 1.1),
                    ("Delhi".to_string(), 0.9),
                ]),
                warehouse_multiplier: BTreeMap::from([("W1".to_string(), 0.9), ("W2".to_string(), 1.0)]),
            }),
            simulator: SimulatorConfig::default(),
        }
    }
}
