use std::collections::BTreeMap;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::entities::{ForecastTable, ShipmentPlan, SupplyTable};
use crate::error::{PlanError, RecordKey, Stage};
use crate::lp::LpSolver;
use crate::planning::allocation::{AllocationInput, solve_allocation};
use crate::util::AllocationConfig;

/// What-if perturbation of the allocation inputs.
/// Entities absent from a map keep a multiplier of 1.0.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Scenario {
    /// Multiplier on `demand_p90` per city
    #[serde(default)]
    pub demand_multiplier: BTreeMap<String, f64>,
    /// Multiplier on `available_inventory` per warehouse
    #[serde(default)]
    pub warehouse_multiplier: BTreeMap<String, f64>,
}

impl Scenario {
    pub fn demand_factor(&self, city: &str) -> f64 {
        self.demand_multiplier.get(city).copied().unwrap_or(1.0)
    }

    pub fn inventory_factor(&self, warehouse: &str) -> f64 {
        self.warehouse_multiplier.get(warehouse).copied().unwrap_or(1.0)
    }

    fn validate(&self) -> Result<(), PlanError> {
        for (city, m) in &self.demand_multiplier {
            if !m.is_finite() || *m < 0.0 {
                return Err(PlanError::invalid(
                    "scenario",
                    RecordKey::city(city),
                    format!("demand multiplier must be finite and non-negative, got {m}"),
                ));
            }
        }
        for (warehouse, m) in &self.warehouse_multiplier {
            if !m.is_finite() || *m < 0.0 {
                return Err(PlanError::invalid(
                    "scenario",
                    RecordKey::warehouse(warehouse),
                    format!("inventory multiplier must be finite and non-negative, got {m}"),
                ));
            }
        }
        Ok(())
    }
}

/// [`AllocationPlanner`](crate::planning::AllocationPlanner) run on a rescaled private copy of its inputs:
/// `demand_p90[c, d] *= demand_multiplier[c]` and `available_inventory[w] *= warehouse_multiplier[w]`.
///
/// The source tables are only read, so a baseline allocation may run on them concurrently.
pub struct ScenarioAllocationPlanner<S> {
    config: AllocationConfig,
    scenario: Scenario,
    solver: S,
}

impl<S: LpSolver> ScenarioAllocationPlanner<S> {
    pub fn new(config: AllocationConfig, scenario: Scenario, solver: S) -> Self {
        Self {
            config,
            scenario,
            solver,
        }
    }

    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    pub fn plan(&self, forecast: &ForecastTable, supply: &SupplyTable) -> Result<ShipmentPlan, PlanError> {
        self.scenario.validate()?;

        let mut input = AllocationInput::new(forecast, supply);

        for city in self.scenario.demand_multiplier.keys() {
            if forecast.cities().all(|c| c != city) {
                warn!("[SCEN] demand multiplier for unknown city {city} ignored");
            }
        }
        for warehouse in self.scenario.warehouse_multiplier.keys() {
            if supply.inventory(warehouse).is_none() {
                warn!("[SCEN] inventory multiplier for unknown warehouse {warehouse} ignored");
            }
        }

        for (&(city, _), target) in input.targets.iter_mut() {
            *target *= self.scenario.demand_factor(city);
        }
        for (&warehouse, inventory) in input.inventory.iter_mut() {
            *inventory *= self.scenario.inventory_factor(warehouse);
        }

        info!(
            "[SCEN] running allocation with {} demand and {} inventory multipliers",
            self.scenario.demand_multiplier.len(),
            self.scenario.warehouse_multiplier.len()
        );

        solve_allocation(Stage::Scenario, &input, &self.config, &self.solver)
    }
}
