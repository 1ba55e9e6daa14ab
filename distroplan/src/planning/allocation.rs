use std::collections::{BTreeMap, HashMap};

use itertools::Itertools;
use log::{info, warn};
use thousands::Separable;

use crate::entities::{ForecastTable, ShipmentPlan, ShipmentPlanRecord, SupplyTable};
use crate::error::{PlanError, RecordKey, Stage};
use crate::lp::{LinearProgram, LpSolver, Sense, VarKey};
use crate::util::{AllocationConfig, FPA, assertions, tolerance_for};

/// Allocates warehouse inventory to cities over the forecast horizon.
///
/// Minimises `Σ ship·(cost + λ·co2) + μ·Σ unmet` subject to
/// * coverage: for every (city, day), `Σ_w ship[w, city, day] + unmet[city, day] >= demand_p90`
/// * capacity: for every (warehouse, day), `Σ_c ship[warehouse, c, day] <= available_inventory`
///
/// The same static inventory bounds every day of the horizon; it is not depleted across days.
pub struct AllocationPlanner<S> {
    config: AllocationConfig,
    solver: S,
}

impl<S: LpSolver> AllocationPlanner<S> {
    pub fn new(config: AllocationConfig, solver: S) -> Self {
        Self { config, solver }
    }

    pub fn config(&self) -> &AllocationConfig {
        &self.config
    }

    /// Solves the allocation LP. Any status other than optimal is returned as [`PlanError::SolverStatus`].
    pub fn plan(&self, forecast: &ForecastTable, supply: &SupplyTable) -> Result<ShipmentPlan, PlanError> {
        let input = AllocationInput::new(forecast, supply);
        solve_allocation(Stage::Allocation, &input, &self.config, &self.solver)
    }
}

/// Coverage targets and inventories the allocation LP is formulated over.
/// Owned copies, so a scenario can rescale them without touching the source tables.
pub(crate) struct AllocationInput<'a> {
    pub supply: &'a SupplyTable,
    /// demand_p90 per (city, day)
    pub targets: BTreeMap<(&'a str, u32), f64>,
    pub inventory: BTreeMap<&'a str, f64>,
}

impl<'a> AllocationInput<'a> {
    pub fn new(forecast: &'a ForecastTable, supply: &'a SupplyTable) -> Self {
        Self {
            supply,
            targets: forecast
                .records()
                .map(|r| ((r.city.as_str(), r.day), r.demand_p90))
                .collect(),
            inventory: supply.warehouses().collect(),
        }
    }

    pub fn targets_city(&self, city: &str) -> bool {
        self.targets.keys().any(|&(c, _)| c == city)
    }
}

/// The stockout penalty must exceed the effective unit cost of every lane that receives variables,
/// i.e. every lane whose city has a coverage target.
pub(crate) fn validate_config(config: &AllocationConfig, input: &AllocationInput) -> Result<(), PlanError> {
    let AllocationConfig {
        emission_weight,
        stockout_penalty,
    } = *config;
    if !emission_weight.is_finite() || emission_weight < 0.0 {
        return Err(PlanError::config(
            RecordKey::default(),
            format!("emission weight must be finite and non-negative, got {emission_weight}"),
        ));
    }
    let costliest = input
        .supply
        .costliest_lane(emission_weight, |l| input.targets_city(&l.city));
    if let Some(lane) = costliest {
        let max_cost = lane.effective_unit_cost(emission_weight);
        if !stockout_penalty.is_finite() || stockout_penalty <= max_cost {
            return Err(PlanError::config(
                RecordKey::warehouse(&lane.warehouse).with_city(&lane.city),
                format!(
                    "stockout penalty {stockout_penalty} does not exceed the effective unit cost {max_cost:.3} of this lane"
                ),
            ));
        }
    }
    Ok(())
}

pub(crate) fn solve_allocation(
    stage: Stage,
    input: &AllocationInput,
    config: &AllocationConfig,
    solver: &impl LpSolver,
) -> Result<ShipmentPlan, PlanError> {
    validate_config(config, input)?;

    let days_per_city: HashMap<&str, Vec<u32>> = input.targets.keys().copied().into_group_map();

    let mut lp = LinearProgram::new(match stage {
        Stage::Scenario => "shipment_plan_scenario",
        _ => "shipment_plan",
    });
    let mut objective = vec![];

    let mut ship: BTreeMap<(&str, &str, u32), VarKey> = BTreeMap::new();
    for lane in input.supply.lanes() {
        let (w, c) = (lane.warehouse.as_str(), lane.city.as_str());
        let Some(days) = days_per_city.get(c) else {
            warn!("[{}] no forecast for city {c}, lane from {w} left unused", tag(stage));
            continue;
        };
        let unit_cost = lane.effective_unit_cost(config.emission_weight);
        for &day in days {
            let key = lp.add_variable(format!("ship_{w}_{c}_{day}"), 0.0, f64::INFINITY);
            ship.insert((w, c, day), key);
            objective.push((key, unit_cost));
        }
    }

    let unmet: BTreeMap<(&str, u32), VarKey> = input
        .targets
        .keys()
        .map(|&(c, d)| ((c, d), lp.add_variable(format!("unmet_{c}_{d}"), 0.0, f64::INFINITY)))
        .collect();
    objective.extend(unmet.values().map(|&k| (k, config.stockout_penalty)));
    lp.set_objective(objective);

    let ship_into: HashMap<(&str, u32), Vec<VarKey>> =
        ship.iter().map(|(&(_, c, d), &k)| ((c, d), k)).into_group_map();
    let ship_from: BTreeMap<(&str, u32), Vec<VarKey>> = ship
        .iter()
        .map(|(&(w, _, d), &k)| ((w, d), k))
        .into_group_map()
        .into_iter()
        .collect();

    for (&(c, d), &target) in &input.targets {
        if !ship_into.contains_key(&(c, d)) {
            warn!("[{}] city {c} has no supply lane on day {d}, demand can only go unmet", tag(stage));
        }
        let terms = ship_into
            .get(&(c, d))
            .into_iter()
            .flatten()
            .map(|&k| (k, 1.0))
            .chain([(unmet[&(c, d)], 1.0)]);
        lp.add_constraint(format!("coverage_{c}_{d}"), terms, Sense::Geq, target);
    }

    for (&(w, d), keys) in &ship_from {
        lp.add_constraint(
            format!("capacity_{w}_{d}"),
            keys.iter().map(|&k| (k, 1.0)),
            Sense::Leq,
            input.inventory[w],
        );
    }

    info!(
        "[{}] formulated {} variables and {} constraints over {} (city, day) targets",
        tag(stage),
        lp.n_variables().separate_with_commas(),
        lp.n_constraints().separate_with_commas(),
        input.targets.len().separate_with_commas()
    );

    let solution = solver.solve(&lp);
    if !solution.is_optimal() {
        return Err(PlanError::SolverStatus {
            stage,
            status: solution.status,
            detail: format!(
                "{} variables, {} constraints; no shipment plan produced",
                lp.n_variables(),
                lp.n_constraints()
            ),
        });
    }

    // coverage and capacity re-checked on the solved values
    for (&(c, d), &target) in &input.targets {
        let covered = ship_into
            .get(&(c, d))
            .into_iter()
            .flatten()
            .map(|&k| solution.value(k))
            .sum::<f64>()
            + solution.value(unmet[&(c, d)]);
        if covered < target - tolerance_for(target) {
            return Err(PlanError::Consistency {
                stage,
                key: RecordKey::city(c).with_day(d),
                expected: target,
                actual: covered,
            });
        }
    }
    for (&(w, d), keys) in &ship_from {
        let shipped = keys.iter().map(|&k| solution.value(k)).sum::<f64>();
        let inventory = input.inventory[w];
        if FPA(shipped) > FPA(inventory + tolerance_for(inventory)) {
            return Err(PlanError::Consistency {
                stage,
                key: RecordKey::warehouse(w).with_day(d),
                expected: inventory,
                actual: shipped,
            });
        }
    }

    let records = ship
        .iter()
        .map(|(&(w, c, d), &k)| ShipmentPlanRecord {
            warehouse: w.to_string(),
            city: c.to_string(),
            day: d,
            shipped_qty: solution.value(k).max(0.0),
            unmet_demand: solution.value(unmet[&(c, d)]).max(0.0),
        })
        .collect_vec();

    let objective_value = solution.objective_value.unwrap_or_else(|| lp.objective_value(&solution.values));
    let plan = ShipmentPlan::new(records, objective_value);
    debug_assert!(stage != Stage::Allocation || assertions::plan_respects_inventory(&plan, input.supply));

    let total_unmet = unmet.values().map(|&k| solution.value(k)).sum::<f64>();
    info!(
        "[{}] optimal plan: objective {:.3}, shipped {:.2} units, unmet {:.2} units",
        tag(stage),
        objective_value,
        plan.total_shipped(),
        total_unmet
    );

    Ok(plan)
}

fn tag(stage: Stage) -> &'static str {
    match stage {
        Stage::Scenario => "SCEN",
        _ => "ALLOC",
    }
}
