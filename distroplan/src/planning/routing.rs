use std::collections::{BTreeMap, HashMap};

use itertools::Itertools;
use log::{info, warn};
use thousands::Separable;

use crate::entities::{FleetConfig, RoutePlan, RouteRecord, ShipmentPlan, SupplyTable, Vehicle};
use crate::error::{PlanError, RecordKey, Stage};
use crate::lp::{LinearProgram, LpSolver, Sense, SolveStatus, VarKey};
use crate::util::{RoutingConfig, TOLERANCE, assertions, tolerance_for};

/// Decomposes a solved [`ShipmentPlan`] across each warehouse's vehicles.
///
/// Minimises `Σ ship_v·distance_km·co2_per_km_per_unit` subject to
/// * reproduction: for every plan row (w, c, d), `Σ_v ship_v[w, v, c, d] == shipped_qty`
/// * capacity: for every vehicle and day, `Σ_c ship_v[w, v, c, d] <= capacity`
///
/// Quantities are never truncated: a fleet too small for a day's volume makes the LP infeasible.
pub struct RoutePlanner<S> {
    config: RoutingConfig,
    fleet: FleetConfig,
    solver: S,
}

impl<S: LpSolver> RoutePlanner<S> {
    pub fn new(config: RoutingConfig, fleet: FleetConfig, solver: S) -> Self {
        Self {
            config,
            fleet,
            solver,
        }
    }

    pub fn fleet(&self) -> &FleetConfig {
        &self.fleet
    }

    pub fn plan(&self, shipments: &ShipmentPlan, supply: &SupplyTable) -> Result<RoutePlan, PlanError> {
        let co2_factor = self.config.co2_per_km_per_unit;
        if !co2_factor.is_finite() || co2_factor < 0.0 {
            return Err(PlanError::config(
                RecordKey::default(),
                format!("co2 per km per unit must be finite and non-negative, got {co2_factor}"),
            ));
        }

        let fleets: BTreeMap<&str, Vec<Vehicle>> = shipments
            .records()
            .iter()
            .map(|r| r.warehouse.as_str())
            .unique()
            .map(|w| Ok((w, self.fleet.vehicles(w)?)))
            .collect::<Result<_, PlanError>>()?;

        let mut lp = LinearProgram::new("vehicle_routes");
        let mut objective = vec![];
        let mut ship_v: BTreeMap<(&str, &str, &str, u32), VarKey> = BTreeMap::new();
        let mut reproduce: Vec<(RecordKey, Vec<VarKey>, f64)> = vec![];

        for row in shipments.records() {
            let (w, c, d) = (row.warehouse.as_str(), row.city.as_str(), row.day);
            let key = || RecordKey::warehouse(w).with_city(c).with_day(d);
            let lane = supply.lane(w, c).ok_or_else(|| {
                PlanError::invalid("supply", key(), "shipment on a lane without distance")
            })?;
            let unit_emissions = lane.distance_km * co2_factor;

            let vehicles = &fleets[w];
            if vehicles.is_empty() {
                if row.shipped_qty > TOLERANCE {
                    return Err(PlanError::SolverStatus {
                        stage: Stage::Routing,
                        status: SolveStatus::Infeasible,
                        detail: format!("{} requires {:.3} units but owns no vehicles", key(), row.shipped_qty),
                    });
                }
                continue;
            }

            let keys = vehicles
                .iter()
                .map(|v| {
                    let k = lp.add_variable(format!("ship_{}_{c}_{d}", v.id), 0.0, f64::INFINITY);
                    ship_v.insert((w, v.id.as_str(), c, d), k);
                    objective.push((k, unit_emissions));
                    k
                })
                .collect_vec();
            lp.add_constraint(
                format!("reproduce_{w}_{c}_{d}"),
                keys.iter().map(|&k| (k, 1.0)),
                Sense::Eq,
                row.shipped_qty,
            );
            reproduce.push((key(), keys, row.shipped_qty));
        }
        lp.set_objective(objective);

        let capacities: HashMap<&str, f64> = fleets
            .values()
            .flatten()
            .map(|v| (v.id.as_str(), v.capacity))
            .collect();
        let loads: BTreeMap<(&str, &str, u32), Vec<VarKey>> = ship_v
            .iter()
            .map(|(&(w, v, _, d), &k)| ((w, v, d), k))
            .into_group_map()
            .into_iter()
            .collect();
        for (&(_, v, d), keys) in &loads {
            lp.add_constraint(
                format!("capacity_{v}_{d}"),
                keys.iter().map(|&k| (k, 1.0)),
                Sense::Leq,
                capacities[v],
            );
        }

        info!(
            "[ROUTE] formulated {} variables and {} constraints for {} vehicles",
            lp.n_variables().separate_with_commas(),
            lp.n_constraints().separate_with_commas(),
            capacities.len()
        );

        let solution = self.solver.solve(&lp);
        if !solution.is_optimal() {
            let overloaded = self.overloaded_days(shipments);
            if solution.status == SolveStatus::Infeasible && !overloaded.is_empty() {
                warn!("[ROUTE] fleet capacity exceeded: {}", overloaded.join("; "));
            }
            return Err(PlanError::SolverStatus {
                stage: Stage::Routing,
                status: solution.status,
                detail: match overloaded.is_empty() {
                    true => "no route plan produced".to_string(),
                    false => format!("fleet capacity exceeded: {}", overloaded.join("; ")),
                },
            });
        }

        for (key, keys, required) in &reproduce {
            let delivered = keys.iter().map(|&k| solution.value(k)).sum::<f64>();
            if (delivered - required).abs() > tolerance_for(*required) {
                return Err(PlanError::Consistency {
                    stage: Stage::Routing,
                    key: key.clone(),
                    expected: *required,
                    actual: delivered,
                });
            }
        }
        for (&(w, v, d), keys) in &loads {
            let load = keys.iter().map(|&k| solution.value(k)).sum::<f64>();
            let capacity = capacities[v];
            if load > capacity + tolerance_for(capacity) {
                return Err(PlanError::Consistency {
                    stage: Stage::Routing,
                    key: RecordKey::warehouse(w).with_day(d),
                    expected: capacity,
                    actual: load,
                });
            }
        }

        let records = ship_v
            .iter()
            .map(|(&(w, v, c, d), &k)| RouteRecord {
                day: d,
                warehouse: w.to_string(),
                vehicle: v.to_string(),
                city: c.to_string(),
                shipped_qty: solution.value(k).max(0.0),
            })
            .collect_vec();

        let total_emissions = solution
            .objective_value
            .unwrap_or_else(|| lp.objective_value(&solution.values));
        info!(
            "[ROUTE] optimal routes: {} rows, total emissions {:.3}",
            records.len().separate_with_commas(),
            total_emissions
        );

        let routes = RoutePlan::new(records, total_emissions);
        debug_assert!(assertions::routes_reproduce_plan(&routes, shipments));
        Ok(routes)
    }

    /// Every (warehouse, day) whose planned volume exceeds its fleet's daily capacity
    fn overloaded_days(&self, shipments: &ShipmentPlan) -> Vec<String> {
        shipments
            .records()
            .iter()
            .map(|r| (r.warehouse.as_str(), r.day))
            .unique()
            .sorted()
            .filter_map(|(w, d)| {
                let required = shipments.shipped_from(w, d);
                let capacity = self.fleet.daily_capacity(w).unwrap_or(0.0);
                (required > capacity + tolerance_for(capacity)).then(|| {
                    format!(
                        "{} requires {required:.3} > fleet capacity {capacity:.3}",
                        RecordKey::warehouse(w).with_day(d)
                    )
                })
            })
            .collect()
    }
}
