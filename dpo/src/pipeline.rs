use std::panic;
use std::path::Path;
use std::thread;

use anyhow::{Context, Result};
use distroplan::PlanError;
use distroplan::entities::{FleetConfig, ForecastTable, RoutePlan, ShipmentPlan};
use distroplan::forecast::DemandForecaster;
use distroplan::io::ext_repr::{ExtDemandRow, ExtForecastRow, ExtSupplyRow};
use distroplan::io::{export, import};
use distroplan::lp::{LpSolver, MicroLpSolver, TimeLimitedSolver};
use distroplan::planning::{AllocationPlanner, RoutePlanner, ScenarioAllocationPlanner};
use log::{error, info};
use serde::{Deserialize, Serialize};

use crate::EPOCH;
use crate::config::DpoConfig;
use crate::io;

/// Where the allocation targets of a run come from
#[derive(Debug, Clone)]
pub enum DemandSource {
    /// Demand history, forecast during the run
    History(Vec<ExtDemandRow>),
    /// A persisted forecast table, used as is
    Forecast(Vec<ExtForecastRow>),
}

/// Products of one planning run.
/// Every stage result is kept, so a failing stage does not discard the output of an independent one.
#[derive(Debug)]
pub struct PlanningOutput {
    pub forecast: ForecastTable,
    pub shipment_plan: Result<ShipmentPlan, PlanError>,
    /// Absent when no scenario is configured
    pub scenario_plan: Option<Result<ShipmentPlan, PlanError>>,
    /// Absent when the baseline allocation failed
    pub routes: Option<Result<RoutePlan, PlanError>>,
    pub summary: RunSummary,
}

impl PlanningOutput {
    /// The first failure of a stage the baseline routes depend on.
    /// A failed scenario is not one of them.
    pub fn into_result(self) -> Result<()> {
        self.shipment_plan.context("baseline allocation failed")?;
        if let Some(routes) = self.routes {
            routes.context("routing failed")?;
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RunSummary {
    pub n_cities: usize,
    pub n_forecast_rows: usize,
    pub horizon_days: usize,
    pub baseline: PlanSummary,
    pub scenario: Option<PlanSummary>,
    pub routing: Option<RoutingSummary>,
    pub run_time_ms: u64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum PlanSummary {
    Solved {
        objective_value: f64,
        total_shipped: f64,
        total_unmet: f64,
    },
    Failed {
        reason: String,
    },
}

impl PlanSummary {
    fn of(plan: &Result<ShipmentPlan, PlanError>) -> Self {
        match plan {
            Ok(plan) => PlanSummary::Solved {
                objective_value: plan.objective_value(),
                total_shipped: plan.total_shipped(),
                total_unmet: plan.total_unmet(),
            },
            Err(e) => PlanSummary::Failed { reason: e.to_string() },
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum RoutingSummary {
    Solved { total_emissions: f64, n_route_rows: usize },
    Failed { reason: String },
}

/// [`run_with_solver`] with the `microlp` backend under the configured time limit
pub fn run(config: &DpoConfig, demand: &DemandSource, supply: &[ExtSupplyRow]) -> Result<PlanningOutput> {
    let solver = TimeLimitedSolver::new(MicroLpSolver, config.solver_time_limit());
    run_with_solver(config, demand, supply, &solver)
}

/// Forecast (unless a forecast is given), baseline and scenario allocation, then fleet decomposition of the baseline plan.
///
/// Invalid inputs and configuration abort the run. A failing LP stage is recorded in the output instead,
/// and only the stages consuming its plan are skipped.
pub fn run_with_solver<S: LpSolver>(
    config: &DpoConfig,
    demand: &DemandSource,
    supply: &[ExtSupplyRow],
    solver: &S,
) -> Result<PlanningOutput> {
    let supply = import::import_supply(supply).context("invalid supply table")?;
    let fleet = FleetConfig::new(config.fleet.clone())?;

    let forecast = match demand {
        DemandSource::History(rows) => {
            let history = import::import_demand(rows).context("invalid demand history")?;
            DemandForecaster::new(config.forecast)?.forecast(&history)?
        }
        DemandSource::Forecast(rows) => {
            let forecast = import::import_forecast(rows).context("invalid forecast table")?;
            info!("[MAIN] using {} persisted forecast rows, forecasting skipped", forecast.len());
            forecast
        }
    };

    let baseline_planner = AllocationPlanner::new(config.allocation, solver);
    let scenario_planner = config
        .scenario
        .clone()
        .map(|s| ScenarioAllocationPlanner::new(config.allocation, s, solver));

    let (forecast_ref, supply_ref) = (&forecast, &supply);
    let (shipment_plan, scenario_plan) = thread::scope(|s| -> Result<_> {
        let scenario_handle = scenario_planner
            .as_ref()
            .map(|p| {
                thread::Builder::new()
                    .name("scenario".to_string())
                    .spawn_scoped(s, move || p.plan(forecast_ref, supply_ref))
            })
            .transpose()
            .context("could not spawn scenario thread")?;
        let baseline = baseline_planner.plan(forecast_ref, supply_ref);
        let scenario = scenario_handle.map(|h| h.join().unwrap_or_else(|e| panic::resume_unwind(e)));
        Ok((baseline, scenario))
    })?;
    if let Some(Err(e)) = &scenario_plan {
        error!("[MAIN] scenario allocation failed, continuing with the baseline: {e}");
    }

    let routes = match &shipment_plan {
        Ok(plan) => {
            let routes = RoutePlanner::new(config.routing, fleet, solver).plan(plan, &supply);
            if let Err(e) = &routes {
                error!("[MAIN] routing failed: {e}");
            }
            Some(routes)
        }
        Err(e) => {
            error!("[MAIN] baseline allocation failed, routing skipped: {e}");
            None
        }
    };

    let summary = RunSummary {
        n_cities: forecast.cities().count(),
        n_forecast_rows: forecast.len(),
        horizon_days: forecast.horizon().len(),
        baseline: PlanSummary::of(&shipment_plan),
        scenario: scenario_plan.as_ref().map(PlanSummary::of),
        routing: routes.as_ref().map(|r| match r {
            Ok(routes) => RoutingSummary::Solved {
                total_emissions: routes.total_emissions(),
                n_route_rows: routes.records().len(),
            },
            Err(e) => RoutingSummary::Failed { reason: e.to_string() },
        }),
        run_time_ms: EPOCH.elapsed().as_millis() as u64,
    };
    info!("[MAIN] run finished: {summary:?}");

    Ok(PlanningOutput {
        forecast,
        shipment_plan,
        scenario_plan,
        routes,
        summary,
    })
}

/// Writes every table the run produced as a JSON array into `folder`, plus the summary
pub fn write_output(output: &PlanningOutput, folder: &Path) -> Result<()> {
    io::write_json(&export::export_forecast(&output.forecast), &folder.join("demand_forecast.json"))?;
    if let Ok(plan) = &output.shipment_plan {
        io::write_json(&export::export_shipment_plan(plan), &folder.join("shipment_plan.json"))?;
    }
    if let Some(Ok(plan)) = &output.scenario_plan {
        io::write_json(
            &export::export_shipment_plan(plan),
            &folder.join("shipment_plan_scenario.json"),
        )?;
    }
    if let Some(Ok(routes)) = &output.routes {
        io::write_json(&export::export_route_plan(routes), &folder.join("vehicle_routes.json"))?;
    }
    io::write_json(&output.summary, &folder.join("summary.json"))?;
    Ok(())
}
