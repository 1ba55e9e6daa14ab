use crate::entities::{
    DemandHistory, DemandObservation, ForecastRecord, ForecastTable, SupplyRecord, SupplyTable,
};
use crate::error::PlanError;
use crate::io::ext_repr::{ExtDemandRow, ExtForecastRow, ExtSupplyRow};

/// Imports demand history rows. Rows of one entity must appear in increasing day order.
pub fn import_demand(rows: &[ExtDemandRow]) -> Result<DemandHistory, PlanError> {
    DemandHistory::new(rows.iter().map(|r| DemandObservation {
        entity: r.city.clone(),
        day: r.day,
        demand: r.demand,
    }))
}

pub fn import_forecast(rows: &[ExtForecastRow]) -> Result<ForecastTable, PlanError> {
    ForecastTable::new(rows.iter().map(|r| ForecastRecord {
        city: r.city.clone(),
        day: r.day,
        demand_p10: r.demand_p10,
        demand_p50: r.demand_p50,
        demand_p90: r.demand_p90,
    }))
}

pub fn import_supply(rows: &[ExtSupplyRow]) -> Result<SupplyTable, PlanError> {
    SupplyTable::new(rows.iter().map(|r| SupplyRecord {
        warehouse: r.warehouse.clone(),
        city: r.city.clone(),
        available_inventory: r.available_inventory,
        distance_km: r.distance_km,
        cost_per_unit: r.cost_per_unit,
        co2_per_unit: r.co2_per_unit,
    }))
}
