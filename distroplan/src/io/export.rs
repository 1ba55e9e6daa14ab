use crate::entities::{ForecastTable, RoutePlan, ShipmentPlan};
use crate::io::ext_repr::{ExtForecastRow, ExtRouteRow, ExtShipmentRow};

pub fn export_forecast(table: &ForecastTable) -> Vec<ExtForecastRow> {
    table
        .records()
        .map(|r| ExtForecastRow {
            city: r.city.clone(),
            day: r.day,
            demand_p10: r.demand_p10,
            demand_p50: r.demand_p50,
            demand_p90: r.demand_p90,
        })
        .collect()
}

pub fn export_shipment_plan(plan: &ShipmentPlan) -> Vec<ExtShipmentRow> {
    plan.records()
        .iter()
        .map(|r| ExtShipmentRow {
            warehouse: r.warehouse.clone(),
            city: r.city.clone(),
            day: r.day,
            shipped_qty: r.shipped_qty,
            unmet_demand: r.unmet_demand,
        })
        .collect()
}

/// Route rows ordered by day, then warehouse, vehicle and city
pub fn export_route_plan(plan: &RoutePlan) -> Vec<ExtRouteRow> {
    let mut rows: Vec<ExtRouteRow> = plan
        .records()
        .iter()
        .map(|r| ExtRouteRow {
            day: r.day,
            warehouse: r.warehouse.clone(),
            vehicle: r.vehicle.clone(),
            city: r.city.clone(),
            shipped_qty: r.shipped_qty,
        })
        .collect();
    rows.sort_by(|a, b| {
        (a.day, &a.warehouse, &a.vehicle, &a.city).cmp(&(b.day, &b.warehouse, &b.vehicle, &b.city))
    });
    rows
}
