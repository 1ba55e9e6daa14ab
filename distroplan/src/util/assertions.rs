use crate::entities::{ForecastTable, RoutePlan, ShipmentPlan, SupplyTable};
use crate::util::tolerance_for;
use itertools::Itertools;

/// p10 <= p50 <= p90 and p10 >= 0 for every record
pub fn forecast_bands_ordered(table: &ForecastTable) -> bool {
    table.records().all(|r| {
        r.demand_p10 >= 0.0 && r.demand_p10 <= r.demand_p50 && r.demand_p50 <= r.demand_p90
    })
}

/// Shipped + unmet covers `demand_p90` for every forecast (city, day) served by at least one lane
pub fn plan_covers_forecast(plan: &ShipmentPlan, forecast: &ForecastTable) -> bool {
    forecast.records().all(|r| {
        let covered = plan.delivered_to(&r.city, r.day) + plan.unmet(&r.city, r.day);
        let served = plan.records().iter().any(|s| s.city == r.city && s.day == r.day);
        !served || covered >= r.demand_p90 - tolerance_for(r.demand_p90)
    })
}

/// No warehouse ships more than its inventory on any day
pub fn plan_respects_inventory(plan: &ShipmentPlan, supply: &SupplyTable) -> bool {
    plan.records()
        .iter()
        .map(|r| (r.warehouse.as_str(), r.day))
        .unique()
        .all(|(w, d)| {
            let inventory = supply.inventory(w).unwrap_or(0.0);
            plan.shipped_from(w, d) <= inventory + tolerance_for(inventory)
        })
}

/// Vehicles deliver exactly the planned quantity of every shipment row
pub fn routes_reproduce_plan(routes: &RoutePlan, plan: &ShipmentPlan) -> bool {
    plan.records().iter().all(|r| {
        let delivered = routes.delivered(&r.warehouse, &r.city, r.day);
        (delivered - r.shipped_qty).abs() <= tolerance_for(r.shipped_qty)
    })
}

/// No vehicle carries more than `capacity` on a day
pub fn routes_respect_capacity(routes: &RoutePlan, capacity_of: impl Fn(&str) -> f64) -> bool {
    routes
        .records()
        .iter()
        .map(|r| (r.vehicle.as_str(), r.day))
        .unique()
        .all(|(v, d)| {
            let capacity = capacity_of(v);
            routes.vehicle_load(v, d) <= capacity + tolerance_for(capacity)
        })
}
