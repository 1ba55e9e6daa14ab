use serde::{Deserialize, Serialize};

/// Row of the demand history table
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ExtDemandRow {
    /// Demand point (entity) identifier
    pub city: String,
    pub day: u32,
    pub demand: f64,
}

/// Row of the forecast table
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ExtForecastRow {
    pub city: String,
    pub day: u32,
    pub demand_p10: f64,
    pub demand_p50: f64,
    pub demand_p90: f64,
}

/// Row of the supply table: a warehouse-city lane
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ExtSupplyRow {
    pub warehouse: String,
    pub city: String,
    pub available_inventory: f64,
    pub distance_km: f64,
    pub cost_per_unit: f64,
    pub co2_per_unit: f64,
}

/// Row of the shipment plan table
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ExtShipmentRow {
    pub warehouse: String,
    pub city: String,
    pub day: u32,
    pub shipped_qty: f64,
    pub unmet_demand: f64,
}

/// Row of the route plan table
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ExtRouteRow {
    pub day: u32,
    pub warehouse: String,
    pub vehicle: String,
    pub city: String,
    pub shipped_qty: f64,
}
