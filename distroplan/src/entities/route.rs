/// Quantity carried by one vehicle to a city on a day
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRecord {
    pub day: u32,
    pub warehouse: String,
    pub vehicle: String,
    pub city: String,
    pub shipped_qty: f64,
}

/// Vehicle-level decomposition of a [`ShipmentPlan`](crate::entities::ShipmentPlan)
#[derive(Debug, Clone)]
pub struct RoutePlan {
    records: Vec<RouteRecord>,
    total_emissions: f64,
}

impl RoutePlan {
    pub(crate) fn new(records: Vec<RouteRecord>, total_emissions: f64) -> Self {
        Self {
            records,
            total_emissions,
        }
    }

    /// Rows ordered by warehouse, vehicle, city and day
    pub fn records(&self) -> &[RouteRecord] {
        &self.records
    }

    /// Optimal value of the routing objective
    pub fn total_emissions(&self) -> f64 {
        self.total_emissions
    }

    pub fn vehicle_load(&self, vehicle: &str, day: u32) -> f64 {
        self.records
            .iter()
            .filter(|r| r.vehicle == vehicle && r.day == day)
            .map(|r| r.shipped_qty)
            .sum()
    }

    /// Total volume delivered from a warehouse to a city on a day, over all its vehicles
    pub fn delivered(&self, warehouse: &str, city: &str, day: u32) -> f64 {
        self.records
            .iter()
            .filter(|r| r.warehouse == warehouse && r.city == city && r.day == day)
            .map(|r| r.shipped_qty)
            .sum()
    }
}
