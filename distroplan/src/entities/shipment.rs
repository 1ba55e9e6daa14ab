/// Quantity shipped on a lane on a day, with the unmet demand of the receiving city on that day
#[derive(Debug, Clone, PartialEq)]
pub struct ShipmentPlanRecord {
    pub warehouse: String,
    pub city: String,
    pub day: u32,
    pub shipped_qty: f64,
    /// Unmet demand of (city, day); repeated on every row of the same city and day
    pub unmet_demand: f64,
}

/// Result of a solved allocation LP.
/// Only constructed from an optimal solve, so holding one means the plan is valid for routing.
#[derive(Debug, Clone)]
pub struct ShipmentPlan {
    records: Vec<ShipmentPlanRecord>,
    objective_value: f64,
}

impl ShipmentPlan {
    pub(crate) fn new(records: Vec<ShipmentPlanRecord>, objective_value: f64) -> Self {
        Self {
            records,
            objective_value,
        }
    }

    /// Rows ordered by warehouse, city and day
    pub fn records(&self) -> &[ShipmentPlanRecord] {
        &self.records
    }

    /// Optimal value of the allocation objective (cost + weighted emissions + stockout penalty)
    pub fn objective_value(&self) -> f64 {
        self.objective_value
    }

    pub fn total_shipped(&self) -> f64 {
        self.records.iter().map(|r| r.shipped_qty).sum()
    }

    /// Total unmet demand, counting each (city, day) once
    pub fn total_unmet(&self) -> f64 {
        let mut seen = std::collections::BTreeSet::new();
        self.records
            .iter()
            .filter(|r| seen.insert((r.city.as_str(), r.day)))
            .map(|r| r.unmet_demand)
            .sum()
    }

    pub fn shipped_from(&self, warehouse: &str, day: u32) -> f64 {
        self.records
            .iter()
            .filter(|r| r.warehouse == warehouse && r.day == day)
            .map(|r| r.shipped_qty)
            .sum()
    }

    pub fn delivered_to(&self, city: &str, day: u32) -> f64 {
        self.records
            .iter()
            .filter(|r| r.city == city && r.day == day)
            .map(|r| r.shipped_qty)
            .sum()
    }

    pub fn unmet(&self, city: &str, day: u32) -> f64 {
        self.records
            .iter()
            .find(|r| r.city == city && r.day == day)
            .map_or(0.0, |r| r.unmet_demand)
    }
}
