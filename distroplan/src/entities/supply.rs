use std::collections::BTreeMap;

use crate::error::{PlanError, RecordKey};

const TABLE: &str = "supply";

/// Transport lane from a warehouse to a city, with the warehouse's available inventory
#[derive(Debug, Clone, PartialEq)]
pub struct SupplyRecord {
    pub warehouse: String,
    pub city: String,
    pub available_inventory: f64,
    pub distance_km: f64,
    pub cost_per_unit: f64,
    pub co2_per_unit: f64,
}

impl SupplyRecord {
    /// Objective coefficient of one unit shipped on this lane
    pub fn effective_unit_cost(&self, emission_weight: f64) -> f64 {
        self.cost_per_unit + emission_weight * self.co2_per_unit
    }

    fn validate(&self) -> Result<(), PlanError> {
        let fields = [
            ("available_inventory", self.available_inventory),
            ("distance_km", self.distance_km),
            ("cost_per_unit", self.cost_per_unit),
            ("co2_per_unit", self.co2_per_unit),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(PlanError::invalid(
                    TABLE,
                    RecordKey::warehouse(&self.warehouse).with_city(&self.city),
                    format!("{name} must be finite and non-negative, got {value}"),
                ));
            }
        }
        Ok(())
    }
}

/// Supply lanes keyed by (warehouse, city), with one inventory figure per warehouse.
#[derive(Debug, Clone)]
pub struct SupplyTable {
    lanes: BTreeMap<(String, String), SupplyRecord>,
    inventory: BTreeMap<String, f64>,
}

impl SupplyTable {
    /// Every row of a warehouse repeats its inventory; rows disagreeing on it are rejected.
    pub fn new(records: impl IntoIterator<Item = SupplyRecord>) -> Result<Self, PlanError> {
        let mut lanes = BTreeMap::new();
        let mut inventory: BTreeMap<String, f64> = BTreeMap::new();

        for record in records {
            record.validate()?;
            let key = || RecordKey::warehouse(&record.warehouse).with_city(&record.city);
            match inventory.get(&record.warehouse) {
                Some(&inv) if inv != record.available_inventory => {
                    return Err(PlanError::invalid(
                        TABLE,
                        key(),
                        format!(
                            "available_inventory {} conflicts with {} on another row of the same warehouse",
                            record.available_inventory, inv
                        ),
                    ));
                }
                Some(_) => {}
                None => {
                    inventory.insert(record.warehouse.clone(), record.available_inventory);
                }
            }
            let lane_key = (record.warehouse.clone(), record.city.clone());
            if lanes.contains_key(&lane_key) {
                return Err(PlanError::invalid(TABLE, key(), "duplicate (warehouse, city)"));
            }
            lanes.insert(lane_key, record);
        }

        if lanes.is_empty() {
            return Err(PlanError::invalid(TABLE, RecordKey::default(), "table is empty"));
        }

        Ok(Self { lanes, inventory })
    }

    /// Lanes ordered by warehouse, then city
    pub fn lanes(&self) -> impl Iterator<Item = &SupplyRecord> {
        self.lanes.values()
    }

    pub fn lane(&self, warehouse: &str, city: &str) -> Option<&SupplyRecord> {
        self.lanes.get(&(warehouse.to_string(), city.to_string()))
    }

    pub fn inventory(&self, warehouse: &str) -> Option<f64> {
        self.inventory.get(warehouse).copied()
    }

    /// Warehouses and their available inventory, ordered by id
    pub fn warehouses(&self) -> impl Iterator<Item = (&str, f64)> {
        self.inventory.iter().map(|(w, inv)| (w.as_str(), *inv))
    }

    /// Lane with the largest objective coefficient per unit shipped, among the lanes accepted by `filter`
    pub fn costliest_lane(
        &self,
        emission_weight: f64,
        filter: impl Fn(&SupplyRecord) -> bool,
    ) -> Option<&SupplyRecord> {
        self.lanes.values().filter(|l| filter(l)).max_by(|a, b| {
            a.effective_unit_cost(emission_weight)
                .total_cmp(&b.effective_unit_cost(emission_weight))
        })
    }
}
