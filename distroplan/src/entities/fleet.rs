use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{PlanError, RecordKey};

/// A delivery vehicle owned by a warehouse
#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    pub id: String,
    pub warehouse: String,
    /// Volume the vehicle can deliver per day
    pub capacity: f64,
}

/// Fleet of a single warehouse: a number of identical vehicles
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct FleetEntry {
    pub num_vehicles: usize,
    pub capacity: f64,
}

/// Per-warehouse fleet configuration
#[derive(Debug, Clone, Default)]
pub struct FleetConfig {
    entries: BTreeMap<String, FleetEntry>,
}

impl FleetConfig {
    pub fn new(entries: BTreeMap<String, FleetEntry>) -> Result<Self, PlanError> {
        for (warehouse, entry) in entries.iter() {
            if !entry.capacity.is_finite() || entry.capacity < 0.0 {
                return Err(PlanError::config(
                    RecordKey::warehouse(warehouse),
                    format!("vehicle capacity must be finite and non-negative, got {}", entry.capacity),
                ));
            }
        }
        Ok(Self { entries })
    }

    pub fn entry(&self, warehouse: &str) -> Option<&FleetEntry> {
        self.entries.get(warehouse)
    }

    /// Total volume the warehouse's fleet can deliver on one day
    pub fn daily_capacity(&self, warehouse: &str) -> Option<f64> {
        self.entry(warehouse)
            .map(|e| e.num_vehicles as f64 * e.capacity)
    }

    /// The named vehicles of a warehouse, `{warehouse}_V1` to `{warehouse}_V{n}`.
    /// A warehouse without fleet entry is a configuration error.
    pub fn vehicles(&self, warehouse: &str) -> Result<Vec<Vehicle>, PlanError> {
        let entry = self.entry(warehouse).ok_or_else(|| {
            PlanError::config(RecordKey::warehouse(warehouse), "no fleet configured")
        })?;
        Ok((1..=entry.num_vehicles)
            .map(|i| Vehicle {
                id: format!("{warehouse}_V{i}"),
                warehouse: warehouse.to_string(),
                capacity: entry.capacity,
            })
            .collect())
    }
}
