use std::collections::BTreeMap;

use crate::error::{PlanError, RecordKey};

const TABLE: &str = "demand history";

/// A single observed demand of an entity (demand point) on a day
#[derive(Debug, Clone, PartialEq)]
pub struct DemandObservation {
    pub entity: String,
    pub day: u32,
    pub demand: f64,
}

/// Demand observations grouped per entity, each series ordered by strictly increasing day.
#[derive(Debug, Clone)]
pub struct DemandHistory {
    series: BTreeMap<String, Vec<DemandObservation>>,
}

impl DemandHistory {
    /// Validates and groups the observations.
    /// Within an entity, days must appear in strictly increasing order and demand must be finite and non-negative.
    pub fn new(observations: impl IntoIterator<Item = DemandObservation>) -> Result<Self, PlanError> {
        let mut series: BTreeMap<String, Vec<DemandObservation>> = BTreeMap::new();

        for obs in observations {
            let key = RecordKey::city(&obs.entity).with_day(obs.day);
            if !obs.demand.is_finite() || obs.demand < 0.0 {
                return Err(PlanError::invalid(
                    TABLE,
                    key,
                    format!("demand must be finite and non-negative, got {}", obs.demand),
                ));
            }
            let entity_series = series.entry(obs.entity.clone()).or_default();
            if let Some(prev) = entity_series.last() {
                if prev.day == obs.day {
                    return Err(PlanError::invalid(TABLE, key, "duplicate day"));
                }
                if prev.day > obs.day {
                    return Err(PlanError::invalid(
                        TABLE,
                        key,
                        format!("days not sorted, day {} follows day {}", obs.day, prev.day),
                    ));
                }
            }
            entity_series.push(obs);
        }

        if series.is_empty() {
            return Err(PlanError::invalid(TABLE, RecordKey::default(), "table is empty"));
        }

        Ok(Self { series })
    }

    /// All entities with their ordered observations
    pub fn series(&self) -> impl Iterator<Item = (&str, &[DemandObservation])> {
        self.series.iter().map(|(e, s)| (e.as_str(), s.as_slice()))
    }

    pub fn entities(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(|e| e.as_str())
    }

    pub fn n_observations(&self) -> usize {
        self.series.values().map(|s| s.len()).sum()
    }
}
