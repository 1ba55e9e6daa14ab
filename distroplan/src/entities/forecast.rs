use std::collections::BTreeMap;

use itertools::Itertools;

use crate::error::{PlanError, RecordKey};

const TABLE: &str = "forecast";

/// Demand bands of a city on a day. `demand_p90` is the coverage target of the allocation.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRecord {
    pub city: String,
    pub day: u32,
    pub demand_p10: f64,
    pub demand_p50: f64,
    pub demand_p90: f64,
}

impl ForecastRecord {
    fn validate(&self) -> Result<(), PlanError> {
        let key = || RecordKey::city(&self.city).with_day(self.day);
        let bands = [self.demand_p10, self.demand_p50, self.demand_p90];
        if bands.iter().any(|b| !b.is_finite()) {
            return Err(PlanError::invalid(TABLE, key(), "demand bands must be finite"));
        }
        if self.demand_p10 < 0.0 {
            return Err(PlanError::invalid(
                TABLE,
                key(),
                format!("demand_p10 is negative ({})", self.demand_p10),
            ));
        }
        if self.demand_p10 > self.demand_p50 || self.demand_p50 > self.demand_p90 {
            return Err(PlanError::invalid(
                TABLE,
                key(),
                format!(
                    "bands not ordered: p10={} p50={} p90={}",
                    self.demand_p10, self.demand_p50, self.demand_p90
                ),
            ));
        }
        Ok(())
    }
}

/// Forecast records keyed by (city, day). Immutable once built.
#[derive(Debug, Clone)]
pub struct ForecastTable {
    records: BTreeMap<(String, u32), ForecastRecord>,
}

impl ForecastTable {
    pub fn new(records: impl IntoIterator<Item = ForecastRecord>) -> Result<Self, PlanError> {
        let mut map = BTreeMap::new();
        for record in records {
            record.validate()?;
            let key = (record.city.clone(), record.day);
            if map.contains_key(&key) {
                return Err(PlanError::invalid(
                    TABLE,
                    RecordKey::city(&record.city).with_day(record.day),
                    "duplicate (city, day)",
                ));
            }
            map.insert(key, record);
        }
        if map.is_empty() {
            return Err(PlanError::invalid(TABLE, RecordKey::default(), "table is empty"));
        }
        Ok(Self { records: map })
    }

    /// Records ordered by city, then day
    pub fn records(&self) -> impl Iterator<Item = &ForecastRecord> {
        self.records.values()
    }

    pub fn get(&self, city: &str, day: u32) -> Option<&ForecastRecord> {
        self.records.get(&(city.to_string(), day))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn cities(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(|(c, _)| c.as_str()).dedup()
    }

    /// Distinct forecast days across all cities, ascending
    pub fn horizon(&self) -> Vec<u32> {
        self.records.keys().map(|(_, d)| *d).sorted().dedup().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(city: &str, day: u32, p10: f64, p50: f64, p90: f64) -> ForecastRecord {
        ForecastRecord {
            city: city.into(),
            day,
            demand_p10: p10,
            demand_p50: p50,
            demand_p90: p90,
        }
    }

    #[test]
    fn lookup_and_horizon() {
        let table = ForecastTable::new(vec![
            rec("Pune", 2, 1.0, 2.0, 3.0),
            rec("Delhi", 1, 1.0, 2.0, 3.0),
            rec("Pune", 1, 1.0, 2.0, 3.0),
        ])
        .unwrap();
        assert_eq!(table.horizon(), vec![1, 2]);
        assert_eq!(table.cities().collect_vec(), vec!["Delhi", "Pune"]);
        assert_eq!(table.get("Pune", 2).unwrap().demand_p90, 3.0);
        assert!(table.get("Delhi", 2).is_none());
    }

    #[test]
    fn rejects_disordered_bands() {
        assert!(ForecastTable::new(vec![rec("Pune", 1, 3.0, 2.0, 4.0)]).is_err());
        assert!(ForecastTable::new(vec![rec("Pune", 1, 1.0, 5.0, 4.0)]).is_err());
        assert!(ForecastTable::new(vec![rec("Pune", 1, -0.5, 2.0, 4.0)]).is_err());
    }

    #[test]
    fn rejects_duplicate_keys() {
        let err = ForecastTable::new(vec![
            rec("Pune", 1, 1.0, 2.0, 3.0),
            rec("Pune", 1, 1.0, 2.0, 3.0),
        ])
        .unwrap_err();
        assert!(matches!(err, PlanError::InputValidation { .. }));
    }
}
