use itertools::Itertools;
use log::{debug, info};
use rayon::prelude::*;
use thousands::Separable;

use crate::entities::{DemandHistory, DemandObservation, ForecastRecord, ForecastTable};
use crate::error::{PlanError, RecordKey};
use crate::util::{ForecastConfig, assertions};

/// Smooths each entity's demand history with a trailing moving average and derives p10/p50/p90 bands
/// from the spread of the in-sample residuals.
///
/// The forecast of an observation only uses the `window` observations strictly before it.
/// The first `window` observations of a series have no full window and are back-filled with the series mean.
/// Entities are independent and processed in parallel.
#[derive(Debug, Clone, Copy)]
pub struct DemandForecaster {
    config: ForecastConfig,
}

impl DemandForecaster {
    pub fn new(config: ForecastConfig) -> Result<Self, PlanError> {
        if config.window == 0 {
            return Err(PlanError::config(RecordKey::default(), "forecast window must be at least 1"));
        }
        for (name, z) in [("z_p10", config.z_p10), ("z_p90", config.z_p90)] {
            if !z.is_finite() || z < 0.0 {
                return Err(PlanError::config(
                    RecordKey::default(),
                    format!("{name} must be finite and non-negative, got {z}"),
                ));
            }
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    pub fn forecast(&self, history: &DemandHistory) -> Result<ForecastTable, PlanError> {
        let series = history.series().collect_vec();

        let per_entity = series
            .into_par_iter()
            .map(|(entity, observations)| self.forecast_entity(entity, observations))
            .collect::<Result<Vec<_>, PlanError>>()?;

        let table = ForecastTable::new(per_entity.into_iter().flatten())?;
        debug_assert!(assertions::forecast_bands_ordered(&table));
        info!(
            "[FCST] forecasted {} records from {} observations of {} entities (window {}, z_p10 {}, z_p90 {})",
            table.len().separate_with_commas(),
            history.n_observations().separate_with_commas(),
            history.entities().count(),
            self.config.window,
            self.config.z_p10,
            self.config.z_p90
        );
        Ok(table)
    }

    /// Forecast bands for a single, day-ordered series
    pub fn forecast_entity(
        &self,
        entity: &str,
        observations: &[DemandObservation],
    ) -> Result<Vec<ForecastRecord>, PlanError> {
        let demand = observations.iter().map(|o| o.demand).collect_vec();
        let point = trailing_mean_forecast(&demand, self.config.window);

        let residuals = demand.iter().zip(&point).map(|(d, f)| d - f).collect_vec();
        let sigma = sample_std(&residuals).ok_or_else(|| PlanError::InsufficientHistory {
            key: RecordKey::city(entity),
            residuals: residuals.len(),
        })?;
        debug!("[FCST] {entity}: residual sigma {sigma:.4} over {} days", residuals.len());

        Ok(observations
            .iter()
            .zip(point)
            .map(|(obs, f)| ForecastRecord {
                city: entity.to_string(),
                day: obs.day,
                demand_p10: (f - self.config.z_p10 * sigma).max(0.0),
                demand_p50: f,
                demand_p90: f + self.config.z_p90 * sigma,
            })
            .collect())
    }
}

/// Mean of the `window` values strictly before each position.
/// Positions without a full window get the mean of the whole series.
pub fn trailing_mean_forecast(demand: &[f64], window: usize) -> Vec<f64> {
    if demand.is_empty() {
        return vec![];
    }
    let series_mean = demand.iter().sum::<f64>() / demand.len() as f64;
    (0..demand.len())
        .map(|i| match i >= window {
            true => demand[i - window..i].iter().sum::<f64>() / window as f64,
            false => series_mean,
        })
        .collect()
}

/// Sample standard deviation (n - 1 denominator); `None` for fewer than 2 values
pub fn sample_std(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    let std = var.sqrt();
    std.is_finite().then_some(std)
}
