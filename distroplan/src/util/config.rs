use serde::{Deserialize, Serialize};

/// Configuration of the [`DemandForecaster`](crate::forecast::DemandForecaster)
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct ForecastConfig {
    /// Number of preceding observations averaged into a forecast
    pub window: usize,
    /// Number of residual standard deviations subtracted for the p10 band
    pub z_p10: f64,
    /// Number of residual standard deviations added for the p90 band
    pub z_p90: f64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            window: 7,
            z_p10: 1.28,
            z_p90: 1.28,
        }
    }
}

/// Objective weights of the allocation LP
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct AllocationConfig {
    /// Weight of emissions (co2 per unit) relative to direct cost
    pub emission_weight: f64,
    /// Objective cost per unit of unmet demand.
    /// Must exceed every effective unit shipping cost so that shipping is always preferred over shortfall.
    pub stockout_penalty: f64,
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            emission_weight: 0.5,
            stockout_penalty: 50.0,
        }
    }
}

/// Configuration of the [`RoutePlanner`](crate::planning::RoutePlanner)
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct RoutingConfig {
    /// Emissions per unit carried over one kilometre
    pub co2_per_km_per_unit: f64,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            co2_per_km_per_unit: 0.9,
        }
    }
}
