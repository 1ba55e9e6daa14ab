use anyhow::{Result, ensure};
use distroplan::io::ext_repr::{ExtDemandRow, ExtSupplyRow};
use itertools::Itertools;
use log::info;
use rand::SeedableRng;
use rand::prelude::SmallRng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SimWarehouse {
    pub id: String,
    pub loc: (f64, f64),
    pub inventory: f64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SimCity {
    pub id: String,
    pub loc: (f64, f64),
    pub base_demand: f64,
    /// Amplitude of the seasonal sine
    pub seasonality: f64,
}

/// Synthetic network used when no demand or supply file is given
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct SimulatorConfig {
    pub warehouses: Vec<SimWarehouse>,
    pub cities: Vec<SimCity>,
    pub cost_per_km: f64,
    pub co2_per_km: f64,
    pub n_days: u32,
    /// Standard deviation of the Normal noise added to each demand value, 0 disables noise
    pub demand_noise: f64,
    /// Seed for the noise, drawn from the OS when absent
    pub prng_seed: Option<u64>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        let warehouse = |id: &str, loc, inventory| SimWarehouse {
            id: id.to_string(),
            loc,
            inventory,
        };
        let city = |id: &str, loc, base_demand, seasonality| SimCity {
            id: id.to_string(),
            loc,
            base_demand,
            seasonality,
        };
        Self {
            warehouses: vec![
                warehouse("W1", (0.0, 0.0), 15000.0),
                warehouse("W2", (10.0, 5.0), 12000.0),
            ],
            cities: vec![
                city("Mumbai", (2.0, 3.0), 60.0, 10.0),
                city("Pune", (3.0, 4.0), 50.0, 8.0),
                city("Delhi", (12.0, 15.0), 80.0, 15.0),
                city("Bangalore", (8.0, 10.0), 70.0, 12.0),
            ],
            cost_per_km: 2.5,
            co2_per_km: 0.9,
            n_days: 30,
            demand_noise: 0.0,
            prng_seed: Some(0),
        }
    }
}

pub struct Simulator {
    config: SimulatorConfig,
    rng: SmallRng,
}

impl Simulator {
    pub fn new(config: SimulatorConfig) -> Result<Self> {
        ensure!(!config.warehouses.is_empty(), "simulator needs at least one warehouse");
        ensure!(!config.cities.is_empty(), "simulator needs at least one city");
        ensure!(config.n_days > 0, "simulator needs a horizon of at least one day");
        ensure!(
            config.demand_noise.is_finite() && config.demand_noise >= 0.0,
            "demand noise must be finite and non-negative, got {}",
            config.demand_noise
        );
        ensure!(
            config.cost_per_km >= 0.0 && config.co2_per_km >= 0.0,
            "transport rates must be non-negative"
        );
        let rng = match config.prng_seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        Ok(Self { config, rng })
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Demand for day index `t` is emitted as day `t + 1`:
    /// `max(0, round(base_demand + seasonality * sin(t / 5) + noise))`
    pub fn demand_rows(&mut self) -> Result<Vec<ExtDemandRow>> {
        let noise = match self.config.demand_noise {
            sd if sd > 0.0 => Some(Normal::new(0.0, sd)?),
            _ => None,
        };
        let mut rows = Vec::with_capacity(self.config.n_days as usize * self.config.cities.len());
        for t in 0..self.config.n_days {
            for city in &self.config.cities {
                let seasonal = city.seasonality * (t as f64 / 5.0).sin();
                let eps = noise.map_or(0.0, |n| n.sample(&mut self.rng));
                let demand = (city.base_demand + seasonal + eps).round_ties_even().max(0.0);
                rows.push(ExtDemandRow {
                    city: city.id.clone(),
                    day: t + 1,
                    demand,
                });
            }
        }
        info!(
            "[SIM] generated {} demand rows over {} days",
            rows.len(),
            self.config.n_days
        );
        Ok(rows)
    }

    /// Full warehouse x city product with Euclidean lane distances
    pub fn supply_rows(&self) -> Vec<ExtSupplyRow> {
        self.config
            .warehouses
            .iter()
            .cartesian_product(&self.config.cities)
            .map(|(w, c)| {
                let dist = (w.loc.0 - c.loc.0).hypot(w.loc.1 - c.loc.1);
                ExtSupplyRow {
                    warehouse: w.id.clone(),
                    city: c.id.clone(),
                    available_inventory: w.inventory,
                    distance_km: round2(dist),
                    cost_per_unit: round2(dist * self.config.cost_per_km),
                    co2_per_unit: round2(dist * self.config.co2_per_km),
                }
            })
            .collect()
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
