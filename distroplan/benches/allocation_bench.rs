use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use itertools::Itertools;

use distroplan::entities::{ForecastRecord, ForecastTable, SupplyRecord, SupplyTable};
use distroplan::lp::MicroLpSolver;
use distroplan::planning::AllocationPlanner;
use distroplan::util::AllocationConfig;

criterion_main!(benches);
criterion_group!(benches, allocation_horizon_bench);

const HORIZONS: [u32; 4] = [7, 14, 30, 60];
const WAREHOUSES: [&str; 3] = ["W1", "W2", "W3"];
const CITIES: [&str; 6] = ["Mumbai", "Pune", "Delhi", "Jaipur", "Chennai", "Kolkata"];

fn network(horizon: u32) -> (ForecastTable, SupplyTable) {
    let forecast = (1..=horizon)
        .cartesian_product(CITIES.iter().enumerate())
        .map(|(day, (i, city))| {
            let p50 = 40.0 + 10.0 * i as f64 + 5.0 * ((day as f64) / 7.0).sin();
            ForecastRecord {
                city: city.to_string(),
                day,
                demand_p10: 0.8 * p50,
                demand_p50: p50,
                demand_p90: 1.2 * p50,
            }
        })
        .collect_vec();
    let supply = WAREHOUSES
        .iter()
        .enumerate()
        .cartesian_product(CITIES.iter().enumerate())
        .map(|((wi, w), (ci, c))| {
            let distance = 3.0 + ((wi * 7 + ci * 3) % 11) as f64;
            SupplyRecord {
                warehouse: w.to_string(),
                city: c.to_string(),
                available_inventory: 150.0,
                distance_km: distance,
                cost_per_unit: 2.5 * distance,
                co2_per_unit: 0.9 * distance,
            }
        })
        .collect_vec();
    (ForecastTable::new(forecast).unwrap(), SupplyTable::new(supply).unwrap())
}

/// Formulation and solve of the allocation LP for growing horizons
fn allocation_horizon_bench(c: &mut Criterion) {
    let config = AllocationConfig {
        emission_weight: 0.5,
        stockout_penalty: 100.0,
    };
    let mut group = c.benchmark_group("allocation_horizon");
    for horizon in HORIZONS {
        let (forecast, supply) = network(horizon);
        let planner = AllocationPlanner::new(config, MicroLpSolver);
        group.bench_function(BenchmarkId::from_parameter(horizon), |b| {
            b.iter(|| planner.plan(&forecast, &supply).unwrap())
        });
    }
    group.finish();
}
