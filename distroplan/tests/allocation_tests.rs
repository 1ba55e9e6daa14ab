#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::thread;

    use distroplan::PlanError;
    use distroplan::entities::{ForecastRecord, ForecastTable, SupplyRecord, SupplyTable};
    use distroplan::error::Stage;
    use distroplan::lp::{LinearProgram, LpSolution, LpSolver, MicroLpSolver};
    use distroplan::planning::{AllocationPlanner, Scenario, ScenarioAllocationPlanner};
    use distroplan::util::{AllocationConfig, assertions};
    use float_cmp::approx_eq;
    use slotmap::SecondaryMap;
    use test_case::test_case;

    fn target(city: &str, day: u32, p90: f64) -> ForecastRecord {
        ForecastRecord {
            city: city.to_string(),
            day,
            demand_p10: 0.8 * p90,
            demand_p50: 0.9 * p90,
            demand_p90: p90,
        }
    }

    fn lane(w: &str, c: &str, inventory: f64, cost: f64, co2: f64) -> SupplyRecord {
        SupplyRecord {
            warehouse: w.to_string(),
            city: c.to_string(),
            available_inventory: inventory,
            distance_km: cost / 2.5,
            cost_per_unit: cost,
            co2_per_unit: co2,
        }
    }

    /// Two warehouses, three cities, three days
    fn network() -> (ForecastTable, SupplyTable) {
        let forecast = ForecastTable::new(
            (1..=3).flat_map(|d| {
                [
                    target("Mumbai", d, 60.0 + d as f64),
                    target("Pune", d, 50.0),
                    target("Delhi", d, 95.0 - d as f64),
                ]
            }),
        )
        .unwrap();
        let supply = SupplyTable::new(vec![
            lane("W1", "Mumbai", 120.0, 9.0, 3.2),
            lane("W1", "Pune", 120.0, 12.5, 4.5),
            lane("W1", "Delhi", 120.0, 48.0, 17.3),
            lane("W2", "Mumbai", 90.0, 22.0, 7.9),
            lane("W2", "Pune", 90.0, 20.0, 7.2),
            lane("W2", "Delhi", 90.0, 25.5, 9.2),
        ])
        .unwrap();
        (forecast, supply)
    }

    fn config() -> AllocationConfig {
        AllocationConfig {
            emission_weight: 0.5,
            stockout_penalty: 100.0,
        }
    }

    #[test]
    fn stockout_example() {
        let _ = env_logger::builder().is_test(true).try_init();
        let forecast = ForecastTable::new(vec![target("Pune", 1, 150.0)]).unwrap();
        let supply = SupplyTable::new(vec![lane("W1", "Pune", 100.0, 2.0, 1.0)]).unwrap();
        let planner = AllocationPlanner::new(
            AllocationConfig {
                emission_weight: 0.5,
                stockout_penalty: 50.0,
            },
            MicroLpSolver,
        );
        let plan = planner.plan(&forecast, &supply).unwrap();

        assert_eq!(plan.records().len(), 1);
        let row = &plan.records()[0];
        assert!(approx_eq!(f64, row.shipped_qty, 100.0, epsilon = 1e-6));
        assert!(approx_eq!(f64, row.unmet_demand, 50.0, epsilon = 1e-6));
        assert!(approx_eq!(f64, plan.objective_value(), 100.0 * 2.5 + 50.0 * 50.0, epsilon = 1e-6));
    }

    #[test]
    fn plan_satisfies_coverage_and_inventory() {
        let (forecast, supply) = network();
        let plan = AllocationPlanner::new(config(), MicroLpSolver)
            .plan(&forecast, &supply)
            .unwrap();

        assert!(assertions::plan_covers_forecast(&plan, &forecast));
        assert!(assertions::plan_respects_inventory(&plan, &supply));
        assert_eq!(plan.records().len(), 6 * 3);
        assert!(plan.records().iter().all(|r| r.shipped_qty >= 0.0 && r.unmet_demand >= 0.0));
        // 205 demanded per day against 210 available, nothing goes unmet
        assert!(approx_eq!(f64, plan.total_unmet(), 0.0, epsilon = 1e-6));
    }

    #[test]
    fn cheaper_lane_is_used_first() {
        let forecast = ForecastTable::new(vec![target("Pune", 1, 70.0)]).unwrap();
        let supply = SupplyTable::new(vec![
            lane("W1", "Pune", 50.0, 1.0, 0.0),
            lane("W2", "Pune", 100.0, 5.0, 0.0),
        ])
        .unwrap();
        let plan = AllocationPlanner::new(config(), MicroLpSolver)
            .plan(&forecast, &supply)
            .unwrap();
        assert!(approx_eq!(f64, plan.shipped_from("W1", 1), 50.0, epsilon = 1e-6));
        assert!(approx_eq!(f64, plan.shipped_from("W2", 1), 20.0, epsilon = 1e-6));
    }

    #[test]
    fn inventory_is_not_depleted_across_days() {
        let forecast = ForecastTable::new((1..=3).map(|d| target("Pune", d, 80.0))).unwrap();
        let supply = SupplyTable::new(vec![lane("W1", "Pune", 100.0, 1.0, 0.0)]).unwrap();
        let plan = AllocationPlanner::new(config(), MicroLpSolver)
            .plan(&forecast, &supply)
            .unwrap();
        for d in 1..=3 {
            assert!(approx_eq!(f64, plan.shipped_from("W1", d), 80.0, epsilon = 1e-6));
        }
        assert!(plan.total_shipped() > 100.0);
        assert!(approx_eq!(f64, plan.total_unmet(), 0.0, epsilon = 1e-6));
    }

    #[test_case(BTreeMap::new(), BTreeMap::new(); "empty maps")]
    #[test_case(
        BTreeMap::from([("Mumbai".to_string(), 1.0), ("Pune".to_string(), 1.0), ("Delhi".to_string(), 1.0)]),
        BTreeMap::from([("W1".to_string(), 1.0), ("W2".to_string(), 1.0)]);
        "explicit unit multipliers"
    )]
    fn neutral_scenario_reproduces_baseline(
        demand_multiplier: BTreeMap<String, f64>,
        warehouse_multiplier: BTreeMap<String, f64>,
    ) {
        let (forecast, supply) = network();
        let baseline = AllocationPlanner::new(config(), MicroLpSolver)
            .plan(&forecast, &supply)
            .unwrap();
        let scenario = Scenario {
            demand_multiplier,
            warehouse_multiplier,
        };
        let alternate = ScenarioAllocationPlanner::new(config(), scenario, MicroLpSolver)
            .plan(&forecast, &supply)
            .unwrap();
        assert!(approx_eq!(
            f64,
            baseline.objective_value(),
            alternate.objective_value(),
            epsilon = 1e-6 * baseline.objective_value()
        ));
    }

    #[test]
    fn scenario_shortage_raises_unmet_demand() {
        let (forecast, supply) = network();
        let scenario = Scenario {
            demand_multiplier: BTreeMap::from([("Mumbai".to_string(), 1.2), ("Pune".to_string(), 1.1)]),
            warehouse_multiplier: BTreeMap::from([("W1".to_string(), 0.9)]),
        };
        let alternate = ScenarioAllocationPlanner::new(config(), scenario, MicroLpSolver)
            .plan(&forecast, &supply)
            .unwrap();
        // W1 capped at 108 per day, 2 warehouses deliver at most 198
        for d in 1..=3 {
            assert!(alternate.shipped_from("W1", d) <= 108.0 + 1e-6);
        }
        assert!(alternate.total_unmet() > 0.0);
    }

    #[test]
    fn baseline_and_scenario_run_concurrently() {
        let (forecast, supply) = network();
        let solver = MicroLpSolver;
        let baseline_planner = AllocationPlanner::new(config(), &solver);
        let scenario_planner = ScenarioAllocationPlanner::new(
            config(),
            Scenario {
                warehouse_multiplier: BTreeMap::from([("W2".to_string(), 0.0)]),
                ..Default::default()
            },
            &solver,
        );

        let (baseline, alternate) = thread::scope(|s| {
            let b = s.spawn(|| baseline_planner.plan(&forecast, &supply));
            let a = s.spawn(|| scenario_planner.plan(&forecast, &supply));
            (b.join().unwrap(), a.join().unwrap())
        });
        let baseline = baseline.unwrap();
        let alternate = alternate.unwrap();

        let sequential = baseline_planner.plan(&forecast, &supply).unwrap();
        assert!(approx_eq!(
            f64,
            baseline.objective_value(),
            sequential.objective_value(),
            epsilon = 1e-6 * sequential.objective_value()
        ));
        for d in 1..=3 {
            assert!(alternate.shipped_from("W2", d) <= 1e-6);
        }
    }

    #[test]
    fn failing_scenario_does_not_affect_baseline() {
        let (forecast, supply) = network();
        let bad = ScenarioAllocationPlanner::new(
            config(),
            Scenario {
                demand_multiplier: BTreeMap::from([("Pune".to_string(), f64::NAN)]),
                ..Default::default()
            },
            MicroLpSolver,
        );
        assert!(matches!(bad.plan(&forecast, &supply), Err(PlanError::InputValidation { .. })));
        assert!(AllocationPlanner::new(config(), MicroLpSolver).plan(&forecast, &supply).is_ok());
    }

    /// Claims optimality with every variable at zero
    struct ZeroSolver;

    impl LpSolver for ZeroSolver {
        fn solve(&self, lp: &LinearProgram) -> LpSolution {
            let values: SecondaryMap<_, _> = lp.variables().map(|(k, _)| (k, 0.0)).collect();
            LpSolution::optimal(values, 0.0)
        }
    }

    #[test]
    fn uncovered_target_is_a_consistency_error() {
        let forecast = ForecastTable::new(vec![target("Pune", 3, 40.0)]).unwrap();
        let supply = SupplyTable::new(vec![lane("W1", "Pune", 100.0, 2.0, 1.0)]).unwrap();
        let planner = AllocationPlanner::new(config(), ZeroSolver);
        match planner.plan(&forecast, &supply) {
            Err(PlanError::Consistency {
                stage,
                key,
                expected,
                actual,
            }) => {
                assert_eq!(stage, Stage::Allocation);
                assert_eq!(key.city.as_deref(), Some("Pune"));
                assert_eq!(key.day, Some(3));
                assert!(approx_eq!(f64, expected, 40.0, epsilon = 1e-9));
                assert!(approx_eq!(f64, actual, 0.0, epsilon = 1e-9));
            }
            other => panic!("expected a consistency error, got {other:?}"),
        }
    }
}
