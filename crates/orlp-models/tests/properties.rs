//! Property-based checks over randomly generated allocation and covering models

use orlp_models::CoefficientTable;
use orlp_models::blend::share_row;
use orlp_solver::{report, Direction, Model, Relation, SolutionStatus, Solver};
use proptest::collection::vec;
use proptest::prelude::*;

/// Maximize with positive data and `<=` rows: always feasible and bounded
fn allocation() -> impl Strategy<Value = Model> {
    (1usize..5, 1usize..5)
        .prop_flat_map(|(n, m)| {
            (
                vec(1.0f64..20.0, n),
                vec(vec(0.5f64..10.0, n), m),
                vec(10.0f64..2000.0, m),
            )
        })
        .prop_map(|(profit, matrix, bounds)| {
            let names: Vec<String> = (0..profit.len()).map(|i| format!("a{}", i)).collect();
            let mut table = CoefficientTable::new(Direction::Maximize, names);
            table.set_objective(profit);
            for (j, (row, bound)) in matrix.into_iter().zip(bounds).enumerate() {
                table.add_row(format!("r{}", j), row, Relation::Le, bound);
            }
            table.to_model().unwrap()
        })
}

/// Minimize with positive data and `>=` rows: always feasible and bounded
fn covering() -> impl Strategy<Value = Model> {
    (1usize..5, 1usize..5)
        .prop_flat_map(|(n, m)| {
            (
                vec(1.0f64..20.0, n),
                vec(vec(0.5f64..10.0, n), m),
                vec(1.0f64..500.0, m),
            )
        })
        .prop_map(|(cost, matrix, bounds)| {
            let names: Vec<String> = (0..cost.len()).map(|i| format!("a{}", i)).collect();
            let mut table = CoefficientTable::new(Direction::Minimize, names);
            table.set_objective(cost);
            for (j, (row, bound)) in matrix.into_iter().zip(bounds).enumerate() {
                table.add_row(format!("r{}", j), row, Relation::Ge, bound);
            }
            table.to_model().unwrap()
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn optimal_usage_stays_within_bounds(model in allocation()) {
        let solution = Solver::new().solve(&model);
        prop_assert_eq!(solution.status, SolutionStatus::Optimal);

        let report = report(&model, &solution);
        prop_assert!(report.is_consistent(), "{:?}", report.warnings);
        for row in &report.resources {
            prop_assert!(row.usage <= row.bound + 1e-6 * row.bound.max(1.0));
        }
    }

    #[test]
    fn covering_meets_requirements(model in covering()) {
        let solution = Solver::new().solve(&model);
        prop_assert_eq!(solution.status, SolutionStatus::Optimal);

        let report = report(&model, &solution);
        prop_assert!(report.is_consistent(), "{:?}", report.warnings);
        for row in &report.resources {
            prop_assert!(row.usage >= row.bound - 1e-6 * row.bound.max(1.0));
        }
    }

    #[test]
    fn resolving_is_idempotent(model in allocation()) {
        let solver = Solver::new();
        let first = solver.solve(&model);
        let second = solver.solve(&model);
        prop_assert_eq!(first.objective_value, second.objective_value);
        for (a, b) in first.values.iter().zip(&second.values) {
            prop_assert!((a - b).abs() < 1e-6);
        }
    }

    #[test]
    fn coefficient_change_keeps_dimensions(model in allocation(), value in 0.5f64..10.0) {
        let variant = model.with_coefficient(0, 0, value).unwrap();
        prop_assert_eq!(variant.num_activities(), model.num_activities());
        prop_assert_eq!(variant.num_constraints(), model.num_constraints());

        let solution = Solver::new().solve(&variant);
        prop_assert_eq!(solution.values.len(), model.num_activities());
    }

    #[test]
    fn added_share_limit_never_improves_maximum(model in allocation(), ratio in 0.05f64..0.95) {
        let solver = Solver::new();
        let base = solver.solve(&model);

        let row = share_row(model.num_activities(), 0, ratio).unwrap();
        let limited = model.with_constraint("share", row, Relation::Le, 0.0).unwrap();
        let constrained = solver.solve(&limited);

        prop_assert_eq!(constrained.status, SolutionStatus::Optimal);
        let slack = 1e-6 * base.objective_value.abs().max(1.0);
        prop_assert!(constrained.objective_value <= base.objective_value + slack);
    }
}
