use microlp::{ComparisonOp, OptimizationDirection, Problem, Variable};

use crate::error::SolverError;
use crate::problem::{Activity, Direction, Model, Relation};
use crate::solution::Solution;

/// A declare-then-solve LP/MIP capability.
///
/// Infeasibility and unboundedness come back as solution statuses; only a
/// failure inside the backend itself yields `SolutionStatus::Error`.
pub trait Backend {
    fn solve(&self, model: &Model) -> Solution;
}

/// Default backend, delegating to `microlp` (dual simplex with
/// branch-and-bound for integer activities)
#[derive(Debug, Clone)]
pub struct Solver {
    /// Tolerance for floating point comparisons
    tolerance: f64,
}

impl Default for Solver {
    fn default() -> Self {
        Self { tolerance: 1e-9 }
    }
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = tol;
        self
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn solve(&self, model: &Model) -> Solution {
        log::debug!(
            "solving {} model: {} activities, {} constraints",
            model.direction(),
            model.num_activities(),
            model.num_constraints()
        );

        // Open integer ranges are capped at the i32 limits by the backend, so
        // unboundedness has to be read off the continuous relaxation.
        let open_integer = model.activities().iter().any(has_open_integer_range);
        if open_integer {
            let relaxed = self.run(model, false);
            if !relaxed.is_optimal() {
                log::info!("relaxation finished: {}", relaxed.status);
                return relaxed;
            }
        }

        let mut solution = self.run(model, true);
        if open_integer && solution.is_optimal() {
            if let Some(error) = capped_activity(model, &solution.values) {
                solution = Solution::failed(error);
            }
        }

        log::info!("solve finished: {} (objective {})", solution.status, solution.objective_value);
        solution
    }

    /// Declare the model to the backend and solve it once
    fn run(&self, model: &Model, integral: bool) -> Solution {
        let mut problem = Problem::new(match model.direction() {
            Direction::Maximize => OptimizationDirection::Maximize,
            Direction::Minimize => OptimizationDirection::Minimize,
        });

        let vars: Vec<Variable> = model
            .activities()
            .iter()
            .map(|a| add_activity(&mut problem, a, integral))
            .collect();

        for c in model.constraints() {
            let terms: Vec<(Variable, f64)> = vars
                .iter()
                .zip(&c.coefficients)
                .filter(|(_, a)| **a != 0.0)
                .map(|(&v, &a)| (v, a))
                .collect();

            // The backend rejects rows without terms; decide them here.
            if terms.is_empty() {
                if c.relation.is_satisfied(0.0, c.rhs, self.tolerance) {
                    continue;
                }
                log::warn!("constraint {} has no terms and cannot hold: 0 {} {}", c.name, c.relation, c.rhs);
                return Solution::infeasible();
            }

            problem.add_constraint(terms, comparison(c.relation), c.rhs);
        }

        match problem.solve() {
            Ok(solved) => {
                let values = vars
                    .iter()
                    .zip(model.activities())
                    .map(|(&v, a)| self.clean(solved[v], integral && a.bounds.integer))
                    .collect();
                Solution::optimal(values, solved.objective())
            }
            Err(microlp::Error::Infeasible) => Solution::infeasible(),
            Err(microlp::Error::Unbounded) => Solution::unbounded(),
            Err(other) => Solution::failed(SolverError(other.to_string())),
        }
    }

    fn clean(&self, value: f64, integer: bool) -> f64 {
        if integer {
            let rounded = value.round();
            if (rounded - value).abs() < 1e-6 {
                return rounded;
            }
        }
        if value.abs() < self.tolerance { 0.0 } else { value }
    }
}

impl Backend for Solver {
    fn solve(&self, model: &Model) -> Solution {
        Solver::solve(self, model)
    }
}

/// Solve with the default backend
pub fn solve(model: &Model) -> Solution {
    Solver::new().solve(model)
}

fn add_activity(problem: &mut Problem, activity: &Activity, integral: bool) -> Variable {
    let bounds = activity.bounds;
    let upper = bounds.upper.unwrap_or(f64::INFINITY);
    if integral && bounds.integer {
        // Finite bounds fit i32 (checked at build); open ends saturate.
        problem.add_integer_var(activity.objective, (bounds.lower.ceil() as i32, upper.floor() as i32))
    } else {
        problem.add_var(activity.objective, (bounds.lower, upper))
    }
}

fn has_open_integer_range(activity: &Activity) -> bool {
    activity.bounds.integer && (activity.bounds.upper.is_none() || activity.bounds.lower == f64::NEG_INFINITY)
}

/// An integer activity sitting on a saturated i32 limit is not a real optimum
fn capped_activity(model: &Model, values: &[f64]) -> Option<SolverError> {
    model
        .activities()
        .iter()
        .zip(values)
        .filter(|(a, _)| has_open_integer_range(a))
        .find(|&(a, &v)| {
            (a.bounds.upper.is_none() && v >= f64::from(i32::MAX))
                || (a.bounds.lower == f64::NEG_INFINITY && v <= f64::from(i32::MIN))
        })
        .map(|(a, &v)| {
            SolverError(format!(
                "integer activity {} reached the backend's integer limit at {}",
                a.name, v
            ))
        })
}

fn comparison(relation: Relation) -> ComparisonOp {
    match relation {
        Relation::Le => ComparisonOp::Le,
        Relation::Ge => ComparisonOp::Ge,
        Relation::Eq => ComparisonOp::Eq,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::{build, VarBounds};
    use crate::solution::SolutionStatus;

    #[test]
    fn test_simple_maximization() {
        // Maximize: 3x + 2y
        // Subject to:
        //   x + y <= 4
        //   x <= 3
        //   y <= 3
        // Optimal: x=3, y=1, obj=11
        let model = build(
            Direction::Maximize,
            &[3.0, 2.0],
            &[vec![1.0, 1.0], vec![1.0, 0.0], vec![0.0, 1.0]],
            &[Relation::Le; 3],
            &[4.0, 3.0, 3.0],
            &[VarBounds::default(); 2],
        )
        .unwrap();

        let solution = Solver::new().solve(&model);

        assert_eq!(solution.status, SolutionStatus::Optimal);
        assert!((solution.values[0] - 3.0).abs() < 1e-6, "x = {} (expected 3)", solution.values[0]);
        assert!((solution.values[1] - 1.0).abs() < 1e-6, "y = {} (expected 1)", solution.values[1]);
        assert!((solution.objective_value - 11.0).abs() < 1e-6, "obj = {} (expected 11)", solution.objective_value);
    }

    #[test]
    fn test_minimization_with_ge() {
        // Minimize: 2x + 3y
        // Subject to:
        //   x + y >= 4
        //   x <= 3
        //   y <= 3
        // Optimal: x=3, y=1, obj=9
        let model = build(
            Direction::Minimize,
            &[2.0, 3.0],
            &[vec![1.0, 1.0], vec![1.0, 0.0], vec![0.0, 1.0]],
            &[Relation::Ge, Relation::Le, Relation::Le],
            &[4.0, 3.0, 3.0],
            &[VarBounds::default(); 2],
        )
        .unwrap();

        let solution = solve(&model);

        assert_eq!(solution.status, SolutionStatus::Optimal);
        assert!((solution.values[0] - 3.0).abs() < 1e-6);
        assert!((solution.values[1] - 1.0).abs() < 1e-6);
        assert!((solution.objective_value - 9.0).abs() < 1e-6);
    }

    #[test]
    fn test_infeasible() {
        // x >= 5
        // x <= 3
        let model = build(
            Direction::Minimize,
            &[1.0],
            &[vec![1.0], vec![1.0]],
            &[Relation::Ge, Relation::Le],
            &[5.0, 3.0],
            &[VarBounds::default()],
        )
        .unwrap();

        let solution = solve(&model);

        assert_eq!(solution.status, SolutionStatus::Infeasible);
        assert!(solution.values.is_empty());
        assert_eq!(solution.value(0), None);
    }

    #[test]
    fn test_unbounded() {
        // Maximize x + y with only x - y <= 1
        let model = build(
            Direction::Maximize,
            &[1.0, 1.0],
            &[vec![1.0, -1.0]],
            &[Relation::Le],
            &[1.0],
            &[VarBounds::default(); 2],
        )
        .unwrap();

        assert_eq!(solve(&model).status, SolutionStatus::Unbounded);
    }

    #[test]
    fn test_upper_bounds_respected() {
        let model = build(
            Direction::Maximize,
            &[1.0, 1.0],
            &[vec![1.0, 1.0]],
            &[Relation::Le],
            &[10.0],
            &[VarBounds::at_most(2.0), VarBounds::between(1.0, 3.0)],
        )
        .unwrap();

        let solution = solve(&model);
        assert!(solution.is_optimal());
        assert!((solution.values[0] - 2.0).abs() < 1e-6);
        assert!((solution.values[1] - 3.0).abs() < 1e-6);
        assert!((solution.objective_value - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_integer_activities() {
        // Maximize 3x + 2y, x + y <= 4.5, x <= 2.5, both integer.
        // LP relaxation gives 11.5; the integer optimum is x=2, y=2, obj=10.
        let model = build(
            Direction::Maximize,
            &[3.0, 2.0],
            &[vec![1.0, 1.0], vec![1.0, 0.0]],
            &[Relation::Le, Relation::Le],
            &[4.5, 2.5],
            &[VarBounds::default().integer(); 2],
        )
        .unwrap();

        let solution = solve(&model);
        assert!(solution.is_optimal());
        assert_eq!(solution.values, vec![2.0, 2.0]);
        assert!((solution.objective_value - 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_unbounded_integer_activities() {
        // Maximize x + y with only x - y <= 1, both integer
        let model = build(
            Direction::Maximize,
            &[1.0, 1.0],
            &[vec![1.0, -1.0]],
            &[Relation::Le],
            &[1.0],
            &[VarBounds::default().integer(); 2],
        )
        .unwrap();

        let solution = solve(&model);
        assert_eq!(solution.status, SolutionStatus::Unbounded);
        assert!(solution.values.is_empty());
    }

    #[test]
    fn test_integer_optimum_beyond_backend_range() {
        // Maximize x, x <= 5e9 as a row, x integer without an upper bound
        let model = build(
            Direction::Maximize,
            &[1.0],
            &[vec![1.0]],
            &[Relation::Le],
            &[5e9],
            &[VarBounds::default().integer()],
        )
        .unwrap();

        let solution = solve(&model);
        assert_eq!(solution.status, SolutionStatus::Error);
        let message = solution.error.unwrap().0;
        assert!(message.contains("x1"), "{}", message);
    }

    #[test]
    fn test_open_integer_range_within_limits() {
        // Same shape with a small row bound solves normally
        let model = build(
            Direction::Maximize,
            &[1.0],
            &[vec![2.0]],
            &[Relation::Le],
            &[7.0],
            &[VarBounds::default().integer()],
        )
        .unwrap();

        let solution = solve(&model);
        assert!(solution.is_optimal());
        assert_eq!(solution.values, vec![3.0]);
    }

    #[test]
    fn test_empty_rows_decided_locally() {
        let satisfiable = build(
            Direction::Maximize,
            &[1.0],
            &[vec![0.0], vec![1.0]],
            &[Relation::Le, Relation::Le],
            &[5.0, 2.0],
            &[VarBounds::default()],
        )
        .unwrap();
        let solution = solve(&satisfiable);
        assert!(solution.is_optimal());
        assert!((solution.values[0] - 2.0).abs() < 1e-6);

        let contradictory = satisfiable.with_bound(0, -1.0).unwrap();
        assert_eq!(solve(&contradictory).status, SolutionStatus::Infeasible);
    }

    #[test]
    fn test_repeated_solves_identical() {
        let model = build(
            Direction::Maximize,
            &[5.0, 4.0, 3.0],
            &[vec![2.0, 3.0, 1.0], vec![4.0, 1.0, 2.0], vec![3.0, 4.0, 2.0]],
            &[Relation::Le; 3],
            &[5.0, 11.0, 8.0],
            &[VarBounds::default(); 3],
        )
        .unwrap();

        let solver = Solver::new();
        let first = solver.solve(&model);
        let second = solver.solve(&model);
        assert_eq!(first.objective_value, second.objective_value);
        assert!((first.objective_value - 13.0).abs() < 1e-6);
        for (a, b) in first.values.iter().zip(&second.values) {
            assert!((a - b).abs() < 1e-6);
        }
    }
}
