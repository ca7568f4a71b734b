//! Post-optimal analysis by re-solving perturbed variants of a model.

use crate::problem::Model;
use crate::report::report;
use crate::solution::Solution;
use crate::solver::Backend;

/// Marginal value of relaxing one constraint
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ShadowPrice {
    /// Constraint name
    pub constraint: String,
    /// Objective change per unit of RHS increase; `None` when the perturbed
    /// model has no optimal solution
    pub value: Option<f64>,
    /// Interpretation
    pub interpretation: String,
}

/// Detailed analysis of an optimal solution
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub shadow_prices: Vec<ShadowPrice>,
    /// Which constraints are binding (tight) at optimum
    pub binding_constraints: Vec<String>,
}

/// Analyze with a unit RHS step
pub fn analyze<B: Backend>(backend: &B, model: &Model, solution: &Solution) -> Option<Analysis> {
    analyze_with_step(backend, model, solution, 1.0)
}

/// Estimate shadow prices as `(z(b_j + step) - z(b)) / step` for each row.
///
/// Returns `None` unless `solution` is optimal. The estimate is exact while the
/// optimal basis survives the step.
pub fn analyze_with_step<B: Backend>(
    backend: &B,
    model: &Model,
    solution: &Solution,
    step: f64,
) -> Option<Analysis> {
    if !solution.is_optimal() || step == 0.0 || !step.is_finite() {
        return None;
    }

    let tolerance = 1e-9;
    let mut shadow_prices = Vec::with_capacity(model.num_constraints());

    for (j, c) in model.constraints().iter().enumerate() {
        let value = model
            .with_bound(j, c.rhs + step)
            .ok()
            .map(|variant| backend.solve(&variant))
            .filter(Solution::is_optimal)
            .map(|relaxed| (relaxed.objective_value - solution.objective_value) / step);

        let interpretation = match value {
            None => "Perturbed model has no optimal solution".to_string(),
            Some(v) if v.abs() < tolerance => "Non-binding constraint".to_string(),
            Some(v) if v > 0.0 => {
                format!("Increasing RHS by 1 unit would increase the objective by {:.4}", v)
            }
            Some(v) => format!("Increasing RHS by 1 unit would decrease the objective by {:.4}", -v),
        };

        shadow_prices.push(ShadowPrice {
            constraint: c.name.clone(),
            value: value.map(|v| if v.abs() < tolerance { 0.0 } else { v }),
            interpretation,
        });
    }

    let binding_constraints = report(model, solution)
        .binding_constraints()
        .into_iter()
        .map(str::to_string)
        .collect();

    Some(Analysis {
        shadow_prices,
        binding_constraints,
    })
}
