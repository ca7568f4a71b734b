use crate::error::SolverError;

/// The result of solving a model.
///
/// Serialize-only: non-optimal solutions carry a `NaN` objective, written as
/// `null`.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// Solution status
    pub status: SolutionStatus,
    /// Optimal values for each activity (empty unless optimal)
    pub values: Vec<f64>,
    /// Optimal objective value
    pub objective_value: f64,
    /// Backend failure, populated when status is `Error`
    pub error: Option<SolverError>,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolutionStatus {
    /// An optimal solution was found
    Optimal,
    /// The problem is infeasible (no solution exists)
    Infeasible,
    /// The problem is unbounded
    Unbounded,
    /// Solver encountered an error
    Error,
}

impl std::fmt::Display for SolutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SolutionStatus::Optimal => "OPTIMAL",
            SolutionStatus::Infeasible => "INFEASIBLE",
            SolutionStatus::Unbounded => "UNBOUNDED",
            SolutionStatus::Error => "ERROR",
        };
        f.write_str(s)
    }
}

impl Solution {
    pub fn optimal(values: Vec<f64>, objective_value: f64) -> Self {
        Self {
            status: SolutionStatus::Optimal,
            values,
            objective_value,
            error: None,
        }
    }

    pub fn infeasible() -> Self {
        Self {
            status: SolutionStatus::Infeasible,
            values: Vec::new(),
            objective_value: f64::NAN,
            error: None,
        }
    }

    pub fn unbounded() -> Self {
        Self {
            status: SolutionStatus::Unbounded,
            values: Vec::new(),
            objective_value: f64::NAN,
            error: None,
        }
    }

    pub fn failed(error: SolverError) -> Self {
        Self {
            status: SolutionStatus::Error,
            values: Vec::new(),
            objective_value: f64::NAN,
            error: Some(error),
        }
    }

    pub fn is_optimal(&self) -> bool {
        self.status == SolutionStatus::Optimal
    }

    /// Value of activity `index`, or `None` when there is no optimal solution
    pub fn value(&self, index: usize) -> Option<f64> {
        if !self.is_optimal() {
            return None;
        }
        self.values.get(index).copied()
    }
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(Solution::infeasible()).unwrap();
        assert_eq!(json["status"], "Infeasible");
        assert!(json["objective_value"].is_null());
        assert!(json["error"].is_null());

        let json = serde_json::to_value(Solution::failed(SolverError("boom".to_string()))).unwrap();
        assert_eq!(json["status"], "Error");
        assert_eq!(json["error"], "boom");

        let json = serde_json::to_value(Solution::optimal(vec![1.5], 3.0)).unwrap();
        assert_eq!(json["values"][0], 1.5);
        assert_eq!(json["objective_value"], 3.0);
    }
}
