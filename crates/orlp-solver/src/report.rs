use std::fmt;

use crate::problem::{Direction, Model, Relation};
use crate::solution::{Solution, SolutionStatus};

/// Relative tolerance used by [`report`]
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Decision value of one activity
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityRow {
    pub name: String,
    pub value: f64,
    /// Objective coefficient (profit or cost per unit)
    pub unit_objective: f64,
    /// `value * unit_objective`
    pub contribution: f64,
}

/// Derived usage of one constraint row
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceRow {
    pub name: String,
    /// `Σ_i a_ji x_i`
    pub usage: f64,
    pub relation: Relation,
    pub bound: f64,
    /// Distance from the bound on the feasible side
    pub slack: f64,
    /// Whether the row holds with equality at the solution
    pub binding: bool,
}

/// A reported quantity that disagrees with what the model requires
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ConsistencyWarning {
    /// Constraint or activity name
    pub subject: String,
    /// Required value (bound or expected count)
    pub required: f64,
    /// Actual value achieved
    pub actual: f64,
    /// How far outside the requirement
    pub excess: f64,
    pub description: String,
}

/// Labelled tables derived from a model and its solution
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub direction: Direction,
    pub status: SolutionStatus,
    pub objective_value: f64,
    pub activities: Vec<ActivityRow>,
    pub resources: Vec<ResourceRow>,
    pub warnings: Vec<ConsistencyWarning>,
    /// Backend message when status is `Error`
    pub error: Option<String>,
}

pub fn report(model: &Model, solution: &Solution) -> Report {
    report_with_tolerance(model, solution, DEFAULT_TOLERANCE)
}

/// Compute activity values, resource usage and consistency warnings.
///
/// Tolerances are relative to the magnitude of the bound, with an absolute
/// floor of `tolerance` for bounds smaller than one.
pub fn report_with_tolerance(model: &Model, solution: &Solution, tolerance: f64) -> Report {
    let mut report = Report {
        direction: model.direction(),
        status: solution.status,
        objective_value: solution.objective_value,
        activities: Vec::new(),
        resources: Vec::new(),
        warnings: Vec::new(),
        error: solution.error.as_ref().map(|e| e.0.clone()),
    };

    if solution.status != SolutionStatus::Optimal {
        return report;
    }

    if solution.values.len() != model.num_activities() {
        report.warnings.push(ConsistencyWarning {
            subject: "solution".to_string(),
            required: model.num_activities() as f64,
            actual: solution.values.len() as f64,
            excess: (model.num_activities() as f64 - solution.values.len() as f64).abs(),
            description: format!(
                "solution has {} values for {} activities",
                solution.values.len(),
                model.num_activities()
            ),
        });
        log::warn!("{}", report.warnings[0].description);
        return report;
    }

    let values = &solution.values;

    for (a, &value) in model.activities().iter().zip(values) {
        report.activities.push(ActivityRow {
            name: a.name.clone(),
            value,
            unit_objective: a.objective,
            contribution: a.objective * value,
        });

        let lower_gap = a.bounds.lower - value;
        if lower_gap > tolerance * a.bounds.lower.abs().max(1.0) {
            report.warnings.push(ConsistencyWarning {
                subject: a.name.clone(),
                required: a.bounds.lower,
                actual: value,
                excess: lower_gap,
                description: format!("{} is below its lower bound of {:.2} by {:.4}", a.name, a.bounds.lower, lower_gap),
            });
        }
        if let Some(upper) = a.bounds.upper {
            let upper_gap = value - upper;
            if upper_gap > tolerance * upper.abs().max(1.0) {
                report.warnings.push(ConsistencyWarning {
                    subject: a.name.clone(),
                    required: upper,
                    actual: value,
                    excess: upper_gap,
                    description: format!("{} exceeds its upper bound of {:.2} by {:.4}", a.name, upper, upper_gap),
                });
            }
        }
    }

    for c in model.constraints() {
        let usage = c.lhs(values);
        let scale = c.rhs.abs().max(1.0);
        let slack = match c.relation {
            Relation::Le => c.rhs - usage,
            Relation::Ge => usage - c.rhs,
            Relation::Eq => (c.rhs - usage).abs(),
        };
        let violation = c.relation.violation(usage, c.rhs);

        if violation > tolerance * scale {
            let description = match c.relation {
                Relation::Le => format!("{} exceeds maximum of {:.2} by {:.4}", c.name, c.rhs, violation),
                Relation::Ge => format!("{} is below minimum of {:.2} by {:.4}", c.name, c.rhs, violation),
                Relation::Eq => format!("{} requires exactly {:.2} but got {:.4}", c.name, c.rhs, usage),
            };
            report.warnings.push(ConsistencyWarning {
                subject: c.name.clone(),
                required: c.rhs,
                actual: usage,
                excess: violation,
                description,
            });
        }

        report.resources.push(ResourceRow {
            name: c.name.clone(),
            usage,
            relation: c.relation,
            bound: c.rhs,
            slack,
            binding: (usage - c.rhs).abs() <= tolerance * scale,
        });
    }

    // Worst first
    report
        .warnings
        .sort_by(|a, b| b.excess.partial_cmp(&a.excess).unwrap_or(std::cmp::Ordering::Equal));

    for w in &report.warnings {
        log::warn!("consistency warning: {}", w.description);
    }

    report
}

impl Report {
    /// Names of rows that hold with equality at the solution
    pub fn binding_constraints(&self) -> Vec<&str> {
        self.resources
            .iter()
            .filter(|r| r.binding)
            .map(|r| r.name.as_str())
            .collect()
    }

    pub fn is_consistent(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn usage(&self, constraint: &str) -> Option<f64> {
        self.resources
            .iter()
            .find(|r| r.name == constraint)
            .map(|r| r.usage)
    }

    pub fn value(&self, activity: &str) -> Option<f64> {
        self.activities
            .iter()
            .find(|a| a.name == activity)
            .map(|a| a.value)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Status: {}", self.status)?;
        match self.status {
            SolutionStatus::Optimal => {}
            SolutionStatus::Infeasible => {
                return writeln!(f, "No solution exists that satisfies all constraints.");
            }
            SolutionStatus::Unbounded => {
                return writeln!(f, "The problem has no finite optimal solution.");
            }
            SolutionStatus::Error => {
                return writeln!(
                    f,
                    "Solver encountered an error: {}",
                    self.error.as_deref().unwrap_or("unknown")
                );
            }
        }

        writeln!(f, "Objective ({}): {:.4}", self.direction, self.objective_value)?;
        writeln!(f)?;

        writeln!(f, "  {:20} {:>12} {:>12} {:>14}", "Activity", "Value", "Per unit", "Contribution")?;
        for a in &self.activities {
            writeln!(
                f,
                "  {:20} {:>12.4} {:>12.4} {:>14.4}",
                a.name, a.value, a.unit_objective, a.contribution
            )?;
        }
        writeln!(f)?;

        writeln!(f, "  {:20} {:>12} {:>4} {:>12} {:>12}", "Constraint", "Usage", "", "Bound", "Slack")?;
        for r in &self.resources {
            writeln!(
                f,
                "  {:20} {:>12.4} {:>4} {:>12.4} {:>12.4}{}",
                r.name,
                r.usage,
                r.relation.symbol(),
                r.bound,
                r.slack,
                if r.binding { "  (binding)" } else { "" }
            )?;
        }

        if !self.warnings.is_empty() {
            writeln!(f)?;
            writeln!(f, "Consistency warnings:")?;
            for w in &self.warnings {
                writeln!(f, "  - {}", w.description)?;
            }
        }
        Ok(())
    }
}
