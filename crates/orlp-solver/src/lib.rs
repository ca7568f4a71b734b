mod analysis;
mod error;
mod problem;
mod report;
mod solution;
mod solver;

pub use analysis::{analyze, analyze_with_step, Analysis, ShadowPrice};
pub use error::{ModelError, SolverError};
pub use problem::{build, Activity, Constraint, Direction, Model, Relation, VarBounds};
pub use report::{report, report_with_tolerance, ActivityRow, ConsistencyWarning, Report, ResourceRow, DEFAULT_TOLERANCE};
pub use solution::{Solution, SolutionStatus};
pub use solver::{solve, Backend, Solver};
