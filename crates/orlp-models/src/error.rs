use orlp_solver::ModelError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TableError {
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("Duplicate label: {0}")]
    DuplicateLabel(String),
    #[error("Unknown activity: {0}")]
    UnknownActivity(String),
    #[error("Unknown row: {0}")]
    UnknownRow(String),
    #[error("Unknown scenario: {0}")]
    UnknownScenario(String),
}
