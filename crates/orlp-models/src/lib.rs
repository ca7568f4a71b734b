pub mod blend;
pub mod catalog;
pub mod error;
pub mod table;
pub mod transport;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use catalog::{Scenario, SCENARIOS};
pub use error::TableError;
pub use table::{CoefficientTable, TableRow};
pub use transport::{Balance, Node, TransportProblem};
