use orlp_solver::{Direction, Model, ModelError, Relation, Solution};

use crate::error::TableError;
use crate::table::CoefficientTable;

/// How total supply compares with total demand
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Balance {
    /// Total supply is less than total demand
    SupplyConstrained,
    /// Total supply exceeds total demand
    DemandConstrained,
    Balanced,
}

/// A source or destination with its supply or demand
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub name: String,
    pub amount: f64,
}

impl Node {
    pub fn new(name: impl Into<String>, amount: f64) -> Self {
        Self {
            name: name.into(),
            amount,
        }
    }
}

/// Minimum-cost shipment of goods from sources to destinations.
///
/// Activity `i * destinations.len() + j` is the quantity shipped from source
/// `i` to destination `j`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct TransportProblem {
    pub sources: Vec<Node>,
    pub destinations: Vec<Node>,
    /// `costs[i][j]`: unit cost from source `i` to destination `j`
    pub costs: Vec<Vec<f64>>,
}

impl TransportProblem {
    pub fn new(sources: Vec<Node>, destinations: Vec<Node>, costs: Vec<Vec<f64>>) -> Self {
        Self {
            sources,
            destinations,
            costs,
        }
    }

    pub fn total_supply(&self) -> f64 {
        self.sources.iter().map(|s| s.amount).sum()
    }

    pub fn total_demand(&self) -> f64 {
        self.destinations.iter().map(|d| d.amount).sum()
    }

    pub fn balance(&self) -> Balance {
        let supply = self.total_supply();
        let demand = self.total_demand();
        let tolerance = 1e-9 * supply.abs().max(demand.abs()).max(1.0);
        if (supply - demand).abs() <= tolerance {
            Balance::Balanced
        } else if supply < demand {
            Balance::SupplyConstrained
        } else {
            Balance::DemandConstrained
        }
    }

    /// Relations for the (supply, demand) rows.
    ///
    /// The scarce side must ship or receive exactly its amount while the other
    /// side is capped. A balanced problem uses equality on both sides.
    pub fn relations(&self) -> (Relation, Relation) {
        match self.balance() {
            Balance::SupplyConstrained => (Relation::Eq, Relation::Le),
            Balance::DemandConstrained => (Relation::Le, Relation::Eq),
            Balance::Balanced => (Relation::Eq, Relation::Eq),
        }
    }

    /// Activity label of the route from `source` to `destination`
    pub fn route_name(&self, source: usize, destination: usize) -> Option<String> {
        let from = self.sources.get(source)?;
        let to = self.destinations.get(destination)?;
        Some(route(from, to))
    }

    pub fn to_table(&self) -> Result<CoefficientTable, TableError> {
        let (supply, demand) = self.relations();
        self.to_table_with(supply, demand)
    }

    /// Build with explicit relations, e.g. equality on both sides of an
    /// unbalanced problem (which is infeasible).
    pub fn to_table_with(&self, supply: Relation, demand: Relation) -> Result<CoefficientTable, TableError> {
        let m = self.sources.len();
        let n = self.destinations.len();

        if self.costs.len() != m {
            return Err(ModelError::DimensionMismatch {
                what: "cost rows".to_string(),
                expected: m,
                found: self.costs.len(),
            }
            .into());
        }
        if let Some((i, row)) = self.costs.iter().enumerate().find(|(_, row)| row.len() != n) {
            return Err(ModelError::DimensionMismatch {
                what: format!("costs from {}", self.sources[i].name),
                expected: n,
                found: row.len(),
            }
            .into());
        }

        let routes: Vec<String> = self
            .sources
            .iter()
            .flat_map(|from| self.destinations.iter().map(move |to| route(from, to)))
            .collect();

        let mut table = CoefficientTable::new(Direction::Minimize, routes);
        table.set_objective(self.costs.iter().flatten().copied().collect());

        for (i, source) in self.sources.iter().enumerate() {
            let coefficients = (0..m * n).map(|k| if k / n == i { 1.0 } else { 0.0 }).collect();
            table.add_row(format!("{} supply", source.name), coefficients, supply, source.amount);
        }
        for (j, destination) in self.destinations.iter().enumerate() {
            let coefficients = (0..m * n).map(|k| if k % n == j { 1.0 } else { 0.0 }).collect();
            table.add_row(format!("{} demand", destination.name), coefficients, demand, destination.amount);
        }

        log::debug!(
            "transportation table: {} routes, supply {} vs demand {} ({:?})",
            m * n,
            self.total_supply(),
            self.total_demand(),
            self.balance()
        );
        Ok(table)
    }

    pub fn to_model(&self) -> Result<Model, TableError> {
        self.to_table()?.to_model()
    }

    /// Reshape an optimal solution into `shipments[source][destination]`
    pub fn shipments(&self, solution: &Solution) -> Option<Vec<Vec<f64>>> {
        let n = self.destinations.len();
        if !solution.is_optimal() || solution.values.len() != self.sources.len() * n {
            return None;
        }
        Some(solution.values.chunks(n.max(1)).map(<[f64]>::to_vec).collect())
    }
}

fn route(from: &Node, to: &Node) -> String {
    format!("{}->{}", from.name, to.name)
}
