//! Worked examples: furniture production, its blending and painting
//! variants, a least-cost feed mix, and small transportation problems.

use orlp_solver::{Direction, Model, Relation};

use crate::error::TableError;
use crate::table::CoefficientTable;
use crate::transport::{Node, TransportProblem};

/// A named, ready-to-build example
#[derive(Debug, Clone, Copy)]
pub struct Scenario {
    pub name: &'static str,
    pub description: &'static str,
    table: fn() -> Result<CoefficientTable, TableError>,
}

impl Scenario {
    pub fn table(&self) -> Result<CoefficientTable, TableError> {
        (self.table)()
    }

    pub fn model(&self) -> Result<Model, TableError> {
        self.table()?.to_model()
    }
}

pub const SCENARIOS: &[Scenario] = &[
    Scenario {
        name: "furniture",
        description: "Chairs, desks and tables competing for four resources (allocation)",
        table: furniture,
    },
    Scenario {
        name: "furniture-blend",
        description: "Furniture with chairs limited to 40% of total production",
        table: furniture_blend,
    },
    Scenario {
        name: "furniture-frames",
        description: "Four products including frames, with a painting department",
        table: furniture_frames,
    },
    Scenario {
        name: "furniture-frames-paint",
        description: "Four products with chairs taking 20 hours of painting",
        table: furniture_frames_paint,
    },
    Scenario {
        name: "feed-mix",
        description: "Least-cost feed meeting protein, fiber and fat requirements (covering)",
        table: feed_mix,
    },
    Scenario {
        name: "transport-balanced",
        description: "Two plants and three markets with equal supply and demand",
        table: transport_balanced,
    },
    Scenario {
        name: "transport-supply",
        description: "Supply-constrained transportation: every plant ships its full supply",
        table: transport_supply_constrained,
    },
    Scenario {
        name: "transport-demand",
        description: "Demand-constrained transportation: every market receives its full demand",
        table: transport_demand_constrained,
    },
    Scenario {
        name: "transport-infeasible",
        description: "Supply-constrained transportation forced to equality on both sides",
        table: transport_infeasible,
    },
];

pub fn find(name: &str) -> Result<&'static Scenario, TableError> {
    SCENARIOS
        .iter()
        .find(|s| s.name == name)
        .ok_or_else(|| TableError::UnknownScenario(name.to_string()))
}

pub fn names() -> Vec<&'static str> {
    SCENARIOS.iter().map(|s| s.name).collect()
}

pub fn furniture() -> Result<CoefficientTable, TableError> {
    let mut table = CoefficientTable::new(Direction::Maximize, ["Chairs", "Desks", "Tables"]);
    table.set_objective(vec![20.0, 14.0, 16.0]);
    table.add_row("Fabrication", vec![6.0, 2.0, 4.0], Relation::Le, 2000.0);
    table.add_row("Assembly", vec![8.0, 6.0, 4.0], Relation::Le, 2000.0);
    table.add_row("Machining", vec![6.0, 4.0, 8.0], Relation::Le, 1440.0);
    table.add_row("Wood", vec![40.0, 25.0, 25.0], Relation::Le, 9600.0);
    Ok(table)
}

/// Chairs / (Chairs + Desks + Tables) <= 40%
pub fn furniture_blend() -> Result<CoefficientTable, TableError> {
    let mut table = furniture()?;
    table.add_ratio_row(
        "Chair share",
        &["Chairs"],
        &["Chairs", "Desks", "Tables"],
        Relation::Le,
        0.4,
    )?;
    Ok(table)
}

pub fn furniture_frames() -> Result<CoefficientTable, TableError> {
    let mut table = CoefficientTable::new(Direction::Maximize, ["Chairs", "Desks", "Frames", "Tables"]);
    table.set_objective(vec![20.0, 14.0, 3.0, 16.0]);
    table.add_row("Fabrication", vec![6.0, 5.0, 3.0, 4.0], Relation::Le, 1440.0);
    table.add_row("Assembly", vec![4.0, 3.0, 1.0, 5.0], Relation::Le, 1440.0);
    table.add_row("Machining", vec![2.0, 3.0, 1.0, 4.0], Relation::Le, 2000.0);
    table.add_row("Painting", vec![1.0, 3.0, 4.0, 1.0], Relation::Le, 1000.0);
    table.add_row("Wood", vec![50.0, 25.0, 5.0, 25.0], Relation::Le, 9600.0);
    Ok(table)
}

pub fn furniture_frames_paint() -> Result<CoefficientTable, TableError> {
    let mut table = furniture_frames()?;
    table.set_coefficient("Painting", "Chairs", 20.0)?;
    Ok(table)
}

pub fn feed_mix() -> Result<CoefficientTable, TableError> {
    let mut table = CoefficientTable::new(Direction::Minimize, ["Oats", "Corn", "Soy"]);
    table.set_objective(vec![2.0, 3.0, 4.0]);
    table.add_row("Protein", vec![3.0, 4.0, 5.0], Relation::Ge, 60.0);
    table.add_row("Fiber", vec![2.0, 1.0, 3.0], Relation::Ge, 30.0);
    table.add_row("Fat", vec![1.0, 3.0, 1.0], Relation::Ge, 24.0);
    Ok(table)
}

/// Two plants, three markets; unit costs per route
pub fn shipping(supply: [f64; 2], demand: [f64; 3]) -> TransportProblem {
    TransportProblem::new(
        vec![Node::new("Plant A", supply[0]), Node::new("Plant B", supply[1])],
        vec![
            Node::new("Alpha", demand[0]),
            Node::new("Beta", demand[1]),
            Node::new("Gamma", demand[2]),
        ],
        vec![vec![10.0, 7.0, 1.0], vec![4.0, 6.0, 3.0]],
    )
}

pub fn transport_balanced() -> Result<CoefficientTable, TableError> {
    shipping([50.0, 40.0], [30.0, 25.0, 35.0]).to_table()
}

pub fn transport_supply_constrained() -> Result<CoefficientTable, TableError> {
    shipping([50.0, 40.0], [30.0, 25.0, 45.0]).to_table()
}

pub fn transport_demand_constrained() -> Result<CoefficientTable, TableError> {
    shipping([60.0, 40.0], [30.0, 25.0, 35.0]).to_table()
}

pub fn transport_infeasible() -> Result<CoefficientTable, TableError> {
    shipping([50.0, 40.0], [30.0, 25.0, 45.0]).to_table_with(Relation::Eq, Relation::Eq)
}
