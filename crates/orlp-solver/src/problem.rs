use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// Whether the objective is maximized or minimized
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Maximize,
    Minimize,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Maximize => f.write_str("maximize"),
            Direction::Minimize => f.write_str("minimize"),
        }
    }
}

/// Relational operator of a constraint row
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// Less than or equal (<=)
    Le,
    /// Greater than or equal (>=)
    Ge,
    /// Equal (=)
    Eq,
}

impl Relation {
    pub fn symbol(self) -> &'static str {
        match self {
            Relation::Le => "<=",
            Relation::Ge => ">=",
            Relation::Eq => "=",
        }
    }

    /// How far `lhs` falls outside `rhs` under this relation. Zero when satisfied.
    pub fn violation(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            Relation::Le => (lhs - rhs).max(0.0),
            Relation::Ge => (rhs - lhs).max(0.0),
            Relation::Eq => (lhs - rhs).abs(),
        }
    }

    pub fn is_satisfied(self, lhs: f64, rhs: f64, tolerance: f64) -> bool {
        self.violation(lhs, rhs) <= tolerance * rhs.abs().max(1.0)
    }

    /// Parse a list of relation symbols, failing on the first unrecognized one
    pub fn parse_all<S: AsRef<str>>(symbols: &[S]) -> Result<Vec<Relation>, ModelError> {
        symbols.iter().map(|s| s.as_ref().parse()).collect()
    }
}

impl FromStr for Relation {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "<=" | "≤" | "le" => Ok(Relation::Le),
            ">=" | "≥" | "ge" => Ok(Relation::Ge),
            "=" | "==" | "eq" => Ok(Relation::Eq),
            other => Err(ModelError::InvalidRelation(other.to_string())),
        }
    }
}

impl TryFrom<String> for Relation {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Relation> for String {
    fn from(relation: Relation) -> Self {
        relation.symbol().to_string()
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Bounds on a single decision variable
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VarBounds {
    pub lower: f64,
    pub upper: Option<f64>,
    /// Restrict the variable to whole numbers
    pub integer: bool,
}

impl Default for VarBounds {
    fn default() -> Self {
        Self {
            lower: 0.0,
            upper: None,
            integer: false,
        }
    }
}

impl VarBounds {
    pub fn non_negative() -> Self {
        Self::default()
    }

    pub fn at_most(upper: f64) -> Self {
        Self {
            upper: Some(upper),
            ..Self::default()
        }
    }

    pub fn between(lower: f64, upper: f64) -> Self {
        Self {
            lower,
            upper: Some(upper),
            integer: false,
        }
    }

    pub fn integer(mut self) -> Self {
        self.integer = true;
        self
    }
}

/// A decision variable: name, objective coefficient and bounds
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Activity {
    pub name: String,
    pub objective: f64,
    pub bounds: VarBounds,
}

/// One row of the model: `Σ coefficients[i] * x_i  relation  rhs`
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    /// Name/label for the constraint (for reporting)
    pub name: String,
    pub coefficients: Vec<f64>,
    pub relation: Relation,
    pub rhs: f64,
}

impl Constraint {
    /// Left-hand side evaluated at `values`
    pub fn lhs(&self, values: &[f64]) -> f64 {
        self.coefficients
            .iter()
            .zip(values)
            .map(|(a, x)| a * x)
            .sum()
    }
}

/// A validated linear program.
///
/// Dimensions are fixed at construction. The `with_*` methods never mutate;
/// they return a new model for the scenario variant.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    direction: Direction,
    activities: Vec<Activity>,
    constraints: Vec<Constraint>,
}

/// Build a model from raw coefficient data.
///
/// Represents `direction Σ c_i x_i` subject to `Σ a_ji x_i (rel_j) b_j` for every
/// row `j`, with `var_bounds[i]` applied to each `x_i`. Activities are named
/// `x1..xN` and rows `c1..cM` until [`Model::with_names`] is applied.
pub fn build(
    direction: Direction,
    objective: &[f64],
    matrix: &[Vec<f64>],
    relations: &[Relation],
    bounds: &[f64],
    var_bounds: &[VarBounds],
) -> Result<Model, ModelError> {
    let n = objective.len();
    let m = matrix.len();

    if var_bounds.len() != n {
        return Err(ModelError::mismatch("variable bounds", n, var_bounds.len()));
    }
    if relations.len() != m {
        return Err(ModelError::mismatch("relations", m, relations.len()));
    }
    if bounds.len() != m {
        return Err(ModelError::mismatch("constraint bounds", m, bounds.len()));
    }
    for (j, row) in matrix.iter().enumerate() {
        if row.len() != n {
            return Err(ModelError::mismatch(format!("constraint row {}", j), n, row.len()));
        }
        check_finite(row, &format!("constraint row {}", j))?;
    }
    check_finite(objective, "objective")?;
    check_finite(bounds, "constraint bounds")?;

    let mut activities = Vec::with_capacity(n);
    for (i, (&c, &vb)) in objective.iter().zip(var_bounds).enumerate() {
        let name = format!("x{}", i + 1);
        check_var_bounds(&name, vb)?;
        activities.push(Activity {
            name,
            objective: c,
            bounds: vb,
        });
    }

    let constraints = matrix
        .iter()
        .zip(relations)
        .zip(bounds)
        .enumerate()
        .map(|(j, ((row, &relation), &rhs))| Constraint {
            name: format!("c{}", j + 1),
            coefficients: row.clone(),
            relation,
            rhs,
        })
        .collect();

    log::debug!("built {} model with {} activities and {} constraints", direction, n, m);

    Ok(Model {
        direction,
        activities,
        constraints,
    })
}

fn check_finite(values: &[f64], what: &str) -> Result<(), ModelError> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(ModelError::NonFinite {
            what: what.to_string(),
            index,
        }),
        None => Ok(()),
    }
}

fn check_var_bounds(name: &str, vb: VarBounds) -> Result<(), ModelError> {
    let upper = vb.upper.unwrap_or(f64::INFINITY);
    if vb.lower.is_nan() || upper.is_nan() || vb.lower == f64::INFINITY {
        return Err(ModelError::NonFinite {
            what: format!("bounds of {}", name),
            index: 0,
        });
    }
    if vb.lower > upper {
        return Err(ModelError::InvalidBound {
            activity: name.to_string(),
            lower: vb.lower,
            upper,
        });
    }
    if vb.integer {
        let range = f64::from(i32::MIN)..=f64::from(i32::MAX);
        for bound in [vb.lower.ceil(), upper.floor()] {
            if bound.is_finite() && !range.contains(&bound) {
                return Err(ModelError::IntegerRange {
                    activity: name.to_string(),
                    bound,
                });
            }
        }
    }
    Ok(())
}

impl Model {
    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn num_activities(&self) -> usize {
        self.activities.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    pub fn objective(&self) -> Vec<f64> {
        self.activities.iter().map(|a| a.objective).collect()
    }

    pub fn coefficient(&self, row: usize, col: usize) -> Option<f64> {
        self.constraints.get(row)?.coefficients.get(col).copied()
    }

    pub fn activity_index(&self, name: &str) -> Option<usize> {
        self.activities.iter().position(|a| a.name == name)
    }

    pub fn constraint_index(&self, name: &str) -> Option<usize> {
        self.constraints.iter().position(|c| c.name == name)
    }

    /// Objective function evaluated at `values`
    pub fn objective_value(&self, values: &[f64]) -> f64 {
        self.activities
            .iter()
            .zip(values)
            .map(|(a, x)| a.objective * x)
            .sum()
    }

    /// Attach labels to activities and constraints
    pub fn with_names<A, C>(mut self, activities: &[A], constraints: &[C]) -> Result<Self, ModelError>
    where
        A: AsRef<str>,
        C: AsRef<str>,
    {
        if activities.len() != self.activities.len() {
            return Err(ModelError::mismatch(
                "activity names",
                self.activities.len(),
                activities.len(),
            ));
        }
        if constraints.len() != self.constraints.len() {
            return Err(ModelError::mismatch(
                "constraint names",
                self.constraints.len(),
                constraints.len(),
            ));
        }
        for (a, name) in self.activities.iter_mut().zip(activities) {
            a.name = name.as_ref().to_string();
        }
        for (c, name) in self.constraints.iter_mut().zip(constraints) {
            c.name = name.as_ref().to_string();
        }
        Ok(self)
    }

    /// Variant with a single constraint coefficient replaced
    pub fn with_coefficient(&self, row: usize, col: usize, value: f64) -> Result<Self, ModelError> {
        self.check_row(row)?;
        self.check_col(col)?;
        check_finite(&[value], "coefficient")?;
        let mut model = self.clone();
        model.constraints[row].coefficients[col] = value;
        Ok(model)
    }

    /// Variant with a single objective coefficient replaced
    pub fn with_objective_coefficient(&self, col: usize, value: f64) -> Result<Self, ModelError> {
        self.check_col(col)?;
        check_finite(&[value], "objective")?;
        let mut model = self.clone();
        model.activities[col].objective = value;
        Ok(model)
    }

    /// Variant with a different right-hand side on one row
    pub fn with_bound(&self, row: usize, rhs: f64) -> Result<Self, ModelError> {
        self.check_row(row)?;
        check_finite(&[rhs], "constraint bounds")?;
        let mut model = self.clone();
        model.constraints[row].rhs = rhs;
        Ok(model)
    }

    /// Variant with different bounds on one activity
    pub fn with_var_bounds(&self, col: usize, bounds: VarBounds) -> Result<Self, ModelError> {
        self.check_col(col)?;
        check_var_bounds(&self.activities[col].name, bounds)?;
        let mut model = self.clone();
        model.activities[col].bounds = bounds;
        Ok(model)
    }

    /// Variant with one additional row appended
    pub fn with_constraint(
        &self,
        name: impl Into<String>,
        coefficients: Vec<f64>,
        relation: Relation,
        rhs: f64,
    ) -> Result<Self, ModelError> {
        let name = name.into();
        if coefficients.len() != self.activities.len() {
            return Err(ModelError::mismatch(
                format!("constraint {}", name),
                self.activities.len(),
                coefficients.len(),
            ));
        }
        check_finite(&coefficients, &format!("constraint {}", name))?;
        check_finite(&[rhs], &format!("bound of {}", name))?;
        let mut model = self.clone();
        model.constraints.push(Constraint {
            name,
            coefficients,
            relation,
            rhs,
        });
        Ok(model)
    }

    fn check_row(&self, row: usize) -> Result<(), ModelError> {
        if row >= self.constraints.len() {
            return Err(ModelError::IndexOutOfRange {
                what: "constraints".to_string(),
                index: row,
                len: self.constraints.len(),
            });
        }
        Ok(())
    }

    fn check_col(&self, col: usize) -> Result<(), ModelError> {
        if col >= self.activities.len() {
            return Err(ModelError::IndexOutOfRange {
                what: "activities".to_string(),
                index: col,
                len: self.activities.len(),
            });
        }
        Ok(())
    }
}
