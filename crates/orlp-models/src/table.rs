use std::collections::HashSet;
use std::fmt;

use orlp_solver::{build, Direction, Model, ModelError, Relation, VarBounds};

use crate::blend;
use crate::error::TableError;

/// One labelled constraint row of a coefficient table
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub name: String,
    /// Consumption or contribution rate per activity
    pub coefficients: Vec<f64>,
    pub relation: Relation,
    /// Availability or requirement
    pub bound: f64,
}

/// Labelled numeric data for one model: activity columns, objective row and
/// constraint rows.
///
/// Rows are stored as given; shapes are checked when the table is turned into
/// a [`Model`].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct CoefficientTable {
    pub direction: Direction,
    /// Activity (column) labels
    pub activities: Vec<String>,
    /// Profit or cost per unit of each activity
    pub objective: Vec<f64>,
    /// Per-activity bounds; empty means non-negative and unbounded above
    #[cfg_attr(feature = "serde", serde(default))]
    pub var_bounds: Vec<VarBounds>,
    pub rows: Vec<TableRow>,
}

impl CoefficientTable {
    pub fn new<S: Into<String>>(direction: Direction, activities: impl IntoIterator<Item = S>) -> Self {
        let activities: Vec<String> = activities.into_iter().map(Into::into).collect();
        let n = activities.len();
        Self {
            direction,
            activities,
            objective: vec![0.0; n],
            var_bounds: Vec::new(),
            rows: Vec::new(),
        }
    }

    pub fn set_objective(&mut self, coefficients: Vec<f64>) {
        self.objective = coefficients;
    }

    pub fn add_row(&mut self, name: impl Into<String>, coefficients: Vec<f64>, relation: Relation, bound: f64) {
        self.rows.push(TableRow {
            name: name.into(),
            coefficients,
            relation,
            bound,
        });
    }

    /// Add the linearized form of `Σ numerator / Σ denominator (relation) ratio`
    pub fn add_ratio_row(
        &mut self,
        name: impl Into<String>,
        numerator: &[&str],
        denominator: &[&str],
        relation: Relation,
        ratio: f64,
    ) -> Result<(), TableError> {
        let numerator = self.resolve(numerator)?;
        let denominator = self.resolve(denominator)?;
        let coefficients = blend::ratio_row(self.activities.len(), &numerator, &denominator, ratio)?;
        self.add_row(name, coefficients, relation, 0.0);
        Ok(())
    }

    pub fn set_bounds(&mut self, activity: &str, bounds: VarBounds) -> Result<(), TableError> {
        let index = self.activity_index(activity)?;
        if self.var_bounds.is_empty() {
            self.var_bounds = vec![VarBounds::default(); self.activities.len()];
        }
        match self.var_bounds.get_mut(index) {
            Some(slot) => {
                *slot = bounds;
                Ok(())
            }
            None => Err(ModelError::DimensionMismatch {
                what: "variable bounds".to_string(),
                expected: self.activities.len(),
                found: self.var_bounds.len(),
            }
            .into()),
        }
    }

    pub fn set_coefficient(&mut self, row: &str, activity: &str, value: f64) -> Result<(), TableError> {
        let col = self.activity_index(activity)?;
        let row = self
            .rows
            .iter_mut()
            .find(|r| r.name == row)
            .ok_or_else(|| TableError::UnknownRow(row.to_string()))?;
        match row.coefficients.get_mut(col) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(ModelError::DimensionMismatch {
                what: format!("constraint row {}", row.name),
                expected: col + 1,
                found: row.coefficients.len(),
            }
            .into()),
        }
    }

    pub fn activity_index(&self, activity: &str) -> Result<usize, TableError> {
        self.activities
            .iter()
            .position(|a| a == activity)
            .ok_or_else(|| TableError::UnknownActivity(activity.to_string()))
    }

    fn resolve(&self, names: &[&str]) -> Result<Vec<usize>, TableError> {
        names.iter().map(|name| self.activity_index(name)).collect()
    }

    /// Validate labels and shapes, then build the model
    pub fn to_model(&self) -> Result<Model, TableError> {
        check_unique(self.activities.iter())?;
        check_unique(self.rows.iter().map(|r| &r.name))?;

        let var_bounds = if self.var_bounds.is_empty() {
            vec![VarBounds::default(); self.activities.len()]
        } else {
            self.var_bounds.clone()
        };
        if var_bounds.len() != self.activities.len() {
            return Err(ModelError::DimensionMismatch {
                what: "variable bounds".to_string(),
                expected: self.activities.len(),
                found: var_bounds.len(),
            }
            .into());
        }
        if self.objective.len() != self.activities.len() {
            return Err(ModelError::DimensionMismatch {
                what: "objective".to_string(),
                expected: self.activities.len(),
                found: self.objective.len(),
            }
            .into());
        }

        let matrix: Vec<Vec<f64>> = self.rows.iter().map(|r| r.coefficients.clone()).collect();
        let relations: Vec<Relation> = self.rows.iter().map(|r| r.relation).collect();
        let bounds: Vec<f64> = self.rows.iter().map(|r| r.bound).collect();
        let row_names: Vec<&str> = self.rows.iter().map(|r| r.name.as_str()).collect();

        let model = build(self.direction, &self.objective, &matrix, &relations, &bounds, &var_bounds)
            .map_err(|e| self.name_row_error(e))?
            .with_names(&self.activities, &row_names)?;
        Ok(model)
    }

    /// Replace `constraint row j` in shape errors with the row's label
    fn name_row_error(&self, err: ModelError) -> ModelError {
        match err {
            ModelError::DimensionMismatch { what, expected, found } => {
                let what = what
                    .strip_prefix("constraint row ")
                    .and_then(|j| j.parse::<usize>().ok())
                    .and_then(|j| self.rows.get(j))
                    .map(|r| format!("row {}", r.name))
                    .unwrap_or(what);
                ModelError::DimensionMismatch { what, expected, found }
            }
            other => other,
        }
    }
}

fn check_unique<'a>(labels: impl Iterator<Item = &'a String>) -> Result<(), TableError> {
    let mut seen = HashSet::new();
    for label in labels {
        if !seen.insert(label.as_str()) {
            return Err(TableError::DuplicateLabel(label.clone()));
        }
    }
    Ok(())
}

impl fmt::Display for CoefficientTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .activities
            .iter()
            .map(|a| a.chars().count())
            .max()
            .unwrap_or(0)
            .max(8);
        let objective_label = match self.direction {
            Direction::Maximize => "Profit",
            Direction::Minimize => "Cost",
        };

        write!(f, "  {:20}", "")?;
        for a in &self.activities {
            write!(f, " {:>width$}", a, width = width)?;
        }
        writeln!(f, " {:>4} {:>12}", "", "Bound")?;

        write!(f, "  {:20}", objective_label)?;
        for c in &self.objective {
            write!(f, " {:>width$.2}", c, width = width)?;
        }
        writeln!(f, " ({})", self.direction)?;

        for row in &self.rows {
            write!(f, "  {:20}", row.name)?;
            for c in &row.coefficients {
                write!(f, " {:>width$.2}", c, width = width)?;
            }
            writeln!(f, " {:>4} {:>12.2}", row.relation.symbol(), row.bound)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn furniture() -> CoefficientTable {
        let mut table = CoefficientTable::new(Direction::Maximize, ["Chairs", "Desks", "Tables"]);
        table.set_objective(vec![20.0, 14.0, 16.0]);
        table.add_row("Fabrication", vec![6.0, 2.0, 4.0], Relation::Le, 2000.0);
        table.add_row("Assembly", vec![8.0, 6.0, 4.0], Relation::Le, 2000.0);
        table
    }

    #[test]
    fn test_to_model_carries_labels() {
        let model = furniture().to_model().unwrap();
        assert_eq!(model.num_activities(), 3);
        assert_eq!(model.num_constraints(), 2);
        assert_eq!(model.activities()[2].name, "Tables");
        assert_eq!(model.constraints()[1].name, "Assembly");
        assert_eq!(model.coefficient(1, 0), Some(8.0));
    }

    #[test]
    fn test_short_row_reports_its_label() {
        let mut table = furniture();
        table.add_row("Wood", vec![40.0, 25.0], Relation::Le, 9600.0);
        let err = table.to_model().unwrap_err();
        assert_eq!(
            err,
            TableError::Model(ModelError::DimensionMismatch {
                what: "row Wood".to_string(),
                expected: 3,
                found: 2,
            })
        );
    }

    #[test]
    fn test_duplicate_labels() {
        let mut table = furniture();
        table.add_row("Assembly", vec![1.0, 1.0, 1.0], Relation::Le, 1.0);
        assert_eq!(
            table.to_model().unwrap_err(),
            TableError::DuplicateLabel("Assembly".to_string())
        );
    }

    #[test]
    fn test_ratio_row_and_coefficient_edit() {
        let mut table = furniture();
        table
            .add_ratio_row("Chair share", &["Chairs"], &["Chairs", "Desks", "Tables"], Relation::Le, 0.4)
            .unwrap();
        let row = &table.rows[2];
        assert!((row.coefficients[0] - 0.6).abs() < 1e-12);
        assert_eq!(row.bound, 0.0);

        table.set_coefficient("Assembly", "Desks", 7.0).unwrap();
        assert_eq!(table.rows[1].coefficients[1], 7.0);
        assert_eq!(
            table.set_coefficient("Paint", "Desks", 1.0).unwrap_err(),
            TableError::UnknownRow("Paint".to_string())
        );
        assert_eq!(
            table.add_ratio_row("bad", &["Sofas"], &["Chairs"], Relation::Le, 0.5).unwrap_err(),
            TableError::UnknownActivity("Sofas".to_string())
        );
    }

    #[test]
    fn test_bounds_per_activity() {
        let mut table = furniture();
        table.set_bounds("Desks", VarBounds::at_most(50.0)).unwrap();
        let model = table.to_model().unwrap();
        assert_eq!(model.activities()[1].bounds.upper, Some(50.0));
        assert_eq!(model.activities()[0].bounds, VarBounds::default());
    }

    #[test]
    fn test_display_has_labels() {
        let text = furniture().to_string();
        assert!(text.contains("Chairs"));
        assert!(text.contains("Profit"));
        assert!(text.contains("Fabrication"));
        assert!(text.contains("2000.00"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_json_table() {
        let source = r#"{
            "direction": "minimize",
            "activities": ["oats", "corn"],
            "objective": [2, 3],
            "rows": [
                { "name": "protein", "coefficients": [3, 4], "relation": ">=", "bound": 60 }
            ]
        }"#;
        let table: CoefficientTable = serde_json::from_str(source).unwrap();
        assert_eq!(table.rows[0].relation, Relation::Ge);
        assert!(table.var_bounds.is_empty());
        assert_eq!(table.to_model().unwrap().num_constraints(), 1);

        let bad = source.replace("\">=\"", "\"<>\"");
        let err = serde_json::from_str::<CoefficientTable>(&bad).unwrap_err();
        assert!(err.to_string().contains("Invalid relation"), "{}", err);
    }
}
