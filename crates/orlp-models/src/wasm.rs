//! WASM bindings
//!
//! Exposes table solving and the worked examples to JavaScript, returning
//! reports as plain objects.

use wasm_bindgen::prelude::*;

use crate::catalog;
use crate::table::CoefficientTable;
use orlp_solver::{report, Solver};

fn to_js<E: std::fmt::Display>(e: E) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Solve a coefficient table given as JSON and return the report
#[wasm_bindgen]
pub fn solve_json(source: &str) -> Result<JsValue, JsValue> {
    let table: CoefficientTable = serde_json::from_str(source).map_err(to_js)?;
    let model = table.to_model().map_err(to_js)?;
    let solution = Solver::new().solve(&model);
    serde_wasm_bindgen::to_value(&report(&model, &solution)).map_err(to_js)
}

/// Solve one of the built-in scenarios by name
#[wasm_bindgen]
pub fn solve_scenario(name: &str) -> Result<JsValue, JsValue> {
    let model = catalog::find(name).and_then(|s| s.model()).map_err(to_js)?;
    let solution = Solver::new().solve(&model);
    serde_wasm_bindgen::to_value(&report(&model, &solution)).map_err(to_js)
}

/// Names of the built-in scenarios
#[wasm_bindgen]
pub fn scenario_names() -> JsValue {
    serde_wasm_bindgen::to_value(&catalog::names()).unwrap_or(JsValue::NULL)
}
