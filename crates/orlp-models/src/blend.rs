//! Linearization of ratio constraints.
//!
//! A requirement such as "chairs may be at most 40% of all furniture",
//! `x_k / Σ x_i <= r`, is not linear. Multiplying through by the (non-negative)
//! denominator gives the equivalent row `x_k - r * Σ x_i <= 0`, which is what
//! these helpers produce.

use orlp_solver::ModelError;

/// Coefficients of `Σ_{i∈numerator} x_i - ratio * Σ_{i∈denominator} x_i` over `n` activities.
///
/// Pair the row with a right-hand side of zero: `<=` caps the ratio, `>=`
/// enforces a minimum. Activities may appear on both sides.
pub fn ratio_row(
    n: usize,
    numerator: &[usize],
    denominator: &[usize],
    ratio: f64,
) -> Result<Vec<f64>, ModelError> {
    if !ratio.is_finite() {
        return Err(ModelError::NonFinite {
            what: "ratio".to_string(),
            index: 0,
        });
    }

    let mut coeffs = vec![0.0; n];
    for &i in numerator {
        *slot(&mut coeffs, i)? += 1.0;
    }
    for &i in denominator {
        *slot(&mut coeffs, i)? -= ratio;
    }
    Ok(coeffs)
}

/// Row for `x_target / Σ_all x_i` against `ratio`
pub fn share_row(n: usize, target: usize, ratio: f64) -> Result<Vec<f64>, ModelError> {
    let all: Vec<usize> = (0..n).collect();
    ratio_row(n, &[target], &all, ratio)
}

fn slot(coeffs: &mut [f64], index: usize) -> Result<&mut f64, ModelError> {
    let len = coeffs.len();
    coeffs.get_mut(index).ok_or(ModelError::IndexOutOfRange {
        what: "activities".to_string(),
        index,
        len,
    })
}
