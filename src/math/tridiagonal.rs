//! Thomas algorithm for tridiagonal systems, O(n) per solve.

use crate::core::PricingError;

/// In-place tridiagonal solve using caller-owned scratch buffers.
///
/// Row `i` reads `lower[i]·x[i-1] + diag[i]·x[i] + upper[i]·x[i+1] = rhs[i]`;
/// `lower[0]` and `upper[n-1]` are ignored.
///
/// # Errors
/// [`PricingError::InvalidInput`] on mismatched lengths, [`PricingError::NumericalError`]
/// on a vanishing pivot or a non-finite solution.
pub fn solve_tridiagonal_inplace(
    lower: &[f64],
    diag: &[f64],
    upper: &[f64],
    rhs: &[f64],
    c_star: &mut [f64],
    d_star: &mut [f64],
    out: &mut [f64],
) -> Result<(), PricingError> {
    let n = diag.len();
    if n == 0 {
        return Ok(());
    }
    if lower.len() != n
        || upper.len() != n
        || rhs.len() != n
        || c_star.len() != n
        || d_star.len() != n
        || out.len() != n
    {
        return Err(PricingError::InvalidInput(
            "tridiagonal input lengths must match".to_string(),
        ));
    }

    if diag[0].abs() <= 1.0e-14 || !diag[0].is_finite() {
        return Err(PricingError::NumericalError(
            "tridiagonal solver singular matrix".to_string(),
        ));
    }

    c_star[0] = if n > 1 { upper[0] / diag[0] } else { 0.0 };
    d_star[0] = rhs[0] / diag[0];

    for i in 1..n {
        let denom = diag[i] - lower[i] * c_star[i - 1];
        if denom.abs() <= 1.0e-14 || !denom.is_finite() {
            return Err(PricingError::NumericalError(format!(
                "tridiagonal solver singular matrix at row {i}"
            )));
        }
        c_star[i] = if i < n - 1 { upper[i] / denom } else { 0.0 };
        d_star[i] = (rhs[i] - lower[i] * d_star[i - 1]) / denom;
    }

    out[n - 1] = d_star[n - 1];
    for i in (0..n - 1).rev() {
        out[i] = d_star[i] - c_star[i] * out[i + 1];
    }

    if out.iter().any(|v| !v.is_finite()) {
        return Err(PricingError::NumericalError(
            "tridiagonal solve produced non-finite values".to_string(),
        ));
    }
    Ok(())
}
