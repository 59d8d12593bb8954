//! Least-squares solving for the Levenberg–Marquardt step.
//!
//! Each damped step solves the 2×2 normal-equation system
//!
//! ```text
//! (JᵀWJ + λ diag(JᵀWJ)) δ = JᵀW r
//! ```
//!
//! Implementation choices:
//! - We solve via SVD rather than direct inversion so that near-singular
//!   systems (e.g. all observations deep in saturation, where the Km column
//!   nearly vanishes) degrade gracefully instead of producing garbage steps.
//! - Parameter dimension is 2, so SVD cost is irrelevant.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if the strict solve fails.
    for &tol in &[1e-12, 1e-10, 1e-8] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Invert a small symmetric positive-definite matrix (the Gauss–Newton
/// approximation `JᵀWJ`), used for the parameter covariance.
///
/// Returns `None` if the matrix is singular or the inverse is non-finite.
pub fn invert_normal_matrix(a: &DMatrix<f64>) -> Option<DMatrix<f64>> {
    let inv = a.clone().try_inverse()?;
    if inv.iter().all(|v| v.is_finite()) {
        Some(inv)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn least_squares_solves_simple_system() {
        // Fit y = 2 + 3x on x = [0,1,2]
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let beta = solve_least_squares(&x, &y).unwrap();
        assert!((beta[0] - 2.0).abs() < 1e-10);
        assert!((beta[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn singular_normal_matrix_inversion_fails_cleanly() {
        let a = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 4.0]);
        assert!(invert_normal_matrix(&a).is_none());
    }

    #[test]
    fn normal_matrix_inverse_roundtrips() {
        let a = DMatrix::from_row_slice(2, 2, &[4.0, 1.0, 1.0, 3.0]);
        let inv = invert_normal_matrix(&a).unwrap();
        let id = &a * &inv;
        assert!((id[(0, 0)] - 1.0).abs() < 1e-12);
        assert!((id[(1, 1)] - 1.0).abs() < 1e-12);
        assert!(id[(0, 1)].abs() < 1e-12);
    }
}
