//! Shared least-squares solver.
//!
//! Every least-squares-style strategy in this crate reduces to the same
//! unconstrained problem:
//!
//! ```text
//! minimize ‖A·x − y‖₂
//! ```
//!
//! over a dense system, usually whitened by the noise-weighting transform
//! first.
//!
//! Implementation choices:
//! - SVD rather than normal equations: forming `AᵀA` squares the condition
//!   number, and query matrices are routinely rank-deficient (repeated or
//!   linearly dependent queries). The SVD pseudoinverse solve also returns
//!   the minimum-Euclidean-norm solution in the rank-deficient case, which
//!   is the documented contract for `LeastSquares`.
//! - A ladder of tolerances: start strict and relax if the strict solve
//!   rejects the system, so nearly collinear query sets still solve.

use nalgebra::{DMatrix, DVector};

/// Solve `min ‖A·x − y‖₂` via SVD, returning the minimum-norm solution.
///
/// Returns `None` if no tolerance in the ladder produces a finite solution.
pub fn solve_least_squares(a: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = a.clone().svd(true, true);

    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(x) = svd.solve(y, tol) {
            if x.iter().all(|v| v.is_finite()) {
                return Some(x);
            }
        }
    }

    None
}

/// Largest singular value of `a` (0 for an all-zero matrix).
///
/// The projected-gradient solver uses this to pick a safe step size.
pub fn spectral_norm(a: &DMatrix<f64>) -> f64 {
    let svd = a.clone().svd(false, false);
    svd.singular_values.iter().fold(0.0_f64, |m, &s| m.max(s))
}
