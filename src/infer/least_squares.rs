//! Unconstrained least-squares inference.

use nalgebra::{DMatrix, DVector};

use crate::error::InferError;
use crate::math::{build_weighted_matrix, build_weighted_observations, solve_least_squares};

/// Minimum-norm least-squares strategy.
///
/// `infer` assumes the system is already homoscedastic: either the noise is
/// uniform across rows, or the caller whitened `(A, y)` beforehand. When
/// per-row noise scales are known, [`LeastSquares::infer_weighted`] applies
/// the whitening internally and is the statistically efficient choice.
///
/// No constraints are enforced; components of the estimate may be negative
/// or exceed physical bounds. Deterministic given `(A, y)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeastSquares;

impl LeastSquares {
    pub fn new() -> Self {
        Self
    }

    /// Estimate `x̂` as the minimum-norm solution of `min ‖A·x − y‖₂`.
    pub fn infer(
        &self,
        queries: &DMatrix<f64>,
        observations: &DVector<f64>,
    ) -> Result<DVector<f64>, InferError> {
        if observations.len() != queries.nrows() {
            return Err(InferError::ShapeMismatch {
                what: "observations",
                expected: queries.nrows(),
                actual: observations.len(),
            });
        }

        solve_least_squares(queries, observations).ok_or(InferError::IllConditioned)
    }

    /// Whiten the system by the per-row noise scales, then solve.
    pub fn infer_weighted(
        &self,
        queries: &DMatrix<f64>,
        observations: &DVector<f64>,
        noise_scales: &[f64],
    ) -> Result<DVector<f64>, InferError> {
        let weighted_queries = build_weighted_matrix(queries, noise_scales)?;
        let weighted_observations = build_weighted_observations(observations, noise_scales)?;
        self.infer(&weighted_queries, &weighted_observations)
    }
}
