//! Non-negative least-squares inference.
//!
//! Solves `min ‖A·x − y‖₂` subject to `x ≥ 0` by projected gradient descent
//! on the equivalent quadratic program:
//!
//! - gradient step on `½‖A·x − y‖₂²` with fixed step `1/L`, where `L` is the
//!   largest eigenvalue of `AᵀA` (squared spectral norm of `A`)
//! - projection onto the non-negative orthant (componentwise clamp at 0)
//!
//! With step `1/L` each iteration is monotone in the objective, and the
//! iterates converge to a KKT point of the constrained program. Running out
//! of iterations is recovered locally: the best iterate is returned and the
//! convergence report flags the shortfall, so pathological systems degrade
//! to an approximation instead of an error.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::error::InferError;
use crate::infer::Convergence;
use crate::math::spectral_norm;

/// Stopping controls for the projected-gradient iteration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct NnlsOptions {
    /// Hard cap on gradient/projection rounds.
    pub max_rounds: usize,
    /// Stop once the largest componentwise change falls to this or below.
    pub tolerance: f64,
}

impl Default for NnlsOptions {
    fn default() -> Self {
        Self {
            max_rounds: 5_000,
            tolerance: 1e-10,
        }
    }
}

/// Least-squares strategy with an elementwise `x̂ ≥ 0` constraint.
#[derive(Debug, Clone, Copy, Default)]
pub struct NonNegativeLeastSquares {
    options: NnlsOptions,
}

impl NonNegativeLeastSquares {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: NnlsOptions) -> Result<Self, InferError> {
        if options.max_rounds == 0 {
            return Err(InferError::InvalidConfiguration(
                "NNLS round cap must be >= 1.".to_string(),
            ));
        }
        if !(options.tolerance.is_finite() && options.tolerance >= 0.0) {
            return Err(InferError::InvalidConfiguration(format!(
                "NNLS tolerance must be finite and >= 0, got {}.",
                options.tolerance
            )));
        }
        Ok(Self { options })
    }

    /// Estimate `x̂ ≥ 0` minimizing `‖A·x − y‖₂`.
    pub fn infer(
        &self,
        queries: &DMatrix<f64>,
        observations: &DVector<f64>,
    ) -> Result<DVector<f64>, InferError> {
        self.infer_with_report(queries, observations)
            .map(|(estimate, _)| estimate)
    }

    /// Same as [`NonNegativeLeastSquares::infer`], also reporting whether the
    /// iteration actually converged.
    pub fn infer_with_report(
        &self,
        queries: &DMatrix<f64>,
        observations: &DVector<f64>,
    ) -> Result<(DVector<f64>, Convergence), InferError> {
        if observations.len() != queries.nrows() {
            return Err(InferError::ShapeMismatch {
                what: "observations",
                expected: queries.nrows(),
                actual: observations.len(),
            });
        }

        // A NaN anywhere would slip through the spectral-norm fold (f64::max
        // ignores NaN) and masquerade as an all-zero system, so reject
        // non-finite inputs the way the direct strategies do.
        if queries.iter().any(|v| !v.is_finite()) || observations.iter().any(|v| !v.is_finite()) {
            return Err(InferError::IllConditioned);
        }

        let n = queries.ncols();
        let norm = spectral_norm(queries);
        if norm <= 0.0 {
            // All-zero queries: every feasible point fits equally well, so
            // return the zero vector.
            let report = Convergence {
                converged: true,
                rounds: 0,
                final_change: 0.0,
            };
            return Ok((DVector::zeros(n), report));
        }

        let gram = queries.tr_mul(queries);
        let aty = queries.tr_mul(observations);
        let step = 1.0 / (norm * norm);

        let mut x = DVector::<f64>::zeros(n);
        let mut rounds = 0;
        let mut final_change = f64::INFINITY;
        let mut converged = false;

        while rounds < self.options.max_rounds {
            let gradient = &gram * &x - &aty;
            let x_next = (&x - gradient * step).map(|v| v.max(0.0));
            final_change = (&x_next - &x).amax();
            x = x_next;
            rounds += 1;

            if final_change <= self.options.tolerance {
                converged = true;
                break;
            }
        }

        let report = Convergence {
            converged,
            rounds,
            final_change,
        };
        Ok((x, report))
    }
}
