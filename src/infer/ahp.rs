//! Adaptive-threshold hybrid inference (AHP-style).
//!
//! Two-phase strategy for count-like measurements:
//!
//! 1. **Denoising**: a fraction `ratio` of the per-call privacy budget
//!    `eps_par` is attributed to the noisy counts already in hand. Entries
//!    whose noisy magnitude falls below
//!    `eta · ln(n) / (ratio · eps_par)` are set to zero — values that small
//!    are indistinguishable from pure noise at that budget, and suppressing
//!    them concentrates the remaining budget on signal likely to be real.
//! 2. **Reconstruction**: the surviving entries are treated as a fresh
//!    measurement with noise scale `1 / ((1 − ratio) · eps_par)`; the system
//!    is whitened and solved by least squares, then clamped non-negative.
//!
//! If thresholding zeroes out every entry, the reconstruction still returns
//! a well-shaped all-zero estimate rather than failing.

use nalgebra::{DMatrix, DVector};

use crate::error::InferError;
use crate::math::{build_weighted_matrix, build_weighted_observations, solve_least_squares};

/// Hybrid thresholding strategy.
///
/// `eta` (threshold-confidence parameter) and `ratio` (budget fraction spent
/// on denoising) are fixed at construction; the total budget `eps_par` is
/// supplied per call.
#[derive(Debug, Clone, Copy)]
pub struct AhpThresholding {
    eta: f64,
    ratio: f64,
}

impl AhpThresholding {
    pub fn new(eta: f64, ratio: f64) -> Result<Self, InferError> {
        if !(eta.is_finite() && eta > 0.0) {
            return Err(InferError::InvalidConfiguration(format!(
                "AHP eta must be finite and > 0, got {eta}."
            )));
        }
        // Both phases need a strictly positive budget share, so the open
        // interval: ratio = 0 makes the threshold infinite, ratio = 1 leaves
        // nothing for reconstruction.
        if !(ratio.is_finite() && ratio > 0.0 && ratio < 1.0) {
            return Err(InferError::InvalidConfiguration(format!(
                "AHP ratio must lie strictly between 0 and 1, got {ratio}."
            )));
        }
        Ok(Self { eta, ratio })
    }

    /// Denoise `observations` by thresholding, then reconstruct `x̂ ≥ 0`.
    pub fn infer(
        &self,
        queries: &DMatrix<f64>,
        observations: &DVector<f64>,
        eps_par: f64,
    ) -> Result<DVector<f64>, InferError> {
        if observations.len() != queries.nrows() {
            return Err(InferError::ShapeMismatch {
                what: "observations",
                expected: queries.nrows(),
                actual: observations.len(),
            });
        }
        if !(eps_par.is_finite() && eps_par > 0.0) {
            return Err(InferError::InvalidConfiguration(format!(
                "AHP privacy budget must be finite and > 0, got {eps_par}."
            )));
        }

        let cutoff = self.threshold(observations.len(), eps_par);
        let denoised = observations.map(|v| if v.abs() < cutoff { 0.0 } else { v });

        if denoised.iter().all(|&v| v == 0.0) {
            return Ok(DVector::zeros(queries.ncols()));
        }

        // Remaining budget determines the effective noise scale of the
        // reconstruction phase.
        let reconstruction_scale = 1.0 / ((1.0 - self.ratio) * eps_par);
        let scales = vec![reconstruction_scale; observations.len()];

        let weighted_queries = build_weighted_matrix(queries, &scales)?;
        let weighted_observations = build_weighted_observations(&denoised, &scales)?;
        let estimate = solve_least_squares(&weighted_queries, &weighted_observations)
            .ok_or(InferError::IllConditioned)?;

        Ok(estimate.map(|v| v.max(0.0)))
    }

    /// Denoising cutoff for an `n`-entry count vector at budget `eps_par`.
    fn threshold(&self, n: usize, eps_par: f64) -> f64 {
        self.eta * (n as f64).ln() / (self.ratio * eps_par)
    }
}
