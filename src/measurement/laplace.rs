//! Laplace measurement mechanism.
//!
//! Answers a batch of linear queries about the true vector under
//! epsilon-differential privacy: `y = A·x + Laplace(0, b)` per row, with the
//! scale calibrated to the query matrix's L1 sensitivity and the privacy
//! budget spent on the batch. The same scale is what callers feed back into
//! the noise-weighting transform on the inference side.
//!
//! Randomness always comes from a caller-supplied RNG so measurements are
//! reproducible under a fixed seed; nothing here touches process-global
//! random state.

use nalgebra::{DMatrix, DVector};
use rand::Rng;
use rand_distr::Exp1;

use crate::error::InferError;

/// L1 sensitivity of a query matrix: the largest column L1 norm.
///
/// One individual moving between cells changes `A·x` by at most this much in
/// L1, which is the quantity Laplace noise must be calibrated to.
pub fn l1_sensitivity(queries: &DMatrix<f64>) -> f64 {
    let mut worst = 0.0_f64;
    for j in 0..queries.ncols() {
        let mut column_sum = 0.0;
        for i in 0..queries.nrows() {
            column_sum += queries[(i, j)].abs();
        }
        worst = worst.max(column_sum);
    }
    worst
}

/// Noise scale for answering `queries` with budget share `eps_share`.
pub fn laplace_scale_factor(queries: &DMatrix<f64>, eps_share: f64) -> Result<f64, InferError> {
    if !(eps_share.is_finite() && eps_share > 0.0) {
        return Err(InferError::InvalidConfiguration(format!(
            "Privacy budget share must be finite and > 0, got {eps_share}."
        )));
    }
    Ok(l1_sensitivity(queries) / eps_share)
}

/// Laplace mechanism over a fixed query matrix and budget share.
#[derive(Debug, Clone)]
pub struct Laplace {
    queries: DMatrix<f64>,
    scale: f64,
}

impl Laplace {
    pub fn new(queries: DMatrix<f64>, eps_share: f64) -> Result<Self, InferError> {
        let scale = laplace_scale_factor(&queries, eps_share)?;
        Ok(Self { queries, scale })
    }

    /// The per-row noise scale this mechanism adds.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Measure the true vector: `A·x` plus calibrated Laplace noise per row.
    pub fn measure<R: Rng>(
        &self,
        x: &DVector<f64>,
        rng: &mut R,
    ) -> Result<DVector<f64>, InferError> {
        if x.len() != self.queries.ncols() {
            return Err(InferError::ShapeMismatch {
                what: "true vector",
                expected: self.queries.ncols(),
                actual: x.len(),
            });
        }

        let mut answers = &self.queries * x;
        for i in 0..answers.len() {
            answers[i] += sample_laplace(self.scale, rng);
        }
        Ok(answers)
    }
}

/// Draw from Laplace(0, scale) as the difference of two unit exponentials.
fn sample_laplace<R: Rng>(scale: f64, rng: &mut R) -> f64 {
    let e1: f64 = rng.sample(Exp1);
    let e2: f64 = rng.sample(Exp1);
    scale * (e1 - e2)
}
