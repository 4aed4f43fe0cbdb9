//! Noise-weighting (whitening) transform.
//!
//! Measurements carry heterogeneous noise: each row of the query matrix was
//! answered under its own privacy-budget share, so each observation has its
//! own noise scale. Ordinary least squares treats every row as equally
//! trustworthy, which is wrong here. The fix is classical generalized least
//! squares via row scaling:
//!
//! ```text
//! A'[i, ·] = A[i, ·] / noise_scales[i]
//! y'[i]    = y[i]    / noise_scales[i]
//! ```
//!
//! Rows with a larger noise scale (less trustworthy) are shrunk, so an
//! ordinary least-squares fit of `(A', y')` behaves as the statistically
//! efficient weighted fit — the maximum-likelihood estimate under
//! independent per-row noise of known scale.
//!
//! Defining property (used by tests): with `A` the identity,
//! `diag(build_weighted_matrix(A, scales)) == 1 / scales`.

use nalgebra::{DMatrix, DVector};

use crate::error::InferError;

/// Scale each row of `queries` by the reciprocal of its noise scale.
///
/// Fails fast with `ShapeMismatch` if `noise_scales` does not have one entry
/// per row, and with `InvalidScale` on any scale that is not finite and
/// strictly positive.
pub fn build_weighted_matrix(
    queries: &DMatrix<f64>,
    noise_scales: &[f64],
) -> Result<DMatrix<f64>, InferError> {
    validate_scales(noise_scales, queries.nrows())?;

    let mut weighted = queries.clone();
    for (i, &scale) in noise_scales.iter().enumerate() {
        for j in 0..weighted.ncols() {
            weighted[(i, j)] /= scale;
        }
    }
    Ok(weighted)
}

/// Scale each observation by the reciprocal of its noise scale.
///
/// Same preconditions as [`build_weighted_matrix`]; the two must be applied
/// with identical `noise_scales` to keep the system consistent.
pub fn build_weighted_observations(
    observations: &DVector<f64>,
    noise_scales: &[f64],
) -> Result<DVector<f64>, InferError> {
    validate_scales(noise_scales, observations.len())?;

    let mut weighted = observations.clone();
    for (i, &scale) in noise_scales.iter().enumerate() {
        weighted[i] /= scale;
    }
    Ok(weighted)
}

fn validate_scales(noise_scales: &[f64], rows: usize) -> Result<(), InferError> {
    if noise_scales.len() != rows {
        return Err(InferError::ShapeMismatch {
            what: "noise scales",
            expected: rows,
            actual: noise_scales.len(),
        });
    }
    for (index, &value) in noise_scales.iter().enumerate() {
        if !(value.is_finite() && value > 0.0) {
            return Err(InferError::InvalidScale { index, value });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_diagonal_recovers_reciprocal_scales() {
        let n = 5;
        let a = DMatrix::<f64>::identity(n, n);
        let scales = [0.5, 1.0, 2.0, 4.0, 8.0];

        let weighted = build_weighted_matrix(&a, &scales).unwrap();
        for i in 0..n {
            let expected = 1.0 / scales[i];
            assert!(
                (weighted[(i, i)] - expected).abs() < 1e-12,
                "diag[{i}]: expected {expected}, got {}",
                weighted[(i, i)]
            );
        }
    }

    #[test]
    fn matrix_and_observation_weighting_are_consistent() {
        // For identity queries, y[i] * A'[i, i] must equal y'[i].
        let n = 4;
        let a = DMatrix::<f64>::identity(n, n);
        let y = DVector::from_row_slice(&[3.0, -1.0, 0.0, 7.5]);
        let scales = [2.0, 3.0, 5.0, 0.25];

        let aw = build_weighted_matrix(&a, &scales).unwrap();
        let yw = build_weighted_observations(&y, &scales).unwrap();
        for i in 0..n {
            assert!((y[i] * aw[(i, i)] - yw[i]).abs() < 1e-12);
        }
    }

    #[test]
    fn weighting_preserves_shape() {
        let a = DMatrix::<f64>::from_element(3, 7, 1.0);
        let weighted = build_weighted_matrix(&a, &[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(weighted.nrows(), 3);
        assert_eq!(weighted.ncols(), 7);
    }

    #[test]
    fn zero_scale_is_rejected() {
        let a = DMatrix::<f64>::identity(2, 2);
        let err = build_weighted_matrix(&a, &[1.0, 0.0]).unwrap_err();
        assert_eq!(err, InferError::InvalidScale { index: 1, value: 0.0 });
    }

    #[test]
    fn negative_and_non_finite_scales_are_rejected() {
        let y = DVector::from_row_slice(&[1.0, 2.0]);
        assert!(matches!(
            build_weighted_observations(&y, &[-1.0, 2.0]),
            Err(InferError::InvalidScale { index: 0, .. })
        ));
        assert!(matches!(
            build_weighted_observations(&y, &[1.0, f64::NAN]),
            Err(InferError::InvalidScale { index: 1, .. })
        ));
    }

    #[test]
    fn scale_count_mismatch_is_rejected() {
        let a = DMatrix::<f64>::identity(3, 3);
        let err = build_weighted_matrix(&a, &[1.0, 2.0]).unwrap_err();
        assert_eq!(
            err,
            InferError::ShapeMismatch {
                what: "noise scales",
                expected: 3,
                actual: 2,
            }
        );
    }
}
