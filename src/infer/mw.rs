//! Multiplicative-weights inference.
//!
//! Iterative refinement that never inverts a matrix. Starting from a
//! caller-supplied non-negative estimate, each round:
//!
//! 1. computes the implied measurements `A·x`
//! 2. forms the residual `y − A·x`
//! 3. back-projects it through `Aᵀ` and rescales every component by
//!    `exp(correction / (2·total))`
//! 4. renormalizes so the total mass of the starting vector is conserved
//!
//! Two invariants hold across rounds:
//!
//! - components stay `≥ 0`: the update factor `exp(·)` is positive, so a
//!   component can only reach zero by starting there, and then it stays at
//!   zero
//! - total mass is conserved exactly by the renormalization step
//!
//! The loop stops once the largest componentwise change falls within the
//! tolerance, or at the round cap, whichever comes first. Noise-aware
//! weighting is deliberately *not* part of this interface: measurement trust
//! must be encoded in `A`/`y` before calling.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::error::InferError;
use crate::infer::Convergence;

/// Exponent clamp for the multiplicative factor. Residuals early in a run
/// can be large relative to the total mass; without the clamp a single round
/// could overflow `exp` to infinity and poison the estimate.
const EXPONENT_CLAMP: f64 = 50.0;

/// Stopping controls for the multiplicative-weights iteration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MwOptions {
    /// Hard cap on update rounds.
    pub update_rounds: usize,
    /// Stop once the largest componentwise change falls to this or below.
    pub tolerance: f64,
}

impl Default for MwOptions {
    fn default() -> Self {
        Self {
            update_rounds: 50,
            tolerance: 1e-9,
        }
    }
}

/// Multiplicative-weights strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct MultiplicativeWeights {
    options: MwOptions,
}

impl MultiplicativeWeights {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: MwOptions) -> Result<Self, InferError> {
        if options.update_rounds == 0 {
            return Err(InferError::InvalidConfiguration(
                "Multiplicative-weights round cap must be >= 1.".to_string(),
            ));
        }
        if !(options.tolerance.is_finite() && options.tolerance >= 0.0) {
            return Err(InferError::InvalidConfiguration(format!(
                "Multiplicative-weights tolerance must be finite and >= 0, got {}.",
                options.tolerance
            )));
        }
        Ok(Self { options })
    }

    /// Refine `x_init` into an estimate consistent with the measurements.
    ///
    /// `x_init` must have one component per query-matrix column; negative
    /// components are treated as zero mass. The initial vector (and its
    /// randomness, if any) is the caller's choice — this strategy draws no
    /// random numbers itself.
    pub fn infer(
        &self,
        queries: &DMatrix<f64>,
        observations: &DVector<f64>,
        x_init: &DVector<f64>,
    ) -> Result<DVector<f64>, InferError> {
        self.infer_with_report(queries, observations, x_init)
            .map(|(estimate, _)| estimate)
    }

    /// Same as [`MultiplicativeWeights::infer`], also reporting whether the
    /// iteration stabilized before the round cap.
    pub fn infer_with_report(
        &self,
        queries: &DMatrix<f64>,
        observations: &DVector<f64>,
        x_init: &DVector<f64>,
    ) -> Result<(DVector<f64>, Convergence), InferError> {
        if observations.len() != queries.nrows() {
            return Err(InferError::ShapeMismatch {
                what: "observations",
                expected: queries.nrows(),
                actual: observations.len(),
            });
        }
        if x_init.len() != queries.ncols() {
            return Err(InferError::ShapeMismatch {
                what: "initial estimate",
                expected: queries.ncols(),
                actual: x_init.len(),
            });
        }

        let mut x = x_init.map(|v| if v.is_finite() { v.max(0.0) } else { 0.0 });
        let total = x.sum();
        if !(total.is_finite() && total > 0.0) {
            return Err(InferError::InvalidConfiguration(
                "Initial estimate must carry positive total mass.".to_string(),
            ));
        }

        let mut rounds = 0;
        let mut final_change = f64::INFINITY;
        let mut converged = false;

        while rounds < self.options.update_rounds {
            let residual = observations - queries * &x;
            let correction = queries.tr_mul(&residual) / (2.0 * total);

            let previous = x.clone();
            for i in 0..x.len() {
                let exponent = correction[i].clamp(-EXPONENT_CLAMP, EXPONENT_CLAMP);
                x[i] *= exponent.exp();
            }

            // Conservation of total mass. The sum stays positive because at
            // least one component of `x` is positive and update factors are
            // strictly positive.
            let mass = x.sum();
            x *= total / mass;

            final_change = (&x - &previous).amax();
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measurement::Laplace;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn conserves_mass_and_non_negativity_under_noise() {
        let n = 8;
        let mut rng = StdRng::seed_from_u64(10);
        let a = DMatrix::<f64>::identity(n, n);
        let x_true = DVector::from_fn(n, |i, _| 0.1 * (i as f64 + 1.0));

        let y = Laplace::new(a.clone(), 0.1)
            .unwrap()
            .measure(&x_true, &mut rng)
            .unwrap();
        let x_init = DVector::from_element(n, 0.5);

        let x = MultiplicativeWeights::new().infer(&a, &y, &x_init).unwrap();
        assert_eq!(x.len(), n);
        assert!(x.iter().all(|&v| v >= 0.0), "negative component in {x:?}");
        assert!(
            (x.sum() - x_init.sum()).abs() < 1e-9,
            "total mass drifted: {} vs {}",
            x.sum(),
            x_init.sum()
        );
    }

    #[test]
    fn converges_to_truth_on_exact_identity_measurements() {
        // With exact measurements and a starting vector of the correct total
        // mass, the fixed point of the update is the true vector.
        let a = DMatrix::<f64>::identity(4, 4);
        let x_true = DVector::from_row_slice(&[0.1, 0.2, 0.3, 0.4]);
        let y = &a * &x_true;
        let x_init = DVector::from_element(4, 0.25);

        let options = MwOptions {
            update_rounds: 2_000,
            tolerance: 1e-14,
        };
        let (x, report) = MultiplicativeWeights::with_options(options)
            .unwrap()
            .infer_with_report(&a, &y, &x_init)
            .unwrap();

        assert!(report.converged, "expected convergence, got {report:?}");
        for i in 0..4 {
            assert!(
                (x[i] - x_true[i]).abs() < 1e-4,
                "component {i}: expected {}, got {}",
                x_true[i],
                x[i]
            );
        }
    }

    #[test]
    fn all_zero_observations_keep_estimate_non_negative() {
        // y = 0 drives every correction negative; components shrink but the
        // renormalization restores total mass and nothing can cross zero.
        let a = DMatrix::<f64>::identity(4, 4);
        let y = DVector::zeros(4);
        let x_init = DVector::from_row_slice(&[0.1, 0.2, 0.3, 0.4]);

        let x = MultiplicativeWeights::new().infer(&a, &y, &x_init).unwrap();
        assert_eq!(x.len(), 4);
        assert!(x.iter().all(|&v| v >= 0.0), "negative component in {x:?}");
        assert!((x.sum() - x_init.sum()).abs() < 1e-9);
    }

    #[test]
    fn zero_components_stay_zero() {
        let a = DMatrix::<f64>::identity(3, 3);
        let y = DVector::from_row_slice(&[1.0, 1.0, 1.0]);
        let x_init = DVector::from_row_slice(&[0.0, 0.5, 0.5]);

        let x = MultiplicativeWeights::new().infer(&a, &y, &x_init).unwrap();
        assert_eq!(x[0], 0.0);
        assert!(x[1] > 0.0 && x[2] > 0.0);
    }

    #[test]
    fn initial_estimate_length_mismatch_fails_fast() {
        let a = DMatrix::<f64>::identity(3, 3);
        let y = DVector::from_row_slice(&[1.0, 1.0, 1.0]);
        let x_init = DVector::from_row_slice(&[0.5, 0.5]);

        let err = MultiplicativeWeights::new()
            .infer(&a, &y, &x_init)
            .unwrap_err();
        assert_eq!(
            err,
            InferError::ShapeMismatch {
                what: "initial estimate",
                expected: 3,
                actual: 2,
            }
        );
    }

    #[test]
    fn massless_initial_estimate_is_rejected() {
        let a = DMatrix::<f64>::identity(2, 2);
        let y = DVector::from_row_slice(&[1.0, 1.0]);
        let x_init = DVector::from_row_slice(&[0.0, 0.0]);

        assert!(matches!(
            MultiplicativeWeights::new().infer(&a, &y, &x_init),
            Err(InferError::InvalidConfiguration(_))
        ));
    }
}
