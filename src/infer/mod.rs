//! Inference strategies.
//!
//! Each strategy turns `(A, y, …)` into an estimate `x̂` of the private data
//! vector. They form a closed set of variants sharing one capability but
//! with genuinely different signatures, so they are independent structs
//! rather than implementors of a common trait:
//!
//! - [`LeastSquares`]: unconstrained minimum-norm solve
//! - [`NonNegativeLeastSquares`]: adds the `x̂ ≥ 0` constraint
//! - [`MultiplicativeWeights`]: iterative multiplicative refinement from a
//!   caller-supplied starting vector
//! - [`AhpThresholding`]: denoise-by-thresholding, then reconstruct
//!
//! Strategies are stateless apart from constructor-time configuration, and
//! no call mutates its inputs, so concurrent use of one instance is safe.

pub mod ahp;
pub mod least_squares;
pub mod mw;
pub mod nnls;

pub use ahp::*;
pub use least_squares::*;
pub use mw::*;
pub use nnls::*;

use serde::{Deserialize, Serialize};

/// Outcome of an iterative solve.
///
/// Running out of iterations is not an error: the strategy still returns its
/// best iterate, and this report tells the caller whether the stopping
/// tolerance was actually reached.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Convergence {
    /// Whether the iteration stabilized within tolerance before the cap.
    pub converged: bool,
    /// Number of update rounds actually executed.
    pub rounds: usize,
    /// Magnitude of the last iterate-to-iterate change.
    pub final_change: f64,
}
