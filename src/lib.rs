//! `dp-recon` library crate.
//!
//! Reconstructs an estimate of a private data vector from noisy linear
//! measurements collected under a differential-privacy mechanism. A
//! mechanism observes `y = A·x + noise`, where `A` is a known query matrix,
//! `x` is the unknown true vector, and the per-row noise magnitude is known
//! to the caller. This crate is the inference side of that pipeline:
//!
//! - `math`: row weighting (whitening) and the shared least-squares solver
//! - `infer`: the inference strategies (least squares, non-negative least
//!   squares, multiplicative weights, AHP thresholding)
//! - `measurement`: a Laplace measurement mechanism and its scale factor,
//!   used by callers to produce `y` and the per-row noise scales
//!
//! Every inference call is synchronous, in-memory, and stateless apart from
//! constructor-time configuration; randomness always enters through a
//! caller-supplied RNG.

pub mod error;
pub mod infer;
pub mod math;
pub mod measurement;
