//! Measurement collaborators: the noisy side of the pipeline.

pub mod laplace;

pub use laplace::*;
