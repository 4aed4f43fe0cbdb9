//! Mathematical utilities: noise weighting and least squares.

pub mod lsq;
pub mod weighting;

pub use lsq::*;
pub use weighting::*;
