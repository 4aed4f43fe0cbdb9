/// Errors surfaced by the inference layer.
///
/// Shape and configuration problems are detected up front, before any
/// numerical work starts; a call that hits one of these never returns an
/// estimate. Iterative solvers that merely run out of iterations do *not*
/// error — they return their best iterate together with a convergence flag.
#[derive(Debug, Clone, PartialEq)]
pub enum InferError {
    /// Row/column/length mismatch between the query matrix and a vector input.
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
    /// A noise scale that is zero, negative, or non-finite.
    ///
    /// A scale of zero is undefined for the weighting transform (it would
    /// divide the row by zero), so it is rejected rather than producing
    /// inf/NaN rows silently.
    InvalidScale { index: usize, value: f64 },
    /// Out-of-range constructor or per-call configuration.
    InvalidConfiguration(String),
    /// The direct solver could not produce a finite solution at any tolerance.
    IllConditioned,
}

impl std::fmt::Display for InferError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InferError::ShapeMismatch {
                what,
                expected,
                actual,
            } => write!(f, "Shape mismatch for {what}: expected {expected}, got {actual}."),
            InferError::InvalidScale { index, value } => {
                write!(f, "Noise scale at row {index} must be finite and > 0, got {value}.")
            }
            InferError::InvalidConfiguration(message) => write!(f, "{message}"),
            InferError::IllConditioned => {
                write!(f, "System is too ill-conditioned to solve robustly.")
            }
        }
    }
}

impl std::error::Error for InferError {}
