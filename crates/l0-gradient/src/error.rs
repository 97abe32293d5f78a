//! Error types for the smoothing pipeline.

use thiserror::Error;

/// Failure of a single linear solve.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveError {
    /// The Cholesky factorization hit a non-positive pivot.
    #[error("system matrix is not numerically positive definite")]
    NotPositiveDefinite,

    /// Right-hand side does not match the prepared system.
    #[error("right-hand side has length {actual}, system has {expected} unknowns")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// Error type for the [`L0Smoother`](crate::L0Smoother) API.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SmoothError {
    #[error("invalid parameter: {0}")]
    InvalidParams(String),

    #[error("image has no pixels or no channels")]
    EmptyImage,

    #[error("expected {expected} interleaved samples, got {actual}")]
    SampleCount { expected: usize, actual: usize },

    #[error("channel {index} is {rows}x{cols}, expected {expected_rows}x{expected_cols}")]
    ChannelShape {
        index: usize,
        rows: usize,
        cols: usize,
        expected_rows: usize,
        expected_cols: usize,
    },

    #[error("linear solve failed in iteration {iteration}: {source}")]
    Solve {
        iteration: usize,
        #[source]
        source: SolveError,
    },
}
