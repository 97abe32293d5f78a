//! Linear solve strategies for `(β·A0 + E) s = b`.
//!
//! A [`LinearSolver`] turns the system matrix into a [`PreparedSystem`]
//! (factorization or preconditioner set-up), which then solves one
//! right-hand side per channel. The system matrix only depends on `β`, so
//! preparation happens once per outer iteration.
//!
//! Two strategies ship with the crate:
//!
//! - [`CholeskySolver`]: sparse Cholesky factorization and direct solve
//! - [`ConjugateGradient`]: Jacobi-preconditioned conjugate gradient

mod cg;
mod cholesky;

pub use cg::ConjugateGradient;
pub use cholesky::CholeskySolver;

use crate::error::SolveError;
use nalgebra::DVector;
use nalgebra_sparse::CsrMatrix;
use std::fmt;

/// A strategy for solving the per-iteration sparse system.
pub trait LinearSolver: fmt::Debug {
    /// Short name used in log output.
    fn name(&self) -> &'static str;

    /// Prepare `a` for repeated solves.
    fn prepare(&self, a: &CsrMatrix<f64>) -> Result<Box<dyn PreparedSystem>, SolveError>;
}

/// A system matrix ready to be solved against right-hand sides.
pub trait PreparedSystem {
    fn solve(&self, b: &DVector<f64>) -> Result<DVector<f64>, SolveError>;
}

/// The built-in strategies, selected by the `exact` configuration flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SolverKind {
    /// Sparse Cholesky factorization.
    #[default]
    Exact,
    /// Preconditioned conjugate gradient.
    Iterative,
}

impl SolverKind {
    /// Map the configuration flag: `true` selects [`SolverKind::Exact`].
    pub fn from_exact_flag(exact: bool) -> Self {
        if exact {
            SolverKind::Exact
        } else {
            SolverKind::Iterative
        }
    }

    pub fn is_exact(self) -> bool {
        matches!(self, SolverKind::Exact)
    }

    /// Instantiate the strategy with its default settings.
    pub fn solver(self) -> Box<dyn LinearSolver> {
        match self {
            SolverKind::Exact => Box::new(CholeskySolver),
            SolverKind::Iterative => Box::new(ConjugateGradient::default()),
        }
    }
}

fn check_dimension(expected: usize, b: &DVector<f64>) -> Result<(), SolveError> {
    if b.len() != expected {
        return Err(SolveError::DimensionMismatch {
            expected,
            actual: b.len(),
        });
    }
    Ok(())
}
