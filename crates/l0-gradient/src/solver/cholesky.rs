//! Exact strategy: sparse Cholesky factorization.

use super::{check_dimension, LinearSolver, PreparedSystem};
use crate::error::SolveError;
use nalgebra::{DMatrix, DVector};
use nalgebra_sparse::factorization::CscCholesky;
use nalgebra_sparse::{CscMatrix, CsrMatrix};

/// Factorizes `A = LLᵗ` once and solves by forward/backward substitution.
///
/// Factorization fails with [`SolveError::NotPositiveDefinite`] when a
/// pivot is not positive. `β·A0 + E` is positive definite by construction,
/// so this only happens for degenerate parameters or foreign matrices.
#[derive(Debug, Clone, Copy, Default)]
pub struct CholeskySolver;

struct CholeskySystem {
    factor: CscCholesky<f64>,
    size: usize,
}

impl LinearSolver for CholeskySolver {
    fn name(&self) -> &'static str {
        "cholesky"
    }

    fn prepare(&self, a: &CsrMatrix<f64>) -> Result<Box<dyn PreparedSystem>, SolveError> {
        let csc = CscMatrix::from(a);
        let factor = CscCholesky::factor(&csc).map_err(|_| SolveError::NotPositiveDefinite)?;
        Ok(Box::new(CholeskySystem {
            factor,
            size: a.nrows(),
        }))
    }
}

impl PreparedSystem for CholeskySystem {
    fn solve(&self, b: &DVector<f64>) -> Result<DVector<f64>, SolveError> {
        check_dimension(self.size, b)?;
        let mut x = DMatrix::from_column_slice(self.size, 1, b.as_slice());
        self.factor.solve_mut(&mut x);
        Ok(DVector::from_column_slice(x.as_slice()))
    }
}
