//! Iterative strategy: Jacobi-preconditioned conjugate gradient.
//!
//! Defaults follow the usual sparse-library CG set-up: diagonal
//! preconditioner, zero initial guess, stop when `‖r‖ < tol·‖b‖` with
//! `tol` equal to single-precision epsilon, and at most `2·N` iterations.
//! Hitting the cap is not an error; the current iterate is returned.

use super::{check_dimension, LinearSolver, PreparedSystem};
use crate::error::SolveError;
use nalgebra::DVector;
use nalgebra_sparse::CsrMatrix;

/// Default relative residual tolerance.
pub const DEFAULT_TOLERANCE: f64 = f32::EPSILON as f64;

/// Conjugate gradient settings.
///
/// # Example
///
/// ```
/// use l0_gradient::solver::{ConjugateGradient, LinearSolver};
/// use nalgebra::DVector;
/// use nalgebra_sparse::CsrMatrix;
///
/// let a = CsrMatrix::identity(3) * 2.0;
/// let system = ConjugateGradient::default().prepare(&a).unwrap();
/// let x = system.solve(&DVector::from_vec(vec![2.0, 4.0, 6.0])).unwrap();
/// assert!((x - DVector::from_vec(vec![1.0, 2.0, 3.0])).amax() < 1e-6);
/// ```
#[derive(Debug, Clone)]
pub struct ConjugateGradient {
    tolerance: f64,
    max_iterations: Option<usize>,
}

impl Default for ConjugateGradient {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: None,
        }
    }
}

impl ConjugateGradient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the relative residual tolerance.
    #[inline]
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the iteration cap. Defaults to twice the number of unknowns.
    #[inline]
    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = Some(max_iterations);
        self
    }
}

struct CgSystem {
    matrix: CsrMatrix<f64>,
    inv_diagonal: DVector<f64>,
    tolerance: f64,
    max_iterations: usize,
}

impl LinearSolver for ConjugateGradient {
    fn name(&self) -> &'static str {
        "conjugate-gradient"
    }

    fn prepare(&self, a: &CsrMatrix<f64>) -> Result<Box<dyn PreparedSystem>, SolveError> {
        let n = a.nrows();
        let mut diagonal = DVector::<f64>::zeros(n);
        for (row, col, value) in a.triplet_iter() {
            if row == col {
                diagonal[row] += *value;
            }
        }
        // Zero pivots get no scaling.
        let inv_diagonal = diagonal.map(|d: f64| if d != 0.0 { 1.0 / d } else { 1.0 });

        Ok(Box::new(CgSystem {
            matrix: a.clone(),
            inv_diagonal,
            tolerance: self.tolerance,
            max_iterations: self.max_iterations.unwrap_or(2 * n),
        }))
    }
}

impl PreparedSystem for CgSystem {
    fn solve(&self, b: &DVector<f64>) -> Result<DVector<f64>, SolveError> {
        let n = self.matrix.nrows();
        check_dimension(n, b)?;

        let mut x = DVector::zeros(n);
        let b_norm = b.norm();
        if b_norm == 0.0 {
            return Ok(x);
        }
        let threshold = (self.tolerance * b_norm).powi(2);

        // r = b - A*0
        let mut r = b.clone();
        let mut z = r.component_mul(&self.inv_diagonal);
        let mut p = z.clone();
        let mut rz = r.dot(&z);

        let mut iterations = 0;
        while iterations < self.max_iterations && r.norm_squared() >= threshold {
            let ap = &self.matrix * &p;
            let pap = p.dot(&ap);
            if pap.abs() < 1e-300 {
                break;
            }
            let alpha = rz / pap;

            x.axpy(alpha, &p, 1.0);
            r.axpy(-alpha, &ap, 1.0);
            iterations += 1;

            z = r.component_mul(&self.inv_diagonal);
            let rz_new = r.dot(&z);
            let beta = rz_new / rz;
            rz = rz_new;

            // p = z + beta * p
            p.axpy(1.0, &z, beta);
        }

        let relative_residual = r.norm() / b_norm;
        if relative_residual < self.tolerance {
            tracing::trace!(iterations, relative_residual, "CG converged");
        } else {
            tracing::debug!(
                iterations,
                relative_residual,
                "CG stopped before reaching tolerance"
            );
        }

        Ok(x)
    }
}
