//! Sparse forward-difference operators and the fixed system matrices.
//!
//! [`gradient_operator`] builds `Gx` / `Gy`; [`SystemOperators`] caches them
//! together with their transposes, `A0 = GxᵗGx + GyᵗGy` and the identity `E`
//! for one image size. Nothing in here is mutated after construction.

use nalgebra::DVector;
use nalgebra_sparse::{CooMatrix, CsrMatrix};

/// Difference direction of a gradient operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Difference with the pixel to the right (`index + 1`).
    Horizontal,
    /// Difference with the pixel below (`index + cols`).
    Vertical,
}

/// How the operators and the shrinkage step treat the last row and column.
///
/// # Legacy
///
/// A neighbor entry is dropped only when its flat index falls outside
/// `0..rows*cols`. For [`Axis::Horizontal`] the `index + 1` neighbor of a
/// last-column pixel is the first pixel of the next row, so the difference
/// wraps; only the final pixel keeps a lone `+1`. For [`Axis::Vertical`]
/// every last-row pixel keeps a lone `+1`. The shrinkage step only looks at
/// interior pixels and leaves `H = V = 0` on the last row and column.
///
/// # Neumann
///
/// A pixel without an in-grid neighbor along the axis gets an empty
/// operator row, and the shrinkage step computes every forward difference
/// that stays in the grid. Constant fields are then in the null space of
/// `A0`, so flat regions pass through the solve unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundaryPolicy {
    #[default]
    Legacy,
    Neumann,
}

impl BoundaryPolicy {
    /// Flat index of the forward neighbor of `(row, col)` along `axis`, if
    /// the operator row gets a `-1` entry there.
    fn forward_neighbor(
        self,
        axis: Axis,
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    ) -> Option<usize> {
        let index = row * cols + col;
        match self {
            BoundaryPolicy::Legacy => {
                let neighbor = match axis {
                    Axis::Horizontal => index + 1,
                    Axis::Vertical => index + cols,
                };
                (neighbor < rows * cols).then_some(neighbor)
            }
            BoundaryPolicy::Neumann => match axis {
                Axis::Horizontal => (col + 1 < cols).then_some(index + 1),
                Axis::Vertical => (row + 1 < rows).then_some(index + cols),
            },
        }
    }

    /// Whether a pixel without a forward neighbor keeps its `+1` entry.
    fn keeps_partial_rows(self) -> bool {
        matches!(self, BoundaryPolicy::Legacy)
    }
}

/// Build the `N x N` forward-difference matrix for one axis.
///
/// Row `i = row * cols + col` holds `+1` at `i` and `-1` at the forward
/// neighbor chosen by `policy`.
///
/// # Example
///
/// ```
/// use l0_gradient::operators::{gradient_operator, Axis, BoundaryPolicy};
/// use nalgebra::DVector;
///
/// let gx = gradient_operator(2, 2, Axis::Horizontal, BoundaryPolicy::Legacy);
/// let s = DVector::from_vec(vec![1.0, 3.0, 6.0, 10.0]);
/// let g = &gx * &s;
/// assert_eq!(g.as_slice(), &[-2.0, -3.0, -4.0, 10.0]);
/// ```
pub fn gradient_operator(
    rows: usize,
    cols: usize,
    axis: Axis,
    policy: BoundaryPolicy,
) -> CsrMatrix<f64> {
    let n = rows * cols;
    let mut coo = CooMatrix::new(n, n);

    for row in 0..rows {
        for col in 0..cols {
            let index = row * cols + col;
            match policy.forward_neighbor(axis, row, col, rows, cols) {
                Some(neighbor) => {
                    coo.push(index, index, 1.0);
                    coo.push(index, neighbor, -1.0);
                }
                None if policy.keeps_partial_rows() => coo.push(index, index, 1.0),
                None => {}
            }
        }
    }

    CsrMatrix::from(&coo)
}

/// Fixed matrices for one image size, shared read-only by every channel.
#[derive(Debug, Clone)]
pub struct SystemOperators {
    rows: usize,
    cols: usize,
    policy: BoundaryPolicy,
    gx: CsrMatrix<f64>,
    gy: CsrMatrix<f64>,
    gx_t: CsrMatrix<f64>,
    gy_t: CsrMatrix<f64>,
    a0: CsrMatrix<f64>,
    identity: CsrMatrix<f64>,
}

impl SystemOperators {
    /// Build both gradient operators and derive `A0` and `E`.
    pub fn new(rows: usize, cols: usize, policy: BoundaryPolicy) -> Self {
        let gx = gradient_operator(rows, cols, Axis::Horizontal, policy);
        let gy = gradient_operator(rows, cols, Axis::Vertical, policy);
        let gx_t = gx.transpose();
        let gy_t = gy.transpose();
        let a0 = &(&gx_t * &gx) + &(&gy_t * &gy);
        let identity = CsrMatrix::identity(rows * cols);

        tracing::debug!(rows, cols, nnz = a0.nnz(), ?policy, "Built system operators");

        Self {
            rows,
            cols,
            policy,
            gx,
            gy,
            gx_t,
            gy_t,
            a0,
            identity,
        }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of unknowns (`rows * cols`).
    #[inline]
    pub fn size(&self) -> usize {
        self.rows * self.cols
    }

    #[inline]
    pub fn policy(&self) -> BoundaryPolicy {
        self.policy
    }

    #[inline]
    pub fn gx(&self) -> &CsrMatrix<f64> {
        &self.gx
    }

    #[inline]
    pub fn gy(&self) -> &CsrMatrix<f64> {
        &self.gy
    }

    /// `GxᵗGx + GyᵗGy`.
    #[inline]
    pub fn a0(&self) -> &CsrMatrix<f64> {
        &self.a0
    }

    #[inline]
    pub fn identity(&self) -> &CsrMatrix<f64> {
        &self.identity
    }

    /// `A = β·A0 + E`.
    pub fn system_matrix(&self, beta: f64) -> CsrMatrix<f64> {
        &(&self.a0 * beta) + &self.identity
    }

    /// `b = I + β·(GxᵗH + GyᵗV)`, all arguments flattened.
    pub fn rhs(
        &self,
        intensity: &DVector<f64>,
        h: &DVector<f64>,
        v: &DVector<f64>,
        beta: f64,
    ) -> DVector<f64> {
        let divergence = &self.gx_t * h + &self.gy_t * v;
        intensity + divergence * beta
    }
}
