//! Closed-form gradient shrinkage (the auxiliary-variable step).
//!
//! For fixed `S` and `β` the L0 subproblem decouples per pixel: a gradient
//! `(gx, gy)` is either kept or zeroed, whichever costs less. Zeroing wins
//! exactly when `gx² + gy² < λ/β`.

use crate::field::ScalarField;
use crate::operators::BoundaryPolicy;

/// Overwrite `h` and `v` with the thresholded forward differences of `s`.
///
/// `gx(j,i) = S(j,i) - S(j,i+1)` and `gy(j,i) = S(j,i) - S(j+1,i)`. Which
/// differences are evaluated near the last row and column depends on
/// `policy` (see [`BoundaryPolicy`]); any difference that is not evaluated
/// counts as zero and is therefore suppressed.
///
/// # Panics (debug only)
///
/// Debug-asserts that `h` and `v` have the same shape as `s`.
///
/// # Example
///
/// ```
/// use l0_gradient::operators::BoundaryPolicy;
/// use l0_gradient::{shrink_gradients, ScalarField};
///
/// let mut s = ScalarField::zeros(3, 3);
/// s.set(1, 1, 1.0);
/// let mut h = ScalarField::zeros(3, 3);
/// let mut v = ScalarField::zeros(3, 3);
///
/// // Threshold λ/β = 0.5: a unit step survives.
/// shrink_gradients(&s, &mut h, &mut v, 0.5, BoundaryPolicy::Legacy);
/// assert_eq!(h.get(1, 1), 1.0);
///
/// // Threshold 4.0: everything is suppressed.
/// shrink_gradients(&s, &mut h, &mut v, 4.0, BoundaryPolicy::Legacy);
/// assert_eq!(h.get(1, 1), 0.0);
/// ```
pub fn shrink_gradients(
    s: &ScalarField,
    h: &mut ScalarField,
    v: &mut ScalarField,
    threshold: f64,
    policy: BoundaryPolicy,
) {
    debug_assert_eq!((h.rows(), h.cols()), (s.rows(), s.cols()));
    debug_assert_eq!((v.rows(), v.cols()), (s.rows(), s.cols()));

    let rows = s.rows();
    let cols = s.cols();

    for row in 0..rows {
        for col in 0..cols {
            let (gx, gy) = forward_differences(s, row, col, policy);
            if gx * gx + gy * gy < threshold {
                h.set(row, col, 0.0);
                v.set(row, col, 0.0);
            } else {
                h.set(row, col, gx);
                v.set(row, col, gy);
            }
        }
    }
}

#[inline]
fn forward_differences(
    s: &ScalarField,
    row: usize,
    col: usize,
    policy: BoundaryPolicy,
) -> (f64, f64) {
    let rows = s.rows();
    let cols = s.cols();
    let here = s.get(row, col);
    let has_right = col + 1 < cols;
    let has_below = row + 1 < rows;

    match policy {
        BoundaryPolicy::Legacy => {
            if has_right && has_below {
                (here - s.get(row, col + 1), here - s.get(row + 1, col))
            } else {
                (0.0, 0.0)
            }
        }
        BoundaryPolicy::Neumann => {
            let gx = if has_right { here - s.get(row, col + 1) } else { 0.0 };
            let gy = if has_below { here - s.get(row + 1, col) } else { 0.0 };
            (gx, gy)
        }
    }
}
