//! Per-channel scalar grids and their flat vector form.
//!
//! A [`ScalarField`] stores one `f64` per pixel in row-major order. The
//! solver works on the same values as an [`nalgebra::DVector`]; since the
//! grid is already row-major, [`ScalarField::to_flat`] and
//! [`ScalarField::from_flat`] are plain copies and exact inverses.

use nalgebra::DVector;

/// A `rows x cols` grid of floating-point values, row-major.
///
/// Used for the normalized input intensity `I`, the current estimate `S`
/// and the auxiliary gradient fields `H` and `V`.
///
/// # Example
///
/// ```
/// use l0_gradient::ScalarField;
///
/// let mut field = ScalarField::zeros(2, 3);
/// field.set(1, 2, 0.5);
///
/// let flat = field.to_flat();
/// assert_eq!(flat[5], 0.5);
/// assert_eq!(ScalarField::from_flat(2, 3, &flat), field);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarField {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl ScalarField {
    /// Create a field with every value set to zero.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::filled(rows, cols, 0.0)
    }

    /// Create a field with every value set to `value`.
    pub fn filled(rows: usize, cols: usize, value: f64) -> Self {
        Self {
            rows,
            cols,
            data: vec![value; rows * cols],
        }
    }

    /// Wrap row-major values.
    ///
    /// Returns `None` if `data.len() != rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Option<Self> {
        if data.len() != rows * cols {
            return None;
        }
        Some(Self { rows, cols, data })
    }

    /// Rebuild a field from its flat (row-major) vector form.
    ///
    /// # Panics
    ///
    /// Panics if `flat.len() != rows * cols`.
    pub fn from_flat(rows: usize, cols: usize, flat: &DVector<f64>) -> Self {
        assert_eq!(
            flat.len(),
            rows * cols,
            "flat vector length ({}) must match {}x{}",
            flat.len(),
            rows,
            cols
        );
        Self {
            rows,
            cols,
            data: flat.as_slice().to_vec(),
        }
    }

    /// Flatten into a row-major vector of length `rows * cols`.
    pub fn to_flat(&self) -> DVector<f64> {
        DVector::from_column_slice(&self.data)
    }

    /// Overwrite the values from a flat vector of matching length.
    pub(crate) fn copy_from_flat(&mut self, flat: &DVector<f64>) {
        debug_assert_eq!(flat.len(), self.data.len());
        self.data.copy_from_slice(flat.as_slice());
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of pixels (`rows * cols`).
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.cols + col] = value;
    }

    /// Row-major values.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Mean of `|S(j,i) - S(j,i+1)| + |S(j,i) - S(j+1,i)|` over every
    /// forward difference that stays inside the grid, normalized by the
    /// pixel count. A rough "how far from flat" measure.
    pub fn mean_abs_gradient(&self) -> f64 {
        if self.data.is_empty() {
            return 0.0;
        }
        let mut total = 0.0;
        for row in 0..self.rows {
            for col in 0..self.cols {
                let here = self.get(row, col);
                if col + 1 < self.cols {
                    total += (here - self.get(row, col + 1)).abs();
                }
                if row + 1 < self.rows {
                    total += (here - self.get(row + 1, col)).abs();
                }
            }
        }
        total / self.data.len() as f64
    }
}
