//! 8-bit snapshots of the running estimate.

use crate::field::ScalarField;

/// Quantize an estimate value in `[0, 1]` to 8 bits.
///
/// Takes the absolute value of `value * 255`, rounds half to even and
/// saturates to `0..=255`. Negative overshoot therefore maps to its
/// magnitude, not to zero.
#[inline]
pub fn quantize(value: f64) -> u8 {
    let scaled = (value * 255.0).abs().round_ties_even();
    if scaled.is_nan() {
        0
    } else {
        scaled.min(255.0) as u8
    }
}

/// The merged 8-bit image produced by one outer iteration.
///
/// Samples are interleaved in channel order, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    iteration: usize,
    beta: f64,
    rows: usize,
    cols: usize,
    channel_count: usize,
    pixels: Vec<u8>,
}

impl Snapshot {
    /// Quantize and interleave the channel estimates.
    ///
    /// # Panics (debug only)
    ///
    /// Debug-asserts that all estimates share one shape.
    pub fn merge<'a, I>(iteration: usize, beta: f64, estimates: I) -> Self
    where
        I: IntoIterator<Item = &'a ScalarField>,
    {
        let estimates: Vec<&ScalarField> = estimates.into_iter().collect();
        let channel_count = estimates.len();
        let (rows, cols) = estimates
            .first()
            .map(|e| (e.rows(), e.cols()))
            .unwrap_or((0, 0));
        debug_assert!(estimates.iter().all(|e| e.rows() == rows && e.cols() == cols));

        let mut pixels = Vec::with_capacity(rows * cols * channel_count);
        for index in 0..rows * cols {
            for estimate in &estimates {
                pixels.push(quantize(estimate.as_slice()[index]));
            }
        }

        Self {
            iteration,
            beta,
            rows,
            cols,
            channel_count,
            pixels,
        }
    }

    /// 1-based iteration number.
    #[inline]
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// Penalty weight used to produce this snapshot.
    #[inline]
    pub fn beta(&self) -> f64 {
        self.beta
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn channel_count(&self) -> usize {
        self.channel_count
    }

    /// Interleaved 8-bit samples.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Consume the snapshot and return the sample buffer.
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }
}
