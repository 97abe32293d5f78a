//! Multi-channel input images.

use crate::error::SmoothError;
use crate::field::ScalarField;

/// An input image as one [`ScalarField`] per channel, values in `[0, 1]`.
///
/// # Example
///
/// ```
/// use l0_gradient::Image;
///
/// // 2x1 RGB image, interleaved 8-bit samples
/// let image = Image::from_interleaved_u8(1, 2, 3, &[255, 0, 0, 0, 0, 255]).unwrap();
/// assert_eq!(image.channel_count(), 3);
/// assert_eq!(image.channels()[0].get(0, 0), 1.0);
/// assert_eq!(image.channels()[2].get(0, 1), 1.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    rows: usize,
    cols: usize,
    channels: Vec<ScalarField>,
}

impl Image {
    /// Build from per-channel fields, which must all share one shape.
    pub fn from_channels(channels: Vec<ScalarField>) -> Result<Self, SmoothError> {
        let first = channels.first().ok_or(SmoothError::EmptyImage)?;
        let (rows, cols) = (first.rows(), first.cols());
        if first.is_empty() {
            return Err(SmoothError::EmptyImage);
        }
        for (index, channel) in channels.iter().enumerate() {
            if channel.rows() != rows || channel.cols() != cols {
                return Err(SmoothError::ChannelShape {
                    index,
                    rows: channel.rows(),
                    cols: channel.cols(),
                    expected_rows: rows,
                    expected_cols: cols,
                });
            }
        }
        Ok(Self {
            rows,
            cols,
            channels,
        })
    }

    /// Split interleaved 8-bit samples into channels normalized by `1/255`.
    pub fn from_interleaved_u8(
        rows: usize,
        cols: usize,
        channel_count: usize,
        samples: &[u8],
    ) -> Result<Self, SmoothError> {
        if rows == 0 || cols == 0 || channel_count == 0 {
            return Err(SmoothError::EmptyImage);
        }
        if samples.len() != rows * cols * channel_count {
            return Err(SmoothError::SampleCount {
                expected: rows * cols * channel_count,
                actual: samples.len(),
            });
        }

        let channels = (0..channel_count)
            .map(|c| {
                let data = samples
                    .iter()
                    .skip(c)
                    .step_by(channel_count)
                    .map(|&v| v as f64 / 255.0)
                    .collect();
                ScalarField::from_vec(rows, cols, data).ok_or(SmoothError::EmptyImage)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::from_channels(channels)
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
        self.channels.len()
    }

    #[inline]
    pub fn channels(&self) -> &[ScalarField] {
        &self.channels
    }
}
