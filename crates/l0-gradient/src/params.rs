//! Optimization parameters.

use crate::error::SmoothError;

/// Default hard cap on outer iterations.
pub const DEFAULT_ITER_MAX: usize = 1000;

/// Parameters of one minimization run.
///
/// - `lambda`: sparsity weight. Larger values flatten more aggressively.
/// - `beta_max`: the run stops once the penalty weight reaches this value.
/// - `kappa`: multiplicative growth of the penalty weight per iteration.
/// - `iter_max`: hard cap on outer iterations (default 1000).
///
/// The initial penalty weight is derived as `2 * lambda`.
///
/// # Example
///
/// ```
/// use l0_gradient::SmoothParams;
///
/// let params = SmoothParams::new(0.01, 1.0e4, 1.5).unwrap();
/// assert_eq!(params.beta0(), 0.02);
/// assert_eq!(params.iter_max(), 1000);
///
/// assert!(SmoothParams::new(0.01, 1.0e4, 1.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothParams {
    lambda: f64,
    beta_max: f64,
    kappa: f64,
    iter_max: usize,
}

impl SmoothParams {
    /// Validate and create parameters with the default iteration cap.
    pub fn new(lambda: f64, beta_max: f64, kappa: f64) -> Result<Self, SmoothError> {
        if !(lambda.is_finite() && lambda > 0.0) {
            return Err(SmoothError::InvalidParams(format!(
                "lambda must be a positive number, got {lambda}"
            )));
        }
        if !beta_max.is_finite() {
            return Err(SmoothError::InvalidParams(format!(
                "beta_max must be finite, got {beta_max}"
            )));
        }
        if !(kappa.is_finite() && kappa > 1.0) {
            return Err(SmoothError::InvalidParams(format!(
                "kappa must be greater than 1, got {kappa}"
            )));
        }
        Ok(Self {
            lambda,
            beta_max,
            kappa,
            iter_max: DEFAULT_ITER_MAX,
        })
    }

    /// Set the iteration cap.
    pub fn with_iter_max(mut self, iter_max: usize) -> Result<Self, SmoothError> {
        if iter_max == 0 {
            return Err(SmoothError::InvalidParams(
                "iter_max must be at least 1".to_string(),
            ));
        }
        self.iter_max = iter_max;
        Ok(self)
    }

    #[inline]
    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    #[inline]
    pub fn beta_max(&self) -> f64 {
        self.beta_max
    }

    #[inline]
    pub fn kappa(&self) -> f64 {
        self.kappa
    }

    #[inline]
    pub fn iter_max(&self) -> usize {
        self.iter_max
    }

    /// Initial penalty weight, `2 * lambda`.
    #[inline]
    pub fn beta0(&self) -> f64 {
        2.0 * self.lambda
    }
}
