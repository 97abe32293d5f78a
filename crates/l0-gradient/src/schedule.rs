//! Continuation schedule for the penalty weight.
//!
//! Iteration `k` (0-based) solves with `β_k = β0·κ^k`. The run continues
//! while `β_k < β_max` and fewer than `iter_max` iterations have completed.

use crate::params::SmoothParams;

/// One outer iteration of the schedule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    /// 1-based iteration number.
    pub iteration: usize,
    /// Penalty weight used by this iteration's shrinkage and solve.
    pub beta: f64,
}

impl Step {
    /// The weight the schedule moves to after this iteration.
    #[inline]
    pub fn next_beta(&self, kappa: f64) -> f64 {
        self.beta * kappa
    }
}

/// Iterator over the outer iterations of a run.
///
/// # Example
///
/// ```
/// use l0_gradient::{ContinuationSchedule, SmoothParams};
///
/// let params = SmoothParams::new(0.01, 0.1, 2.0).unwrap();
/// let betas: Vec<f64> = ContinuationSchedule::new(&params).map(|s| s.beta).collect();
/// assert_eq!(betas, vec![0.02, 0.04, 0.08]);
/// ```
#[derive(Debug, Clone)]
pub struct ContinuationSchedule {
    beta: f64,
    beta_max: f64,
    kappa: f64,
    completed: usize,
    iter_max: usize,
}

impl ContinuationSchedule {
    pub fn new(params: &SmoothParams) -> Self {
        Self {
            beta: params.beta0(),
            beta_max: params.beta_max(),
            kappa: params.kappa(),
            completed: 0,
            iter_max: params.iter_max(),
        }
    }

    /// Current penalty weight (the one the next step would use).
    #[inline]
    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// Number of steps handed out so far.
    #[inline]
    pub fn completed(&self) -> usize {
        self.completed
    }
}

impl Iterator for ContinuationSchedule {
    type Item = Step;

    fn next(&mut self) -> Option<Step> {
        if self.beta >= self.beta_max || self.completed >= self.iter_max {
            return None;
        }
        let step = Step {
            iteration: self.completed + 1,
            beta: self.beta,
        };
        self.beta *= self.kappa;
        self.completed += 1;
        Some(step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(lambda: f64, beta_max: f64, kappa: f64) -> SmoothParams {
        SmoothParams::new(lambda, beta_max, kappa).unwrap()
    }

    #[test]
    fn test_betas_strictly_increase() {
        let steps: Vec<Step> = ContinuationSchedule::new(&params(0.01, 1.0e4, 1.5)).collect();
        for pair in steps.windows(2) {
            assert!(pair[1].beta > pair[0].beta);
            assert_eq!(pair[1].iteration, pair[0].iteration + 1);
        }
        assert_eq!(steps[0].iteration, 1);
        assert_eq!(steps[0].beta, 0.02);
    }

    #[test]
    fn test_step_count_matches_closed_form() {
        let p = params(0.01, 1.0e4, 1.5);
        let count = ContinuationSchedule::new(&p).count();

        // Smallest k with 2λ·κ^k >= β_max
        let mut k = 0;
        let mut beta = p.beta0();
        while beta < p.beta_max() {
            beta *= p.kappa();
            k += 1;
        }
        assert_eq!(count, k);
        assert_eq!(count, 33);
    }

    #[test]
    fn test_iter_max_caps_schedule() {
        let p = params(0.01, 1.0e4, 1.5).with_iter_max(7).unwrap();
        assert_eq!(ContinuationSchedule::new(&p).count(), 7);
    }

    #[test]
    fn test_empty_when_beta0_reaches_beta_max() {
        // β0 = 0.2 >= 0.1
        assert_eq!(ContinuationSchedule::new(&params(0.1, 0.1, 2.0)).count(), 0);
        assert_eq!(ContinuationSchedule::new(&params(0.05, 0.1, 2.0)).count(), 0);
    }

    #[test]
    fn test_never_empty_when_beta0_below_beta_max() {
        assert_eq!(ContinuationSchedule::new(&params(0.01, 0.0201, 100.0)).count(), 1);
    }

    #[test]
    fn test_schedule_state_tracks_progress() {
        let mut schedule = ContinuationSchedule::new(&params(0.01, 0.1, 2.0));
        let first = schedule.next().unwrap();
        assert_eq!(first.next_beta(2.0), 0.04);
        assert_eq!(schedule.beta(), 0.04);
        assert_eq!(schedule.completed(), 1);
    }
}
