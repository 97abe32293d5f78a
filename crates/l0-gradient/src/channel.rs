//! Per-channel state and the two half-steps of one outer iteration.

use crate::error::SolveError;
use crate::field::ScalarField;
use crate::operators::SystemOperators;
use crate::shrink::shrink_gradients;
use crate::solver::PreparedSystem;
use nalgebra::DVector;

/// Buffers owned by one color channel for the whole run.
///
/// `intensity` is the normalized input and never changes; `estimate`,
/// `h` and `v` are overwritten every iteration.
#[derive(Debug, Clone)]
pub struct ChannelState {
    intensity: DVector<f64>,
    estimate: ScalarField,
    h: ScalarField,
    v: ScalarField,
}

impl ChannelState {
    /// Start from the input: the first estimate is the input itself.
    pub fn new(input: &ScalarField) -> Self {
        let rows = input.rows();
        let cols = input.cols();
        Self {
            intensity: input.to_flat(),
            estimate: input.clone(),
            h: ScalarField::zeros(rows, cols),
            v: ScalarField::zeros(rows, cols),
        }
    }

    /// Current smoothed estimate `S`.
    #[inline]
    pub fn estimate(&self) -> &ScalarField {
        &self.estimate
    }

    /// Auxiliary gradient fields `(H, V)` from the last shrinkage step.
    #[inline]
    pub fn auxiliaries(&self) -> (&ScalarField, &ScalarField) {
        (&self.h, &self.v)
    }

    /// Threshold the gradients of the current estimate into `H` and `V`.
    pub fn shrink(&mut self, ops: &SystemOperators, lambda: f64, beta: f64) {
        shrink_gradients(
            &self.estimate,
            &mut self.h,
            &mut self.v,
            lambda / beta,
            ops.policy(),
        );
    }

    /// Solve for the new estimate against an already prepared system.
    ///
    /// On error the estimate is left untouched.
    pub fn solve(
        &mut self,
        ops: &SystemOperators,
        system: &dyn PreparedSystem,
        beta: f64,
    ) -> Result<(), SolveError> {
        let b = ops.rhs(&self.intensity, &self.h.to_flat(), &self.v.to_flat(), beta);
        let s = system.solve(&b)?;
        self.estimate.copy_from_flat(&s);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operators::BoundaryPolicy;
    use crate::solver::{CholeskySolver, LinearSolver};

    #[test]
    fn test_new_channel_starts_at_input() {
        let input = ScalarField::filled(2, 3, 0.25);
        let channel = ChannelState::new(&input);
        assert_eq!(channel.estimate(), &input);
        let (h, v) = channel.auxiliaries();
        assert!(h.as_slice().iter().chain(v.as_slice()).all(|x| *x == 0.0));
    }

    #[test]
    fn test_kept_gradients_reproduce_input() {
        // Interior spike: every gradient survives and matches the operator
        // rows exactly, so the solve returns the input.
        let mut input = ScalarField::zeros(4, 4);
        input.set(1, 1, 1.0);
        let ops = SystemOperators::new(4, 4, BoundaryPolicy::Legacy);
        let mut channel = ChannelState::new(&input);
        let beta = 0.02;

        channel.shrink(&ops, 0.01, beta);
        let system = CholeskySolver.prepare(&ops.system_matrix(beta)).unwrap();
        channel.solve(&ops, system.as_ref(), beta).unwrap();

        for (got, want) in channel.estimate().as_slice().iter().zip(input.as_slice()) {
            assert!((got - want).abs() < 1e-12, "got {got}, want {want}");
        }
    }

    #[test]
    fn test_suppressed_gradients_smooth_the_estimate() {
        let mut input = ScalarField::zeros(4, 4);
        input.set(1, 1, 1.0);
        let ops = SystemOperators::new(4, 4, BoundaryPolicy::Legacy);
        let mut channel = ChannelState::new(&input);
        let beta = 1.0;

        // λ/β = 10 suppresses every gradient
        channel.shrink(&ops, 10.0, beta);
        let system = CholeskySolver.prepare(&ops.system_matrix(beta)).unwrap();
        channel.solve(&ops, system.as_ref(), beta).unwrap();

        let peak = channel.estimate().get(1, 1);
        assert!(peak < 1.0 && peak > 0.0, "peak {peak}");
        assert!(channel.estimate().get(1, 0) > 0.0);
    }
}
