//! L0Smoother builder -- the primary entry point for the crate.
//!
//! [`L0Smoother`] holds the run configuration; [`L0Smoother::iterations`]
//! starts a run over one image and yields a [`Snapshot`] per outer
//! iteration.

mod snapshot;

pub use snapshot::{quantize, Snapshot};

use crate::channel::ChannelState;
use crate::error::{SmoothError, SolveError};
use crate::field::ScalarField;
use crate::image::Image;
use crate::operators::{BoundaryPolicy, SystemOperators};
use crate::params::SmoothParams;
use crate::schedule::{ContinuationSchedule, Step};
use crate::solver::{ConjugateGradient, LinearSolver, PreparedSystem, SolverKind};
use nalgebra_sparse::CsrMatrix;

/// What to do when the solver cannot prepare an iteration's system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Yield the error and end the run. Snapshots already yielded stay valid.
    #[default]
    Abort,
    /// Log a warning and keep every channel's previous estimate for the
    /// failed iteration. Its snapshot repeats the previous one.
    KeepPrevious,
    /// Log a warning and redo the iteration with the iterative solver.
    FallbackIterative,
}

/// Edge-preserving smoother driven by the L0 gradient prior.
///
/// # Design
///
/// - Constructor requires validated [`SmoothParams`]
/// - Configuration methods consume and return `self`
/// - [`iterations()`](Self::iterations) takes `&self`, so one smoother can
///   process many images
///
/// # Example
///
/// ```
/// use l0_gradient::{Image, L0Smoother, ScalarField, SmoothParams, SolverKind};
///
/// let mut field = ScalarField::zeros(4, 4);
/// field.set(1, 1, 1.0);
/// let image = Image::from_channels(vec![field]).unwrap();
///
/// let params = SmoothParams::new(0.01, 0.1, 2.0).unwrap();
/// let smoother = L0Smoother::new(params).solver(SolverKind::Exact);
///
/// let snapshots = smoother.run(&image).unwrap();
/// assert_eq!(snapshots.len(), 3);
/// assert_eq!(snapshots[0].iteration(), 1);
/// ```
#[derive(Debug)]
pub struct L0Smoother {
    params: SmoothParams,
    solver: Box<dyn LinearSolver>,
    boundary: BoundaryPolicy,
    on_failure: FailurePolicy,
}

impl L0Smoother {
    /// Create a smoother with the exact solver, legacy boundary handling
    /// and [`FailurePolicy::Abort`].
    pub fn new(params: SmoothParams) -> Self {
        Self {
            params,
            solver: SolverKind::default().solver(),
            boundary: BoundaryPolicy::default(),
            on_failure: FailurePolicy::default(),
        }
    }

    /// Select one of the built-in solve strategies.
    #[inline]
    pub fn solver(self, kind: SolverKind) -> Self {
        self.with_solver(kind.solver())
    }

    /// Use a custom solve strategy.
    #[inline]
    pub fn with_solver(mut self, solver: Box<dyn LinearSolver>) -> Self {
        self.solver = solver;
        self
    }

    #[inline]
    pub fn boundary(mut self, policy: BoundaryPolicy) -> Self {
        self.boundary = policy;
        self
    }

    #[inline]
    pub fn on_solve_failure(mut self, policy: FailurePolicy) -> Self {
        self.on_failure = policy;
        self
    }

    #[inline]
    pub fn params(&self) -> &SmoothParams {
        &self.params
    }

    /// Start a run over `image`.
    ///
    /// Builds the operators for the image size and one [`ChannelState`]
    /// per channel. Nothing is solved until the iterator is advanced.
    pub fn iterations<'a>(&'a self, image: &Image) -> Iterations<'a> {
        let ops = SystemOperators::new(image.rows(), image.cols(), self.boundary);
        let channels = image.channels().iter().map(ChannelState::new).collect();

        tracing::debug!(
            rows = image.rows(),
            cols = image.cols(),
            channels = image.channel_count(),
            solver = self.solver.name(),
            "Starting L0 gradient minimization"
        );

        Iterations {
            smoother: self,
            ops,
            channels,
            schedule: ContinuationSchedule::new(&self.params),
            finished: false,
        }
    }

    /// Run to completion and collect every snapshot in iteration order.
    pub fn run(&self, image: &Image) -> Result<Vec<Snapshot>, SmoothError> {
        self.iterations(image).collect()
    }
}

/// A run in progress. Yields one [`Snapshot`] per outer iteration.
///
/// After an error is yielded the iterator is fused and returns `None`.
/// Between calls to `next()` the current per-channel estimates can be
/// inspected through [`estimates()`](Self::estimates).
pub struct Iterations<'a> {
    smoother: &'a L0Smoother,
    ops: SystemOperators,
    channels: Vec<ChannelState>,
    schedule: ContinuationSchedule,
    finished: bool,
}

impl Iterations<'_> {
    /// Current estimate of every channel, in channel order.
    pub fn estimates(&self) -> Vec<&ScalarField> {
        self.channels.iter().map(ChannelState::estimate).collect()
    }

    #[inline]
    pub fn channels(&self) -> &[ChannelState] {
        &self.channels
    }

    #[inline]
    pub fn operators(&self) -> &SystemOperators {
        &self.ops
    }

    /// Number of completed outer iterations.
    #[inline]
    pub fn completed(&self) -> usize {
        self.schedule.completed()
    }

    fn prepare(
        &self,
        a: &CsrMatrix<f64>,
        iteration: usize,
    ) -> Result<Option<Box<dyn PreparedSystem>>, SolveError> {
        let error = match self.smoother.solver.prepare(a) {
            Ok(system) => return Ok(Some(system)),
            Err(error) => error,
        };

        match self.smoother.on_failure {
            FailurePolicy::Abort => Err(error),
            FailurePolicy::KeepPrevious => {
                tracing::warn!(iteration, %error, "Solve failed, keeping previous estimates");
                Ok(None)
            }
            FailurePolicy::FallbackIterative => {
                tracing::warn!(iteration, %error, "Solve failed, falling back to conjugate gradient");
                ConjugateGradient::default().prepare(a).map(Some)
            }
        }
    }

    fn advance(&mut self, step: Step) -> Result<Snapshot, SmoothError> {
        let lambda = self.smoother.params.lambda();
        let beta = step.beta;
        let to_smooth_error = |source| SmoothError::Solve {
            iteration: step.iteration,
            source,
        };

        let a = self.ops.system_matrix(beta);
        if let Some(system) = self.prepare(&a, step.iteration).map_err(to_smooth_error)? {
            for channel in &mut self.channels {
                channel.shrink(&self.ops, lambda, beta);
                channel
                    .solve(&self.ops, system.as_ref(), beta)
                    .map_err(to_smooth_error)?;
            }
        }

        tracing::debug!(
            iteration = step.iteration,
            beta,
            next_beta = step.next_beta(self.smoother.params.kappa()),
            "Completed iteration"
        );

        Ok(Snapshot::merge(
            step.iteration,
            beta,
            self.channels.iter().map(ChannelState::estimate),
        ))
    }
}

impl Iterator for Iterations<'_> {
    type Item = Result<Snapshot, SmoothError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let Some(step) = self.schedule.next() else {
            self.finished = true;
            return None;
        };
        let result = self.advance(step);
        if result.is_err() {
            self.finished = true;
        }
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::CholeskySolver;
    use pretty_assertions::assert_eq;

    #[derive(Debug)]
    struct AlwaysFails;

    impl LinearSolver for AlwaysFails {
        fn name(&self) -> &'static str {
            "always-fails"
        }

        fn prepare(&self, _a: &CsrMatrix<f64>) -> Result<Box<dyn PreparedSystem>, SolveError> {
            Err(SolveError::NotPositiveDefinite)
        }
    }

    /// Fails on the iteration with the given 1-based index, succeeds otherwise.
    #[derive(Debug)]
    struct FailsOnCall {
        fail_at: usize,
        calls: std::cell::Cell<usize>,
    }

    impl LinearSolver for FailsOnCall {
        fn name(&self) -> &'static str {
            "fails-on-call"
        }

        fn prepare(&self, a: &CsrMatrix<f64>) -> Result<Box<dyn PreparedSystem>, SolveError> {
            let call = self.calls.get() + 1;
            self.calls.set(call);
            if call == self.fail_at {
                Err(SolveError::NotPositiveDefinite)
            } else {
                CholeskySolver.prepare(a)
            }
        }
    }

    fn step_image() -> Image {
        let mut field = ScalarField::zeros(6, 6);
        for row in 0..6 {
            for col in 3..6 {
                field.set(row, col, 0.8);
            }
        }
        Image::from_channels(vec![field]).unwrap()
    }

    fn params() -> SmoothParams {
        SmoothParams::new(0.01, 1.0, 2.0).unwrap()
    }

    #[test]
    fn test_defaults() {
        let smoother = L0Smoother::new(params());
        assert_eq!(smoother.solver.name(), "cholesky");
        assert_eq!(smoother.boundary, BoundaryPolicy::Legacy);
        assert_eq!(smoother.on_failure, FailurePolicy::Abort);
    }

    #[test]
    fn test_builder_chaining() {
        let smoother = L0Smoother::new(params())
            .solver(SolverKind::Iterative)
            .boundary(BoundaryPolicy::Neumann)
            .on_solve_failure(FailurePolicy::KeepPrevious);
        assert_eq!(smoother.solver.name(), "conjugate-gradient");
        assert_eq!(smoother.boundary, BoundaryPolicy::Neumann);
        assert_eq!(smoother.on_failure, FailurePolicy::KeepPrevious);
    }

    #[test]
    fn test_abort_yields_error_then_stops() {
        let smoother = L0Smoother::new(params()).with_solver(Box::new(AlwaysFails));
        let mut iterations = smoother.iterations(&step_image());

        let first = iterations.next().unwrap();
        assert_eq!(
            first.unwrap_err(),
            SmoothError::Solve {
                iteration: 1,
                source: SolveError::NotPositiveDefinite
            }
        );
        assert!(iterations.next().is_none());
    }

    #[test]
    fn test_abort_keeps_earlier_snapshots() {
        let smoother = L0Smoother::new(params()).with_solver(Box::new(FailsOnCall {
            fail_at: 3,
            calls: std::cell::Cell::new(0),
        }));

        let results: Vec<_> = smoother.iterations(&step_image()).collect();
        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(results[1].is_ok());
        assert!(matches!(
            results[2],
            Err(SmoothError::Solve { iteration: 3, .. })
        ));
    }

    #[test]
    fn test_keep_previous_repeats_snapshot() {
        let smoother = L0Smoother::new(params())
            .with_solver(Box::new(FailsOnCall {
                fail_at: 2,
                calls: std::cell::Cell::new(0),
            }))
            .on_solve_failure(FailurePolicy::KeepPrevious);

        let snapshots = smoother.run(&step_image()).unwrap();
        // β: 0.02, 0.04, ..., 0.64 -> 6 iterations
        assert_eq!(snapshots.len(), 6);
        assert_eq!(snapshots[1].pixels(), snapshots[0].pixels());
        assert_eq!(snapshots[1].iteration(), 2);
    }

    #[test]
    fn test_fallback_matches_iterative_run() {
        let fallback = L0Smoother::new(params())
            .with_solver(Box::new(AlwaysFails))
            .on_solve_failure(FailurePolicy::FallbackIterative);
        let iterative = L0Smoother::new(params()).solver(SolverKind::Iterative);

        let image = step_image();
        let a = fallback.run(&image).unwrap();
        let b = iterative.run(&image).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_estimates_visible_between_steps() {
        let smoother = L0Smoother::new(params());
        let image = step_image();
        let mut iterations = smoother.iterations(&image);

        assert_eq!(iterations.estimates()[0], &image.channels()[0]);
        iterations.next().unwrap().unwrap();
        assert_eq!(iterations.completed(), 1);
        assert_eq!(iterations.estimates().len(), 1);
        assert_eq!(iterations.operators().size(), 36);
    }
}
