#![allow(clippy::needless_range_loop)]

//! l0-gradient: edge-preserving smoothing by L0 gradient minimization
//!
//! The smoother minimizes `|S - I|² + λ·C(S)`, where `C(S)` counts the
//! pixels with a non-zero gradient. Counting is combinatorial, so the
//! problem is split with auxiliary gradient fields `(H, V)` and solved by
//! alternating two easy steps while a penalty weight `β` grows:
//!
//! ```text
//! I (normalized input)
//!     |
//!     v
//! S := I, β := 2λ
//!     |
//!     +--> (H, V) := shrink(∇S, λ/β)            per pixel, closed form
//!     |         |
//!     |    S := (β·A0 + E)⁻¹ (I + β·(GxᵗH + GyᵗV))   sparse solve
//!     |         |
//!     |    snapshot(S) -> output sequence
//!     |         |
//!     +<-- β := β·κ  while β < β_max
//! ```
//!
//! `Gx` and `Gy` are sparse forward-difference operators and
//! `A0 = GxᵗGx + GyᵗGy`. Both only depend on the image size and are built
//! once per run.
//!
//! # Quick Start
//!
//! ```
//! use l0_gradient::{Image, L0Smoother, SmoothParams, SolverKind};
//!
//! // 2x2 grayscale image
//! let image = Image::from_interleaved_u8(2, 2, 1, &[0, 0, 255, 255]).unwrap();
//!
//! let params = SmoothParams::new(0.01, 1.0, 2.0).unwrap();
//! let smoother = L0Smoother::new(params).solver(SolverKind::Iterative);
//!
//! for snapshot in smoother.iterations(&image) {
//!     let snapshot = snapshot.unwrap();
//!     assert_eq!(snapshot.pixels().len(), 4);
//! }
//! ```
//!
//! # Solvers
//!
//! The linear step is behind the [`LinearSolver`] trait:
//!
//! - [`CholeskySolver`]: exact sparse factorization (`exact = true`)
//! - [`ConjugateGradient`]: Jacobi-preconditioned CG (`exact = false`)
//!
//! A factorization failure is reported as [`SolveError`] and handled
//! according to the smoother's [`FailurePolicy`].

pub mod channel;
pub mod error;
pub mod field;
pub mod image;
pub mod operators;
pub mod params;
pub mod schedule;
pub mod shrink;
pub mod smoother;
pub mod solver;


pub use channel::ChannelState;
pub use error::{SmoothError, SolveError};
pub use field::ScalarField;
pub use image::Image;
pub use operators::{BoundaryPolicy, SystemOperators};
pub use params::{SmoothParams, DEFAULT_ITER_MAX};
pub use schedule::{ContinuationSchedule, Step};
pub use shrink::shrink_gradients;
pub use smoother::{FailurePolicy, Iterations, L0Smoother, Snapshot};
pub use solver::{CholeskySolver, ConjugateGradient, LinearSolver, PreparedSystem, SolverKind};
