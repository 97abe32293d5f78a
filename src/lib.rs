//! l0smooth - edge-preserving image smoothing via L0 gradient minimization
//!
//! Command-line front end for the [`l0_gradient`] crate. A run reads an
//! image and a one-line configuration file, then writes one PNG per
//! outer iteration plus a `config.txt` echo into an output directory.
//! See [`pipeline::run`].

pub mod config;
pub mod error;
pub mod image_io;
pub mod pipeline;

pub use config::{ConfigError, RunConfig};
pub use error::AppError;
pub use pipeline::{Job, RunSummary};
