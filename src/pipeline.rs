//! One smoothing run from files to files.
//!
//! Order of work: configuration, input image, output directory, then one
//! PNG per iteration as it is produced, and finally the configuration
//! echo. The echo is also written when the run stops on a numerical
//! error, so the snapshots already on disk stay attributable.

use crate::config::{RunConfig, CONFIG_ECHO_FILE};
use crate::error::AppError;
use crate::image_io;
use anyhow::Context;
use l0_gradient::{BoundaryPolicy, FailurePolicy, L0Smoother, DEFAULT_ITER_MAX};
use std::fs;
use std::path::PathBuf;

/// Everything a run needs, as given on the command line.
#[derive(Debug, Clone)]
pub struct Job {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub config: PathBuf,
    pub iter_max: usize,
    pub boundary: BoundaryPolicy,
    pub on_solve_failure: FailurePolicy,
}

impl Job {
    /// A job with default iteration cap and policies.
    pub fn new(
        input: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        config: impl Into<PathBuf>,
    ) -> Self {
        Self {
            input: input.into(),
            output_dir: output_dir.into(),
            config: config.into(),
            iter_max: DEFAULT_ITER_MAX,
            boundary: BoundaryPolicy::default(),
            on_solve_failure: FailurePolicy::default(),
        }
    }
}

/// What a successful run wrote.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub config: RunConfig,
    /// Snapshot files in iteration order.
    pub snapshots: Vec<PathBuf>,
    pub config_echo: PathBuf,
}

impl RunSummary {
    #[inline]
    pub fn iterations(&self) -> usize {
        self.snapshots.len()
    }
}

pub fn run(job: &Job) -> Result<RunSummary, AppError> {
    let config = RunConfig::load(&job.config)?;
    let params = config.params(job.iter_max)?;
    tracing::info!(
        lambda = config.lambda,
        beta_max = config.beta_max,
        kappa = config.kappa,
        exact = config.exact,
        "Loaded configuration"
    );

    let image = image_io::load_image(&job.input)?;
    tracing::info!(
        rows = image.rows(),
        cols = image.cols(),
        channels = image.channel_count(),
        "Decoded input image"
    );

    fs::create_dir_all(&job.output_dir)
        .with_context(|| format!("Failed to create {}", job.output_dir.display()))
        .map_err(AppError::Output)?;

    let smoother = L0Smoother::new(params)
        .solver(config.solver_kind())
        .boundary(job.boundary)
        .on_solve_failure(job.on_solve_failure);

    let mut snapshots = Vec::new();
    let mut failure = None;
    for result in smoother.iterations(&image) {
        let snapshot = match result {
            Ok(snapshot) => snapshot,
            Err(e) => {
                failure = Some(e);
                break;
            }
        };
        tracing::info!(
            iteration = snapshot.iteration(),
            beta = snapshot.beta() * params.kappa(),
            "Iteration complete"
        );
        let path = image_io::write_snapshot(&job.output_dir, &snapshot).map_err(AppError::Output)?;
        snapshots.push(path);
    }

    let config_echo = job.output_dir.join(CONFIG_ECHO_FILE);
    config
        .save(&config_echo)
        .with_context(|| format!("Failed to write {}", config_echo.display()))
        .map_err(AppError::Output)?;

    if let Some(e) = failure {
        return Err(AppError::Numerical(e));
    }

    Ok(RunSummary {
        config,
        snapshots,
        config_echo,
    })
}
