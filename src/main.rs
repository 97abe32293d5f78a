use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use l0_gradient::{BoundaryPolicy, FailurePolicy, DEFAULT_ITER_MAX};
use l0smooth::pipeline::{self, Job};
use l0smooth::AppError;

#[derive(Parser)]
#[command(name = "l0smooth")]
#[command(about = "Edge-preserving image smoothing via L0 gradient minimization")]
struct Cli {
    /// Input image (PNG, JPEG, BMP, TIFF, WebP, GIF)
    input: PathBuf,

    /// Output directory for result_iteration_<k>.png and config.txt
    output: PathBuf,

    /// Config file: "--lambda <f> --beta_max <f> --kappa <f> --exact <true|false>"
    config: PathBuf,

    /// Upper bound on the number of outer iterations
    #[arg(long, default_value_t = DEFAULT_ITER_MAX)]
    iter_max: usize,

    /// Gradient operator boundary handling
    #[arg(long, value_enum, default_value_t = BoundaryArg::Legacy)]
    boundary: BoundaryArg,

    /// What to do when the linear system cannot be factorized
    #[arg(long, value_enum, default_value_t = FailureArg::Abort)]
    on_solve_failure: FailureArg,
}

#[derive(Clone, Copy, ValueEnum)]
enum BoundaryArg {
    /// Wrap-around last column, partial last row
    Legacy,
    /// Zero gradient across the image border
    Neumann,
}

impl From<BoundaryArg> for BoundaryPolicy {
    fn from(arg: BoundaryArg) -> Self {
        match arg {
            BoundaryArg::Legacy => BoundaryPolicy::Legacy,
            BoundaryArg::Neumann => BoundaryPolicy::Neumann,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum FailureArg {
    /// Stop with an error
    Abort,
    /// Skip the update and keep the previous estimates
    KeepPrevious,
    /// Retry the iteration with conjugate gradient
    FallbackIterative,
}

impl From<FailureArg> for FailurePolicy {
    fn from(arg: FailureArg) -> Self {
        match arg {
            FailureArg::Abort => FailurePolicy::Abort,
            FailureArg::KeepPrevious => FailurePolicy::KeepPrevious,
            FailureArg::FallbackIterative => FailurePolicy::FallbackIterative,
        }
    }
}

fn main() -> ExitCode {
    // Help counts as a usage error too
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(AppError::Usage(e).exit_code());
        }
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "l0smooth=info,l0_gradient=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    tracing::info!(
        input = %cli.input.display(),
        output = %cli.output.display(),
        config = %cli.config.display(),
        "Starting l0smooth"
    );

    let job = Job {
        input: cli.input,
        output_dir: cli.output,
        config: cli.config,
        iter_max: cli.iter_max,
        boundary: cli.boundary.into(),
        on_solve_failure: cli.on_solve_failure.into(),
    };

    match pipeline::run(&job) {
        Ok(summary) => {
            tracing::info!(
                iterations = summary.iterations(),
                output = %job.output_dir.display(),
                "Done"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Run failed");
            ExitCode::from(e.exit_code())
        }
    }
}
