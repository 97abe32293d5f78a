use crate::config::ConfigError;
use crate::image_io::ImageIoError;
use l0_gradient::SmoothError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Usage(#[from] clap::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Input error: {0}")]
    Input(#[from] ImageIoError),

    #[error("Output error: {0:#}")]
    Output(anyhow::Error),

    #[error("Numerical error: {0}")]
    Numerical(#[from] SmoothError),
}

impl AppError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Usage(_) | AppError::Config(_) => 1,
            AppError::Input(_) => 2,
            AppError::Output(_) => 3,
            AppError::Numerical(_) => 4,
        }
    }
}
