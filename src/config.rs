//! Algorithm configuration file.
//!
//! The file's first line holds four flag/value pairs, in any order:
//!
//! ```text
//! --lambda 0.01 --beta_max 10000 --kappa 1.5 --exact true
//! ```
//!
//! [`RunConfig`] parses that line ([`FromStr`]) and prints it back in the
//! same form ([`Display`](fmt::Display)), which is how the run's
//! configuration is echoed next to its results.

use l0_gradient::{SmoothError, SmoothParams, SolverKind};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Name of the configuration echo written into the output directory.
pub const CONFIG_ECHO_FILE: &str = "config.txt";

const FLAG_LAMBDA: &str = "--lambda";
const FLAG_BETA_MAX: &str = "--beta_max";
const FLAG_KAPPA: &str = "--kappa";
const FLAG_EXACT: &str = "--exact";

/// Number of whitespace-separated tokens on the configuration line.
const TOKEN_COUNT: usize = 8;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Configuration file is empty")]
    Empty,

    #[error("Expected {TOKEN_COUNT} fields, found {0}")]
    FieldCount(usize),

    #[error("Unknown flag: {0}")]
    UnknownFlag(String),

    #[error("Flag given twice: {0}")]
    DuplicateFlag(String),

    #[error("Missing flag: {0}")]
    MissingFlag(&'static str),

    #[error("Invalid number for {flag}: {value:?}")]
    InvalidNumber { flag: &'static str, value: String },

    #[error("Invalid value for --exact: {0:?} (expected true or false)")]
    InvalidBool(String),

    #[error(transparent)]
    Params(#[from] SmoothError),
}

/// The four configurable values of a run.
///
/// # Example
///
/// ```
/// use l0smooth::config::RunConfig;
///
/// let config: RunConfig = "--kappa 2 --lambda 0.02 --exact false --beta_max 1e5"
///     .parse()
///     .unwrap();
/// assert_eq!(config.lambda, 0.02);
/// assert!(!config.exact);
/// assert_eq!(
///     config.to_string(),
///     "--lambda 0.02 --beta_max 100000 --kappa 2 --exact false"
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunConfig {
    pub lambda: f64,
    pub beta_max: f64,
    pub kappa: f64,
    pub exact: bool,
}

impl RunConfig {
    /// Read and parse the first line of `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let line = content.lines().next().ok_or(ConfigError::Empty)?;
        line.parse()
    }

    /// Write the configuration line, newline-terminated.
    pub fn save(&self, path: &Path) -> io::Result<()> {
        fs::write(path, format!("{self}\n"))
    }

    /// Validated solver parameters with the given iteration cap.
    pub fn params(&self, iter_max: usize) -> Result<SmoothParams, ConfigError> {
        Ok(SmoothParams::new(self.lambda, self.beta_max, self.kappa)?.with_iter_max(iter_max)?)
    }

    pub fn solver_kind(&self) -> SolverKind {
        SolverKind::from_exact_flag(self.exact)
    }
}

impl FromStr for RunConfig {
    type Err = ConfigError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() {
            return Err(ConfigError::Empty);
        }
        if tokens.len() != TOKEN_COUNT {
            return Err(ConfigError::FieldCount(tokens.len()));
        }

        let mut lambda = None;
        let mut beta_max = None;
        let mut kappa = None;
        let mut exact = None;

        for pair in tokens.chunks(2) {
            let (flag, value) = (pair[0], pair[1]);
            match flag {
                FLAG_LAMBDA => set_once(&mut lambda, flag, parse_number(FLAG_LAMBDA, value)?)?,
                FLAG_BETA_MAX => {
                    set_once(&mut beta_max, flag, parse_number(FLAG_BETA_MAX, value)?)?
                }
                FLAG_KAPPA => set_once(&mut kappa, flag, parse_number(FLAG_KAPPA, value)?)?,
                FLAG_EXACT => set_once(&mut exact, flag, parse_bool(value)?)?,
                other => return Err(ConfigError::UnknownFlag(other.to_string())),
            }
        }

        Ok(Self {
            lambda: lambda.ok_or(ConfigError::MissingFlag(FLAG_LAMBDA))?,
            beta_max: beta_max.ok_or(ConfigError::MissingFlag(FLAG_BETA_MAX))?,
            kappa: kappa.ok_or(ConfigError::MissingFlag(FLAG_KAPPA))?,
            exact: exact.ok_or(ConfigError::MissingFlag(FLAG_EXACT))?,
        })
    }
}

impl fmt::Display for RunConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{FLAG_LAMBDA} {} {FLAG_BETA_MAX} {} {FLAG_KAPPA} {} {FLAG_EXACT} {}",
            self.lambda, self.beta_max, self.kappa, self.exact
        )
    }
}

fn set_once<T>(slot: &mut Option<T>, flag: &str, value: T) -> Result<(), ConfigError> {
    if slot.is_some() {
        return Err(ConfigError::DuplicateFlag(flag.to_string()));
    }
    *slot = Some(value);
    Ok(())
}

fn parse_number(flag: &'static str, value: &str) -> Result<f64, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidNumber {
        flag,
        value: value.to_string(),
    })
}

fn parse_bool(value: &str) -> Result<bool, ConfigError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(ConfigError::InvalidBool(other.to_string())),
    }
}
