//! Error types for configuring, running and reporting a benchmark run.

use std::fmt;
use std::io;
use std::path::PathBuf;

use syscost_core::Operation;

use crate::measurement::SampleError;

/// A configuration that cannot be run.
///
/// Returned before any trial is sampled.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A configuration requested zero trials.
    ZeroTrials,
    /// The outlier threshold is negative, NaN or infinite.
    InvalidThreshold(f64),
    /// A parameter table needed by the selected operations is empty.
    EmptyTable(&'static str),
    /// A table contains a zero array size or iteration count.
    ZeroParameter(Operation),
    /// Context switch needs at least one hand-off per worker.
    TooFewSwitchIterations(usize),
    /// An array size does not fit the largest stack buffer.
    StackCapacityExceeded {
        /// Requested element count.
        requested: usize,
        /// Largest supported element count.
        capacity: usize,
    },
    /// No operation was selected.
    NoOperations,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroTrials => write!(f, "number of trials must be at least 1"),
            Self::InvalidThreshold(t) => write!(
                f,
                "outlier threshold must be a finite non-negative number, got {}",
                t
            ),
            Self::EmptyTable(name) => write!(f, "the {} table is empty", name),
            Self::ZeroParameter(op) => write!(f, "{} needs a parameter of at least 1", op),
            Self::TooFewSwitchIterations(n) => write!(
                f,
                "context switch needs at least 2 iterations, got {}",
                n
            ),
            Self::StackCapacityExceeded {
                requested,
                capacity,
            } => write!(
                f,
                "array size {} exceeds the static access maximum of {}",
                requested, capacity
            ),
            Self::NoOperations => write!(f, "no operations selected"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Failure to write or read result files.
#[derive(Debug)]
pub enum OutputError {
    /// Filesystem error.
    Io {
        /// File or directory involved.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },
    /// The file content does not parse as the expected JSON document.
    Json {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        source: serde_json::Error,
    },
}

impl fmt::Display for OutputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "{}: {}", path.display(), source),
            Self::Json { path, source } => {
                write!(f, "{}: invalid JSON: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for OutputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
        }
    }
}

/// Any error ending a run.
#[derive(Debug)]
pub enum Error {
    /// The configuration was rejected before sampling.
    Config(ConfigError),
    /// A trial failed. The run is aborted and nothing is reported.
    Sample {
        /// Operation being measured.
        operation: Operation,
        /// Array size or iteration count of the failing configuration.
        parameter: usize,
        /// What went wrong.
        source: SampleError,
    },
    /// Results could not be written or read.
    Output(OutputError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "invalid configuration: {}", e),
            Self::Sample {
                operation,
                parameter,
                source,
            } => write!(f, "{} with parameter {} failed: {}", operation, parameter, source),
            Self::Output(e) => write!(f, "output error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Sample { source, .. } => Some(source),
            Self::Output(e) => Some(e),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<OutputError> for Error {
    fn from(e: OutputError) -> Self {
        Self::Output(e)
    }
}

/// Convenience alias for results in this crate.
pub type Result<T> = std::result::Result<T, Error>;
