//! Error type for sample-set statistics.

use core::fmt;

/// Error returned when statistics cannot be computed over a sample set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatsError {
    /// The sample set was empty, so mean and standard deviation are undefined.
    EmptySampleSet,

    /// Every sample was rejected by the outlier filter.
    ///
    /// The configuration yields no result; the run continues with the next one.
    NoValidData {
        /// Number of raw samples that were filtered.
        total: usize,
    },

    /// The σ multiplier was negative, NaN or infinite.
    InvalidThreshold(f64),
}

impl fmt::Display for StatsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySampleSet => write!(f, "cannot compute statistics of an empty sample set"),
            Self::NoValidData { total } => {
                write!(f, "all {} samples were rejected as outliers", total)
            }
            Self::InvalidThreshold(t) => write!(
                f,
                "outlier threshold must be a finite, non-negative multiplier (got {})",
                t
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for StatsError {}
