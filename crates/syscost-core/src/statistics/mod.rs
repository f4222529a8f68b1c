//! Sample-set statistics applied uniformly to every measured quantity.
//!
//! - [`mean`] / [`std_deviation`]: population moments of a non-empty set
//! - [`filter_outliers`]: single-pass `μ ± tσ` rejection on the raw set
//! - [`summarize`]: filter, then recompute the moments on the survivors

mod moments;
mod outlier;

pub use moments::{mean, std_deviation, Moments};
pub use outlier::{filter_outliers, validate_threshold, OutlierStats};

use crate::error::StatsError;
use crate::result::Summary;

/// Filter a raw sample set and summarize the survivors.
///
/// The raw mean and standard deviation only decide the filter bounds. The
/// reported average and standard deviation are recomputed over the retained
/// samples.
///
/// # Errors
///
/// - [`StatsError::EmptySampleSet`] if `samples` is empty
/// - [`StatsError::InvalidThreshold`] if `threshold` is unusable
/// - [`StatsError::NoValidData`] if every sample was rejected
pub fn summarize(samples: &[f64], threshold: f64) -> Result<Summary, StatsError> {
    let (retained, stats) = filter_outliers(samples, threshold)?;
    if retained.is_empty() {
        return Err(StatsError::NoValidData {
            total: stats.total_samples,
        });
    }

    let moments = Moments::from_slice(&retained);
    Ok(Summary {
        average: moments.mean(),
        std_deviation: moments.std_deviation(),
        passed: moments.count(),
        total: stats.total_samples,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn test_summary_uses_filtered_set() {
        let mut samples = vec![10.0; 95];
        samples.extend([10_000.0; 5]);

        let summary = summarize(&samples, 3.0).unwrap();

        assert_eq!(summary.average, 10.0);
        assert_eq!(summary.std_deviation, 0.0);
        assert_eq!(summary.passed, 95);
        assert_eq!(summary.total, 100);
    }

    #[test]
    fn test_no_valid_data() {
        assert_eq!(
            summarize(&[1.0, 2.0], 0.0),
            Err(StatsError::NoValidData { total: 2 })
        );
    }

    #[test]
    fn test_empty_set() {
        assert_eq!(summarize(&[], 3.0), Err(StatsError::EmptySampleSet));
    }
}
