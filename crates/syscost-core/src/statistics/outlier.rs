//! Single-pass σ-multiplier outlier filtering.
//!
//! The filter:
//! 1. Computes mean μ and population standard deviation σ of the raw set
//! 2. Keeps every sample with `μ − tσ ≤ x ≤ μ + tσ`
//!
//! The bounds are derived once from the unfiltered set and never
//! re-derived, so the filter does not shrink a set progressively.

use alloc::vec::Vec;

use super::moments::Moments;
use crate::error::StatsError;

/// Statistics about one filtering pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlierStats {
    /// Samples before filtering.
    pub total_samples: usize,
    /// Samples retained.
    pub retained_samples: usize,
    /// Samples rejected.
    pub outliers_removed: usize,
    /// Mean of the raw set.
    pub raw_mean: f64,
    /// Population standard deviation of the raw set.
    pub raw_std_deviation: f64,
    /// Inclusive lower bound, `μ − tσ`.
    pub lower_bound: f64,
    /// Inclusive upper bound, `μ + tσ`.
    pub upper_bound: f64,
    /// The σ multiplier used.
    pub threshold: f64,
}

impl OutlierStats {
    /// Fraction of samples rejected (0.0 to 1.0).
    pub fn outlier_fraction(&self) -> f64 {
        if self.total_samples == 0 {
            0.0
        } else {
            self.outliers_removed as f64 / self.total_samples as f64
        }
    }
}

/// Check that a σ multiplier is usable.
pub fn validate_threshold(threshold: f64) -> Result<(), StatsError> {
    if threshold.is_finite() && threshold >= 0.0 {
        Ok(())
    } else {
        Err(StatsError::InvalidThreshold(threshold))
    }
}

/// Remove samples lying more than `threshold` standard deviations from the mean.
///
/// Retained samples keep their original order.
///
/// # Errors
///
/// - [`StatsError::EmptySampleSet`] if `samples` is empty
/// - [`StatsError::InvalidThreshold`] if `threshold` is negative or not finite
pub fn filter_outliers(
    samples: &[f64],
    threshold: f64,
) -> Result<(Vec<f64>, OutlierStats), StatsError> {
    validate_threshold(threshold)?;
    if samples.is_empty() {
        return Err(StatsError::EmptySampleSet);
    }

    let moments = Moments::from_slice(samples);
    let mean = moments.mean();
    let std_dev = moments.std_deviation();
    let lower = mean - threshold * std_dev;
    let upper = mean + threshold * std_dev;

    let retained: Vec<f64> = samples
        .iter()
        .copied()
        .filter(|&x| x >= lower && x <= upper)
        .collect();

    let stats = OutlierStats {
        total_samples: samples.len(),
        retained_samples: retained.len(),
        outliers_removed: samples.len() - retained.len(),
        raw_mean: mean,
        raw_std_deviation: std_dev,
        lower_bound: lower,
        upper_bound: upper,
        threshold,
    };

    Ok((retained, stats))
}
