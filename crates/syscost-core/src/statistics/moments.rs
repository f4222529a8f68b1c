//! Mean and population standard deviation.
//!
//! Both are computed with Welford's recurrence. For a set of identical
//! values every update sees a zero delta, so the mean is returned exactly and
//! the standard deviation is exactly zero. The zero-variance edge cases of
//! the outlier filter rely on that.
//!
//! The standard deviation is the *population* form: the sum of squared
//! deviations is divided by the count, never by `count - 1`. Every
//! implementation of the harness uses this convention so that results stay
//! comparable.

use crate::error::StatsError;
use crate::math;

/// Streaming accumulator for mean and population variance.
///
/// ```
/// use syscost_core::statistics::Moments;
///
/// let mut moments = Moments::new();
/// for x in [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0] {
///     moments.update(x);
/// }
/// assert!((moments.mean() - 5.0).abs() < 1e-12);
/// assert!((moments.std_deviation() - 2.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Moments {
    count: usize,
    mean: f64,
    /// Sum of squared deviations from the running mean.
    m2: f64,
}

impl Moments {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulate every value of a slice.
    pub fn from_slice(samples: &[f64]) -> Self {
        let mut moments = Self::new();
        for &x in samples {
            moments.update(x);
        }
        moments
    }

    /// Add one sample.
    #[inline]
    pub fn update(&mut self, x: f64) {
        self.count += 1;
        let delta = x - self.mean;
        self.mean += delta / self.count as f64;
        let delta2 = x - self.mean;
        self.m2 += delta * delta2;
    }

    /// Number of samples seen.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Running mean (0.0 when empty).
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Population variance (0.0 when empty).
    pub fn variance(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            (self.m2 / self.count as f64).max(0.0)
        }
    }

    /// Population standard deviation (0.0 when empty).
    pub fn std_deviation(&self) -> f64 {
        math::sqrt(self.variance())
    }
}

/// Arithmetic mean of a non-empty sample set.
pub fn mean(samples: &[f64]) -> Result<f64, StatsError> {
    if samples.is_empty() {
        return Err(StatsError::EmptySampleSet);
    }
    Ok(Moments::from_slice(samples).mean())
}

/// Population standard deviation of a non-empty sample set.
pub fn std_deviation(samples: &[f64]) -> Result<f64, StatsError> {
    if samples.is_empty() {
        return Err(StatsError::EmptySampleSet);
    }
    Ok(Moments::from_slice(samples).std_deviation())
}
