//! Per-configuration summaries and the reported result record.

use alloc::string::String;
use serde::{Deserialize, Serialize};

use crate::types::{Configuration, Operation};

/// Statistics of the filtered sample set of one configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    /// Mean of the retained samples, in nanoseconds.
    pub average: f64,
    /// Population standard deviation of the retained samples, in nanoseconds.
    pub std_deviation: f64,
    /// Samples that survived the outlier filter.
    pub passed: usize,
    /// Samples collected.
    pub total: usize,
}

/// One reported result, as exchanged with the other implementations.
///
/// Serialized field names and order match the shared JSON layout. Exactly
/// one of `array_size` and `iterations` is present, depending on the
/// operation. Times are nanoseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkResult {
    /// Element count, for memory operations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub array_size: Option<usize>,
    /// Iteration count, for thread operations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iterations: Option<usize>,
    /// Trials requested.
    pub number_of_tests: usize,
    /// Trials that survived outlier filtering.
    pub passed_tests: usize,
    /// σ multiplier used by the filter.
    pub outlier_threshold: f64,
    /// Implementation that produced the result.
    pub programming_language: String,
    /// Operation tag, e.g. `"Context Switch"`.
    pub process_measured: String,
    /// Mean of the retained samples.
    pub average_time: f64,
    /// Population standard deviation of the retained samples.
    pub std_deviation: f64,
}

impl BenchmarkResult {
    /// Build the reported record for a summarized configuration.
    pub fn new(
        configuration: &Configuration,
        summary: &Summary,
        threshold: f64,
        language: &str,
    ) -> Self {
        Self {
            array_size: configuration.array_size(),
            iterations: configuration.iterations(),
            number_of_tests: configuration.trials,
            passed_tests: summary.passed,
            outlier_threshold: threshold,
            programming_language: String::from(language),
            process_measured: String::from(configuration.operation.process_name()),
            average_time: summary.average,
            std_deviation: summary.std_deviation,
        }
    }

    /// The operation named by `process_measured`, if it is a known one.
    pub fn operation(&self) -> Option<Operation> {
        Operation::by_name(&self.process_measured)
    }

    /// Whichever of `array_size` and `iterations` is present.
    pub fn parameter(&self) -> Option<usize> {
        self.array_size.or(self.iterations)
    }

    /// Fraction of trials rejected as outliers.
    pub fn rejected_fraction(&self) -> f64 {
        if self.number_of_tests == 0 {
            0.0
        } else {
            1.0 - self.passed_tests as f64 / self.number_of_tests as f64
        }
    }
}

/// What one configuration produced.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigOutcome {
    /// At least one sample survived filtering.
    Measured(BenchmarkResult),
    /// Every sample was rejected; no result is reported for this configuration.
    NoValidData {
        /// The configuration that produced no data.
        configuration: Configuration,
    },
}

impl ConfigOutcome {
    /// The result, if the configuration produced one.
    pub fn result(&self) -> Option<&BenchmarkResult> {
        match self {
            ConfigOutcome::Measured(result) => Some(result),
            ConfigOutcome::NoValidData { .. } => None,
        }
    }

    /// Whether this is the explicit "no valid data" signal.
    pub fn is_no_valid_data(&self) -> bool {
        matches!(self, ConfigOutcome::NoValidData { .. })
    }
}
