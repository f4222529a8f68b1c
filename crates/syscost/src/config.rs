//! Run configuration.

use serde::{Deserialize, Serialize};
use syscost_core::statistics::validate_threshold;
use syscost_core::{Configuration, Normalization, Operation, ParameterKind};

use crate::error::ConfigError;
use crate::measurement::MAX_STACK_ELEMENTS;

/// Default array sizes for the memory operations.
pub const DEFAULT_ARRAY_SIZES: [usize; 8] = [
    1, 10, 100, 1_000, 10_000, 100_000, 1_000_000, 10_000_000,
];

/// Default iteration counts for the thread operations.
pub const DEFAULT_ITERATIONS: [usize; 5] = [2, 10, 100, 1_000, 10_000];

/// Everything that defines a benchmark run.
///
/// The tables are plain data: every selected memory operation is measured
/// at every array size and every selected thread operation at every
/// iteration count.
///
/// Configs can be saved and loaded as JSON with
/// [`write_config`](crate::output::write_config) and
/// [`load_config`](crate::output::load_config). Missing fields take their
/// defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Trials per configuration.
    ///
    /// Default: 100
    pub trials: usize,

    /// σ multiplier of the outlier filter, shared by every configuration.
    ///
    /// Default: 3.0
    pub outlier_threshold: f64,

    /// Element counts for static/dynamic access, allocation and deallocation.
    pub array_sizes: Vec<usize>,

    /// Repetition counts for thread creation, context switch and migration.
    pub iterations: Vec<usize>,

    /// Operations to run. Always expanded in [`Operation::ALL`] order.
    ///
    /// Default: all seven
    pub operations: Vec<Operation>,

    /// How a trial's measurement becomes a sample.
    ///
    /// Default: per unit
    pub normalization: Normalization,

    /// Value of `programming_language` in the results and the file prefix.
    ///
    /// Default: "Rust"
    pub language: String,

    /// Pin the runner thread to its current CPU for the run.
    ///
    /// Default: false
    pub pin_runner: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            trials: 100,
            outlier_threshold: 3.0,
            array_sizes: DEFAULT_ARRAY_SIZES.to_vec(),
            iterations: DEFAULT_ITERATIONS.to_vec(),
            operations: Operation::ALL.to_vec(),
            normalization: Normalization::default(),
            language: "Rust".to_string(),
            pin_runner: false,
        }
    }
}

impl Config {
    /// Create a new config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Small tables and few trials, for smoke runs.
    pub fn quick() -> Self {
        Self {
            trials: 10,
            array_sizes: vec![1, 100, 10_000],
            iterations: vec![2, 10, 100],
            ..Self::default()
        }
    }

    /// Set the number of trials per configuration.
    pub fn with_trials(mut self, trials: usize) -> Self {
        self.trials = trials;
        self
    }

    /// Set the outlier threshold.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.outlier_threshold = threshold;
        self
    }

    /// Replace the array-size table.
    pub fn with_array_sizes(mut self, sizes: impl Into<Vec<usize>>) -> Self {
        self.array_sizes = sizes.into();
        self
    }

    /// Replace the iteration table.
    pub fn with_iterations(mut self, iterations: impl Into<Vec<usize>>) -> Self {
        self.iterations = iterations.into();
        self
    }

    /// Restrict the run to the given operations.
    pub fn with_operations(mut self, operations: impl Into<Vec<Operation>>) -> Self {
        self.operations = operations.into();
        self
    }

    /// Set the normalization.
    pub fn with_normalization(mut self, normalization: Normalization) -> Self {
        self.normalization = normalization;
        self
    }

    /// Set the language label.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Pin the runner thread for the run.
    pub fn with_pinned_runner(mut self) -> Self {
        self.pin_runner = true;
        self
    }

    /// Whether `operation` is part of the run.
    pub fn includes(&self, operation: Operation) -> bool {
        self.operations.contains(&operation)
    }

    /// Check the configuration without running anything.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.operations.is_empty() {
            return Err(ConfigError::NoOperations);
        }
        if self.trials == 0 {
            return Err(ConfigError::ZeroTrials);
        }
        validate_threshold(self.outlier_threshold)
            .map_err(|_| ConfigError::InvalidThreshold(self.outlier_threshold))?;

        for operation in self.selected_operations() {
            let table = self.table(operation.parameter_kind());
            if table.is_empty() {
                return Err(ConfigError::EmptyTable(table_name(operation.parameter_kind())));
            }
            for &parameter in table {
                check_parameter(operation, parameter)?;
            }
        }
        Ok(())
    }

    /// Expand into configurations in run order.
    ///
    /// Operations follow [`Operation::ALL`] regardless of the order they were
    /// selected in. Within an operation, parameters follow the table order.
    pub fn configurations(&self) -> Vec<Configuration> {
        self.selected_operations()
            .flat_map(move |operation| {
                self.table(operation.parameter_kind())
                    .iter()
                    .map(move |&parameter| Configuration::new(operation, parameter, self.trials))
            })
            .collect()
    }

    /// Selected operations in run order, without duplicates.
    pub fn selected_operations(&self) -> impl Iterator<Item = Operation> + '_ {
        Operation::ALL
            .into_iter()
            .filter(move |operation| self.includes(*operation))
    }

    fn table(&self, kind: ParameterKind) -> &[usize] {
        match kind {
            ParameterKind::ArraySize => &self.array_sizes,
            ParameterKind::Iterations => &self.iterations,
        }
    }
}

/// Check one parameter against the limits of its operation.
pub(crate) fn check_parameter(operation: Operation, parameter: usize) -> Result<(), ConfigError> {
    if parameter == 0 {
        return Err(ConfigError::ZeroParameter(operation));
    }
    match operation {
        Operation::ContextSwitch if parameter < 2 => {
            Err(ConfigError::TooFewSwitchIterations(parameter))
        }
        Operation::StaticAccess if parameter > MAX_STACK_ELEMENTS => {
            Err(ConfigError::StackCapacityExceeded {
                requested: parameter,
                capacity: MAX_STACK_ELEMENTS,
            })
        }
        _ => Ok(()),
    }
}

fn table_name(kind: ParameterKind) -> &'static str {
    match kind {
        ParameterKind::ArraySize => "array size",
        ParameterKind::Iterations => "iteration",
    }
}
