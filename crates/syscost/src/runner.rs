//! Trial aggregation: drives a sampler over every configuration of a run.

use std::time::{Duration, Instant};

use syscost_core::statistics::{summarize, validate_threshold};
use syscost_core::{BenchmarkResult, ConfigOutcome, Configuration, Operation, StatsError};
use tracing::{debug, info, info_span, trace, warn};

use crate::config::{check_parameter, Config};
use crate::error::{ConfigError, Error, Result};
use crate::measurement::{AffinityGuard, AffinityResult, Sampler, SystemSampler};

/// Progress callback: configurations done, configurations total, label of
/// the configuration just finished.
pub type ProgressCallback = Box<dyn FnMut(usize, usize, &str) + Send>;

/// Ordered outcomes of a complete run.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// One outcome per configuration, in run order.
    pub outcomes: Vec<ConfigOutcome>,
    /// Operations the run covered, in run order.
    pub operations: Vec<Operation>,
    /// Language label of the results.
    pub language: String,
    /// Outlier threshold used for every configuration.
    pub outlier_threshold: f64,
    /// Wall time of the whole run.
    pub elapsed: Duration,
}

impl RunReport {
    /// All reported results, in run order.
    pub fn results(&self) -> impl Iterator<Item = &BenchmarkResult> {
        self.outcomes.iter().filter_map(ConfigOutcome::result)
    }

    /// Results of one operation, in run order.
    pub fn results_for(&self, operation: Operation) -> Vec<&BenchmarkResult> {
        self.results()
            .filter(|result| result.operation() == Some(operation))
            .collect()
    }

    /// Configurations whose samples were all rejected.
    pub fn no_valid_data(&self) -> Vec<&Configuration> {
        self.outcomes
            .iter()
            .filter_map(|outcome| match outcome {
                ConfigOutcome::NoValidData { configuration } => Some(configuration),
                ConfigOutcome::Measured(_) => None,
            })
            .collect()
    }
}

/// Runs the configurations of a [`Config`] through a [`Sampler`].
///
/// Trials run strictly one after another on the calling thread.
pub struct Runner<S = SystemSampler> {
    config: Config,
    sampler: S,
    progress_callback: Option<ProgressCallback>,
}

impl Runner<SystemSampler> {
    /// Create a runner that measures this machine.
    pub fn new(config: Config) -> Self {
        Self::with_sampler(config, SystemSampler)
    }
}

impl<S: Sampler> Runner<S> {
    /// Create a runner with a custom sampler.
    pub fn with_sampler(config: Config, sampler: S) -> Self {
        Self {
            config,
            sampler,
            progress_callback: None,
        }
    }

    /// Set progress callback.
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: FnMut(usize, usize, &str) + Send + 'static,
    {
        self.progress_callback = Some(Box::new(callback));
        self
    }

    /// The run configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    fn report_progress(&mut self, done: usize, total: usize, label: &str) {
        if let Some(callback) = self.progress_callback.as_mut() {
            callback(done, total, label);
        }
    }

    /// Run `configuration.trials` trials and return the normalized samples in
    /// collection order.
    ///
    /// # Errors
    ///
    /// The first failing trial aborts collection with [`Error::Sample`].
    pub fn collect_samples(&mut self, configuration: &Configuration) -> Result<Vec<f64>> {
        let normalization = self.config.normalization;
        let mut samples = Vec::with_capacity(configuration.trials);

        for trial in 0..configuration.trials {
            let measurement = self
                .sampler
                .sample(configuration.operation, configuration.parameter)
                .map_err(|source| Error::Sample {
                    operation: configuration.operation,
                    parameter: configuration.parameter,
                    source,
                })?;
            let sample = normalization.apply(measurement);
            trace!(
                trial,
                elapsed_ns = measurement.elapsed_ns,
                units = measurement.units,
                sample,
                "Trial"
            );
            samples.push(sample);
        }

        Ok(samples)
    }

    /// Measure one configuration and summarize it.
    ///
    /// A configuration whose samples are all rejected by the outlier filter
    /// yields [`ConfigOutcome::NoValidData`]; that is not an error.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::ZeroTrials`] and other parameter errors, before any
    ///   trial runs
    /// - [`Error::Sample`] if a trial fails
    pub fn run_configuration(&mut self, configuration: &Configuration) -> Result<ConfigOutcome> {
        if configuration.trials == 0 {
            return Err(ConfigError::ZeroTrials.into());
        }
        let threshold = self.config.outlier_threshold;
        validate_threshold(threshold).map_err(|_| ConfigError::InvalidThreshold(threshold))?;
        check_parameter(configuration.operation, configuration.parameter)?;

        let span = info_span!(
            "configuration",
            operation = configuration.operation.file_stem(),
            parameter = configuration.parameter,
        );
        let _enter = span.enter();

        let samples = self.collect_samples(configuration)?;

        match summarize(&samples, threshold) {
            Ok(summary) => {
                debug!(
                    average_ns = summary.average,
                    std_deviation_ns = summary.std_deviation,
                    passed = summary.passed,
                    total = summary.total,
                    "Summarized"
                );
                Ok(ConfigOutcome::Measured(BenchmarkResult::new(
                    configuration,
                    &summary,
                    threshold,
                    &self.config.language,
                )))
            }
            Err(StatsError::NoValidData { total }) => {
                warn!(total, "No valid data: every sample was rejected as an outlier");
                Ok(ConfigOutcome::NoValidData {
                    configuration: *configuration,
                })
            }
            Err(StatsError::EmptySampleSet) => Err(ConfigError::ZeroTrials.into()),
            Err(StatsError::InvalidThreshold(t)) => Err(ConfigError::InvalidThreshold(t).into()),
        }
    }

    /// Validate the config and measure every configuration in run order.
    ///
    /// # Errors
    ///
    /// Configuration errors are returned before anything is measured. A
    /// failing trial ends the run and no report is produced.
    pub fn run(&mut self) -> Result<RunReport> {
        self.config.validate()?;

        let _pin = if self.config.pin_runner {
            match AffinityGuard::try_pin() {
                AffinityResult::Pinned(guard) => Some(guard),
                AffinityResult::NotPinned { reason } => {
                    warn!(%reason, "Running unpinned");
                    None
                }
            }
        } else {
            None
        };

        let configurations = self.config.configurations();
        let total = configurations.len();
        info!(
            configurations = total,
            trials = self.config.trials,
            threshold = self.config.outlier_threshold,
            "Starting benchmark run"
        );

        let start = Instant::now();
        let mut outcomes = Vec::with_capacity(total);
        for (index, configuration) in configurations.iter().enumerate() {
            let outcome = self.run_configuration(configuration)?;
            outcomes.push(outcome);
            self.report_progress(index + 1, total, &configuration.to_string());
        }
        let elapsed = start.elapsed();

        info!(elapsed_ms = elapsed.as_millis() as u64, "Benchmark run complete");

        Ok(RunReport {
            outcomes,
            operations: self.config.selected_operations().collect(),
            language: self.config.language.clone(),
            outlier_threshold: self.config.outlier_threshold,
            elapsed,
        })
    }
}
