//! Tests for configuration validation.
//!
//! Every invalid configuration must be rejected by `Runner::run` before the
//! sampler is called.

use std::cell::Cell;
use std::rc::Rc;

use syscost::{Config, ConfigError, Error, Measurement, Operation, Runner, SampleError};

/// A runner whose sampler records whether it was ever called.
fn run_counting(config: Config) -> (Result<syscost::RunReport, Error>, usize) {
    let calls = Rc::new(Cell::new(0usize));
    let counter = Rc::clone(&calls);
    let sampler = move |_: Operation, _: usize| -> Result<Measurement, SampleError> {
        counter.set(counter.get() + 1);
        Ok(Measurement::single(1.0))
    };
    let outcome = Runner::with_sampler(config, sampler).run();
    (outcome, calls.get())
}

fn expect_config_error(config: Config, expected: ConfigError) {
    let (outcome, calls) = run_counting(config);
    match outcome {
        Err(Error::Config(e)) => assert_eq!(e, expected),
        other => panic!("expected {:?}, got {:?}", expected, other.map(|r| r.outcomes)),
    }
    assert_eq!(calls, 0, "sampler must not run for an invalid config");
}

// =============================================================================
// TRIALS
// =============================================================================

#[test]
fn zero_trials_rejected() {
    expect_config_error(Config::quick().with_trials(0), ConfigError::ZeroTrials);
}

#[test]
fn one_trial_valid() {
    let config = Config::new()
        .with_operations(vec![Operation::Allocation])
        .with_array_sizes(vec![1])
        .with_trials(1);
    let (outcome, calls) = run_counting(config);
    let report = outcome.unwrap();
    assert_eq!(calls, 1);
    assert_eq!(report.results().next().unwrap().passed_tests, 1);
}

// =============================================================================
// THRESHOLD
// =============================================================================

#[test]
fn negative_threshold_rejected() {
    expect_config_error(
        Config::quick().with_threshold(-0.5),
        ConfigError::InvalidThreshold(-0.5),
    );
}

#[test]
fn infinite_threshold_rejected() {
    expect_config_error(
        Config::quick().with_threshold(f64::INFINITY),
        ConfigError::InvalidThreshold(f64::INFINITY),
    );
}

#[test]
fn nan_threshold_rejected() {
    let (outcome, calls) = run_counting(Config::quick().with_threshold(f64::NAN));
    assert!(matches!(
        outcome,
        Err(Error::Config(ConfigError::InvalidThreshold(t))) if t.is_nan()
    ));
    assert_eq!(calls, 0);
}

#[test]
fn zero_threshold_valid() {
    assert!(Config::quick().with_threshold(0.0).validate().is_ok());
}

// =============================================================================
// TABLES AND OPERATIONS
// =============================================================================

#[test]
fn no_operations_rejected() {
    expect_config_error(
        Config::quick().with_operations(Vec::new()),
        ConfigError::NoOperations,
    );
}

#[test]
fn empty_array_table_rejected() {
    expect_config_error(
        Config::quick().with_array_sizes(Vec::new()),
        ConfigError::EmptyTable("array size"),
    );
}

#[test]
fn zero_array_size_rejected() {
    expect_config_error(
        Config::quick()
            .with_operations(vec![Operation::Deallocation])
            .with_array_sizes(vec![10, 0]),
        ConfigError::ZeroParameter(Operation::Deallocation),
    );
}

#[test]
fn single_switch_iteration_rejected() {
    expect_config_error(
        Config::quick()
            .with_operations(vec![Operation::ContextSwitch])
            .with_iterations(vec![1]),
        ConfigError::TooFewSwitchIterations(1),
    );
}

#[test]
fn single_creation_iteration_valid() {
    let config = Config::quick()
        .with_operations(vec![Operation::ThreadCreation])
        .with_iterations(vec![1]);
    assert!(config.validate().is_ok());
}

#[test]
fn oversized_static_buffer_rejected() {
    let size = syscost::measurement::MAX_STACK_ELEMENTS + 1;
    expect_config_error(
        Config::quick()
            .with_operations(vec![Operation::StaticAccess])
            .with_array_sizes(vec![size]),
        ConfigError::StackCapacityExceeded {
            requested: size,
            capacity: syscost::measurement::MAX_STACK_ELEMENTS,
        },
    );
}

#[test]
fn default_tables() {
    let config = Config::default();
    assert_eq!(
        config.array_sizes,
        vec![1, 10, 100, 1_000, 10_000, 100_000, 1_000_000, 10_000_000]
    );
    assert_eq!(config.iterations, vec![2, 10, 100, 1_000, 10_000]);
    assert_eq!(config.trials, 100);
    assert_eq!(config.outlier_threshold, 3.0);
    assert_eq!(config.language, "Rust");
}
