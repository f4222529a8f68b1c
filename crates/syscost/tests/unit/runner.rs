//! Runner behavior with synthetic samplers.

use std::sync::{Arc, Mutex};

use syscost::{
    Config, ConfigError, ConfigOutcome, Configuration, Error, Measurement, Normalization,
    Operation, Runner, SampleError,
};

type SampleResult = Result<Measurement, SampleError>;

#[test]
fn spikes_are_filtered_end_to_end() {
    // 95 steady trials and 5 spikes, spikes at the end.
    let mut trial = 0;
    let sampler = move |_: Operation, _: usize| -> SampleResult {
        trial += 1;
        let value = if trial > 95 { 10_000.0 } else { 10.0 };
        Ok(Measurement::single(value))
    };
    let config = Config::new()
        .with_operations(vec![Operation::DynamicAccess])
        .with_array_sizes(vec![1_000])
        .with_trials(100)
        .with_threshold(3.0);

    let report = Runner::with_sampler(config, sampler).run().unwrap();
    let result = report.results().next().unwrap();

    assert_eq!(result.number_of_tests, 100);
    assert_eq!(result.passed_tests, 95);
    assert_eq!(result.average_time, 10.0);
    assert_eq!(result.std_deviation, 0.0);
    assert_eq!(result.array_size, Some(1_000));
    assert_eq!(result.iterations, None);
    assert_eq!(result.process_measured, "Dynamic Memory Access");
    assert_eq!(result.programming_language, "Rust");
}

#[test]
fn zero_variance_with_zero_threshold_keeps_everything() {
    let config = Config::new()
        .with_operations(vec![Operation::ThreadCreation])
        .with_iterations(vec![10])
        .with_trials(25)
        .with_threshold(0.0);
    let sampler = |_: Operation, n: usize| -> SampleResult {
        Ok(Measurement::new(70.0 * n as f64, n as u64))
    };

    let report = Runner::with_sampler(config, sampler).run().unwrap();
    let result = report.results().next().unwrap();
    assert_eq!(result.passed_tests, 25);
    assert_eq!(result.average_time, 70.0);
    assert_eq!(result.iterations, Some(10));
}

#[test]
fn zero_trials_rejected_before_sampling() {
    let called = Arc::new(Mutex::new(false));
    let flag = Arc::clone(&called);
    let sampler = move |_: Operation, _: usize| -> SampleResult {
        *flag.lock().unwrap() = true;
        Ok(Measurement::single(1.0))
    };
    let mut runner = Runner::with_sampler(Config::new(), sampler);

    let err = runner
        .run_configuration(&Configuration::new(Operation::StaticAccess, 10, 0))
        .unwrap_err();

    assert!(matches!(err, Error::Config(ConfigError::ZeroTrials)));
    assert!(!*called.lock().unwrap());
}

#[test]
fn configurations_run_in_order() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&seen);
    let sampler = move |op: Operation, n: usize| -> SampleResult {
        let mut log = log.lock().unwrap();
        if log.last() != Some(&(op, n)) {
            log.push((op, n));
        }
        Ok(Measurement::single(1.0))
    };
    let config = Config::new()
        .with_operations(vec![
            Operation::ThreadMigration,
            Operation::StaticAccess,
            Operation::Allocation,
        ])
        .with_array_sizes(vec![100, 1])
        .with_iterations(vec![2])
        .with_trials(3);

    let report = Runner::with_sampler(config, sampler).run().unwrap();

    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            (Operation::StaticAccess, 100),
            (Operation::StaticAccess, 1),
            (Operation::Allocation, 100),
            (Operation::Allocation, 1),
            (Operation::ThreadMigration, 2),
        ]
    );
    assert_eq!(
        report.operations,
        vec![
            Operation::StaticAccess,
            Operation::Allocation,
            Operation::ThreadMigration
        ]
    );
    assert_eq!(report.outcomes.len(), 5);
}

#[test]
fn sampler_error_aborts_run() {
    let sampler = |op: Operation, n: usize| -> SampleResult {
        if op == Operation::Deallocation && n == 1_000 {
            Err(SampleError::Allocation { bytes: 4 })
        } else {
            Ok(Measurement::single(5.0))
        }
    };
    let config = Config::new()
        .with_operations(vec![Operation::Allocation, Operation::Deallocation])
        .with_array_sizes(vec![10, 1_000])
        .with_trials(4);

    let err = Runner::with_sampler(config, sampler).run().unwrap_err();
    match err {
        Error::Sample {
            operation,
            parameter,
            source: SampleError::Allocation { bytes },
        } => {
            assert_eq!(operation, Operation::Deallocation);
            assert_eq!(parameter, 1_000);
            assert_eq!(bytes, 4);
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn no_valid_data_continues_run() {
    // Allocation alternates between two values, so t = 0 rejects every
    // sample; deallocation is constant and survives.
    let mut flip = false;
    let sampler = move |op: Operation, _: usize| -> SampleResult {
        if op == Operation::Allocation {
            flip = !flip;
            Ok(Measurement::single(if flip { 1.0 } else { 2.0 }))
        } else {
            Ok(Measurement::single(8.0))
        }
    };
    let config = Config::new()
        .with_operations(vec![Operation::Allocation, Operation::Deallocation])
        .with_array_sizes(vec![10])
        .with_trials(6)
        .with_threshold(0.0);

    let report = Runner::with_sampler(config, sampler).run().unwrap();

    assert!(matches!(report.outcomes[0], ConfigOutcome::NoValidData { .. }));
    assert_eq!(report.no_valid_data().len(), 1);
    let results: Vec<_> = report.results().collect();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].process_measured, "Memory Deallocation");
    assert_eq!(results[0].average_time, 8.0);
}

#[test]
fn total_normalization_reports_whole_interval() {
    let sampler = |_: Operation, n: usize| -> SampleResult {
        Ok(Measurement::new(3.0 * n as f64, n as u64))
    };
    let config = Config::new()
        .with_operations(vec![Operation::ContextSwitch])
        .with_iterations(vec![100])
        .with_trials(5)
        .with_normalization(Normalization::Total);

    let report = Runner::with_sampler(config, sampler).run().unwrap();
    assert_eq!(report.results().next().unwrap().average_time, 300.0);
}

#[test]
fn progress_reports_every_configuration() {
    let updates = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&updates);
    let sampler = |_: Operation, _: usize| -> SampleResult { Ok(Measurement::single(1.0)) };
    let config = Config::new()
        .with_operations(vec![Operation::DynamicAccess, Operation::ThreadCreation])
        .with_array_sizes(vec![1, 2])
        .with_iterations(vec![3])
        .with_trials(2);

    Runner::with_sampler(config, sampler)
        .on_progress(move |done, total, label| {
            sink.lock().unwrap().push((done, total, label.to_string()));
        })
        .run()
        .unwrap();

    let updates = updates.lock().unwrap();
    assert_eq!(updates.len(), 3);
    assert_eq!(updates[0].0, 1);
    assert!(updates.iter().all(|(_, total, _)| *total == 3));
    assert_eq!(updates[2].2, "Thread Creation (iterations 3)");
}

#[test]
fn language_label_flows_into_results() {
    let sampler = |_: Operation, _: usize| -> SampleResult { Ok(Measurement::single(1.0)) };
    let config = Config::new()
        .with_operations(vec![Operation::Allocation])
        .with_array_sizes(vec![1])
        .with_trials(2)
        .with_language("RustNightly");

    let report = Runner::with_sampler(config, sampler).run().unwrap();
    assert_eq!(report.language, "RustNightly");
    assert_eq!(
        report.results().next().unwrap().programming_language,
        "RustNightly"
    );
}
