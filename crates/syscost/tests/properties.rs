//! Property tests for how the runner turns measurements into samples.

use proptest::prelude::*;
use syscost::{Config, Configuration, Measurement, Normalization, Operation, Runner, SampleError};

fn elapsed_times() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.0f64..1.0e9, 1..60)
}

/// Replay `elapsed` in order, each covering `parameter` units.
fn replay(elapsed: Vec<f64>) -> impl FnMut(Operation, usize) -> Result<Measurement, SampleError> {
    let mut trial = 0;
    move |_, parameter| {
        let value = elapsed[trial % elapsed.len()];
        trial += 1;
        Ok(Measurement::new(value, parameter as u64))
    }
}

proptest! {
    #[test]
    fn per_unit_samples_divide_by_units(elapsed in elapsed_times(), n in 1usize..100_000) {
        let trials = elapsed.len();
        let mut runner = Runner::with_sampler(Config::new(), replay(elapsed.clone()));
        let samples = runner
            .collect_samples(&Configuration::new(Operation::Allocation, n, trials))
            .unwrap();

        prop_assert_eq!(samples.len(), trials);
        for (sample, raw) in samples.iter().zip(&elapsed) {
            prop_assert_eq!(*sample, raw / n as f64);
        }
    }

    #[test]
    fn total_samples_keep_elapsed_time(elapsed in elapsed_times(), n in 1usize..100_000) {
        let trials = elapsed.len();
        let config = Config::new().with_normalization(Normalization::Total);
        let mut runner = Runner::with_sampler(config, replay(elapsed.clone()));
        let samples = runner
            .collect_samples(&Configuration::new(Operation::ContextSwitch, n, trials))
            .unwrap();

        prop_assert_eq!(samples, elapsed);
    }

    #[test]
    fn constant_cost_run_keeps_every_trial(
        cost in 0.0f64..1.0e6,
        n in 1usize..10_000,
        trials in 1usize..50,
        t in 0.0f64..5.0,
    ) {
        let config = Config::new()
            .with_operations(vec![Operation::DynamicAccess])
            .with_array_sizes(vec![n])
            .with_trials(trials)
            .with_threshold(t);
        let report = Runner::with_sampler(config, replay(vec![cost * n as f64]))
            .run()
            .unwrap();

        let result = report.results().next().unwrap();
        prop_assert_eq!(result.passed_tests, trials);
        prop_assert_eq!(result.number_of_tests, trials);
        prop_assert_eq!(result.average_time, cost * n as f64 / n as f64);
        prop_assert_eq!(result.std_deviation, 0.0);
    }
}
