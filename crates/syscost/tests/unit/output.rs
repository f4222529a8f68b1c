//! Result files: per-operation files, combined file and loading.

use std::fs;
use std::time::Duration;

use syscost::output::{
    combine_files, combined_file, load_config, load_results, operation_file, write_config,
    write_report, write_results,
};
use syscost::{
    BenchmarkResult, Config, ConfigOutcome, Configuration, Measurement, Normalization, Operation,
    RunReport, Runner, SampleError, Summary,
};
use tempfile::TempDir;

fn result(operation: Operation, parameter: usize, average: f64) -> BenchmarkResult {
    let summary = Summary {
        average,
        std_deviation: 0.5,
        passed: 99,
        total: 100,
    };
    BenchmarkResult::new(
        &Configuration::new(operation, parameter, 100),
        &summary,
        3.0,
        "Rust",
    )
}

fn report(outcomes: Vec<ConfigOutcome>, operations: Vec<Operation>) -> RunReport {
    RunReport {
        outcomes,
        operations,
        language: "Rust".to_string(),
        outlier_threshold: 3.0,
        elapsed: Duration::from_millis(5),
    }
}

#[test]
fn write_and_load_results() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("results.json");
    let results = vec![
        result(Operation::Allocation, 10, 20.0),
        result(Operation::Allocation, 100, 19.5),
    ];

    write_results(&path, &results).unwrap();
    assert_eq!(load_results(&path).unwrap(), results);

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("[\n"));
    assert!(text.contains("\"process_measured\": \"Memory Allocation\""));
}

#[test]
fn report_layout() {
    let dir = TempDir::new().unwrap();
    let outcomes = vec![
        ConfigOutcome::Measured(result(Operation::StaticAccess, 1, 3.0)),
        ConfigOutcome::Measured(result(Operation::StaticAccess, 10, 2.0)),
        ConfigOutcome::NoValidData {
            configuration: Configuration::new(Operation::ContextSwitch, 2, 100),
        },
        ConfigOutcome::Measured(result(Operation::ContextSwitch, 10, 900.0)),
    ];
    let operations = vec![Operation::StaticAccess, Operation::ContextSwitch];

    let files = write_report(&report(outcomes, operations), dir.path()).unwrap();

    assert_eq!(
        files.operations,
        vec![
            operation_file(dir.path(), "Rust", Operation::StaticAccess),
            operation_file(dir.path(), "Rust", Operation::ContextSwitch),
        ]
    );
    assert!(dir
        .path()
        .join("Rust_measurements/Rust_static_access.json")
        .exists());
    assert_eq!(files.combined, combined_file(dir.path(), "Rust"));

    let switch = load_results(&files.operations[1]).unwrap();
    assert_eq!(switch.len(), 1);
    assert_eq!(switch[0].iterations, Some(10));

    let combined = load_results(&files.combined).unwrap();
    let order: Vec<_> = combined.iter().map(|r| r.parameter().unwrap()).collect();
    assert_eq!(order, vec![1, 10, 10]);
}

#[test]
fn operation_without_results_gets_empty_file() {
    let dir = TempDir::new().unwrap();
    let outcomes = vec![ConfigOutcome::NoValidData {
        configuration: Configuration::new(Operation::ThreadMigration, 2, 100),
    }];

    let files = write_report(&report(outcomes, vec![Operation::ThreadMigration]), dir.path())
        .unwrap();

    assert!(load_results(&files.operations[0]).unwrap().is_empty());
    assert!(load_results(&files.combined).unwrap().is_empty());
}

#[test]
fn combine_skips_missing_and_corrupt_files() {
    let dir = TempDir::new().unwrap();
    let good = dir.path().join("good.json");
    let corrupt = dir.path().join("corrupt.json");
    let missing = dir.path().join("missing.json");
    let output = dir.path().join("combined.json");

    write_results(&good, &[result(Operation::Deallocation, 10, 7.0)]).unwrap();
    fs::write(&corrupt, "{ not an array").unwrap();

    let written = combine_files(&[missing, good, corrupt], &output).unwrap();
    assert_eq!(written, 1);
    assert_eq!(load_results(&output).unwrap().len(), 1);
}

#[test]
fn load_reports_bad_json() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.json");
    fs::write(&path, "[1, 2, 3]").unwrap();

    let err = load_results(&path).unwrap_err();
    assert!(err.to_string().contains("bad.json"));
}

#[test]
fn run_then_write() {
    let dir = TempDir::new().unwrap();
    let config = Config::new()
        .with_operations(vec![Operation::ThreadCreation, Operation::ContextSwitch])
        .with_iterations(vec![2, 10])
        .with_trials(3)
        .with_language("Synthetic");
    let sampler = |_: Operation, n: usize| -> Result<Measurement, SampleError> {
        Ok(Measurement::new(n as f64, n as u64))
    };

    let report = Runner::with_sampler(config, sampler).run().unwrap();
    let files = write_report(&report, dir.path()).unwrap();

    assert!(files
        .combined
        .ends_with("Synthetic_measurements/Synthetic_results.json"));
    let combined = load_results(&files.combined).unwrap();
    assert_eq!(combined.len(), 4);
    assert!(combined.iter().all(|r| r.programming_language == "Synthetic"));
    assert_eq!(combined[0].process_measured, "Thread Creation");
    assert_eq!(combined[3].process_measured, "Context Switch");
}

#[test]
fn config_file_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("configs").join("switch.json");
    let config = Config::quick()
        .with_operations(vec![Operation::ContextSwitch])
        .with_iterations(vec![2, 1_000])
        .with_normalization(Normalization::Total)
        .with_pinned_runner();

    write_config(&path, &config).unwrap();
    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("\"context_switch\""));
    assert!(text.contains("\"normalization\": \"total\""));

    assert_eq!(load_config(&path).unwrap(), config);
}

#[test]
fn partial_config_file_takes_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("partial.json");
    fs::write(
        &path,
        r#"{ "trials": 7, "operations": ["allocation", "thread_creation"] }"#,
    )
    .unwrap();

    let config = load_config(&path).unwrap();
    assert_eq!(config.trials, 7);
    assert_eq!(
        config.operations,
        vec![Operation::Allocation, Operation::ThreadCreation]
    );
    assert_eq!(config.outlier_threshold, 3.0);
    assert_eq!(config.array_sizes, syscost::DEFAULT_ARRAY_SIZES.to_vec());
    assert_eq!(config.language, "Rust");
    assert!(config.validate().is_ok());
}

#[test]
fn bad_config_file_is_reported() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{ "trials": "many" }"#).unwrap();

    let err = load_config(&path).unwrap_err();
    assert!(err.to_string().contains("config.json"));
    assert!(load_config(&dir.path().join("absent.json")).is_err());
}
