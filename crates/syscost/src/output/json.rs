//! JSON result files.
//!
//! Layout under an output root:
//!
//! ```text
//! <root>/<Lang>_measurements/<Lang>_static_access.json
//! <root>/<Lang>_measurements/<Lang>_dynamic_access.json
//! ...
//! <root>/<Lang>_measurements/<Lang>_results.json
//! ```
//!
//! Each per-operation file is a pretty-printed array of that operation's
//! results in run order. The combined file concatenates them.

use std::fs;
use std::path::{Path, PathBuf};

use syscost_core::{BenchmarkResult, Operation};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::OutputError;
use crate::runner::RunReport;

/// Serialize results to a pretty-printed JSON array.
///
/// # Errors
///
/// Returns an error if serialization fails (should not happen for results).
pub fn to_json_pretty(results: &[BenchmarkResult]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(results)
}

/// Directory holding the result files of `language`.
pub fn measurements_dir(root: &Path, language: &str) -> PathBuf {
    root.join(format!("{}_measurements", language))
}

/// Path of the per-operation result file.
pub fn operation_file(root: &Path, language: &str, operation: Operation) -> PathBuf {
    measurements_dir(root, language).join(format!("{}_{}.json", language, operation.file_stem()))
}

/// Path of the combined result file.
pub fn combined_file(root: &Path, language: &str) -> PathBuf {
    measurements_dir(root, language).join(format!("{}_results.json", language))
}

/// Write results to `path` as a pretty JSON array, creating parent
/// directories as needed.
pub fn write_results(path: &Path, results: &[BenchmarkResult]) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| OutputError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let json = to_json_pretty(results).map_err(|source| OutputError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, json).map_err(|source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), results = results.len(), "Wrote results");
    Ok(())
}

/// Read a result file back.
pub fn load_results(path: &Path) -> Result<Vec<BenchmarkResult>, OutputError> {
    let content = fs::read_to_string(path).map_err(|source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| OutputError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Save a run configuration as pretty JSON, creating parent directories as
/// needed.
pub fn write_config(path: &Path, config: &Config) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| OutputError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let json = serde_json::to_string_pretty(config).map_err(|source| OutputError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, json).map_err(|source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Read a run configuration. Fields absent from the file keep their
/// defaults. The result is not validated.
pub fn load_config(path: &Path) -> Result<Config, OutputError> {
    let content = fs::read_to_string(path).map_err(|source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| OutputError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Concatenate result files into `output`, in the order given.
///
/// Inputs that are missing or do not parse are skipped with a warning.
/// Returns the number of results written.
pub fn combine_files(inputs: &[PathBuf], output: &Path) -> Result<usize, OutputError> {
    let mut combined = Vec::new();
    for input in inputs {
        match load_results(input) {
            Ok(results) => combined.extend(results),
            Err(e) => warn!(error = %e, "Skipping result file"),
        }
    }
    write_results(output, &combined)?;
    Ok(combined.len())
}

/// Files written for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFiles {
    /// Per-operation files, in run order.
    pub operations: Vec<PathBuf>,
    /// The combined file.
    pub combined: PathBuf,
}

/// Write the per-operation files and the combined file of a run.
///
/// Every operation the run covered gets a file, even when all of its
/// configurations produced no valid data.
pub fn write_report(report: &RunReport, root: &Path) -> Result<ReportFiles, OutputError> {
    let language = report.language.as_str();
    let mut operations = Vec::with_capacity(report.operations.len());

    for &operation in &report.operations {
        let results: Vec<BenchmarkResult> = report
            .results_for(operation)
            .into_iter()
            .cloned()
            .collect();
        let path = operation_file(root, language, operation);
        write_results(&path, &results)?;
        operations.push(path);
    }

    let combined = combined_file(root, language);
    combine_files(&operations, &combined)?;

    Ok(ReportFiles {
        operations,
        combined,
    })
}
