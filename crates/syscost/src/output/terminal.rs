//! Terminal summary tables.

use colored::Colorize;
use syscost_core::{BenchmarkResult, ConfigOutcome};

use crate::runner::RunReport;

/// Format a completed run as a table, one row per configuration.
pub fn format_report(report: &RunReport) -> String {
    let mut out = String::new();
    let sep = "\u{2500}".repeat(78);

    out.push_str(&format!(
        "\n  {} results ({}σ threshold, {:.1}s)\n",
        report.language.bold(),
        report.outlier_threshold,
        report.elapsed.as_secs_f64()
    ));
    out.push_str(&sep);
    out.push('\n');
    out.push_str(&header());
    out.push_str(&sep);
    out.push('\n');

    for outcome in &report.outcomes {
        match outcome {
            ConfigOutcome::Measured(result) => out.push_str(&format_row(result)),
            ConfigOutcome::NoValidData { configuration } => {
                out.push_str(&format!(
                    "  {:<24} {:>10}   {}\n",
                    configuration.operation.process_name(),
                    configuration.parameter,
                    "no valid data".yellow()
                ));
            }
        }
    }
    out.push_str(&sep);
    out.push('\n');

    let missing = report
        .outcomes
        .iter()
        .filter(|outcome| outcome.is_no_valid_data())
        .count();
    if missing > 0 {
        out.push_str(&format!(
            "  {}\n",
            format!("{} configuration(s) had no valid data", missing).yellow()
        ));
    }
    out
}

/// Format saved results as a table.
pub fn format_results(results: &[BenchmarkResult]) -> String {
    let mut out = String::new();
    let sep = "\u{2500}".repeat(78);

    out.push_str(&header());
    out.push_str(&sep);
    out.push('\n');
    for result in results {
        out.push_str(&format_row(result));
    }
    out
}

fn header() -> String {
    format!(
        "  {:<24} {:>10} {:>10} {:>14} {:>14}\n",
        "Operation".bold(),
        "Parameter".bold(),
        "Passed".bold(),
        "Average (ns)".bold(),
        "Std dev (ns)".bold()
    )
}

fn format_row(result: &BenchmarkResult) -> String {
    let passed = format!("{}/{}", result.passed_tests, result.number_of_tests);
    // More than 5% rejected is worth a second look.
    let passed = if result.rejected_fraction() > 0.05 {
        passed.yellow().to_string()
    } else {
        passed.green().to_string()
    };
    format!(
        "  {:<24} {:>10} {:>10} {:>14.3} {:>14.3}\n",
        result.process_measured,
        result
            .parameter()
            .map(|p| p.to_string())
            .unwrap_or_else(|| "-".to_string()),
        passed,
        result.average_time,
        result.std_deviation
    )
}
