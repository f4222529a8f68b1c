//! CLI tool for running the syscost micro-benchmarks.
//!
//! # Usage
//!
//! ```bash
//! # Full run with the default tables, results under ./Rust_measurements/
//! cargo run --release --bin benchmark
//!
//! # Only context switch and migration, 50 trials, 2σ filter
//! cargo run --release --bin benchmark -- --operations 6,7 -n 50 -t 2
//!
//! # Custom tables, raw totals instead of per-unit times
//! cargo run --release --bin benchmark -- \
//!   --operations static,heap \
//!   --array-sizes "1,1e3,1e6" \
//!   --total
//!
//! # Start from a saved config, override the trial count
//! cargo run --release --bin benchmark -- --config quick.json -n 20
//!
//! # Print a saved result file
//! cargo run --bin benchmark -- --show Rust_measurements/Rust_results.json
//! ```

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

use syscost::measurement::{affinity, resolution_ns};
use syscost::output::{format_report, format_results, load_config, load_results, write_report};
use syscost::{Config, Normalization, Operation, Runner};
use syscost_bench::{logging, parse_list, parse_operations};

/// Operating-system micro-benchmark suite
#[derive(Parser, Debug)]
#[command(name = "benchmark")]
#[command(about = "Measure memory access, allocation, thread creation, context switch and migration costs")]
#[command(version)]
struct Args {
    /// JSON config to start from; other flags override its fields
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Trials per configuration [default: 100]
    #[arg(short = 'n', long)]
    trials: Option<usize>,

    /// Outlier threshold as a multiple of the standard deviation [default: 3.0]
    #[arg(short, long)]
    threshold: Option<f64>,

    /// Operations to run (comma-separated names, 1-7, or "all"/0) [default: all]
    /// Names: static, dynamic, allocation, deallocation, thread-creation,
    /// context-switch, thread-migration
    #[arg(long)]
    operations: Option<String>,

    /// Array sizes for the memory operations (comma-separated)
    #[arg(long)]
    array_sizes: Option<String>,

    /// Iteration counts for the thread operations (comma-separated)
    #[arg(long)]
    iterations: Option<String>,

    /// Output directory for result files
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Language label written into results and file names [default: Rust]
    #[arg(long)]
    language: Option<String>,

    /// Report the whole timed interval instead of time per element/iteration
    #[arg(long)]
    total: bool,

    /// Pin the runner thread to its current CPU
    #[arg(long)]
    pin: bool,

    /// Skip writing JSON result files
    #[arg(long)]
    no_json: bool,

    /// Print a saved result file and exit
    #[arg(long, value_name = "FILE")]
    show: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Only log warnings and errors, hide the progress bar
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let args = Args::parse();
    logging::init(args.verbose, args.quiet);

    if let Some(path) = &args.show {
        match load_results(path) {
            Ok(results) => {
                println!("{}", format_results(&results));
                return;
            }
            Err(e) => {
                eprintln!("Failed to read results: {}", e);
                std::process::exit(1);
            }
        }
    }

    let config = match build_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid arguments: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    if config.includes(Operation::ThreadMigration) && affinity::available_cpus() < 2 {
        tracing::warn!("Fewer than 2 CPUs available; migration will not move the worker");
    }
    tracing::info!(resolution_ns = resolution_ns(), "Clock resolution");

    let total = config.configurations().len();
    let progress_bar = if args.quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(total as u64)
    };
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) | {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-"),
    );
    progress_bar.enable_steady_tick(std::time::Duration::from_millis(100));
    progress_bar.set_message("starting...");

    let pb = progress_bar.clone();
    let mut runner = Runner::new(config).on_progress(move |done, _total, label| {
        pb.set_position(done as u64);
        pb.set_message(label.to_string());
    });

    let report = match runner.run() {
        Ok(report) => report,
        Err(e) => {
            progress_bar.abandon();
            eprintln!("Benchmark failed: {}", e);
            std::process::exit(1);
        }
    };
    progress_bar.finish_and_clear();

    println!("{}", format_report(&report));

    if !args.no_json {
        match write_report(&report, &args.output) {
            Ok(files) => println!("Results written to {}", files.combined.display()),
            Err(e) => {
                eprintln!("Failed to write results: {}", e);
                std::process::exit(1);
            }
        }
    }
}

fn build_config(args: &Args) -> Result<Config, String> {
    let mut config = match &args.config {
        Some(path) => load_config(path).map_err(|e| e.to_string())?,
        None => Config::new(),
    };

    if let Some(trials) = args.trials {
        config = config.with_trials(trials);
    }
    if let Some(threshold) = args.threshold {
        config = config.with_threshold(threshold);
    }
    if let Some(operations) = &args.operations {
        config = config.with_operations(parse_operations(operations)?);
    }
    if let Some(language) = &args.language {
        config = config.with_language(language.clone());
    }

    if let Some(sizes) = &args.array_sizes {
        config = config.with_array_sizes(parse_list(sizes)?);
    }
    if let Some(iterations) = &args.iterations {
        config = config.with_iterations(parse_list(iterations)?);
    }
    if args.total {
        config = config.with_normalization(Normalization::Total);
    }
    if args.pin {
        config = config.with_pinned_runner();
    }
    Ok(config)
}
