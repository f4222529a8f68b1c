//! # syscost
//!
//! Micro-benchmarks of operating-system and runtime costs: stack and heap
//! memory access, allocation, deallocation, thread creation, context switch
//! and thread migration.
//!
//! Every configuration (an operation and its array size or iteration count)
//! is measured over repeated trials. The samples are filtered with a
//! single-pass `μ ± tσ` rule and summarized as a
//! [`BenchmarkResult`], the record shared with the other implementations of
//! the harness.
//!
//! ## Quick Start
//!
//! ```no_run
//! use syscost::{Config, Runner};
//!
//! let config = Config::quick();
//! let report = Runner::new(config).run().unwrap();
//!
//! for result in report.results() {
//!     println!("{}: {:.1} ns", result.process_measured, result.average_time);
//! }
//! ```
//!
//! ## Custom samplers
//!
//! The runner only talks to a [`Sampler`]. Any closure with the right
//! signature works, which makes the statistics easy to exercise:
//!
//! ```
//! use syscost::{Config, Measurement, Operation, Runner, SampleError};
//!
//! let config = Config::new()
//!     .with_operations(vec![Operation::Allocation])
//!     .with_array_sizes(vec![10])
//!     .with_trials(20);
//! let sampler = |_: Operation, n: usize| -> Result<Measurement, SampleError> {
//!     Ok(Measurement::new(50.0 * n as f64, n as u64))
//! };
//!
//! let report = Runner::with_sampler(config, sampler).run().unwrap();
//! let result = report.results().next().unwrap();
//! assert_eq!(result.average_time, 50.0);
//! assert_eq!(result.passed_tests, 20);
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod runner;

pub mod measurement;
pub mod output;

pub use config::{Config, DEFAULT_ARRAY_SIZES, DEFAULT_ITERATIONS};
pub use error::{ConfigError, Error, OutputError, Result};
pub use measurement::{SampleError, Sampler, SystemSampler};
pub use runner::{ProgressCallback, RunReport, Runner};

pub use syscost_core::{
    BenchmarkResult, ConfigOutcome, Configuration, Measurement, Normalization, Operation,
    ParameterKind, StatsError, Summary,
};
