//! Core statistics and result types for OS micro-benchmark trials.
//!
//! This crate holds the parts of syscost that must produce numerically
//! identical results across independent implementations of the harness:
//!
//! - Population mean and standard deviation over a sample set
//! - Single-pass σ-multiplier outlier rejection
//! - The per-configuration summary and the reported result record
//!
//! It has no timing or OS dependencies and works in `no_std` environments
//! with an allocator. Measurement lives in the `syscost` crate.
//!
//! # Features
//!
//! - `std` (default): implement `std::error::Error` for the error types
//!
//! ```
//! use syscost_core::statistics::summarize;
//!
//! let mut samples = vec![10.0; 95];
//! samples.extend([10_000.0; 5]);
//!
//! let summary = summarize(&samples, 3.0).unwrap();
//! assert_eq!(summary.passed, 95);
//! assert_eq!(summary.average, 10.0);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod error;
mod math;
pub mod result;
pub mod statistics;
pub mod types;

pub use error::StatsError;
pub use result::{BenchmarkResult, ConfigOutcome, Summary};
pub use statistics::{filter_outliers, mean, std_deviation, summarize, OutlierStats};
pub use types::{Configuration, Measurement, Normalization, Operation, ParameterKind};
