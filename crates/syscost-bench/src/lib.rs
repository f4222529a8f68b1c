//! Support code for the `benchmark` command-line runner.
//!
//! - [`selection`]: parsing of operation lists and parameter tables
//! - [`logging`]: tracing subscriber setup

pub mod logging;
pub mod selection;

pub use selection::{parse_list, parse_operations};
