//! Result files and terminal output.

mod json;
mod terminal;

pub use json::{
    combine_files, combined_file, load_config, load_results, measurements_dir, operation_file,
    to_json_pretty, write_config, write_report, write_results, ReportFiles,
};
pub use terminal::{format_report, format_results};
