//! Output formatting module.
//!
//! Provides formatters for plain text, JSON, and CSV output of scan reports,
//! and the live progress observers used while a scan runs.

mod csv_format;
mod json_format;
mod plain;
mod progress;

pub use csv_format::{print_csv, write_csv};
pub use json_format::{print_json, write_json};
pub use plain::{print_error, print_plain, print_scan_header, print_warning, write_plain};
pub use progress::{ConsoleProgress, LogProgress};

use crate::cli::OutputFormat;
use crate::scanner::ScanReport;
use std::io;

/// Format and print a report according to the specified format.
pub fn print_results(report: &ScanReport, format: OutputFormat, show_closed: bool) -> io::Result<()> {
    match format {
        OutputFormat::Plain => print_plain(report, show_closed),
        OutputFormat::Json => print_json(report),
        OutputFormat::Csv => print_csv(report, show_closed),
    }
}
