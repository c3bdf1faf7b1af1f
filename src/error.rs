//! Error types for portsweep.
//!
//! Uses `thiserror` for ergonomic error definitions.

use crate::scanner::ScanReport;
use crate::types::{PortError, TargetError};
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for scanning operations.
///
/// Per-port connection failures never show up here: a failed probe is simply
/// a port that is not open.
#[derive(Error, Debug)]
pub enum ScanError {
    /// The target could not be resolved; no port was probed.
    #[error("target resolution failed")]
    Resolution(#[from] TargetError),

    /// The scan was interrupted. Carries everything found before the stop.
    #[error("{}", cancelled_message(.0))]
    Cancelled(Box<ScanReport>),

    /// Interrupted while the target was still being looked up.
    #[error("scan cancelled before the target was resolved")]
    CancelledBeforeStart,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ScanError {
    /// The partial report of a cancelled scan, if this is a cancellation.
    pub fn partial_report(&self) -> Option<&ScanReport> {
        match self {
            Self::Cancelled(report) => Some(report),
            _ => None,
        }
    }
}

fn cancelled_message(report: &ScanReport) -> String {
    format!(
        "scan cancelled after {} of {} ports",
        report.ports_scanned, report.ports_requested
    )
}

/// Result type alias for scan operations.
pub type ScanResult<T> = Result<T, ScanError>;

/// Errors raised while loading or saving settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not determine a configuration directory for this platform")]
    DirectoryNotFound,

    #[error("failed to read {path}: {reason}")]
    ReadFailed { path: PathBuf, reason: String },

    #[error("failed to write {path}: {reason}")]
    WriteFailed { path: PathBuf, reason: String },

    #[error("invalid settings file: {0}")]
    InvalidFormat(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Top-level error for the command-line front end.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid port specification: {0}")]
    Ports(#[from] PortError),

    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;
