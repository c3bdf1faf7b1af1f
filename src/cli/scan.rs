//! Scan command implementation.
//!
//! Merges command-line flags over the settings file, runs the scan and
//! renders the report.

use crate::cli::OutputFormat;
use crate::config::AppSettings;
use crate::error::{CliResult, ScanError};
use crate::output::{self, ConsoleProgress, LogProgress};
use crate::scanner::{run_scan, CancelToken, ScanJobConfig, ScanObserver, ScanReport};
use crate::types::PortSpec;
use clap::Parser;
use std::process::ExitCode;
use std::time::Duration;
use tracing::warn;

/// Scan a target for open TCP ports.
#[derive(Parser, Debug)]
pub struct ScanCommand {
    /// Target to scan (IPv4 address or hostname)
    ///
    /// Examples:
    ///   192.168.1.1        IPv4 address
    ///   example.com        Hostname
    #[arg(value_name = "TARGET")]
    pub target: String,

    /// Ports to scan (e.g., "80", "80,443", "1-1024", "22,80,443,8000-9000")
    #[arg(short, long)]
    pub ports: Option<String>,

    /// Maximum number of connection attempts in flight (1 = one port at a time)
    #[arg(short = 'c', long)]
    pub concurrency: Option<usize>,

    /// Connection timeout in milliseconds
    #[arg(short = 't', long)]
    pub timeout: Option<u64>,

    /// Rate limit in probes per second (0 = unlimited)
    #[arg(short = 'r', long = "rate")]
    pub rate_limit: Option<u32>,

    /// Output format for results
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Show closed and filtered ports in output
    #[arg(long)]
    pub show_closed: bool,

    /// Clear the terminal before scanning
    #[arg(long)]
    pub clear: bool,
}

/// How a scan that did not error ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    Completed,
    /// Interrupted; partial results were still printed.
    Cancelled,
}

impl ScanOutcome {
    pub fn exit_code(self) -> ExitCode {
        match self {
            Self::Completed => ExitCode::SUCCESS,
            Self::Cancelled => ExitCode::from(130),
        }
    }
}

impl ScanCommand {
    /// Build the scan job from flags, falling back to `settings`.
    pub fn job(&self, settings: &AppSettings) -> CliResult<ScanJobConfig> {
        let ports: PortSpec = self
            .ports
            .as_deref()
            .unwrap_or(&settings.default_ports)
            .parse()?;
        let timeout_ms = self.timeout.unwrap_or(settings.default_timeout_ms);

        Ok(ScanJobConfig::new(&ports, Duration::from_millis(timeout_ms))
            .with_concurrency(self.concurrency.unwrap_or(settings.default_concurrency))
            .with_rate_limit(self.rate_limit.unwrap_or(settings.default_rate_limit)))
    }

    pub fn format(&self, settings: &AppSettings) -> OutputFormat {
        self.output.unwrap_or(settings.default_output_format)
    }

    /// Execute the scan command.
    ///
    /// Resolution and configuration failures are returned as errors. A
    /// cancelled scan still prints what it found and reports
    /// [`ScanOutcome::Cancelled`].
    pub async fn execute(
        &self,
        settings: &AppSettings,
        quiet: bool,
        cancel: &CancelToken,
    ) -> CliResult<ScanOutcome> {
        let job = self.job(settings)?;
        let format = self.format(settings);
        let interactive = format == OutputFormat::Plain && !quiet;

        if self.clear && interactive {
            // Cosmetic; a terminal that cannot be cleared is not an error.
            let _ = console::Term::stdout().clear_screen();
        }

        let observer: Box<dyn ScanObserver> = if interactive {
            Box::new(ConsoleProgress::new(true, true))
        } else {
            Box::new(LogProgress)
        };

        match run_scan(&self.target, &job, observer.as_ref(), cancel).await {
            Ok(report) => {
                self.render(&report, format)?;
                Ok(ScanOutcome::Completed)
            }
            Err(ScanError::Cancelled(report)) => {
                warn!(host = %self.target, "scan interrupted by user");
                if !quiet {
                    output::print_warning("You pressed Ctrl+C, showing partial results");
                }
                self.render(&report, format)?;
                Ok(ScanOutcome::Cancelled)
            }
            Err(ScanError::CancelledBeforeStart) => {
                warn!(host = %self.target, "scan interrupted during resolution");
                if !quiet {
                    output::print_warning("You pressed Ctrl+C before scanning started");
                }
                Ok(ScanOutcome::Cancelled)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn render(&self, report: &ScanReport, format: OutputFormat) -> CliResult<()> {
        output::print_results(report, format, self.show_closed)?;
        Ok(())
    }
}
