//! Live progress observers.
//!
//! `ConsoleProgress` draws a progress bar and prints each open port the
//! moment it is found. `LogProgress` reports through `tracing` only, which
//! keeps stdout clean for JSON and CSV.

use crate::output::plain::print_scan_header;
use crate::scanner::{PortResult, ScanObserver, ScanReport};
use crate::types::ScanTarget;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::OnceLock;
use tracing::info;

const BAR_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}";

/// Progress bar plus incremental "Port N: Open" lines.
pub struct ConsoleProgress {
    show_bar: bool,
    show_header: bool,
    bar: OnceLock<ProgressBar>,
}

impl ConsoleProgress {
    pub fn new(show_bar: bool, show_header: bool) -> Self {
        Self {
            show_bar,
            show_header,
            bar: OnceLock::new(),
        }
    }

    fn build_bar(&self, total: usize) -> ProgressBar {
        if !self.show_bar {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(total as u64);
        // The template is a constant; fall back to the default style if it is ever rejected.
        let bar_style = ProgressStyle::default_bar()
            .template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-");
        pb.set_style(bar_style);
        pb
    }
}

impl ScanObserver for ConsoleProgress {
    fn on_start(&self, target: &ScanTarget, total_ports: usize) {
        if self.show_header {
            print_scan_header(&target.original, &target.ip.to_string(), total_ports);
        }
        let _ = self.bar.set(self.build_bar(total_ports));
    }

    fn on_result(&self, result: &PortResult) {
        let Some(pb) = self.bar.get() else {
            return;
        };
        pb.inc(1);

        if result.is_open() {
            let line = format!(
                "  {} Port {}: {}",
                style("+").green().bold(),
                result.port,
                style("Open").green()
            );
            // A hidden bar swallows println, so fall back to stdout.
            if pb.is_hidden() {
                println!("{}", line);
            } else {
                pb.println(line);
                pb.set_message(format!("Found open port: {}", result.port));
            }
        }
    }

    fn on_finish(&self, report: &ScanReport) {
        if let Some(pb) = self.bar.get() {
            if report.cancelled {
                pb.abandon_with_message("Scan interrupted");
            } else {
                pb.finish_and_clear();
            }
        }
    }
}

/// Observer that only logs.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgress;

impl ScanObserver for LogProgress {
    fn on_start(&self, target: &ScanTarget, total_ports: usize) {
        info!(host = %target, ports = total_ports, "scanning");
    }

    fn on_result(&self, result: &PortResult) {
        if result.is_open() {
            info!(port = %result.port, "port open");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::PortStatus;
    use crate::types::Port;
    use std::net::Ipv4Addr;

    #[test]
    fn test_console_progress_counts_results() {
        let progress = ConsoleProgress::new(false, false);
        progress.on_start(&ScanTarget::new("127.0.0.1", Ipv4Addr::LOCALHOST), 3);

        for port in 1..=3 {
            progress.on_result(&PortResult::new(Port::new(port).unwrap(), PortStatus::Closed));
        }

        assert_eq!(progress.bar.get().unwrap().position(), 3);
    }

    #[test]
    fn test_console_progress_ignores_results_before_start() {
        let progress = ConsoleProgress::new(false, false);
        progress.on_result(&PortResult::new(Port::new(80).unwrap(), PortStatus::Open));
        assert!(progress.bar.get().is_none());
    }
}
