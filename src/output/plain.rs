//! Plain text output formatting.
//!
//! Produces human-readable output with colors and formatting.

use crate::scanner::{PortStatus, ScanReport};
use console::{style, Style};
use std::io::{self, Write};

const RULE: &str = "═══════════════════════════════════════════════════════════════";
const THIN_RULE: &str = "───────────────────────────────────────────────────────────────";

/// Print results in human-readable plain text format.
pub fn print_plain(report: &ScanReport, show_closed: bool) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_plain(&mut out, report, show_closed)
}

/// Render a report as plain text.
///
/// Open ports are always listed; closed and filtered ones only with
/// `show_closed`.
pub fn write_plain<W: Write>(out: &mut W, report: &ScanReport, show_closed: bool) -> io::Result<()> {
    // Header
    writeln!(out)?;
    writeln!(out, "{}", style(RULE).cyan())?;
    writeln!(
        out,
        "                    {} Scan Results",
        style("portsweep").cyan().bold()
    )?;
    writeln!(out, "{}", style(RULE).cyan())?;
    writeln!(out)?;

    writeln!(out, "  {} {}", style("Target:").bold(), report.target)?;
    writeln!(out, "  {} {}", style("IP Address:").bold(), report.ip_address)?;
    writeln!(
        out,
        "  {} {}",
        style("Started:").bold(),
        report.started_at.format("%Y-%m-%d %H:%M:%S UTC")
    )?;
    writeln!(out)?;

    // Statistics
    writeln!(
        out,
        "  {} {} of {} ports scanned in {:.2}s",
        style("Statistics:").bold(),
        report.ports_scanned,
        report.ports_requested,
        report.duration_ms as f64 / 1000.0
    )?;
    writeln!(
        out,
        "               {} open, {} closed, {} filtered",
        style(report.open_ports.len()).green().bold(),
        style(report.closed_count).red(),
        style(report.filtered_count).yellow()
    )?;
    if report.cancelled {
        writeln!(
            out,
            "  {} scan interrupted, results are partial",
            style("Note:").yellow().bold()
        )?;
    }
    writeln!(out)?;

    let rows: Vec<_> = report
        .results
        .iter()
        .filter(|r| show_closed || r.is_open())
        .collect();

    if rows.is_empty() {
        writeln!(out, "  {}", style("No open ports found.").dim())?;
    } else {
        writeln!(out, "  {}", style(THIN_RULE).dim())?;
        writeln!(
            out,
            "  {:>6}  {:^10}  {}",
            style("PORT").bold(),
            style("STATE").bold(),
            style("RESPONSE").bold()
        )?;
        writeln!(out, "  {}", style(THIN_RULE).dim())?;

        for result in rows {
            let status_style = match result.status {
                PortStatus::Open => Style::new().green().bold(),
                PortStatus::Closed => Style::new().red(),
                PortStatus::Filtered => Style::new().yellow(),
            };

            let response = result
                .response_time_ms
                .map(|ms| format!("{} ms", ms))
                .unwrap_or_default();

            writeln!(
                out,
                "  {:>6}  {:^10}  {}",
                result.port,
                status_style.apply_to(result.status.to_string()),
                style(response).dim()
            )?;
        }

        writeln!(out, "  {}", style(THIN_RULE).dim())?;
    }

    writeln!(out)?;
    writeln!(
        out,
        "  Scanning completed in: {}",
        format_duration(report.duration_ms)
    )?;
    writeln!(out, "{}", style(RULE).cyan())?;
    writeln!(out)?;

    Ok(())
}

/// Print the banner shown before probing starts.
pub fn print_scan_header(target: &str, ip: &str, ports: usize) {
    println!();
    println!(
        "{} {} v{}",
        style("Starting").cyan(),
        style("portsweep").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!("{}", style("-".repeat(60)).dim());
    println!(
        "Please wait, scanning {} ports on remote host {} ({})",
        style(ports).white().bold(),
        style(target).white().bold(),
        ip
    );
    println!("{}", style("-".repeat(60)).dim());
    println!();
}

/// Print an error message.
pub fn print_error(msg: &str) {
    eprintln!("{} {}", style("Error:").red().bold(), msg);
}

/// Print a warning message.
pub fn print_warning(msg: &str) {
    eprintln!("{} {}", style("Warning:").yellow().bold(), msg);
}

/// `H:MM:SS.mmm`, the way elapsed times read on a terminal.
fn format_duration(ms: u64) -> String {
    let (secs, millis) = (ms / 1000, ms % 1000);
    format!(
        "{}:{:02}:{:02}.{:03}",
        secs / 3600,
        (secs / 60) % 60,
        secs % 60,
        millis
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::PortResult;
    use crate::types::Port;
    use chrono::Utc;

    fn report() -> ScanReport {
        let port = |p| Port::new(p).unwrap();
        ScanReport {
            target: "localhost".to_string(),
            ip_address: "127.0.0.1".parse().unwrap(),
            started_at: Utc::now(),
            ports_requested: 3,
            ports_scanned: 3,
            open_ports: vec![port(22)],
            closed_count: 1,
            filtered_count: 1,
            duration_ms: 61_250,
            cancelled: false,
            results: vec![
                PortResult::new(port(21), PortStatus::Closed),
                PortResult::new(port(22), PortStatus::Open).with_response_time(3),
                PortResult::new(port(23), PortStatus::Filtered),
            ],
        }
    }

    fn render(report: &ScanReport, show_closed: bool) -> String {
        let mut buf = Vec::new();
        write_plain(&mut buf, report, show_closed).unwrap();
        console::strip_ansi_codes(&String::from_utf8(buf).unwrap()).into_owned()
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0:00:00.000");
        assert_eq!(format_duration(61_250), "0:01:01.250");
        assert_eq!(format_duration(3_723_004), "1:02:03.004");
    }

    #[test]
    fn test_plain_lists_open_ports_only_by_default() {
        let text = render(&report(), false);
        assert!(text.contains("IP Address: 127.0.0.1"));
        assert!(text.contains("3 of 3 ports scanned"));
        assert!(text.contains("3 ms"));
        assert!(!text.contains("closed  "));
        assert!(text.contains("Scanning completed in: 0:01:01.250"));
    }

    #[test]
    fn test_plain_show_closed_lists_every_port() {
        let text = render(&report(), true);
        assert!(text.contains("    21    closed  "));
        assert!(text.contains("filtered  "));
    }

    #[test]
    fn test_plain_marks_partial_and_empty_reports() {
        let mut partial = report();
        partial.cancelled = true;
        partial.results.retain(|r| !r.is_open());
        partial.open_ports.clear();

        let text = render(&partial, false);
        assert!(text.contains("results are partial"));
        assert!(text.contains("No open ports found."));
    }
}
