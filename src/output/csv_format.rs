//! CSV output formatting.

use crate::scanner::ScanReport;
use std::io::{self, Write};

/// Print results in CSV format.
pub fn print_csv(report: &ScanReport, show_closed: bool) -> io::Result<()> {
    let stdout = io::stdout();
    write_csv(stdout.lock(), report, show_closed)
}

/// One row per probed port; closed and filtered rows only with `show_closed`.
pub fn write_csv<W: Write>(out: W, report: &ScanReport, show_closed: bool) -> io::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);

    wtr.write_record(["ip_address", "port", "status", "response_time_ms"])?;

    let ip = report.ip_address.to_string();
    for result in report.results.iter().filter(|r| show_closed || r.is_open()) {
        let port = result.port.to_string();
        let status = result.status.to_string();
        let response = result
            .response_time_ms
            .map_or(String::new(), |t| t.to_string());
        wtr.write_record([ip.as_str(), port.as_str(), status.as_str(), response.as_str()])?;
    }

    wtr.flush()?;
    Ok(())
}
